use crate::{Error, Point3f, Result};

/// Removes exact duplicates and returns the survivors sorted
/// lexicographically by `(x, y, z)`.
///
/// Equality is bitwise on the coordinate triple after folding `-0.0` into
/// `0.0`. Near-coincident points are kept. Non-finite coordinates fail with
/// [`Error::NonFinite`] naming the first offending input index.
pub fn unique_points(points: &[Point3f]) -> Result<Vec<Point3f>> {
    let mut keyed = Vec::with_capacity(points.len());
    for (index, &p) in points.iter().enumerate() {
        if !p.is_finite() {
            return Err(Error::NonFinite { index });
        }
        // Adding +0.0 maps -0.0 to +0.0 and leaves every other value alone.
        keyed.push(Point3f::new(p.x + 0.0, p.y + 0.0, p.z + 0.0));
    }

    keyed.sort_unstable_by(|a, b| {
        a.x.total_cmp(&b.x)
            .then(a.y.total_cmp(&b.y))
            .then(a.z.total_cmp(&b.z))
    });
    keyed.dedup_by(|a, b| bits(*a) == bits(*b));

    Ok(keyed)
}

/// Keeps `points[i]` wherever `labels[i]` is set.
///
/// This is the hand-off from an external edge classifier: `labels` must be
/// index-aligned with `points`.
pub fn select_labeled(points: &[Point3f], labels: &[bool]) -> Result<Vec<Point3f>> {
    if points.len() != labels.len() {
        return Err(Error::SizeMismatch {
            expected: points.len(),
            actual: labels.len(),
        });
    }

    Ok(points
        .iter()
        .zip(labels)
        .filter_map(|(&p, &keep)| keep.then_some(p))
        .collect())
}

#[inline]
fn bits(p: Point3f) -> [u32; 3] {
    [p.x.to_bits(), p.y.to_bits(), p.z.to_bits()]
}
