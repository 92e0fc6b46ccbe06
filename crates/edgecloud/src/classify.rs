use std::collections::HashMap;

use ec_core::{Error, Point3f, Result};

/// Seam to the external model that tags points as lying on a feature edge.
///
/// `classify` must return one label per input point, index-aligned.
pub trait EdgeClassifier {
    fn classify(&mut self, points: &[Point3f]) -> Result<Vec<bool>>;
}

impl<F> EdgeClassifier for F
where
    F: FnMut(&[Point3f]) -> Result<Vec<bool>>,
{
    fn classify(&mut self, points: &[Point3f]) -> Result<Vec<bool>> {
        self(points)
    }
}

/// Labels computed ahead of time, looked up by exact coordinate.
///
/// Lookup survives the reordering and deduplication that happen before
/// classification. A coordinate that appears several times in the source
/// is an edge point if any of its copies was labelled one; coordinates not
/// in the source are non-edge.
#[derive(Debug, Clone, Default)]
pub struct LabelLookup {
    labels: HashMap<[u32; 3], bool>,
}

impl LabelLookup {
    pub fn new(points: &[Point3f], labels: &[bool]) -> Result<Self> {
        if points.len() != labels.len() {
            return Err(Error::SizeMismatch {
                expected: points.len(),
                actual: labels.len(),
            });
        }

        let mut map = HashMap::with_capacity(points.len());
        for (&p, &is_edge) in points.iter().zip(labels) {
            *map.entry(key(p)).or_insert(false) |= is_edge;
        }
        Ok(Self { labels: map })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn get(&self, p: Point3f) -> bool {
        self.labels.get(&key(p)).copied().unwrap_or(false)
    }
}

impl EdgeClassifier for LabelLookup {
    fn classify(&mut self, points: &[Point3f]) -> Result<Vec<bool>> {
        Ok(points.iter().map(|&p| self.get(p)).collect())
    }
}

#[inline]
fn key(p: Point3f) -> [u32; 3] {
    [
        (p.x + 0.0).to_bits(),
        (p.y + 0.0).to_bits(),
        (p.z + 0.0).to_bits(),
    ]
}

#[cfg(test)]
mod tests {
    use ec_core::{Error, Point3f};

    use crate::{EdgeClassifier, LabelLookup};

    #[test]
    fn lookup_is_order_independent() {
        let pts = [
            Point3f::new(0.0, 0.0, 0.0),
            Point3f::new(1.0, 0.0, 0.0),
            Point3f::new(2.0, 0.0, 0.0),
        ];
        let mut lookup = LabelLookup::new(&pts, &[false, true, true]).expect("aligned");

        let query = [pts[2], pts[0], Point3f::new(9.0, 9.0, 9.0), pts[1]];
        assert_eq!(
            lookup.classify(&query).expect("infallible"),
            vec![true, false, false, true]
        );
    }

    #[test]
    fn duplicate_coordinates_merge_with_or() {
        let p = Point3f::new(0.5, -0.0, 1.0);
        let lookup = LabelLookup::new(&[p, p], &[false, true]).expect("aligned");
        assert_eq!(lookup.len(), 1);
        assert!(lookup.get(Point3f::new(0.5, 0.0, 1.0)));
    }

    #[test]
    fn misaligned_labels_are_rejected() {
        assert!(matches!(
            LabelLookup::new(&[Point3f::default()], &[]),
            Err(Error::SizeMismatch { .. })
        ));
    }

    #[test]
    fn closures_are_classifiers() {
        let mut by_height = |pts: &[Point3f]| -> ec_core::Result<Vec<bool>> {
            Ok(pts.iter().map(|p| p.z > 0.5).collect())
        };
        let out = by_height
            .classify(&[Point3f::new(0.0, 0.0, 1.0), Point3f::default()])
            .expect("infallible");
        assert_eq!(out, vec![true, false]);
    }
}
