use std::cmp::Ordering;
use std::collections::BTreeMap;

use ec_core::{Point3f, Result, ensure_positive};
use tracing::debug;

/// Floored cell coordinate along one axis.
///
/// Kept as `f64` so cells beyond the `i64` range stay distinct. `-0.0` is
/// folded into `+0.0` on construction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Cell(f64);

impl Cell {
    fn floor(v: f64) -> Self {
        Self(v.floor() + 0.0)
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for Cell {}

impl PartialOrd for Cell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

type VoxelKey = [Cell; 3];

#[derive(Debug, Clone, Copy, Default)]
struct VoxelAcc {
    sum: [f64; 3],
    count: u32,
}

impl VoxelAcc {
    fn push(&mut self, p: Point3f) {
        self.sum[0] += p.x as f64;
        self.sum[1] += p.y as f64;
        self.sum[2] += p.z as f64;
        self.count += 1;
    }

    fn centroid(&self) -> Point3f {
        let n = self.count as f64;
        Point3f::new(
            (self.sum[0] / n) as f32,
            (self.sum[1] / n) as f32,
            (self.sum[2] / n) as f32,
        )
    }
}

/// Cell of the world-aligned grid containing `p`.
///
/// Cells are half-open: `[i * voxel_size, (i + 1) * voxel_size)` per axis.
#[inline]
pub(crate) fn voxel_key(p: Point3f, voxel_size: f32) -> VoxelKey {
    let inv = 1.0 / voxel_size as f64;
    [
        Cell::floor(p.x as f64 * inv),
        Cell::floor(p.y as f64 * inv),
        Cell::floor(p.z as f64 * inv),
    ]
}

/// Replaces every occupied grid cell by the centroid of the points it holds.
///
/// The grid is anchored at the origin, so the result does not depend on the
/// extent of the input. Output is ordered by cell key, which makes the
/// result deterministic for a given input.
pub fn voxel_downsample(points: &[Point3f], voxel_size: f32) -> Result<Vec<Point3f>> {
    ensure_positive("voxel_size", voxel_size)?;

    if points.is_empty() {
        return Ok(Vec::new());
    }

    let mut cells: BTreeMap<VoxelKey, VoxelAcc> = BTreeMap::new();
    for &p in points {
        cells.entry(voxel_key(p, voxel_size)).or_default().push(p);
    }

    let out: Vec<Point3f> = cells.values().map(VoxelAcc::centroid).collect();

    debug!(
        input = points.len(),
        output = out.len(),
        voxel_size,
        "voxel downsample"
    );

    Ok(out)
}
