use ec_core::{Error, Point3f, Result, ensure_at_least, ensure_positive};
use tracing::debug;

use crate::graph::{Edge, EdgeGraph};
use crate::index::{Neighbor, RTreeIndex, SpatialIndex};

#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EdgeGraphConfig {
    /// Neighbours queried per point. Larger values give a denser, noisier
    /// graph.
    pub k: usize,
    /// Multiplier on the mean nearest-neighbour distance that caps edge
    /// length.
    pub max_dist_factor: f32,
}

impl Default for EdgeGraphConfig {
    fn default() -> Self {
        Self {
            k: 2,
            max_dist_factor: 2.0,
        }
    }
}

impl EdgeGraphConfig {
    pub fn validate(&self) -> Result<()> {
        ensure_at_least("k", self.k, 1)?;
        ensure_positive("max_dist_factor", self.max_dist_factor)
    }
}

/// Builds the candidate connectivity graph of `points` using an R-tree.
///
/// Every point links to those of its `k` nearest other points that lie
/// strictly closer than `mean_nearest_distance * max_dist_factor`.
pub fn build_edge_graph(points: &[Point3f], k: usize, max_dist_factor: f32) -> Result<EdgeGraph> {
    let cfg = EdgeGraphConfig { k, max_dist_factor };
    cfg.validate()?;

    if points.len() < 2 {
        return Ok(EdgeGraph::new(points.len(), None));
    }

    let index = RTreeIndex::build(points);
    build_edge_graph_with(points, &cfg, &index)
}

/// [`build_edge_graph`] over a caller-provided index of `points`.
pub fn build_edge_graph_with<I: SpatialIndex>(
    points: &[Point3f],
    cfg: &EdgeGraphConfig,
    index: &I,
) -> Result<EdgeGraph> {
    cfg.validate()?;

    if index.len() != points.len() {
        return Err(Error::SizeMismatch {
            expected: points.len(),
            actual: index.len(),
        });
    }

    if points.len() < 2 {
        return Ok(EdgeGraph::new(points.len(), None));
    }

    let max_dist = distance_gate(points, index, cfg.max_dist_factor);
    let mut graph = EdgeGraph::new(points.len(), Some(max_dist));

    for edge in admit_all(points, index, cfg.k, max_dist) {
        graph.insert(edge);
    }

    debug!(
        points = points.len(),
        k = cfg.k,
        max_dist,
        edges = graph.len(),
        "edge graph built"
    );

    Ok(graph)
}

/// Mean distance from each point to its nearest other point.
///
/// `None` for fewer than two points.
pub fn mean_nearest_distance<I: SpatialIndex>(points: &[Point3f], index: &I) -> Option<f32> {
    if points.len() < 2 {
        return None;
    }

    let mut sum = 0.0_f64;
    for (i, &p) in points.iter().enumerate() {
        if let Some(nn) = nearest_others(index, p, i, 1).first() {
            sum += nn.distance as f64;
        }
    }

    Some((sum / points.len() as f64) as f32)
}

fn distance_gate<I: SpatialIndex>(points: &[Point3f], index: &I, factor: f32) -> f32 {
    // Two points are each other's only neighbour: no spacing to compare
    // against, so nothing is gated.
    if points.len() == 2 {
        return f32::INFINITY;
    }

    let mean = mean_nearest_distance(points, index).unwrap_or(f32::INFINITY);
    let max_dist = mean * factor;
    debug!(mean_nearest = mean, max_dist, "distance gate");
    max_dist
}

/// Up to `k` nearest points to `p` other than index `i`.
fn nearest_others<I: SpatialIndex>(
    index: &I,
    p: Point3f,
    i: usize,
    k: usize,
) -> Vec<Neighbor> {
    // No point has more than `len - 1` others.
    let k = k.min(index.len().saturating_sub(1));
    let mut nn = index.nearest(p, k.saturating_add(1));
    nn.retain(|n| n.index != i);
    nn.truncate(k);
    nn
}

fn admit<I: SpatialIndex>(
    points: &[Point3f],
    index: &I,
    i: usize,
    k: usize,
    max_dist: f32,
) -> Vec<Edge> {
    nearest_others(index, points[i], i, k)
        .into_iter()
        .filter(|n| n.distance < max_dist)
        .filter_map(|n| Edge::new(i, n.index))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn admit_all<I: SpatialIndex>(
    points: &[Point3f],
    index: &I,
    k: usize,
    max_dist: f32,
) -> Vec<Edge> {
    (0..points.len())
        .flat_map(|i| admit(points, index, i, k, max_dist))
        .collect()
}

#[cfg(feature = "parallel")]
fn admit_all<I: SpatialIndex>(
    points: &[Point3f],
    index: &I,
    k: usize,
    max_dist: f32,
) -> Vec<Edge> {
    use rayon::prelude::*;

    (0..points.len())
        .into_par_iter()
        .flat_map_iter(|i| admit(points, index, i, k, max_dist))
        .collect()
}
