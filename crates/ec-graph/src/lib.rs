//! Density-adaptive connectivity graphs over classified edge points.
//!
//! Given the edge-point subset of a cloud, this crate proposes which pairs
//! of points are likely neighbours along the same geometric feature:
//! - Each point is linked to its `k` nearest other points.
//! - A link is kept only if it is strictly shorter than
//!   `mean_nearest_distance * max_dist_factor`, so the gate follows the
//!   point spacing of the input rather than an absolute length.
//! - Links found from both endpoints collapse to one canonical [`Edge`].
//!
//! Degree is not bounded by `k`: a point also receives every link from
//! neighbours that rank it among their own top `k`.
//!
//! Neighbour search goes through the [`SpatialIndex`] trait. [`RTreeIndex`]
//! is the default; any implementation that orders results by
//! `(distance, index)` gives identical graphs.
//!
//! This is candidate topology only. Loop detection, curve fitting and wire
//! construction are left for later stages.

mod build;
mod graph;
mod index;

pub use build::{EdgeGraphConfig, build_edge_graph, build_edge_graph_with, mean_nearest_distance};
pub use graph::{Edge, EdgeGraph};
pub use index::{LinearIndex, Neighbor, RTreeIndex, SpatialIndex};
