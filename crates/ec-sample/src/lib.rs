//! Density normalisation for raw point clouds.
//!
//! `ec-sample` turns an arbitrarily dense, non-uniform point set into a
//! bounded one with roughly even spacing, preferring coverage over exact
//! fidelity.
//!
//! Grid policy:
//! - Cells are axis-aligned cubes of edge `voxel_size` anchored at the
//!   origin; cell `i` on an axis covers `[i * voxel_size, (i + 1) * voxel_size)`.
//! - Each occupied cell contributes exactly one point: the centroid of its
//!   members.
//!
//! Cap policy:
//! - If the voxel output still exceeds `max_points`, exactly `max_points`
//!   survivors are drawn uniformly without replacement.
//! - The draw is the only non-deterministic step; pass your own RNG to
//!   [`sample_with_rng`] or [`random_cap`] to fix it.

mod sample;
mod voxel;

pub use sample::{SampleConfig, random_cap, sample, sample_with_rng};
pub use voxel::voxel_downsample;
