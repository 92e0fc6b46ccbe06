//! Foundational primitives for point-cloud edge graphs.
//!
//! ## Point Sets
//! A point set is a plain `&[Point3f]`. Identity is positional: everything
//! downstream (edge graphs, label masks) refers to points by their index in
//! one fixed slice, so reordering or resizing a set invalidates anything
//! computed over it.
//!
//! ## Precision
//! Coordinates are `f32`. Accumulations that span many points (centroids,
//! mean distances) are done in `f64` by the crates that perform them.
//!
//! ## Errors
//! [`Error`] is shared across the workspace. Configuration values are
//! validated up front with [`ensure_positive`] and [`ensure_at_least`];
//! nothing is clamped or silently corrected.

mod error;
mod geom;
mod points;

pub use error::{Error, Result, ensure_at_least, ensure_positive};
pub use geom::{Aabb3f, Point3f, Vec3f};
pub use points::{select_labeled, unique_points};
