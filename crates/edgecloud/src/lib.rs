//! Umbrella crate for the `edgecloud` workspace.
//!
//! Re-exports the geometry, sampling and graph crates, and wires them into
//! the in-process pipeline that sits between an external edge classifier
//! and downstream wire construction.

mod classify;
mod config;
mod pipeline;

pub use ec_core::*;
pub use ec_graph::*;
pub use ec_sample::*;

pub use classify::{EdgeClassifier, LabelLookup};
pub use config::{ConfigError, PipelineConfig};
pub use pipeline::{PipelineOutput, PipelineStats, run_pipeline};
