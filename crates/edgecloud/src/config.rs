use std::path::{Path, PathBuf};

use ec_graph::EdgeGraphConfig;
use ec_sample::SampleConfig;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Invalid(#[from] ec_core::Error),
}

/// Parameters for [`run_pipeline`](crate::run_pipeline).
///
/// Every field has a default, so a config file only needs the values it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Hard cap on the deduplicated raw cloud before classification.
    pub max_raw_points: usize,
    /// Density normalisation of the edge points, applied only when
    /// `downsample_edges` is set.
    pub sample: SampleConfig,
    pub downsample_edges: bool,
    pub graph: EdgeGraphConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_raw_points: 50_000,
            sample: SampleConfig::default(),
            downsample_edges: false,
            graph: EdgeGraphConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON config and validates it.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> ec_core::Result<()> {
        ec_core::ensure_at_least("max_raw_points", self.max_raw_points, 1)?;
        self.sample.validate()?;
        self.graph.validate()
    }
}
