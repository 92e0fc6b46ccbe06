/// Errors shared by every `edgecloud` crate.
///
/// Empty or singleton inputs are never errors; only configuration values
/// outside their documented range and mismatched companion arrays are.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },
    #[error("size mismatch: expected {expected}, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },
    #[error("non-finite coordinate at point {index}")]
    NonFinite { index: usize },
}

pub type Result<T> = core::result::Result<T, Error>;

impl Error {
    pub fn invalid(name: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name,
            reason: reason.into(),
        }
    }
}

/// Fails with [`Error::InvalidArgument`] unless `value` is finite and `> 0`.
pub fn ensure_positive(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::invalid(
            name,
            format!("must be finite and > 0, got {value}"),
        ))
    }
}

/// Fails with [`Error::InvalidArgument`] when `value` is below `min`.
pub fn ensure_at_least(name: &'static str, value: usize, min: usize) -> Result<()> {
    if value >= min {
        Ok(())
    } else {
        Err(Error::invalid(name, format!("must be >= {min}, got {value}")))
    }
}
