/// Core error types for easefit.
use std::fmt;

/// A specialized Result type for easefit operations.
pub type EaseFitResult<T> = Result<T, EaseFitError>;

/// Which axis of a sample set collapsed during normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeAxis {
    Time,
    Value,
}

impl fmt::Display for RangeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeAxis::Time => write!(f, "time"),
            RangeAxis::Value => write!(f, "value"),
        }
    }
}

/// Top-level error type shared by every easefit crate.
#[derive(Debug, thiserror::Error)]
pub enum EaseFitError {
    #[error("cannot fit: degenerate sample range ({axis} span {span:e})")]
    DegenerateRange { axis: RangeAxis, span: f64 },

    #[error("cannot fit: {axis} span overflows")]
    RangeOverflow { axis: RangeAxis },

    #[error("insufficient samples: found {found}, need at least {required}")]
    InsufficientSamples { found: usize, required: usize },

    #[error("need at least {required} selected keys (found {found})")]
    TooFewSelectedKeys { found: usize, required: usize },

    #[error("need ≥{required} samples in span (found {found})")]
    SparseSpan { found: usize, required: usize },

    #[error("sample {index} has a non-finite time or value")]
    NonFiniteSample { index: usize },

    #[error("sample {index} does not advance in time")]
    UnorderedSamples { index: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config write error: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl EaseFitError {
    /// Create a degenerate-range error for the given axis.
    pub fn degenerate(axis: RangeAxis, span: f64) -> Self {
        EaseFitError::DegenerateRange { axis, span }
    }

    /// Create an insufficient-samples error.
    pub fn insufficient(found: usize, required: usize) -> Self {
        EaseFitError::InsufficientSamples { found, required }
    }

    /// Create an invalid-argument error.
    pub fn invalid(message: impl Into<String>) -> Self {
        EaseFitError::InvalidArgument(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_error_display() {
        let err = EaseFitError::degenerate(RangeAxis::Value, 0.0);
        assert_eq!(
            err.to_string(),
            "cannot fit: degenerate sample range (value span 0e0)"
        );
    }

    #[test]
    fn test_overflow_error_display() {
        let err = EaseFitError::RangeOverflow {
            axis: RangeAxis::Value,
        };
        assert_eq!(err.to_string(), "cannot fit: value span overflows");
    }

    #[test]
    fn test_span_error_display() {
        let keys = EaseFitError::TooFewSelectedKeys {
            found: 1,
            required: 2,
        };
        assert_eq!(keys.to_string(), "need at least 2 selected keys (found 1)");
        let span = EaseFitError::SparseSpan {
            found: 2,
            required: 3,
        };
        assert_eq!(span.to_string(), "need ≥3 samples in span (found 2)");
    }

    #[test]
    fn test_insufficient_error_display() {
        let err = EaseFitError::insufficient(2, 3);
        assert_eq!(
            err.to_string(),
            "insufficient samples: found 2, need at least 3"
        );
    }
}
