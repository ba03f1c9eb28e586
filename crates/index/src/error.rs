//! Error types for the vector index.

use nexus_core::AppError;
use thiserror::Error;

/// Errors raised by index operations.
///
/// `DimensionMismatch` is always detected before any mutation or scoring,
/// so a failed call leaves the index exactly as it was.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A vector's length differs from the index dimension.
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// An index was requested with a zero dimension.
    #[error("Invalid dimension {0}: dimension must be positive")]
    InvalidDimension(usize),

    /// A blocking index task panicked or was cancelled.
    #[error("Index task failed: {0}")]
    TaskFailed(String),
}

impl IndexError {
    /// Check `actual` against the configured dimension.
    pub fn check_dimension(expected: usize, actual: usize) -> IndexResult<()> {
        if expected == actual {
            Ok(())
        } else {
            Err(IndexError::DimensionMismatch { expected, actual })
        }
    }
}

impl From<IndexError> for AppError {
    fn from(err: IndexError) -> Self {
        AppError::Index(err.to_string())
    }
}

/// Convenience type alias for Results with IndexError.
pub type IndexResult<T> = Result<T, IndexError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_dimension() {
        assert!(IndexError::check_dimension(3, 3).is_ok());
        assert_eq!(
            IndexError::check_dimension(3, 2),
            Err(IndexError::DimensionMismatch {
                expected: 3,
                actual: 2
            })
        );
    }

    #[test]
    fn test_into_app_error() {
        let err: AppError = IndexError::DimensionMismatch {
            expected: 4,
            actual: 1,
        }
        .into();
        assert!(matches!(err, AppError::Index(_)));
        assert_eq!(
            err.to_string(),
            "Index error: Dimension mismatch: expected 4, got 1"
        );
    }
}
