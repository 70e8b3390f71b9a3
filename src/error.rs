//! Error types for the claimflow pipeline

use thiserror::Error;

/// Result type alias for claimflow operations
pub type Result<T> = std::result::Result<T, ClaimflowError>;

/// Main error type for the claimflow pipeline.
///
/// This is a batch analytical job: there are no retries anywhere, every
/// failure aborts the run and is reported to the invoking operator.
#[derive(Error, Debug)]
pub enum ClaimflowError {
    /// The input source is unreachable or corrupt.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// An expected column is absent from the input table.
    #[error("schema mismatch: expected column '{0}' is missing")]
    SchemaMismatch(String),

    /// A fold's held-out partition contains a single label class, so its
    /// ROC-AUC is mathematically undefined.
    #[error("fold {fold}: held-out partition contains a single label class, ROC-AUC is undefined")]
    DegenerateFold { fold: usize },

    #[error("data error: {0}")]
    DataError(String),

    #[error("training error: {0}")]
    TrainingError(String),

    #[error("validation error: {0}")]
    ValidationError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<polars::error::PolarsError> for ClaimflowError {
    fn from(err: polars::error::PolarsError) -> Self {
        ClaimflowError::DataError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ClaimflowError::SchemaMismatch("target".to_string());
        assert_eq!(
            err.to_string(),
            "schema mismatch: expected column 'target' is missing"
        );
    }

    #[test]
    fn test_degenerate_fold_carries_index() {
        let err = ClaimflowError::DegenerateFold { fold: 3 };
        assert!(err.to_string().contains("fold 3"));
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ClaimflowError = io_err.into();
        assert!(matches!(err, ClaimflowError::IoError(_)));
    }
}
