//! Error types for the provider layer.

use thiserror::Error;

use crate::contract::ResourceUri;

/// Errors surfaced by provider operations.
///
/// `InvalidArgument`, `Unsupported` and `WriteFailure` are contract errors:
/// they are raised synchronously at the offending call and are never retried.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Malformed input: a missing required field, a column outside the
    /// table's column set, or an unresolvable resource identifier.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A structurally valid request for an operation the table does not
    /// permit. Callers should treat this as a programming error.
    #[error("{0}")]
    Unsupported(&'static str),

    /// The underlying insert did not yield a valid new row id.
    #[error("failed to insert row into {uri}")]
    WriteFailure { uri: ResourceUri },

    /// SQLite error
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO error (database file handling)
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for provider operations.
pub type ProviderResult<T> = Result<T, ProviderError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProviderError::Unsupported("Deletes are not supported");
        assert_eq!(err.to_string(), "Deletes are not supported");

        let err = ProviderError::InvalidArgument("unknown URI content://x/y".to_string());
        assert_eq!(err.to_string(), "invalid argument: unknown URI content://x/y");
    }

    #[test]
    fn test_write_failure_names_target() {
        let uri = ResourceUri::parse("content://gallery/chosen_photos").unwrap();
        let err = ProviderError::WriteFailure { uri };
        assert_eq!(
            err.to_string(),
            "failed to insert row into content://gallery/chosen_photos"
        );
    }
}
