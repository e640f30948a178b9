use thiserror::Error;

/// Errors that can occur during record-store and file-store operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("{entity_type} not found: {id}")]
    NotFound {
        entity_type: &'static str,
        id: String,
    },
    #[error("Unsupported media type: {0}")]
    UnsupportedMediaType(String),
    #[error("Payload too large: {size} bytes exceeds limit of {limit} bytes")]
    PayloadTooLarge { size: usize, limit: usize },
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Query failed: {0}")]
    QueryFailed(String),
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, RepositoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let error = RepositoryError::Validation("missing required field: name".to_string());
        assert_eq!(
            error.to_string(),
            "Validation failed: missing required field: name"
        );
    }

    #[test]
    fn test_not_found_display() {
        let error = RepositoryError::NotFound {
            entity_type: "TravelAuthority",
            id: "42".to_string(),
        };
        assert_eq!(error.to_string(), "TravelAuthority not found: 42");
    }

    #[test]
    fn test_unsupported_media_type_display() {
        let error = RepositoryError::UnsupportedMediaType("image/png".to_string());
        assert_eq!(error.to_string(), "Unsupported media type: image/png");
    }

    #[test]
    fn test_payload_too_large_display() {
        let error = RepositoryError::PayloadTooLarge {
            size: 11_000_000,
            limit: 10_485_760,
        };
        assert_eq!(
            error.to_string(),
            "Payload too large: 11000000 bytes exceeds limit of 10485760 bytes"
        );
    }

    #[test]
    fn test_query_failed_display() {
        let error = RepositoryError::QueryFailed("no such table".to_string());
        assert_eq!(error.to_string(), "Query failed: no such table");
    }
}
