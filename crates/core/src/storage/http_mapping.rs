//! Pure functions for mapping repository errors to the HTTP surface.
//!
//! Handlers build their structured error bodies from these mappings; no
//! failure is ever flattened into a success response.

use super::RepositoryError;

/// Maps a [`RepositoryError`] to an HTTP status code.
pub fn repository_error_to_status_code(error: &RepositoryError) -> u16 {
    match error {
        RepositoryError::Validation(_) => 400,
        RepositoryError::NotFound { .. } => 404,
        RepositoryError::UnsupportedMediaType(_) => 415,
        RepositoryError::PayloadTooLarge { .. } => 413,
        RepositoryError::ConnectionFailed(_) => 503,
        RepositoryError::QueryFailed(_) => 500,
        RepositoryError::InvalidData(_) => 400,
    }
}

/// Maps a [`RepositoryError`] to its machine-readable kind string.
///
/// This is the `error` field of every failure response body.
pub fn repository_error_kind(error: &RepositoryError) -> &'static str {
    match error {
        RepositoryError::Validation(_) => "validation",
        RepositoryError::NotFound { .. } => "not_found",
        RepositoryError::UnsupportedMediaType(_) => "unsupported_media_type",
        RepositoryError::PayloadTooLarge { .. } => "payload_too_large",
        RepositoryError::ConnectionFailed(_) => "store_unavailable",
        RepositoryError::QueryFailed(_) => "store_error",
        RepositoryError::InvalidData(_) => "invalid_data",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_maps_to_400() {
        let error = RepositoryError::Validation("missing field".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
        assert_eq!(repository_error_kind(&error), "validation");
    }

    #[test]
    fn test_not_found_maps_to_404() {
        let error = RepositoryError::NotFound {
            entity_type: "Appointment",
            id: "9".to_string(),
        };
        assert_eq!(repository_error_to_status_code(&error), 404);
        assert_eq!(repository_error_kind(&error), "not_found");
    }

    #[test]
    fn test_unsupported_media_maps_to_415() {
        let error = RepositoryError::UnsupportedMediaType("text/html".to_string());
        assert_eq!(repository_error_to_status_code(&error), 415);
    }

    #[test]
    fn test_payload_too_large_maps_to_413() {
        let error = RepositoryError::PayloadTooLarge {
            size: 1,
            limit: 0,
        };
        assert_eq!(repository_error_to_status_code(&error), 413);
    }

    #[test]
    fn test_connection_failed_maps_to_503() {
        let error = RepositoryError::ConnectionFailed("database locked".to_string());
        assert_eq!(repository_error_to_status_code(&error), 503);
        assert_eq!(repository_error_kind(&error), "store_unavailable");
    }

    #[test]
    fn test_query_failed_maps_to_500() {
        let error = RepositoryError::QueryFailed("syntax error".to_string());
        assert_eq!(repository_error_to_status_code(&error), 500);
        assert_eq!(repository_error_kind(&error), "store_error");
    }

    #[test]
    fn test_invalid_data_maps_to_400() {
        let error = RepositoryError::InvalidData("bad foreign key".to_string());
        assert_eq!(repository_error_to_status_code(&error), 400);
    }
}
