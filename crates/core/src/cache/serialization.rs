//! Pure functions for serializing report responses to/from cache bytes.
//!
//! JSON is used for cache storage so cached values stay human-readable when
//! debugging a live cache.

use thiserror::Error;

use crate::report::GraphResponse;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Serializes a graph response to JSON bytes.
pub fn serialize_report(response: &GraphResponse) -> Result<Vec<u8>, SerializationError> {
    serde_json::to_vec(response).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes back into a graph response.
pub fn deserialize_report(bytes: &[u8]) -> Result<GraphResponse, SerializationError> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip_report() {
        let response = GraphResponse::from_buckets(
            "Travel Entries by month",
            vec![("2024-01".to_string(), 2), ("2024-03".to_string(), 5)],
        );

        let bytes = serialize_report(&response).expect("serialize should succeed");
        let deserialized = deserialize_report(&bytes).expect("deserialize should succeed");

        assert_eq!(response, deserialized);
    }

    #[test]
    fn test_roundtrip_empty_report() {
        let response = GraphResponse::from_buckets("Appointments by year", vec![]);

        let bytes = serialize_report(&response).expect("serialize should succeed");
        let deserialized = deserialize_report(&bytes).expect("deserialize should succeed");

        assert!(deserialized.labels.is_empty());
        assert!(deserialized.datasets[0].data.is_empty());
    }

    #[test]
    fn test_deserialize_malformed_bytes() {
        let result = deserialize_report(b"not valid json");

        assert!(matches!(
            result.unwrap_err(),
            SerializationError::DeserializeFailed(_)
        ));
    }
}
