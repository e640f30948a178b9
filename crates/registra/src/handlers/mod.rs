pub mod appointments;
pub mod employees;
pub mod error;
pub mod travels;

pub use error::AppError;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;

use registra_core::storage::RepositoryError;

/// An attachment file lifted out of a multipart request.
pub(crate) struct UploadedFile {
    pub name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A record-create/update request body: the text fields plus at most one
/// attachment file.
pub(crate) struct RecordRequest {
    pub fields: serde_json::Map<String, serde_json::Value>,
    pub file: Option<UploadedFile>,
}

impl RecordRequest {
    /// Deserializes the collected text fields into a payload model.
    pub fn payload<T: serde::de::DeserializeOwned>(&self) -> Result<T, AppError> {
        serde_json::from_value(serde_json::Value::Object(self.fields.clone())).map_err(|e| {
            AppError::from(RepositoryError::Validation(format!(
                "Failed to parse request: {e}"
            )))
        })
    }
}

/// Reads a create/update request that is multipart when an attachment is
/// present and plain JSON otherwise.
pub(crate) async fn parse_record_request(request: Request) -> Result<RecordRequest, AppError> {
    let is_multipart = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("multipart/form-data"));

    if !is_multipart {
        let bytes = axum::body::to_bytes(request.into_body(), usize::MAX)
            .await
            .map_err(|e| RepositoryError::Validation(format!("Failed to read body: {e}")))?;
        let fields = if bytes.is_empty() {
            serde_json::Map::new()
        } else {
            serde_json::from_slice(&bytes)
                .map_err(|e| RepositoryError::Validation(format!("Invalid JSON body: {e}")))?
        };
        return Ok(RecordRequest {
            fields,
            file: None,
        });
    }

    let mut multipart = Multipart::from_request(request, &())
        .await
        .map_err(|e| RepositoryError::Validation(format!("Invalid multipart body: {e}")))?;

    let mut fields = serde_json::Map::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::from(RepositoryError::Validation(e.to_string())))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "attachment" && field.file_name().is_some() {
            let file_name = field.file_name().unwrap_or("attachment").to_string();
            let content_type = field.content_type().map(str::to_string);
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::from(RepositoryError::Validation(e.to_string())))?;
            file = Some(UploadedFile {
                name: file_name,
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| AppError::from(RepositoryError::Validation(e.to_string())))?;
            fields.insert(name, serde_json::Value::String(value));
        }
    }

    Ok(RecordRequest { fields, file })
}
