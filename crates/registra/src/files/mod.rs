//! Attachment file storage.

mod disk;

pub use disk::DiskFileStore;

use registra_core::storage::{RepositoryError, Result};

/// Content type accepted for record attachments.
pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Checks an uploaded attachment against the media-type and size limits
/// before it is written anywhere.
pub fn validate_attachment(
    content_type: Option<&str>,
    size: usize,
    limit: usize,
) -> Result<()> {
    match content_type {
        Some(ct) if ct == PDF_CONTENT_TYPE => {}
        Some(ct) => {
            return Err(RepositoryError::UnsupportedMediaType(ct.to_string()));
        }
        None => {
            return Err(RepositoryError::UnsupportedMediaType(
                "unknown".to_string(),
            ));
        }
    }
    if size > limit {
        return Err(RepositoryError::PayloadTooLarge { size, limit });
    }
    Ok(())
}
