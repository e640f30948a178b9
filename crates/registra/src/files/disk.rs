//! Filesystem-backed attachment store.
//!
//! Files are stored flat under one directory with collision-resistant
//! generated names (epoch millis + random id + sanitized original name) and
//! exposed under `/uploads/...` public paths.

use std::path::PathBuf;

use async_trait::async_trait;
use uuid::Uuid;

use registra_core::storage::{FileStore, RepositoryError, Result};

/// Public path prefix for stored attachments.
const PUBLIC_PREFIX: &str = "/uploads/";

/// Keeps the original filename recognizable while ruling out separators and
/// anything else the filesystem could mistreat.
fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "attachment".to_string()
    } else {
        cleaned
    }
}

/// Attachment store rooted at a local directory.
pub struct DiskFileStore {
    root: PathBuf,
}

impl DiskFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolves a public `/uploads/...` path back to the file on disk,
    /// rejecting anything that could escape the root directory.
    fn resolve(&self, path: &str) -> Result<PathBuf> {
        let name = path.strip_prefix(PUBLIC_PREFIX).ok_or_else(|| {
            RepositoryError::InvalidData(format!("not an attachment path: {path}"))
        })?;
        if name.is_empty() || name.contains('/') || name.contains('\\') || name.contains("..") {
            return Err(RepositoryError::InvalidData(format!(
                "invalid attachment path: {path}"
            )));
        }
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl FileStore for DiskFileStore {
    async fn save(&self, original_name: &str, bytes: &[u8]) -> Result<String> {
        tokio::fs::create_dir_all(&self.root)
            .await
            .map_err(|e| RepositoryError::QueryFailed(format!("create uploads dir: {e}")))?;

        let name = format!(
            "{}-{}-{}",
            chrono::Utc::now().timestamp_millis(),
            Uuid::new_v4().simple(),
            sanitize_name(original_name)
        );
        let target = self.root.join(&name);

        tokio::fs::write(&target, bytes)
            .await
            .map_err(|e| RepositoryError::QueryFailed(format!("write attachment: {e}")))?;

        tracing::debug!(file = %target.display(), size = bytes.len(), "Attachment stored");
        Ok(format!("{PUBLIC_PREFIX}{name}"))
    }

    async fn delete(&self, path: &str) -> Result<()> {
        let target = self.resolve(path)?;

        match tokio::fs::remove_file(&target).await {
            Ok(()) => Ok(()),
            // Already gone is fine; the reference was stale
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(RepositoryError::QueryFailed(format!(
                "delete attachment: {e}"
            ))),
        }
    }
}
