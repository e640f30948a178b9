use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Report cache TTL in seconds (default: 600)
    pub cache_ttl_seconds: u64,
    /// Maximum number of cache entries (default: 10,000)
    pub cache_max_entries: usize,
    /// Path to SQLite database file (default: "registra.db")
    pub sqlite_path: String,
    /// Directory attachment files are stored in (default: "uploads")
    pub uploads_dir: String,
    /// Maximum attachment size in bytes (default: 10 MiB)
    pub max_attachment_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `CACHE_TTL_SECONDS` - Report cache TTL in seconds (default: 600)
    /// - `CACHE_MAX_ENTRIES` - Maximum cache entries (default: 10,000)
    /// - `SQLITE_PATH` - SQLite database path (default: "registra.db")
    /// - `UPLOADS_DIR` - Attachment directory (default: "uploads")
    /// - `MAX_ATTACHMENT_BYTES` - Attachment size limit (default: 10 MiB)
    pub fn from_env() -> Self {
        Self {
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(600),
            cache_max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "registra.db".to_string()),
            uploads_dir: env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()),
            max_attachment_bytes: env::var("MAX_ATTACHMENT_BYTES")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10 * 1024 * 1024),
        }
    }

    /// Get the report cache TTL as a Duration.
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_ttl_conversion() {
        let config = Config {
            cache_ttl_seconds: 600,
            cache_max_entries: 10_000,
            sqlite_path: "test.db".to_string(),
            uploads_dir: "uploads".to_string(),
            max_attachment_bytes: 10 * 1024 * 1024,
        };

        assert_eq!(config.cache_ttl(), Duration::from_secs(600));
    }

    #[test]
    fn test_default_values() {
        env::remove_var("CACHE_TTL_SECONDS");
        env::remove_var("CACHE_MAX_ENTRIES");
        env::remove_var("SQLITE_PATH");
        env::remove_var("UPLOADS_DIR");
        env::remove_var("MAX_ATTACHMENT_BYTES");

        let config = Config::from_env();

        assert_eq!(config.cache_ttl_seconds, 600);
        assert_eq!(config.cache_max_entries, 10_000);
        assert_eq!(config.sqlite_path, "registra.db");
        assert_eq!(config.uploads_dir, "uploads");
        assert_eq!(config.max_attachment_bytes, 10 * 1024 * 1024);
    }
}
