use std::path::PathBuf;

use crate::auth::JwtConfig;

/// Server configuration
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | WORK_DIR | ./data | Database, stored assets and logs |
/// | DATABASE_PATH | {WORK_DIR}/menu.db | SQLite file |
/// | HTTP_PORT | 3000 | HTTP port |
/// | PUBLIC_URL | http://localhost:{HTTP_PORT} | Base of asset URLs |
/// | ENVIRONMENT | development | development / staging / production |
/// | LOG_LEVEL | info | tracing filter |
/// | LOG_DIR | unset | Daily rolling log files when set |
/// | REQUEST_TIMEOUT_MS | 30000 | Per-request timeout |
/// | MAX_UPLOAD_BYTES | 5242880 | Multipart body limit |
/// | JWT_SECRET | random in debug builds | Token verification key |
/// | JWT_ISSUER / JWT_AUDIENCE | menu-server / menu-clients | Required token claims |
///
/// ```ignore
/// WORK_DIR=/srv/menu HTTP_PORT=8080 cargo run -p menu-server
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Work directory holding the database, assets and logs
    pub work_dir: String,
    /// SQLite database file
    pub database_path: String,
    /// HTTP API port
    pub http_port: u16,
    /// Public base URL used to build asset links (no trailing slash)
    pub public_url: String,
    /// JWT verification settings
    pub jwt: JwtConfig,
    /// Runtime environment: development | staging | production
    pub environment: String,
    pub log_level: String,
    pub log_dir: Option<String>,
    /// Request timeout (milliseconds)
    pub request_timeout_ms: u64,
    /// Maximum accepted request body, uploads included
    pub max_upload_bytes: usize,
}

impl Config {
    /// Load configuration from environment variables, falling back to defaults
    pub fn from_env() -> Self {
        let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "./data".into());
        let http_port = std::env::var("HTTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3000);

        Self {
            database_path: std::env::var("DATABASE_PATH")
                .unwrap_or_else(|_| format!("{}/menu.db", work_dir)),
            public_url: std::env::var("PUBLIC_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| format!("http://localhost:{}", http_port)),
            http_port,
            work_dir,
            jwt: JwtConfig::from_env(),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            request_timeout_ms: std::env::var("REQUEST_TIMEOUT_MS")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(30000),
            max_upload_bytes: std::env::var("MAX_UPLOAD_BYTES")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(5 * 1024 * 1024),
        }
    }

    /// Override the work directory (database and storage follow it)
    ///
    /// Mostly used by tests
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.database_path = format!("{}/menu.db", config.work_dir);
        config.http_port = http_port;
        config
    }

    /// Root directory of stored assets (meal images, QR codes)
    pub fn storage_dir(&self) -> PathBuf {
        PathBuf::from(&self.work_dir).join("storage")
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
    fn test_overrides_move_database_and_storage() {
        let config = Config::with_overrides("/tmp/menu-test", 4000);
        assert_eq!(config.database_path, "/tmp/menu-test/menu.db");
        assert_eq!(config.storage_dir(), PathBuf::from("/tmp/menu-test/storage"));
        assert_eq!(config.http_port, 4000);
    }
}
