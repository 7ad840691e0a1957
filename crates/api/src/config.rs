use std::path::PathBuf;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Graceful shutdown timeout in seconds (default: `30`).
    pub shutdown_timeout_secs: u64,
    /// JWT token configuration (secret, expiry durations).
    pub jwt: JwtConfig,
    /// Where published images go and where wizard uploads are staged.
    pub storage: StorageConfig,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `3000`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
        }
    }
}

/// Object store backend selection.
#[derive(Debug, Clone)]
pub enum StorageBackend {
    /// Files under `root`, served by this server at `/media`.
    Local { root: PathBuf, base_url: String },
    /// An S3 bucket, optionally at a custom endpoint.
    S3 {
        bucket: String,
        endpoint: Option<String>,
        public_base_url: String,
    },
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub backend: StorageBackend,
    /// Directory holding wizard uploads until submission.
    pub staging_dir: PathBuf,
}

impl StorageConfig {
    /// Load storage configuration from environment variables.
    ///
    /// | Env Var               | Default                          |
    /// |-----------------------|----------------------------------|
    /// | `STORAGE_BACKEND`     | `local` (`local` or `s3`)        |
    /// | `MEDIA_ROOT`          | `./media`                        |
    /// | `MEDIA_BASE_URL`      | `http://localhost:3000/media`    |
    /// | `S3_BUCKET`           | required when backend is `s3`    |
    /// | `S3_ENDPOINT`         | unset (AWS default)              |
    /// | `S3_PUBLIC_BASE_URL`  | `https://{bucket}.s3.amazonaws.com` |
    /// | `STAGING_DIR`         | `./staging`                      |
    pub fn from_env() -> Self {
        let backend = match std::env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "local".into())
            .as_str()
        {
            "local" => StorageBackend::Local {
                root: std::env::var("MEDIA_ROOT")
                    .unwrap_or_else(|_| "./media".into())
                    .into(),
                base_url: std::env::var("MEDIA_BASE_URL")
                    .unwrap_or_else(|_| "http://localhost:3000/media".into()),
            },
            "s3" => {
                let bucket =
                    std::env::var("S3_BUCKET").expect("S3_BUCKET must be set for the s3 backend");
                let public_base_url = std::env::var("S3_PUBLIC_BASE_URL")
                    .unwrap_or_else(|_| format!("https://{bucket}.s3.amazonaws.com"));
                StorageBackend::S3 {
                    bucket,
                    endpoint: std::env::var("S3_ENDPOINT").ok().filter(|s| !s.is_empty()),
                    public_base_url,
                }
            }
            other => panic!("STORAGE_BACKEND must be 'local' or 's3', got '{other}'"),
        };

        Self {
            backend,
            staging_dir: std::env::var("STAGING_DIR")
                .unwrap_or_else(|_| "./staging".into())
                .into(),
        }
    }
}
