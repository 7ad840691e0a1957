//! Object storage for published car and color images.
//!
//! [`ObjectStore`] is the seam between the submission flow and wherever image
//! bytes end up. Two backends are provided: a local directory served by the
//! API under a public base URL, and S3 (or any S3-compatible service).
//! Staging of wizard uploads before submission also lives here.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use aws_sdk_s3::primitives::ByteStream;

use crate::draft::PendingImage;
use crate::steps::UploadedImage;

/// Bucket/prefix for primary car images.
pub const CAR_IMAGES_PREFIX: &str = "car-images";

/// Bucket/prefix for per-color images.
pub const COLOR_IMAGES_PREFIX: &str = "color-images";

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("Invalid object key '{0}'")]
    InvalidKey(String),
}

/// A place to publish files and resolve their public URLs.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Store `bytes` under `key`, replacing any existing object.
    async fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str)
        -> Result<(), StorageError>;

    /// Public URL at which `key` is served.
    fn public_url(&self, key: &str) -> String;
}

// ---------------------------------------------------------------------------
// Keys
// ---------------------------------------------------------------------------

/// Reduce a client-supplied file name to `[A-Za-z0-9._-]`.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_start_matches('.');
    if cleaned.is_empty() {
        "image".to_string()
    } else {
        cleaned.to_string()
    }
}

/// Unique object key for a file under `prefix`.
pub fn object_key(prefix: &str, file_name: &str) -> String {
    format!(
        "{prefix}/{}-{}",
        uuid::Uuid::new_v4().simple(),
        sanitize_file_name(file_name)
    )
}

fn validate_key(key: &str) -> Result<(), StorageError> {
    if key.is_empty()
        || key.starts_with('/')
        || key.split('/').any(|seg| seg.is_empty() || seg == "..")
    {
        return Err(StorageError::InvalidKey(key.to_string()));
    }
    Ok(())
}

fn join_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

// ---------------------------------------------------------------------------
// Local directory backend
// ---------------------------------------------------------------------------

/// Stores objects as files below `root`; served at `base_url`.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    root: PathBuf,
    base_url: String,
}

impl LocalObjectStore {
    pub fn new(root: impl Into<PathBuf>, base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            base_url: base_url.into(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        _content_type: &str,
    ) -> Result<(), StorageError> {
        validate_key(key)?;
        let dest = self.root.join(key);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, bytes).await?;
        tracing::debug!(key, path = %dest.display(), "Stored object on local disk");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.base_url, key)
    }
}

// ---------------------------------------------------------------------------
// S3 backend
// ---------------------------------------------------------------------------

/// Stores objects in an S3 bucket.
#[derive(Debug, Clone)]
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base_url: String,
}

impl S3ObjectStore {
    /// Build a client from the ambient AWS configuration.
    ///
    /// `endpoint` points the client at an S3-compatible service (path-style
    /// addressing is used in that case).
    pub async fn from_env(bucket: String, endpoint: Option<String>, public_base_url: String) -> Self {
        let sdk_config = aws_config::load_from_env().await;
        let mut builder = aws_sdk_s3::config::Builder::from(&sdk_config);
        if let Some(endpoint) = endpoint {
            builder = builder.endpoint_url(endpoint).force_path_style(true);
        }
        Self {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
            bucket,
            public_base_url,
        }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn upload(
        &self,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StorageError> {
        validate_key(key)?;
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .content_type(content_type)
            .body(ByteStream::from(bytes))
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;
        tracing::debug!(bucket = %self.bucket, key, "Stored object in S3");
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        join_url(&self.public_base_url, key)
    }
}

// ---------------------------------------------------------------------------
// Staging
// ---------------------------------------------------------------------------

/// Write a validated upload into `staging_dir` and describe it as pending.
pub async fn stage_upload(
    staging_dir: &Path,
    upload: &UploadedImage,
    content_type: &str,
) -> Result<PendingImage, StorageError> {
    tokio::fs::create_dir_all(staging_dir).await?;
    let file_name = sanitize_file_name(&upload.file_name);
    let path = staging_dir.join(format!("{}-{file_name}", uuid::Uuid::new_v4().simple()));
    tokio::fs::write(&path, &upload.bytes).await?;

    Ok(PendingImage {
        staged_path: path.to_string_lossy().into_owned(),
        file_name,
        content_type: content_type.to_string(),
    })
}

/// Read a staged file back for publishing.
pub async fn read_staged(pending: &PendingImage) -> Result<Vec<u8>, StorageError> {
    Ok(tokio::fs::read(&pending.staged_path).await?)
}

/// Best-effort removal of staged files; missing files are ignored.
pub async fn discard_staged<'a>(paths: impl IntoIterator<Item = &'a str>) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path, error = %e, "Failed to remove staged upload");
            }
        }
    }
}
