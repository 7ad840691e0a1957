use std::sync::Arc;

use showroom_core::storage::{LocalObjectStore, ObjectStore, S3ObjectStore};

use crate::config::{ServerConfig, StorageBackend, StorageConfig};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: showroom_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Destination for published car and color images.
    pub store: Arc<dyn ObjectStore>,
}

/// Build the object store selected by configuration.
pub async fn build_object_store(config: &StorageConfig) -> Arc<dyn ObjectStore> {
    match &config.backend {
        StorageBackend::Local { root, base_url } => {
            tracing::info!(root = %root.display(), "Using local object store");
            Arc::new(LocalObjectStore::new(root.clone(), base_url.clone()))
        }
        StorageBackend::S3 {
            bucket,
            endpoint,
            public_base_url,
        } => {
            tracing::info!(%bucket, endpoint = ?endpoint, "Using S3 object store");
            Arc::new(
                S3ObjectStore::from_env(bucket.clone(), endpoint.clone(), public_base_url.clone())
                    .await,
            )
        }
    }
}
