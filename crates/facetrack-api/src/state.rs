//! Application state.

use std::sync::Arc;

use facetrack_storage::{FaceDataStore, InitReport, StorageResult};
use tracing::info;

use crate::config::ApiConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub store: Arc<FaceDataStore>,
}

impl AppState {
    /// Create application state and prepare the storage directory.
    ///
    /// The directory is only wiped when the config asks for it.
    pub async fn new(config: ApiConfig) -> StorageResult<Self> {
        let store = FaceDataStore::new(&config.data_dir);
        let mode = config.init_mode();
        let InitReport { created, removed } = store.init(mode).await?;

        info!(
            dir = %store.dir().display(),
            mode = ?mode,
            created,
            removed,
            "Face data directory ready"
        );

        Ok(Self::with_store(config, store))
    }

    /// Wrap an already initialized store.
    pub fn with_store(config: ApiConfig, store: FaceDataStore) -> Self {
        Self {
            config,
            store: Arc::new(store),
        }
    }
}
