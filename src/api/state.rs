use std::sync::Arc;

use crate::config::Config;
use crate::db::{create_redis_client, FileStore, KeyValueStore, RedisStore, SnapshotCache};
use crate::services::{
    fallback::FallbackSource,
    presentation::NoticeBoard,
    providers::{BundledSnapshot, RemoteCatalogApi},
    store::StatusStore,
    sync::{SyncController, SyncOptions},
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<SyncController>,
    pub board: Arc<NoticeBoard>,
}

impl AppState {
    pub fn new(controller: Arc<SyncController>, board: Arc<NoticeBoard>) -> Self {
        Self { controller, board }
    }

    /// Wires the controller from configuration
    ///
    /// Does not load anything; call [`SyncController::load`] afterwards.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let remote = Arc::new(RemoteCatalogApi::new(
            config.api_url.clone(),
            config.start_date_field,
            config.request_timeout(),
        )?);

        let kv: Arc<dyn KeyValueStore> = match &config.redis_url {
            Some(url) => Arc::new(RedisStore::new(create_redis_client(url)?)),
            None => Arc::new(FileStore::new(&config.cache_path)),
        };
        tracing::info!(backend = kv.name(), key = %config.cache_key, "Local catalog cache ready");

        let source = FallbackSource::new(
            remote.clone(),
            Arc::new(SnapshotCache::new(kv, config.cache_key.clone())),
            Arc::new(BundledSnapshot::new(
                &config.bundled_snapshot_path,
                config.start_date_field,
            )),
        );

        let board = Arc::new(NoticeBoard::new());
        let controller = SyncController::new(
            source,
            remote,
            Arc::new(StatusStore::new()),
            board.clone(),
            SyncOptions::from(config),
        );

        Ok(Self::new(Arc::new(controller), board))
    }
}
