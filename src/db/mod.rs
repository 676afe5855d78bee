//! Durable key-value storage behind the local catalog cache
pub mod file;
pub mod redis;
pub mod snapshot;

pub use self::file::FileStore;
pub use self::redis::{create_redis_client, RedisStore};
pub use self::snapshot::SnapshotCache;

use crate::error::AppResult;

/// Minimal get/set capability over a durable local store
///
/// Errors are reported to the caller; [`SnapshotCache`] is the layer that swallows them.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait KeyValueStore: Send + Sync {
    async fn get(&self, key: &str) -> AppResult<Option<String>>;

    async fn set(&self, key: &str, value: String) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}
