//! Catalog data providers
//!
//! Each provider yields movie records for a [`LoadTarget`]. Providers report their own
//! failures; the fallback chain in [`crate::services::fallback`] decides what to do
//! with them.
use std::fmt::Display;

use crate::{
    error::AppResult,
    models::{MovieRecord, MovieStatus},
};

pub mod bundled;
pub mod remote;

pub use bundled::BundledSnapshot;
pub use remote::RemoteCatalogApi;

/// What a single load asks a provider for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoadTarget {
    /// The whole catalog
    All,
    /// One status partition
    Status(MovieStatus),
}

impl LoadTarget {
    pub fn includes(&self, record: &MovieRecord) -> bool {
        match self {
            LoadTarget::All => true,
            LoadTarget::Status(status) => record.status == *status,
        }
    }

    pub fn status(&self) -> Option<MovieStatus> {
        match self {
            LoadTarget::All => None,
            LoadTarget::Status(status) => Some(*status),
        }
    }
}

impl Display for LoadTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadTarget::All => write!(f, "all"),
            LoadTarget::Status(status) => write!(f, "status:{}", status),
        }
    }
}

/// Trait for catalog data providers
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MovieSource: Send + Sync {
    /// Fetch the records for a target, in provider order
    async fn fetch(&self, target: LoadTarget) -> AppResult<Vec<MovieRecord>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}

/// Remote confirmation of a status change
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait StatusUpdater: Send + Sync {
    /// Set the status of `code` to `status` (PUT semantics)
    async fn update_status(&self, code: &str, status: MovieStatus) -> AppResult<()>;
}
