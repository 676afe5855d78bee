//! Three-tier catalog acquisition: live fetch, then the local cache, then the bundled
//! snapshot. Tiers run strictly in order and a load never returns an error.
use serde::Serialize;
use std::fmt::Display;
use std::sync::Arc;

use crate::{
    db::SnapshotCache,
    models::MovieRecord,
    services::providers::{LoadTarget, MovieSource},
};

/// Which tier served a load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Live,
    Cache,
    Bundled,
    /// Every tier failed
    Empty,
}

impl Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Live => write!(f, "live"),
            Tier::Cache => write!(f, "cache"),
            Tier::Bundled => write!(f, "bundled"),
            Tier::Empty => write!(f, "empty"),
        }
    }
}

/// Result of one load attempt
#[derive(Debug, Clone)]
pub struct Loaded {
    pub target: LoadTarget,
    pub tier: Tier,
    pub records: Vec<MovieRecord>,
}

pub struct FallbackSource {
    live: Arc<dyn MovieSource>,
    cache: Arc<SnapshotCache>,
    bundled: Arc<dyn MovieSource>,
}

impl FallbackSource {
    pub fn new(
        live: Arc<dyn MovieSource>,
        cache: Arc<SnapshotCache>,
        bundled: Arc<dyn MovieSource>,
    ) -> Self {
        Self {
            live,
            cache,
            bundled,
        }
    }

    /// Loads `target`, degrading through the tiers; all failures are contained here
    pub async fn load(&self, target: LoadTarget) -> Loaded {
        match self.live.fetch(target).await {
            Ok(records) => {
                // Best effort; the snapshot cache swallows its own failures
                match target {
                    LoadTarget::All => self.cache.write(&records).await,
                    LoadTarget::Status(status) => {
                        self.cache.merge_partition(status, &records).await
                    }
                }
                return Loaded {
                    target,
                    tier: Tier::Live,
                    records,
                };
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    load_target = %target,
                    provider = self.live.name(),
                    "Live fetch failed, falling back to cache"
                );
            }
        }

        if let Some(cached) = self.cache.read().await {
            let records: Vec<MovieRecord> = cached
                .into_iter()
                .filter(|record| target.includes(record))
                .collect();
            tracing::info!(load_target = %target, count = records.len(), "Serving cached catalog");
            return Loaded {
                target,
                tier: Tier::Cache,
                records,
            };
        }

        match self.bundled.fetch(target).await {
            Ok(records) => {
                tracing::info!(
                    load_target = %target,
                    count = records.len(),
                    provider = self.bundled.name(),
                    "Serving bundled snapshot"
                );
                Loaded {
                    target,
                    tier: Tier::Bundled,
                    records,
                }
            }
            Err(e) => {
                tracing::error!(error = %e, load_target = %target, "All catalog tiers failed");
                Loaded {
                    target,
                    tier: Tier::Empty,
                    records: Vec::new(),
                }
            }
        }
    }
}
