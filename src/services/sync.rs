//! Load and status-change protocols over the fallback source and the status store.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::{
    config::{Config, EndpointMode, MutationMode},
    error::{AppError, AppResult},
    models::{CatalogSection, CatalogView, MovieRecord, MovieStatus, StatusCounts},
    services::{
        fallback::{FallbackSource, Loaded, Tier},
        presentation::{Notice, PresentationAdapter},
        providers::{LoadTarget, StatusUpdater},
        store::StatusStore,
    },
};

/// Deployment shape of the controller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncOptions {
    pub endpoint_mode: EndpointMode,
    pub mutation_mode: MutationMode,
    pub reload_after_change: bool,
    pub hide_special_screenings: bool,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            endpoint_mode: EndpointMode::Unified,
            mutation_mode: MutationMode::Enabled,
            reload_after_change: true,
            hide_special_screenings: true,
        }
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            endpoint_mode: config.endpoint_mode,
            mutation_mode: config.mutation_mode,
            reload_after_change: config.reload_after_change,
            hide_special_screenings: config.hide_special_screenings,
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PartitionReport {
    /// `None` for a unified load
    pub status: Option<MovieStatus>,
    pub tier: Tier,
    pub count: usize,
}

/// Outcome of one load protocol run
#[derive(Debug, Clone, Serialize)]
pub struct LoadReport {
    pub partitions: Vec<PartitionReport>,
    /// Records in the store after the load
    pub total: usize,
    pub loaded_at: DateTime<Utc>,
}

impl LoadReport {
    pub fn all_failed(&self) -> bool {
        self.partitions.iter().all(|p| p.tier == Tier::Empty)
    }
}

/// Outcome of one status-change protocol run
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusChange {
    /// Remote accepted; the optimistic move stands
    Confirmed { record: MovieRecord },
    /// Display-only deployment; nothing was sent
    LocalOnly { record: MovieRecord },
    /// Remote refused; the record is back where it was
    RolledBack { record: MovieRecord, reason: String },
}

impl StatusChange {
    pub fn record(&self) -> &MovieRecord {
        match self {
            StatusChange::Confirmed { record }
            | StatusChange::LocalOnly { record }
            | StatusChange::RolledBack { record, .. } => record,
        }
    }
}

type CodeLock = Arc<tokio::sync::Mutex<()>>;

pub struct SyncController {
    source: FallbackSource,
    updater: Arc<dyn StatusUpdater>,
    store: Arc<StatusStore>,
    presenter: Arc<dyn PresentationAdapter>,
    options: SyncOptions,
    hide_special: AtomicBool,
    /// Per-code locks serializing status changes on the same movie
    in_flight: Mutex<HashMap<String, CodeLock>>,
}

impl SyncController {
    pub fn new(
        source: FallbackSource,
        updater: Arc<dyn StatusUpdater>,
        store: Arc<StatusStore>,
        presenter: Arc<dyn PresentationAdapter>,
        options: SyncOptions,
    ) -> Self {
        Self {
            source,
            updater,
            store,
            presenter,
            hide_special: AtomicBool::new(options.hide_special_screenings),
            options,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn store(&self) -> &Arc<StatusStore> {
        &self.store
    }

    // ------------------------------------------------------------------------
    // Load protocol
    // ------------------------------------------------------------------------

    /// Loads the catalog and commits it to the store
    ///
    /// Partitions load independently; one falling through every tier keeps the records
    /// the store already holds for it rather than blanking the view.
    pub async fn load(&self) -> LoadReport {
        let anchor = self.presenter.capture_position();

        let loads: Vec<Loaded> = match self.options.endpoint_mode {
            EndpointMode::Unified => vec![self.source.load(LoadTarget::All).await],
            EndpointMode::PerStatus => {
                let [first, second, third] =
                    MovieStatus::DISPLAY_ORDER.map(LoadTarget::Status);
                let (a, b, c) = tokio::join!(
                    self.source.load(first),
                    self.source.load(second),
                    self.source.load(third),
                );
                vec![a, b, c]
            }
        };

        // Served partitions first: a code they returned wins over a kept stale copy
        let mut records = Vec::new();
        let mut unserved = Vec::new();
        let mut partitions = Vec::with_capacity(loads.len());
        for loaded in loads {
            partitions.push(PartitionReport {
                status: loaded.target.status(),
                tier: loaded.tier,
                count: loaded.records.len(),
            });
            if loaded.tier == Tier::Empty {
                unserved.push((partitions.len() - 1, loaded.target));
            } else {
                records.extend(loaded.records);
            }
        }

        if !unserved.is_empty() {
            let served: HashSet<String> = records.iter().map(|r| r.code.clone()).collect();
            for (slot, target) in unserved {
                let kept: Vec<MovieRecord> = self
                    .store
                    .snapshot(target.status())
                    .into_iter()
                    .filter(|r| !served.contains(&r.code))
                    .collect();
                tracing::warn!(
                    load_target = %target,
                    kept = kept.len(),
                    "No tier served the partition, keeping current records"
                );
                partitions[slot].count = kept.len();
                records.extend(kept);
            }
        }

        let total = self.store.replace_all(records);

        // A position set while the load was running is newer than the captured one
        if self.presenter.capture_position() == anchor {
            let restored = anchor.filter(|code| self.store.contains(code));
            self.presenter.restore_position(restored);
        }

        let report = LoadReport {
            partitions,
            total,
            loaded_at: Utc::now(),
        };

        if report.all_failed() {
            self.presenter.notify(Notice::catalog_unavailable());
        }

        tracing::info!(
            total = report.total,
            partitions = report.partitions.len(),
            "Catalog loaded"
        );

        report
    }

    // ------------------------------------------------------------------------
    // Status-change protocol
    // ------------------------------------------------------------------------

    /// Moves `code` from `from` to `to`, optimistically, then confirms remotely
    ///
    /// A remote failure is not an error here: the move is rolled back, a notice is raised
    /// and [`StatusChange::RolledBack`] is returned. `NotFound` means the caller's view was
    /// stale and nothing changed.
    ///
    /// The protocol runs on its own task, so dropping the returned future (a client
    /// disconnecting mid-request) still lets the confirmation or rollback land.
    pub async fn change_status(
        self: &Arc<Self>,
        code: &str,
        from: MovieStatus,
        to: MovieStatus,
    ) -> AppResult<StatusChange> {
        if from == to {
            return Err(AppError::InvalidInput(format!(
                "Movie {} is already {}",
                code, to
            )));
        }

        let controller = Arc::clone(self);
        let code = code.to_string();
        tokio::spawn(async move { controller.run_change(&code, from, to).await })
            .await
            .map_err(|e| AppError::Internal(format!("Status change task failed: {}", e)))?
    }

    async fn run_change(
        &self,
        code: &str,
        from: MovieStatus,
        to: MovieStatus,
    ) -> AppResult<StatusChange> {
        let lock = self.code_lock(code);
        let outcome = {
            let _guard = lock.lock().await;
            self.apply_change(code, from, to).await
        };
        drop(lock);
        self.release_code_lock(code);

        let outcome = outcome?;
        if self.options.reload_after_change && matches!(outcome, StatusChange::Confirmed { .. }) {
            self.load().await;
        }

        Ok(outcome)
    }

    async fn apply_change(
        &self,
        code: &str,
        from: MovieStatus,
        to: MovieStatus,
    ) -> AppResult<StatusChange> {
        let moved = self.store.move_status(code, from, to).map_err(|e| {
            tracing::warn!(error = %e, code = %code, "Status change ignored");
            e
        })?;

        if self.options.mutation_mode == MutationMode::DisplayOnly {
            return Ok(StatusChange::LocalOnly { record: moved });
        }

        match self.updater.update_status(code, to).await {
            Ok(()) => Ok(StatusChange::Confirmed { record: moved }),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    code = %code,
                    from = %from,
                    to = %to,
                    "Remote refused status change, rolling back"
                );

                let record = match self.store.move_status(code, to, from) {
                    Ok(record) => record,
                    Err(rollback) => {
                        // A load replaced the record while the request was in flight
                        tracing::warn!(error = %rollback, code = %code, "Rollback superseded");
                        self.store.get(code).unwrap_or(moved)
                    }
                };

                self.presenter
                    .notify(Notice::status_change_failed(code, &e));

                Ok(StatusChange::RolledBack {
                    record,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn code_lock(&self, code: &str) -> CodeLock {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(code.to_string()).or_default().clone()
    }

    fn release_code_lock(&self, code: &str) {
        let mut locks = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(code)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(code);
        }
    }

    // ------------------------------------------------------------------------
    // Views
    // ------------------------------------------------------------------------

    pub fn hide_special_screenings(&self) -> bool {
        self.hide_special.load(Ordering::Relaxed)
    }

    pub fn set_hide_special_screenings(&self, hide: bool) {
        self.hide_special.store(hide, Ordering::Relaxed);
    }

    pub fn view(&self, hide_special: Option<bool>) -> CatalogView {
        let hide = hide_special.unwrap_or_else(|| self.hide_special_screenings());
        CatalogView::build(&self.store.snapshot(None), hide)
    }

    pub fn section(&self, status: MovieStatus, hide_special: Option<bool>) -> CatalogSection {
        let hide = hide_special.unwrap_or_else(|| self.hide_special_screenings());
        CatalogSection::build(status, &self.store.snapshot(Some(status)), hide)
    }

    pub fn counts(&self, hide_special: Option<bool>) -> StatusCounts {
        let hide = hide_special.unwrap_or_else(|| self.hide_special_screenings());
        StatusCounts::tally(&self.store.snapshot(None), hide)
    }
}
