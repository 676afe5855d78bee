use std::collections::HashMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::{
    error::{AppError, AppResult},
    models::{MovieRecord, MovieStatus},
};

/// Records in arrival order with a code index
///
/// Each code is held by exactly one record, and a record carries exactly one status, so
/// the status partitions can never overlap.
#[derive(Default)]
struct Catalog {
    records: Vec<MovieRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    fn from_records(records: Vec<MovieRecord>) -> Self {
        let mut catalog = Catalog {
            records: Vec::with_capacity(records.len()),
            index: HashMap::with_capacity(records.len()),
        };

        for record in records {
            if let Some(&existing) = catalog.index.get(&record.code) {
                tracing::warn!(
                    code = %record.code,
                    kept = %catalog.records[existing].status,
                    dropped = %record.status,
                    "Duplicate code in load, keeping first occurrence"
                );
                continue;
            }
            catalog
                .index
                .insert(record.code.clone(), catalog.records.len());
            catalog.records.push(record);
        }

        catalog
    }
}

/// In-memory catalog partitioned by status
///
/// Every operation takes the lock once, so a reader sees either the state before or
/// after a call, never a partial one.
#[derive(Default)]
pub struct StatusStore {
    catalog: RwLock<Catalog>,
}

impl StatusStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Catalog> {
        self.catalog.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Catalog> {
        self.catalog.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Replaces the whole catalog; returns the number of records kept
    pub fn replace_all(&self, records: Vec<MovieRecord>) -> usize {
        // Built outside the lock, swapped in under it
        let catalog = Catalog::from_records(records);
        let count = catalog.records.len();
        *self.write() = catalog;
        count
    }

    /// Moves `code` from `from` to `to`, returning the updated record
    ///
    /// Fails with `NotFound` when `code` is not currently in `from`, leaving the store
    /// untouched.
    pub fn move_status(
        &self,
        code: &str,
        from: MovieStatus,
        to: MovieStatus,
    ) -> AppResult<MovieRecord> {
        let mut catalog = self.write();

        let position = catalog.index.get(code).copied().ok_or_else(|| {
            AppError::NotFound(format!("Movie {} is not in the catalog", code))
        })?;

        let record = &mut catalog.records[position];
        if record.status != from {
            return Err(AppError::NotFound(format!(
                "Movie {} is {}, not {}",
                code, record.status, from
            )));
        }

        record.status = to;
        tracing::debug!(code = %code, from = %from, to = %to, "Status moved");
        Ok(record.clone())
    }

    /// Current records in load order, optionally restricted to one status
    pub fn snapshot(&self, status: Option<MovieStatus>) -> Vec<MovieRecord> {
        self.read()
            .records
            .iter()
            .filter(|record| status.map_or(true, |s| record.status == s))
            .cloned()
            .collect()
    }

    pub fn get(&self, code: &str) -> Option<MovieRecord> {
        let catalog = self.read();
        catalog
            .index
            .get(code)
            .map(|&position| catalog.records[position].clone())
    }

    pub fn contains(&self, code: &str) -> bool {
        self.read().index.contains_key(code)
    }

    pub fn len(&self) -> usize {
        self.read().records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    fn record(code: &str, status: MovieStatus) -> MovieRecord {
        MovieRecord::new(code, format!("Movie {}", code), status)
    }

    fn codes(records: &[MovieRecord]) -> Vec<&str> {
        records.iter().map(|r| r.code.as_str()).collect()
    }

    /// Every known code in exactly one partition
    fn assert_partitions_disjoint(store: &StatusStore) {
        let mut seen = HashMap::new();
        for status in MovieStatus::ALL {
            for record in store.snapshot(Some(status)) {
                *seen.entry(record.code).or_insert(0) += 1;
            }
        }
        assert_eq!(seen.len(), store.len());
        assert!(seen.values().all(|&count| count == 1));
    }

    #[test]
    fn test_replace_all_keeps_arrival_order() {
        let store = StatusStore::new();
        store.replace_all(vec![
            record("C", MovieStatus::Watched),
            record("A", MovieStatus::InTheaters),
            record("B", MovieStatus::Watched),
        ]);

        assert_eq!(codes(&store.snapshot(None)), vec!["C", "A", "B"]);
        assert_eq!(
            codes(&store.snapshot(Some(MovieStatus::Watched))),
            vec!["C", "B"]
        );
    }

    #[test]
    fn test_replace_all_supersedes_previous_load() {
        let store = StatusStore::new();
        store.replace_all(vec![record("A", MovieStatus::InTheaters)]);
        store.replace_all(vec![record("B", MovieStatus::Watched)]);

        assert!(!store.contains("A"));
        assert!(store.contains("B"));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_replace_all_drops_duplicate_codes() {
        let store = StatusStore::new();
        let kept = store.replace_all(vec![
            record("A", MovieStatus::InTheaters),
            record("A", MovieStatus::Watched),
        ]);

        assert_eq!(kept, 1);
        assert_eq!(store.get("A").unwrap().status, MovieStatus::InTheaters);
        assert_partitions_disjoint(&store);
    }

    #[test]
    fn test_move_status() {
        let store = StatusStore::new();
        store.replace_all(vec![record("A", MovieStatus::InTheaters)]);

        let moved = assert_ok!(store.move_status("A", MovieStatus::InTheaters, MovieStatus::Watched));
        assert_eq!(moved.status, MovieStatus::Watched);
        assert_eq!(moved.code, "A");
        assert!(store.snapshot(Some(MovieStatus::InTheaters)).is_empty());
    }

    #[test]
    fn test_move_from_wrong_partition_is_not_found() {
        let store = StatusStore::new();
        store.replace_all(vec![record("A", MovieStatus::Watched)]);

        let err = assert_err!(store.move_status(
            "A",
            MovieStatus::InTheaters,
            MovieStatus::NotInterested
        ));
        assert!(matches!(err, AppError::NotFound(_)));
        assert_eq!(store.get("A").unwrap().status, MovieStatus::Watched);
    }

    #[test]
    fn test_move_unknown_code_is_not_found() {
        let store = StatusStore::new();
        let err = assert_err!(store.move_status(
            "ZZ",
            MovieStatus::InTheaters,
            MovieStatus::Watched
        ));
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn test_chained_moves() {
        let store = StatusStore::new();
        store.replace_all(vec![
            record("A", MovieStatus::InTheaters),
            record("B", MovieStatus::InTheaters),
        ]);

        assert_ok!(store.move_status("A", MovieStatus::InTheaters, MovieStatus::Watched));
        assert_ok!(store.move_status("A", MovieStatus::Watched, MovieStatus::NotInterested));

        assert_eq!(
            codes(&store.snapshot(Some(MovieStatus::NotInterested))),
            vec!["A"]
        );
        assert!(store.snapshot(Some(MovieStatus::Watched)).is_empty());
        assert_eq!(
            codes(&store.snapshot(Some(MovieStatus::InTheaters))),
            vec!["B"]
        );
    }

    #[test]
    fn test_moves_keep_position() {
        let store = StatusStore::new();
        store.replace_all(vec![
            record("A", MovieStatus::InTheaters),
            record("B", MovieStatus::InTheaters),
            record("C", MovieStatus::InTheaters),
        ]);

        assert_ok!(store.move_status("B", MovieStatus::InTheaters, MovieStatus::Watched));
        assert_ok!(store.move_status("B", MovieStatus::Watched, MovieStatus::InTheaters));
        assert_eq!(codes(&store.snapshot(None)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_partitions_stay_disjoint_under_mixed_moves() {
        let store = StatusStore::new();
        store.replace_all(
            ["A", "B", "C", "D"]
                .iter()
                .map(|code| record(code, MovieStatus::InTheaters))
                .collect(),
        );

        let moves = [
            ("A", MovieStatus::InTheaters, MovieStatus::Watched),
            ("A", MovieStatus::InTheaters, MovieStatus::NotInterested), // stale
            ("B", MovieStatus::Watched, MovieStatus::InTheaters),       // wrong source
            ("C", MovieStatus::InTheaters, MovieStatus::NotInterested),
            ("X", MovieStatus::InTheaters, MovieStatus::Watched), // unknown
            ("A", MovieStatus::Watched, MovieStatus::InTheaters),
            ("D", MovieStatus::InTheaters, MovieStatus::Watched),
        ];
        for (code, from, to) in moves {
            let _ = store.move_status(code, from, to);
            assert_partitions_disjoint(&store);
        }

        assert_eq!(store.len(), 4);
        assert_eq!(store.get("A").unwrap().status, MovieStatus::InTheaters);
        assert_eq!(store.get("C").unwrap().status, MovieStatus::NotInterested);
    }
}
