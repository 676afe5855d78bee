use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;
use std::sync::{Mutex, PoisonError};

/// Number of notices a [`NoticeBoard`] retains
pub const NOTICE_HISTORY: usize = 50;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    /// A status change was rolled back after the remote refused it
    StatusChangeFailed,
    /// A load ended with every tier failing
    CatalogUnavailable,
}

/// Non-fatal problem reported to the renderer
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub message: String,
    pub code: Option<String>,
    pub at: DateTime<Utc>,
}

impl Notice {
    pub fn status_change_failed(code: &str, reason: impl std::fmt::Display) -> Self {
        Self {
            kind: NoticeKind::StatusChangeFailed,
            message: format!("Could not update {}: {}", code, reason),
            code: Some(code.to_string()),
            at: Utc::now(),
        }
    }

    pub fn catalog_unavailable() -> Self {
        Self {
            kind: NoticeKind::CatalogUnavailable,
            message: "No catalog source is available".to_string(),
            code: None,
            at: Utc::now(),
        }
    }
}

/// Whatever renders the catalog
///
/// The view position is the code of the movie the renderer is anchored on.
#[cfg_attr(test, mockall::automock)]
pub trait PresentationAdapter: Send + Sync {
    fn capture_position(&self) -> Option<String>;

    /// `None` when the anchored movie is gone after a load
    fn restore_position(&self, anchor: Option<String>);

    fn notify(&self, notice: Notice);
}

/// Presentation adapter that keeps the view anchor and recent notices in memory
#[derive(Default)]
pub struct NoticeBoard {
    anchor: Mutex<Option<String>>,
    notices: Mutex<VecDeque<Notice>>,
}

impl NoticeBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_anchor(&self, code: Option<String>) {
        *self.anchor.lock().unwrap_or_else(PoisonError::into_inner) = code;
    }

    pub fn anchor(&self) -> Option<String> {
        self.anchor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Oldest first
    pub fn notices(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .cloned()
            .collect()
    }
}

impl PresentationAdapter for NoticeBoard {
    fn capture_position(&self) -> Option<String> {
        self.anchor()
    }

    fn restore_position(&self, anchor: Option<String>) {
        self.set_anchor(anchor);
    }

    fn notify(&self, notice: Notice) {
        tracing::warn!(kind = ?notice.kind, message = %notice.message, "Notice raised");
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        if notices.len() == NOTICE_HISTORY {
            notices.pop_front();
        }
        notices.push_back(notice);
    }
}
