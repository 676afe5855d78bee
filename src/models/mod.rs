use serde::{Deserialize, Serialize};
use std::fmt::Display;

pub mod card;

pub use card::{CatalogSection, CatalogView, MovieCard, StatusCounts, Transition};

/// The user's relationship to a title
///
/// Serialized as the integer the remote API uses (`0`, `1`, `2`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum MovieStatus {
    InTheaters = 0,
    NotInterested = 1,
    Watched = 2,
}

impl MovieStatus {
    pub const ALL: [MovieStatus; 3] = [
        MovieStatus::InTheaters,
        MovieStatus::NotInterested,
        MovieStatus::Watched,
    ];

    /// Order in which sections are rendered and partitions are loaded
    pub const DISPLAY_ORDER: [MovieStatus; 3] = [
        MovieStatus::InTheaters,
        MovieStatus::Watched,
        MovieStatus::NotInterested,
    ];

    pub fn code(self) -> u8 {
        self as u8
    }

    /// Section heading
    pub fn heading(self) -> &'static str {
        match self {
            MovieStatus::InTheaters => "In Theaters",
            MovieStatus::Watched => "Watched Movies",
            MovieStatus::NotInterested => "Not Interested",
        }
    }

    /// Label of the action that moves a title into this status
    pub fn action_label(self) -> &'static str {
        match self {
            MovieStatus::InTheaters => "Not Watched",
            MovieStatus::Watched => "Watched",
            MovieStatus::NotInterested => "Not Interested",
        }
    }

    /// The statuses a title in this status can be moved to, in button order
    pub fn transitions(self) -> [MovieStatus; 2] {
        match self {
            MovieStatus::InTheaters => [MovieStatus::Watched, MovieStatus::NotInterested],
            MovieStatus::Watched => [MovieStatus::InTheaters, MovieStatus::NotInterested],
            MovieStatus::NotInterested => [MovieStatus::Watched, MovieStatus::InTheaters],
        }
    }
}

impl TryFrom<u8> for MovieStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(MovieStatus::InTheaters),
            1 => Ok(MovieStatus::NotInterested),
            2 => Ok(MovieStatus::Watched),
            other => Err(format!("unknown movie status {}", other)),
        }
    }
}

impl From<MovieStatus> for u8 {
    fn from(status: MovieStatus) -> Self {
        status.code()
    }
}

impl Display for MovieStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MovieStatus::InTheaters => write!(f, "in_theaters"),
            MovieStatus::NotInterested => write!(f, "not_interested"),
            MovieStatus::Watched => write!(f, "watched"),
        }
    }
}

/// Name of the start-date field in remote movie objects
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum StartDateField {
    #[default]
    #[serde(rename = "date_started")]
    Snake,
    #[serde(rename = "dateStarted")]
    Camel,
}

/// A movie in the catalog
///
/// `code` is the identity and never changes; only `status` is mutated after load.
/// Serialized with the remote API's field names, which is also the cache format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    pub code: String,
    pub title: String,
    #[serde(rename = "poster", default, skip_serializing_if = "Option::is_none")]
    pub poster_url: Option<String>,
    #[serde(rename = "url", default)]
    pub detail_url: String,
    #[serde(default)]
    pub theaters: Vec<String>,
    #[serde(rename = "date_started", default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    pub status: MovieStatus,
}

impl MovieRecord {
    pub fn new(code: impl Into<String>, title: impl Into<String>, status: MovieStatus) -> Self {
        Self {
            code: code.into(),
            title: title.into(),
            poster_url: None,
            detail_url: String::new(),
            theaters: Vec::new(),
            start_date: None,
            status,
        }
    }
}

// ============================================================================
// Remote API Types
// ============================================================================

/// Movie object as returned by the remote API and the bundled snapshot
#[derive(Debug, Clone, Deserialize)]
pub struct ApiMovie {
    pub code: String,
    pub title: String,
    #[serde(default)]
    pub poster: Option<String>,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub theaters: Vec<String>,
    #[serde(default)]
    pub date_started: Option<String>,
    #[serde(default, rename = "dateStarted")]
    pub date_started_camel: Option<String>,
    #[serde(default)]
    pub status: Option<MovieStatus>,
}

impl ApiMovie {
    /// Materializes a record, reading the start date from the configured field
    ///
    /// `status` overrides whatever the payload says (per-status endpoints); when `None`
    /// the payload's status is used, defaulting to `InTheaters`.
    pub fn into_record(self, field: StartDateField, status: Option<MovieStatus>) -> MovieRecord {
        let start_date = match field {
            StartDateField::Snake => self.date_started,
            StartDateField::Camel => self.date_started_camel,
        };
        let poster_url = self.poster.filter(|p| !p.trim().is_empty());

        MovieRecord {
            code: self.code,
            title: self.title,
            poster_url,
            detail_url: self.url,
            theaters: self.theaters,
            start_date,
            status: status
                .or(self.status)
                .unwrap_or(MovieStatus::InTheaters),
        }
    }
}

/// Body of `PUT /api/movies/{code}/status`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: MovieStatus,
}
