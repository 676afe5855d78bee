use serde::Serialize;

use super::{MovieRecord, MovieStatus};
use crate::services::classifier;

/// Poster shown when a record has none
pub const PLACEHOLDER_POSTER: &str =
    "https://www.nyfa.edu/wp-content/uploads/2022/11/Blank-Movie-Poster1.jpg";

/// Number of venues shown per card; the record keeps the full list
pub const MAX_DISPLAYED_THEATERS: usize = 6;

pub const UNKNOWN_START_DATE: &str = "TBA";

pub const EMPTY_SECTION_MESSAGE: &str = "No movies found.";

/// A status change offered on a card
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Transition {
    pub to: MovieStatus,
    pub label: &'static str,
}

/// Render-ready form of a [`MovieRecord`]
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub code: String,
    pub title: String,
    pub poster: String,
    pub url: String,
    pub theaters: Vec<String>,
    pub start_date: String,
    pub status: MovieStatus,
    pub transitions: Vec<Transition>,
}

impl From<&MovieRecord> for MovieCard {
    fn from(record: &MovieRecord) -> Self {
        Self {
            code: record.code.clone(),
            title: record.title.clone(),
            poster: record
                .poster_url
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_POSTER.to_string()),
            url: record.detail_url.clone(),
            theaters: record
                .theaters
                .iter()
                .take(MAX_DISPLAYED_THEATERS)
                .cloned()
                .collect(),
            start_date: record
                .start_date
                .clone()
                .unwrap_or_else(|| UNKNOWN_START_DATE.to_string()),
            status: record.status,
            transitions: record
                .status
                .transitions()
                .into_iter()
                .map(|to| Transition {
                    to,
                    label: to.action_label(),
                })
                .collect(),
        }
    }
}

/// One status partition after the special-screening filter
#[derive(Debug, Clone, Serialize)]
pub struct CatalogSection {
    pub status: MovieStatus,
    pub heading: &'static str,
    pub movies: Vec<MovieCard>,
    /// Visible records
    pub showing: usize,
    /// All records in the partition
    pub total: usize,
    /// "Showing X of Y movies"
    pub summary: String,
    /// Set when nothing is visible
    pub message: Option<&'static str>,
}

impl CatalogSection {
    /// Builds a section from the records of one partition, in store order
    pub fn build(status: MovieStatus, records: &[MovieRecord], hide_special: bool) -> Self {
        let movies: Vec<MovieCard> = records
            .iter()
            .filter(|r| r.status == status)
            .filter(|r| classifier::is_visible(r, hide_special))
            .map(MovieCard::from)
            .collect();
        let total = records.iter().filter(|r| r.status == status).count();
        let showing = movies.len();

        Self {
            status,
            heading: status.heading(),
            movies,
            showing,
            total,
            summary: format!("Showing {} of {} movies", showing, total),
            message: (showing == 0).then_some(EMPTY_SECTION_MESSAGE),
        }
    }
}

/// Visible title count per partition
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub struct StatusCounts {
    pub in_theaters: usize,
    pub watched: usize,
    pub not_interested: usize,
}

impl StatusCounts {
    pub fn tally(records: &[MovieRecord], hide_special: bool) -> Self {
        let mut counts = Self::default();
        for record in records
            .iter()
            .filter(|r| classifier::is_visible(r, hide_special))
        {
            match record.status {
                MovieStatus::InTheaters => counts.in_theaters += 1,
                MovieStatus::Watched => counts.watched += 1,
                MovieStatus::NotInterested => counts.not_interested += 1,
            }
        }
        counts
    }
}

/// Whole catalog as the renderer sees it
#[derive(Debug, Clone, Serialize)]
pub struct CatalogView {
    pub hide_special_screenings: bool,
    pub counts: StatusCounts,
    pub sections: Vec<CatalogSection>,
}

impl CatalogView {
    pub fn build(records: &[MovieRecord], hide_special: bool) -> Self {
        Self {
            hide_special_screenings: hide_special,
            counts: StatusCounts::tally(records, hide_special),
            sections: MovieStatus::DISPLAY_ORDER
                .into_iter()
                .map(|status| CatalogSection::build(status, records, hide_special))
                .collect(),
        }
    }
}
