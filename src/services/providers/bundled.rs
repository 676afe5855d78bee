use std::path::PathBuf;

use crate::{
    error::{AppError, AppResult},
    models::{ApiMovie, MovieRecord, StartDateField},
    services::providers::{LoadTarget, MovieSource},
};

/// Static catalog shipped with the application, same schema as the remote array
pub struct BundledSnapshot {
    path: PathBuf,
    date_field: StartDateField,
}

impl BundledSnapshot {
    pub fn new(path: impl Into<PathBuf>, date_field: StartDateField) -> Self {
        Self {
            path: path.into(),
            date_field,
        }
    }
}

#[async_trait::async_trait]
impl MovieSource for BundledSnapshot {
    async fn fetch(&self, target: LoadTarget) -> AppResult<Vec<MovieRecord>> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            AppError::Storage(format!(
                "Bundled snapshot {} unreadable: {}",
                self.path.display(),
                e
            ))
        })?;
        let movies: Vec<ApiMovie> = serde_json::from_str(&contents)?;

        Ok(movies
            .into_iter()
            .map(|movie| movie.into_record(self.date_field, None))
            .filter(|record| target.includes(record))
            .collect())
    }

    fn name(&self) -> &'static str {
        "bundled"
    }
}
