//! Remote catalog API client
//!
//! API Flow:
//! 1. Unified catalog: GET /api/movies
//! 2. One partition: GET /api/movies/status/{0|1|2}
//! 3. Status change: PUT /api/movies/{code}/status with `{"status": n}`
use crate::{
    error::{AppError, AppResult},
    models::{ApiMovie, MovieRecord, MovieStatus, StartDateField, StatusUpdate},
    services::providers::{LoadTarget, MovieSource, StatusUpdater},
};
use reqwest::Client as HttpClient;
use std::time::Duration;

#[derive(Clone)]
pub struct RemoteCatalogApi {
    http_client: HttpClient,
    api_url: String,
    date_field: StartDateField,
}

impl RemoteCatalogApi {
    pub fn new(
        api_url: impl Into<String>,
        date_field: StartDateField,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self::with_client(http_client, api_url, date_field))
    }

    pub fn with_client(
        http_client: HttpClient,
        api_url: impl Into<String>,
        date_field: StartDateField,
    ) -> Self {
        let api_url: String = api_url.into();
        Self {
            http_client,
            api_url: api_url.trim_end_matches('/').to_string(),
            date_field,
        }
    }

    fn catalog_url(&self, target: LoadTarget) -> String {
        match target {
            LoadTarget::All => format!("{}/api/movies", self.api_url),
            LoadTarget::Status(status) => {
                format!("{}/api/movies/status/{}", self.api_url, status.code())
            }
        }
    }

    fn status_url(&self, code: &str) -> String {
        format!(
            "{}/api/movies/{}/status",
            self.api_url,
            urlencoding::encode(code)
        )
    }

    /// Parses a catalog array, tagging records with the partition status if any
    fn parse_catalog(&self, body: &str, target: LoadTarget) -> AppResult<Vec<MovieRecord>> {
        let movies: Vec<ApiMovie> = serde_json::from_str(body).map_err(|e| {
            tracing::error!(error = %e, load_target = %target, "Failed to deserialize catalog response");
            AppError::MalformedResponse(format!("Failed to parse catalog response: {}", e))
        })?;

        Ok(movies
            .into_iter()
            .map(|movie| movie.into_record(self.date_field, target.status()))
            .collect())
    }
}

#[async_trait::async_trait]
impl MovieSource for RemoteCatalogApi {
    async fn fetch(&self, target: LoadTarget) -> AppResult<Vec<MovieRecord>> {
        let url = self.catalog_url(target);

        let response = self.http_client.get(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "Catalog API returned status {}: {}",
                status, body
            )));
        }

        let body = response.text().await?;
        let records = self.parse_catalog(&body, target)?;

        tracing::info!(
            load_target = %target,
            count = records.len(),
            provider = self.name(),
            "Catalog fetched"
        );

        Ok(records)
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[async_trait::async_trait]
impl StatusUpdater for RemoteCatalogApi {
    async fn update_status(&self, code: &str, status: MovieStatus) -> AppResult<()> {
        let response = self
            .http_client
            .put(self.status_url(code))
            .json(&StatusUpdate { status })
            .send()
            .await?;

        if !response.status().is_success() {
            let http_status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "Status update returned {}: {}",
                http_status, body
            )));
        }

        tracing::info!(code = %code, status = %status, "Status change confirmed");
        Ok(())
    }
}
