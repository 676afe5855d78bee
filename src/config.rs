use serde::Deserialize;
use std::time::Duration;

use crate::models::StartDateField;

/// Shape of the remote catalog API
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum EndpointMode {
    /// One `GET /api/movies` returning the whole catalog
    #[default]
    Unified,
    /// One `GET /api/movies/status/{n}` per status partition
    PerStatus,
}

/// Whether status changes are confirmed against the remote API
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum MutationMode {
    #[default]
    Enabled,
    /// Status changes only touch the in-memory store
    DisplayOnly,
}

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Remote catalog API base URL
    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub endpoint_mode: EndpointMode,

    #[serde(default)]
    pub mutation_mode: MutationMode,

    /// Name of the start-date field in the remote movie objects
    #[serde(default)]
    pub start_date_field: StartDateField,

    /// Run a full reload after a confirmed status change
    #[serde(default = "default_true")]
    pub reload_after_change: bool,

    /// Initial value of the special-screening filter
    #[serde(default = "default_true")]
    pub hide_special_screenings: bool,

    /// Redis connection URL; the file cache is used when unset
    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default = "default_cache_path")]
    pub cache_path: String,

    #[serde(default = "default_cache_key")]
    pub cache_key: String,

    #[serde(default = "default_bundled_snapshot_path")]
    pub bundled_snapshot_path: String,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_api_url() -> String {
    "http://127.0.0.1:8000".to_string()
}

fn default_true() -> bool {
    true
}

fn default_cache_path() -> String {
    ".cinetrack/cache.json".to_string()
}

fn default_cache_key() -> String {
    "movies_cache".to_string()
}

fn default_bundled_snapshot_path() -> String {
    "assets/movies_backup.json".to_string()
}

fn default_request_timeout_secs() -> u64 {
    10
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            endpoint_mode: EndpointMode::default(),
            mutation_mode: MutationMode::default(),
            start_date_field: StartDateField::default(),
            reload_after_change: true,
            hide_special_screenings: true,
            redis_url: None,
            cache_path: default_cache_path(),
            cache_key: default_cache_key(),
            bundled_snapshot_path: default_bundled_snapshot_path(),
            request_timeout_secs: default_request_timeout_secs(),
            host: default_host(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
