//! Configuration loading.
//!
//! Settings come from a TOML file, `cinevault.toml` in the working
//! directory by default or whatever `CINEVAULT_CONFIG` points at. The TMDB
//! API key never lives in the file; only the name of the environment
//! variable holding it does.

use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use cinevault_ingestion::pacing::RetryPolicy;
use cinevault_ingestion::pipeline::IngestJob;
use cinevault_ingestion::tmdb::{TmdbClientConfig, TMDB_BASE_URL};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub tmdb: TmdbSettings,
    #[serde(default)]
    pub ingest: IngestSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    3001
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: default_host(), port: default_port() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_database_url")]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_url() -> String {
    "sqlite://data/cinevault.db".to_string()
}
fn default_max_connections() -> u32 {
    10
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self { url: default_database_url(), max_connections: default_max_connections() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbSettings {
    #[serde(default = "default_tmdb_base_url")]
    pub base_url: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_region")]
    pub region: String,
    /// Name of the environment variable holding the API key.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_detail_max_attempts")]
    pub detail_max_attempts: u32,
    #[serde(default = "default_detail_backoff_base_ms")]
    pub detail_backoff_base_ms: u64,
    #[serde(default = "default_list_timeout_secs")]
    pub list_timeout_secs: u64,
    #[serde(default = "default_detail_timeout_secs")]
    pub detail_timeout_secs: u64,
}

fn default_tmdb_base_url() -> String {
    TMDB_BASE_URL.to_string()
}
fn default_language() -> String {
    "en-US".to_string()
}
fn default_region() -> String {
    "US".to_string()
}
fn default_api_key_env() -> String {
    "TMDB_API_KEY".to_string()
}
fn default_detail_max_attempts() -> u32 {
    3
}
fn default_detail_backoff_base_ms() -> u64 {
    1000
}
fn default_list_timeout_secs() -> u64 {
    10
}
fn default_detail_timeout_secs() -> u64 {
    15
}

impl Default for TmdbSettings {
    fn default() -> Self {
        Self {
            base_url: default_tmdb_base_url(),
            language: default_language(),
            region: default_region(),
            api_key_env: default_api_key_env(),
            detail_max_attempts: default_detail_max_attempts(),
            detail_backoff_base_ms: default_detail_backoff_base_ms(),
            list_timeout_secs: default_list_timeout_secs(),
            detail_timeout_secs: default_detail_timeout_secs(),
        }
    }
}

impl TmdbSettings {
    /// The API key from the environment, `None` when unset or blank.
    pub fn api_key(&self) -> Option<SecretString> {
        std::env::var(&self.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
            .map(SecretString::from)
    }

    pub fn client_config(&self) -> TmdbClientConfig {
        TmdbClientConfig {
            base_url: self.base_url.clone(),
            language: self.language.clone(),
            region: self.region.clone(),
            list_timeout: Duration::from_secs(self.list_timeout_secs),
            detail_timeout: Duration::from_secs(self.detail_timeout_secs),
            retry: RetryPolicy::new(
                self.detail_max_attempts,
                Duration::from_millis(self.detail_backoff_base_ms),
            ),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestSettings {
    /// Run a full ingest before the server starts listening.
    #[serde(default = "default_run_on_startup")]
    pub run_on_startup: bool,
    #[serde(default = "default_target_count")]
    pub target_count: usize,
    #[serde(default = "default_max_pages")]
    pub max_pages: u32,
    #[serde(default = "default_item_delay_ms")]
    pub item_delay_ms: u64,
    #[serde(default = "default_page_delay_ms")]
    pub page_delay_ms: u64,
    #[serde(default = "default_failure_threshold")]
    pub failure_threshold: u32,
    #[serde(default = "default_cooldown_ms")]
    pub cooldown_ms: u64,
}

fn default_run_on_startup() -> bool {
    true
}
fn default_target_count() -> usize {
    100
}
fn default_max_pages() -> u32 {
    20
}
fn default_item_delay_ms() -> u64 {
    300
}
fn default_page_delay_ms() -> u64 {
    1000
}
fn default_failure_threshold() -> u32 {
    3
}
fn default_cooldown_ms() -> u64 {
    5000
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            run_on_startup: default_run_on_startup(),
            target_count: default_target_count(),
            max_pages: default_max_pages(),
            item_delay_ms: default_item_delay_ms(),
            page_delay_ms: default_page_delay_ms(),
            failure_threshold: default_failure_threshold(),
            cooldown_ms: default_cooldown_ms(),
        }
    }
}

impl IngestSettings {
    pub fn job(&self) -> IngestJob {
        IngestJob {
            target_count: self.target_count,
            max_pages: self.max_pages,
            item_delay_ms: self.item_delay_ms,
            page_delay_ms: self.page_delay_ms,
            failure_threshold: self.failure_threshold,
            cooldown_ms: self.cooldown_ms,
        }
    }
}

impl Config {
    /// Load from `$CINEVAULT_CONFIG` or `./cinevault.toml`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var("CINEVAULT_CONFIG")
            .unwrap_or_else(|_| "cinevault.toml".to_string());
        Self::load_from(Path::new(&path))
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!(
                "config file {} not found; copy cinevault.example.toml and adjust it",
                path.display()
            );
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("failed to parse {}", path.display()))?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_full_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.database.url, "sqlite://data/cinevault.db");
        assert_eq!(config.database.max_connections, 10);
        assert_eq!(config.tmdb.api_key_env, "TMDB_API_KEY");
        assert_eq!(config.tmdb.base_url, "https://api.themoviedb.org/3");
        assert!(config.ingest.run_on_startup);
        assert_eq!(config.ingest.target_count, 100);
        assert_eq!(config.ingest.max_pages, 20);
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let raw = r#"
            [server]
            port = 8080

            [ingest]
            run_on_startup = false
            target_count = 25
        "#;
        let config: Config = toml::from_str(raw).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1");
        assert!(!config.ingest.run_on_startup);
        assert_eq!(config.ingest.target_count, 25);
        assert_eq!(config.ingest.item_delay_ms, 300);
    }

    #[test]
    fn settings_map_onto_client_and_job() {
        let config = Config::default();

        let client = config.tmdb.client_config();
        assert_eq!(client.list_timeout, Duration::from_secs(10));
        assert_eq!(client.detail_timeout, Duration::from_secs(15));
        assert_eq!(client.retry.max_attempts, 3);
        assert_eq!(client.retry.base_delay, Duration::from_millis(1000));

        let job = config.ingest.job();
        assert_eq!(job.target_count, 100);
        assert_eq!(job.cooldown_ms, 5000);
    }
}
