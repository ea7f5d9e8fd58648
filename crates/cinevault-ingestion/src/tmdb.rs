//! TMDB v3 API client.
//!
//! Three read endpoints back the ingest run:
//! - `/genre/movie/list` for the canonical genre vocabulary
//! - `/movie/popular` for paged, popularity-ordered summaries
//! - `/movie/{id}?append_to_response=videos,keywords,credits` for one
//!   detail request per accepted movie
//!
//! Every operation is total: a failure surfaces as an empty page or `None`
//! after logging, and the pipeline decides what that means for the run.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tracing::{error, info, instrument, warn};

use crate::models::{GenreDto, MovieDetails, MovieSummary, Page};
use crate::pacing::{RetryPolicy, Sleeper, TokioSleeper};

pub const TMDB_BASE_URL: &str = "https://api.themoviedb.org/3";

/// Read side of the remote catalog. The pipeline is driven through this
/// trait so tests can script pages, details and failures.
#[async_trait]
pub trait MovieSource: Send + Sync {
    async fn fetch_genres(&self) -> Vec<GenreDto>;
    async fn fetch_popular_page(&self, page: u32) -> Vec<MovieSummary>;
    async fn fetch_movie_details(&self, tmdb_id: i64) -> Option<MovieDetails>;
}

/// Connection settings for [`TmdbClient`].
#[derive(Debug, Clone)]
pub struct TmdbClientConfig {
    pub base_url: String,
    pub language: String,
    pub region: String,
    pub list_timeout: Duration,
    pub detail_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for TmdbClientConfig {
    fn default() -> Self {
        Self {
            base_url: TMDB_BASE_URL.to_string(),
            language: "en-US".to_string(),
            region: "US".to_string(),
            list_timeout: Duration::from_secs(10),
            detail_timeout: Duration::from_secs(15),
            retry: RetryPolicy::default(),
        }
    }
}

pub struct TmdbClient {
    client: Client,
    config: TmdbClientConfig,
    api_key: SecretString,
    sleeper: Arc<dyn Sleeper>,
}

impl TmdbClient {
    pub fn new(config: TmdbClientConfig, api_key: SecretString) -> Self {
        Self {
            client: Client::new(),
            config,
            api_key,
            sleeper: Arc::new(TokioSleeper),
        }
    }

    /// Swap the sleeper used between retry attempts (tests).
    pub fn with_sleeper(mut self, sleeper: Arc<dyn Sleeper>) -> Self {
        self.sleeper = sleeper;
        self
    }

    async fn get_genres(&self) -> anyhow::Result<Vec<GenreDto>> {
        #[derive(Deserialize)]
        struct GenreList {
            genres: Vec<GenreDto>,
        }

        let url = format!("{}/genre/movie/list", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.expose_secret()),
                ("language", self.config.language.as_str()),
            ])
            .timeout(self.config.list_timeout)
            .send()
            .await?
            .error_for_status()?;

        let list: GenreList = response.json().await?;
        Ok(list.genres)
    }

    async fn get_popular(&self, page: u32) -> anyhow::Result<Vec<MovieSummary>> {
        let url = format!("{}/movie/popular", self.config.base_url);
        let page = page.to_string();
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.expose_secret()),
                ("page", page.as_str()),
                ("language", self.config.language.as_str()),
                ("include_adult", "false"),
                ("region", self.config.region.as_str()),
            ])
            .timeout(self.config.list_timeout)
            .send()
            .await?
            .error_for_status()?;

        let body: Page<MovieSummary> = response.json().await?;
        Ok(body.results)
    }

    async fn get_details(&self, tmdb_id: i64) -> anyhow::Result<MovieDetails> {
        let url = format!("{}/movie/{}", self.config.base_url, tmdb_id);
        let response = self
            .client
            .get(&url)
            .query(&[
                ("api_key", self.api_key.expose_secret()),
                ("language", self.config.language.as_str()),
                ("append_to_response", "videos,keywords,credits"),
            ])
            .timeout(self.config.detail_timeout)
            .send()
            .await?
            .error_for_status()?;

        Ok(response.json().await?)
    }
}

#[async_trait]
impl MovieSource for TmdbClient {
    /// Single attempt; an empty list means "nothing to seed" and is left to
    /// the caller to interpret.
    #[instrument(skip(self))]
    async fn fetch_genres(&self) -> Vec<GenreDto> {
        match self.get_genres().await {
            Ok(genres) => {
                info!(count = genres.len(), "fetched genre list");
                genres
            }
            Err(e) => {
                warn!(error = %e, "genre list fetch failed");
                Vec::new()
            }
        }
    }

    #[instrument(skip(self))]
    async fn fetch_popular_page(&self, page: u32) -> Vec<MovieSummary> {
        match self.get_popular(page).await {
            Ok(results) => {
                info!(page, count = results.len(), "fetched popular page");
                results
            }
            Err(e) => {
                warn!(page, error = %e, "popular page fetch failed");
                Vec::new()
            }
        }
    }

    /// The only retried call: up to `max_attempts` tries with a linearly
    /// escalating pause between them, `None` once exhausted.
    #[instrument(skip(self))]
    async fn fetch_movie_details(&self, tmdb_id: i64) -> Option<MovieDetails> {
        let retry = self.config.retry;
        for attempt in 1..=retry.max_attempts {
            match self.get_details(tmdb_id).await {
                Ok(details) => return Some(details),
                Err(e) => {
                    warn!(
                        tmdb_id,
                        attempt,
                        max_attempts = retry.max_attempts,
                        error = %e,
                        "detail fetch attempt failed"
                    );
                    if attempt < retry.max_attempts {
                        self.sleeper.sleep(retry.delay_after(attempt)).await;
                    }
                }
            }
        }
        error!(tmdb_id, "detail fetch exhausted all attempts");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_targets_the_public_api() {
        let config = TmdbClientConfig::default();
        assert_eq!(config.base_url, "https://api.themoviedb.org/3");
        assert_eq!(config.language, "en-US");
        assert_eq!(config.list_timeout, Duration::from_secs(10));
        assert_eq!(config.detail_timeout, Duration::from_secs(15));
        assert_eq!(config.retry.max_attempts, 3);
    }
}
