//! Web-search API client.
//!
//! Thin reqwest wrapper over an external search endpoint: JSON POST with a
//! query string, a recency window, and a result count; the response carries a
//! list of web items (title, url, site name, publish time, snippet).
//!
//! The endpoint and API key come from a YAML config file or from the
//! `SEARCH_API_ENDPOINT` / `SEARCH_API_KEY` environment variables. Transient
//! failures are retried with exponential backoff and jitter; raw page-body
//! fetches are best-effort and fall back to an empty string.

use rand::{rng, Rng};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::time::{Duration, Instant};
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

/// Recency window accepted by the search API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeRange {
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "7d")]
    SevenDays,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeRange::OneDay => "1d",
            TimeRange::ThreeDays => "3d",
            TimeRange::SevenDays => "7d",
        }
    }
}

/// Search endpoint configuration, from `config.yaml` or the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// Full URL of the search endpoint.
    pub endpoint: String,
    /// Optional bearer token.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Fixed delay between successive search calls, to stay under rate limits.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,
}

fn default_request_delay_ms() -> u64 {
    800
}

impl SearchConfig {
    /// Load from a YAML file when a path is given, otherwise from the
    /// environment.
    pub fn load(path: Option<&str>) -> Result<Self, Box<dyn Error>> {
        match path {
            Some(path) => {
                let raw = std::fs::read_to_string(path)?;
                let config: SearchConfig = serde_yaml::from_str(&raw)?;
                info!(path, "Loaded search configuration");
                Ok(config)
            }
            None => {
                let endpoint = std::env::var("SEARCH_API_ENDPOINT").map_err(|_| {
                    "SEARCH_API_ENDPOINT is not set and no --config file was given"
                })?;
                Ok(SearchConfig {
                    endpoint,
                    api_key: std::env::var("SEARCH_API_KEY").ok(),
                    request_delay_ms: default_request_delay_ms(),
                })
            }
        }
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_type: &'static str,
    count: usize,
    time_range: &'static str,
    need_summary: bool,
    need_content: bool,
}

/// One result from the search API. Every field is optional on the wire.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WebItem {
    pub title: Option<String>,
    pub url: Option<String>,
    pub site_name: Option<String>,
    pub publish_time: Option<String>,
    pub snippet: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    web_items: Vec<WebItem>,
}

/// Anything that can run one search attempt. Exists so the retry decorator
/// can wrap the real client and tests can substitute a scripted one.
pub trait SearchOnce {
    async fn search(
        &self,
        query: &str,
        time_range: TimeRange,
        count: usize,
    ) -> Result<Vec<WebItem>, Box<dyn Error>>;
}

/// What the fetch pipeline needs from a news backend: a pacing delay,
/// searches that absorb their own failures, and raw page bodies. The HTTP
/// client implements it for real; tests substitute scripted sources.
pub trait NewsSource {
    /// Pause between successive search calls.
    fn request_delay(&self) -> Duration;

    /// Run a search, returning an empty list when it ultimately fails.
    async fn search_with_backoff(
        &self,
        query: &str,
        time_range: TimeRange,
        count: usize,
    ) -> Vec<WebItem>;

    /// Fetch a raw article body, empty on failure.
    async fn fetch_page_body(&self, url: &str) -> String;
}

/// The real HTTP search client.
#[derive(Debug, Clone)]
pub struct SearchClient {
    http: reqwest::Client,
    config: SearchConfig,
}

impl SearchClient {
    pub fn new(config: SearchConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }
}

impl NewsSource for SearchClient {
    fn request_delay(&self) -> Duration {
        self.config.request_delay()
    }

    /// Run a search with backoff, returning an empty list if every attempt
    /// fails. Per-query failures never abort the pipeline.
    #[instrument(level = "info", skip(self), fields(time_range = time_range.as_str()))]
    async fn search_with_backoff(
        &self,
        query: &str,
        time_range: TimeRange,
        count: usize,
    ) -> Vec<WebItem> {
        let retry = RetrySearch::new(self, 3, Duration::from_secs(1));
        match retry.search(query, time_range, count).await {
            Ok(items) => {
                info!(count = items.len(), "Search returned items");
                items
            }
            Err(e) => {
                warn!(error = %e, "Search failed after retries; continuing with no results");
                Vec::new()
            }
        }
    }

    /// Fetch a raw page body for summarization. Best effort: any failure
    /// yields an empty string, and bodies are truncated to 10 KiB of
    /// characters.
    #[instrument(level = "debug", skip(self), fields(%url))]
    async fn fetch_page_body(&self, url: &str) -> String {
        const MAX_BODY_CHARS: usize = 10_000;

        let body = async {
            let response = self.http.get(url).send().await?;
            response.text().await
        }
        .await;

        match body {
            Ok(text) => {
                debug!(bytes = text.len(), "Fetched page body");
                text.chars().take(MAX_BODY_CHARS).collect()
            }
            Err(e) => {
                warn!(error = %e, "Page fetch failed; summarizer will fall back to the title");
                String::new()
            }
        }
    }
}

impl SearchOnce for &SearchClient {
    async fn search(
        &self,
        query: &str,
        time_range: TimeRange,
        count: usize,
    ) -> Result<Vec<WebItem>, Box<dyn Error>> {
        let request = SearchRequest {
            query,
            search_type: "web",
            count,
            time_range: time_range.as_str(),
            need_summary: false,
            need_content: false,
        };

        let mut builder = self.http.post(&self.config.endpoint).json(&request);
        if let Some(ref key) = self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let t0 = Instant::now();
        let response = builder.send().await?.error_for_status()?;
        let parsed: SearchResponse = response.json().await?;
        debug!(
            elapsed_ms = t0.elapsed().as_millis() as u64,
            items = parsed.web_items.len(),
            "Search request completed"
        );
        Ok(parsed.web_items)
    }
}

/// Retry decorator with exponential backoff and jitter.
///
/// Delay formula: `min(base * 2^(attempt-1), max) + jitter(0..=250ms)`.
pub struct RetrySearch<T> {
    inner: T,
    max_retries: usize,
    base_delay: Duration,
    max_delay: Duration,
}

impl<T> RetrySearch<T>
where
    T: SearchOnce,
{
    pub fn new(inner: T, max_retries: usize, base_delay: Duration) -> Self {
        Self {
            inner,
            max_retries,
            base_delay,
            max_delay: Duration::from_secs(30),
        }
    }
}

impl<T> SearchOnce for RetrySearch<T>
where
    T: SearchOnce,
{
    async fn search(
        &self,
        query: &str,
        time_range: TimeRange,
        count: usize,
    ) -> Result<Vec<WebItem>, Box<dyn Error>> {
        let mut attempt = 0usize;

        loop {
            match self.inner.search(query, time_range, count).await {
                Ok(items) => return Ok(items),
                Err(e) => {
                    attempt += 1;
                    if attempt > self.max_retries {
                        return Err(e);
                    }

                    let mut delay = self.base_delay.saturating_mul(1 << (attempt - 1));
                    if delay > self.max_delay {
                        delay = self.max_delay;
                    }
                    let jitter_ms: u64 = rng().random_range(0..=250);
                    let delay = delay + Duration::from_millis(jitter_ms);

                    warn!(
                        attempt,
                        max = self.max_retries,
                        ?delay,
                        error = %e,
                        "Search attempt failed; backing off"
                    );
                    sleep(delay).await;
                }
            }
        }
    }
}
