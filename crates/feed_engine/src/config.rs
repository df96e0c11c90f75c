use std::time::{Duration, Instant};

use feed_core::FeedTuning;
use reqwest::header::HeaderValue;
use thiserror::Error;
use url::Url;

use crate::fetch::{FetchSettings, TransportError};
use crate::request::{parse_endpoint, CachePolicy, RequestError};
use crate::settings::Settings;

pub const DEFAULT_ENDPOINT: &str = "https://newsapi.org/v2/everything";
pub const FEED_TITLE: &str = "NewsAPI.org";

/// Problems detected while constructing an engine. None of them is retryable.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[source] RequestError),
    #[error("no API key configured")]
    MissingApiKey,
    #[error("API key is not a valid header value")]
    InvalidApiKey,
    #[error("quiet interval of {0:?} cannot be scheduled")]
    InvalidQuietInterval(Duration),
    #[error("failed to build HTTP client: {0}")]
    Transport(#[source] TransportError),
    #[error("failed to start engine runtime: {0}")]
    Runtime(String),
}

#[derive(Clone)]
pub struct EngineConfig {
    pub endpoint: String,
    pub api_key: String,
    pub tuning: FeedTuning,
    pub cache_policy: CachePolicy,
    pub fetch: FetchSettings,
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"<redacted>")
            .field("tuning", &self.tuning)
            .field("cache_policy", &self.cache_policy)
            .field("fetch", &self.fetch)
            .finish()
    }
}

impl EngineConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            tuning: FeedTuning::default(),
            cache_policy: CachePolicy::default(),
            fetch: FetchSettings::default(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.api_key.clone())
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_tuning(mut self, tuning: FeedTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_cache_policy(mut self, cache_policy: CachePolicy) -> Self {
        self.cache_policy = cache_policy;
        self
    }

    pub fn with_fetch_settings(mut self, fetch: FetchSettings) -> Self {
        self.fetch = fetch;
        self
    }

    pub(crate) fn validate(&self) -> Result<(Url, HeaderValue), ConfigError> {
        let endpoint = parse_endpoint(&self.endpoint).map_err(ConfigError::InvalidEndpoint)?;
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingApiKey);
        }
        let key = HeaderValue::from_str(key).map_err(|_| ConfigError::InvalidApiKey)?;
        let quiet = self.tuning.quiet_interval;
        if Instant::now().checked_add(quiet).is_none() {
            return Err(ConfigError::InvalidQuietInterval(quiet));
        }
        Ok((endpoint, key))
    }
}
