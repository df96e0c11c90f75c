use std::time::Duration;

use futures_util::StreamExt;
use reqwest::header::{CACHE_CONTROL, HeaderValue};
use thiserror::Error;

use crate::request::{CachePolicy, FeedRequest, API_KEY_HEADER};

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub connect_timeout: Duration,
    /// `None` lets a stalled response keep the fetch open indefinitely.
    pub request_timeout: Option<Duration>,
    pub max_bytes: u64,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: Some(Duration::from_secs(30)),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportFailure {
    #[error("network error")]
    Network,
    #[error("timeout")]
    Timeout,
    #[error("response too large (max {max_bytes}, actual {actual:?})")]
    TooLarge { max_bytes: u64, actual: Option<u64> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: TransportFailure,
    pub message: String,
}

impl TransportError {
    pub fn new(kind: TransportFailure, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Executes a composed request and returns the raw body.
///
/// Any HTTP status is a successful transport result; the body decides what
/// the page means.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: &FeedRequest) -> Result<Vec<u8>, TransportError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    settings: FetchSettings,
}

impl ReqwestTransport {
    pub fn new(settings: FetchSettings) -> Result<Self, TransportError> {
        let mut builder = reqwest::Client::builder().connect_timeout(settings.connect_timeout);
        if let Some(timeout) = settings.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|err| TransportError::new(TransportFailure::Network, err.to_string()))?;
        Ok(Self { client, settings })
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    fn too_large(&self, actual: u64) -> TransportError {
        TransportError::new(
            TransportFailure::TooLarge {
                max_bytes: self.settings.max_bytes,
                actual: Some(actual),
            },
            "response too large",
        )
    }
}

#[async_trait::async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: &FeedRequest) -> Result<Vec<u8>, TransportError> {
        let mut builder = self
            .client
            .get(request.url.clone())
            .header(API_KEY_HEADER, request.api_key.clone());
        if request.cache_policy == CachePolicy::Revalidate {
            builder = builder.header(CACHE_CONTROL, HeaderValue::from_static("no-cache"));
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(self.too_large(content_len));
            }
        }

        let mut body = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = body.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(self.too_large(next_len));
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        return TransportError::new(TransportFailure::Timeout, err.to_string());
    }
    TransportError::new(TransportFailure::Network, err.to_string())
}
