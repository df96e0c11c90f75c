//! Feed engine: request composition, response classification, transport and
//! the orchestrating [`FeedEngine`].
mod classify;
mod config;
mod engine;
mod fetch;
mod persist;
mod request;
mod settings;

pub use classify::classify;
pub use config::{ConfigError, EngineConfig, DEFAULT_ENDPOINT, FEED_TITLE};
pub use engine::FeedEngine;
pub use fetch::{FetchSettings, ReqwestTransport, Transport, TransportError, TransportFailure};
pub use persist::{ensure_dir, write_atomically, PersistError};
pub use request::{
    page_url, parse_endpoint, CachePolicy, FeedRequest, RequestBuilder, RequestError,
    API_KEY_HEADER, LANGUAGE,
};
pub use settings::{Settings, SettingsError, SettingsStore, SETTINGS_FILENAME};

pub use feed_core::{FeedItem, FeedSnapshot, ItemId, LoadStatus, Outcome, Page, Query};
