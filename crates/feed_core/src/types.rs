use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use url::Url;

/// Placeholder title for records that arrive without one.
pub const UNTITLED: &str = "(untitled)";
/// Placeholder author for records that arrive without one.
pub const UNATTRIBUTED: &str = "(unattributed)";

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Opaque identity of a decoded item, unique for the life of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(u64);

impl ItemId {
    /// Allocates a fresh id.
    pub fn next() -> Self {
        ItemId(NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn from_raw(raw: u64) -> Self {
        ItemId(raw)
    }

    pub fn as_raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// 1-based page cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Page(u32);

impl Page {
    pub const FIRST: Page = Page(1);

    /// Returns `None` for zero.
    pub fn new(number: u32) -> Option<Self> {
        (number > 0).then_some(Page(number))
    }

    pub fn number(self) -> u32 {
        self.0
    }

    pub fn next(self) -> Self {
        Page(self.0.saturating_add(1))
    }
}

impl fmt::Display for Page {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A committed search: trimmed, non-empty text plus the endpoint it targets.
///
/// Equality is by text only.
#[derive(Debug, Clone)]
pub struct Query {
    text: String,
    endpoint: Url,
}

impl Query {
    /// Trims `text`; returns `None` if nothing is left.
    pub fn new(text: &str, endpoint: Url) -> Option<Self> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            endpoint,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl PartialEq for Query {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Query {}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}'", self.text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub id: ItemId,
    pub title: String,
    pub author: String,
    pub detail_url: Option<String>,
    pub thumbnail_url: Option<String>,
}

impl FeedItem {
    /// Builds an item with a fresh id and placeholder-defaulted text fields.
    pub fn new(title: Option<String>, author: Option<String>) -> Self {
        Self {
            id: ItemId::next(),
            title: title.unwrap_or_else(|| UNTITLED.to_string()),
            author: author.unwrap_or_else(|| UNATTRIBUTED.to_string()),
            detail_url: None,
            thumbnail_url: None,
        }
    }

    pub fn with_detail_url(mut self, url: Option<String>) -> Self {
        self.detail_url = url;
        self
    }

    pub fn with_thumbnail_url(mut self, url: Option<String>) -> Self {
        self.thumbnail_url = url;
        self
    }

    pub fn has_detail(&self) -> bool {
        self.detail_url.is_some()
    }
}

/// Classified result of one page fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Status "ok"; the list may be empty.
    Items(Vec<FeedItem>),
    /// Orderly end of feed reported by the API.
    Exhausted(String),
    /// Body could not be decoded as a response envelope.
    Malformed(String),
    /// The transport failed before a body was available.
    TransportFailed(String),
}
