use crate::{FeedItem, LoadStatus};

/// Read-only view of the feed handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FeedSnapshot {
    /// Text of the committed query, if any.
    pub query: Option<String>,
    /// Query generation; bumps once per reset of the list.
    pub generation: u64,
    /// Items in arrival order.
    pub items: Vec<FeedItem>,
    pub status: LoadStatus,
}

impl FeedSnapshot {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn last_item(&self) -> Option<&FeedItem> {
        self.items.last()
    }
}
