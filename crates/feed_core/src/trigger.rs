use crate::{FeedItem, ItemId};

/// Reference lookahead: fire when at most this many items remain after the
/// visible one.
pub const DEFAULT_LOOKAHEAD: usize = 4;

/// A notification from the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// The item with this id is on screen.
    Item(ItemId),
    /// Load more regardless of position (first page, manual refresh).
    LoadMore,
}

/// An instruction to fetch the next page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pulse {
    Unconditional,
    /// Fired by `item` while the list held `list_len` entries.
    NearEnd { item: ItemId, list_len: usize },
}

/// Converts visibility notifications into fetch pulses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTrigger {
    lookahead: usize,
    last_near_end: Option<Pulse>,
}

impl Default for FetchTrigger {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKAHEAD)
    }
}

impl FetchTrigger {
    pub fn new(lookahead: usize) -> Self {
        Self {
            lookahead,
            last_near_end: None,
        }
    }

    pub fn lookahead(&self) -> usize {
        self.lookahead
    }

    /// Forgets coalescing history; called when a new query starts.
    pub fn reset(&mut self) {
        self.last_near_end = None;
    }

    /// Returns a pulse if `notification` should start a fetch.
    ///
    /// Unknown ids are ignored. A near-end pulse identical to the previous one
    /// (same item, same list length) is coalesced away.
    pub fn evaluate(&mut self, items: &[FeedItem], notification: Visibility) -> Option<Pulse> {
        let item = match notification {
            Visibility::LoadMore => return Some(Pulse::Unconditional),
            Visibility::Item(item) => item,
        };

        let remaining = remaining_after(items, item)?;
        if remaining > self.lookahead {
            return None;
        }

        let pulse = Pulse::NearEnd {
            item,
            list_len: items.len(),
        };
        if self.last_near_end == Some(pulse) {
            return None;
        }
        self.last_near_end = Some(pulse);
        Some(pulse)
    }
}

/// Number of items after the first occurrence of `id`, if present.
pub fn remaining_after(items: &[FeedItem], id: ItemId) -> Option<usize> {
    items
        .iter()
        .position(|item| item.id == id)
        .map(|index| items.len() - index - 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items(n: usize) -> Vec<FeedItem> {
        (0..n).map(|_| FeedItem::new(None, None)).collect()
    }

    #[test]
    fn fires_iff_within_lookahead() {
        let list = items(10);
        for k in 0..10 {
            let mut trigger = FetchTrigger::default();
            let visible = list[list.len() - 1 - k].id;
            let fired = trigger.evaluate(&list, Visibility::Item(visible)).is_some();
            assert_eq!(fired, k <= DEFAULT_LOOKAHEAD, "k = {k}");
        }
    }

    #[test]
    fn unknown_id_is_ignored() {
        let mut trigger = FetchTrigger::default();
        let stranger = FeedItem::new(None, None);
        assert_eq!(trigger.evaluate(&items(3), Visibility::Item(stranger.id)), None);
    }

    #[test]
    fn load_more_always_fires() {
        let mut trigger = FetchTrigger::default();
        assert_eq!(trigger.evaluate(&[], Visibility::LoadMore), Some(Pulse::Unconditional));
        assert_eq!(trigger.evaluate(&[], Visibility::LoadMore), Some(Pulse::Unconditional));
    }

    #[test]
    fn identical_pulses_coalesce_until_list_grows() {
        let mut list = items(5);
        let last = list[4].id;
        let mut trigger = FetchTrigger::default();

        assert!(trigger.evaluate(&list, Visibility::Item(last)).is_some());
        assert!(trigger.evaluate(&list, Visibility::Item(last)).is_none());

        list.push(FeedItem::new(None, None));
        assert!(trigger.evaluate(&list, Visibility::Item(last)).is_some());
    }
}
