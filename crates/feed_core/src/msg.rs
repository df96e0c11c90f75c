use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Raw query text changed (one per keystroke).
    QueryEdited { text: String, at: Instant },
    /// Timer tick; lets the query debounce commit pending input.
    Tick { now: Instant },
    /// Presentation layer reports this item as on screen.
    ItemVisible(crate::ItemId),
    /// Explicit "load more" with no specific item.
    LoadMore,
    /// Re-commit the current query from page 1.
    Restart,
    /// A fetch finished (or failed) in the worker context.
    FetchCompleted {
        ticket: crate::FetchTicket,
        outcome: crate::Outcome,
    },
}
