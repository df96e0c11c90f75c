use std::fmt;

use crate::{Outcome, Page};

/// Load state of the current query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Ready { next_page: Page },
    Fetching { page: Page },
    /// The API reported an orderly end of feed.
    Exhausted,
    /// Transport error or undecodable body.
    Failed,
}

impl LoadStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready { .. })
    }

    pub fn is_fetching(&self) -> bool {
        matches!(self, LoadStatus::Fetching { .. })
    }

    /// `Exhausted` and `Failed` stop automatic fetching until the next reset.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LoadStatus::Exhausted | LoadStatus::Failed)
    }
}

impl Default for LoadStatus {
    fn default() -> Self {
        LoadStatus::Ready {
            next_page: Page::FIRST,
        }
    }
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::Ready { next_page } => write!(f, "ready (next page {next_page})"),
            LoadStatus::Fetching { page } => write!(f, "fetching page {page}"),
            LoadStatus::Exhausted => write!(f, "exhausted"),
            LoadStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Identifies one issued fetch so its completion can be matched to the
/// query generation and page it was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FetchTicket {
    pub generation: u64,
    pub page: Page,
}

/// What a completion did to the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Advanced { next_page: Page },
    Exhausted,
    Failed,
    /// The ticket does not match the fetch in flight; nothing changed.
    Stale,
}

/// The single gate for fetches of the current query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Pagination {
    status: LoadStatus,
    generation: u64,
}

impl Pagination {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> LoadStatus {
        self.status
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Starts a new query generation at `Ready(1)`.
    ///
    /// Returns the ticket of the fetch that was in flight, which is now stale.
    pub fn reset(&mut self) -> Option<FetchTicket> {
        let abandoned = self.in_flight();
        self.generation += 1;
        self.status = LoadStatus::default();
        abandoned
    }

    /// `Ready(p)` moves to `Fetching(p)` and yields its ticket; any other
    /// state drops the request.
    pub fn begin(&mut self) -> Option<FetchTicket> {
        let LoadStatus::Ready { next_page } = self.status else {
            return None;
        };
        self.status = LoadStatus::Fetching { page: next_page };
        Some(FetchTicket {
            generation: self.generation,
            page: next_page,
        })
    }

    pub fn in_flight(&self) -> Option<FetchTicket> {
        match self.status {
            LoadStatus::Fetching { page } => Some(FetchTicket {
                generation: self.generation,
                page,
            }),
            _ => None,
        }
    }

    /// Applies the outcome of the fetch identified by `ticket`.
    pub fn complete(&mut self, ticket: FetchTicket, outcome: &Outcome) -> Completion {
        if self.in_flight() != Some(ticket) {
            return Completion::Stale;
        }
        match outcome {
            Outcome::Items(_) => {
                let next_page = ticket.page.next();
                self.status = LoadStatus::Ready { next_page };
                Completion::Advanced { next_page }
            }
            Outcome::Exhausted(_) => {
                self.status = LoadStatus::Exhausted;
                Completion::Exhausted
            }
            Outcome::Malformed(_) | Outcome::TransportFailed(_) => {
                self.status = LoadStatus::Failed;
                Completion::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(n: u32) -> Page {
        Page::new(n).unwrap()
    }

    #[test]
    fn begin_only_from_ready() {
        let mut machine = Pagination::new();
        machine.reset();
        let ticket = machine.begin().unwrap();
        assert_eq!(ticket.page, Page::FIRST);
        assert_eq!(machine.status(), LoadStatus::Fetching { page: Page::FIRST });
        assert_eq!(machine.begin(), None);
    }

    #[test]
    fn items_advance_page() {
        let mut machine = Pagination::new();
        machine.reset();
        let ticket = machine.begin().unwrap();
        let done = machine.complete(ticket, &Outcome::Items(Vec::new()));
        assert_eq!(done, Completion::Advanced { next_page: page(2) });
        assert_eq!(machine.begin().unwrap().page, page(2));
    }

    #[test]
    fn exhausted_and_failed_are_terminal() {
        for (outcome, expected) in [
            (Outcome::Exhausted("done".into()), LoadStatus::Exhausted),
            (Outcome::Malformed("bad".into()), LoadStatus::Failed),
            (Outcome::TransportFailed("down".into()), LoadStatus::Failed),
        ] {
            let mut machine = Pagination::new();
            let ticket = machine.begin().unwrap();
            machine.complete(ticket, &outcome);
            assert_eq!(machine.status(), expected);
            assert!(machine.status().is_terminal());
            assert_eq!(machine.begin(), None);
        }
    }

    #[test]
    fn reset_makes_in_flight_ticket_stale() {
        let mut machine = Pagination::new();
        let old = machine.begin().unwrap();
        assert_eq!(machine.reset(), Some(old));

        let fresh = machine.begin().unwrap();
        assert_eq!(
            machine.complete(old, &Outcome::Items(Vec::new())),
            Completion::Stale
        );
        assert_eq!(machine.status(), LoadStatus::Fetching { page: Page::FIRST });
        assert_ne!(old, fresh);
    }
}
