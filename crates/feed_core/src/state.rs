use std::time::{Duration, Instant};

use feed_logging::{feed_debug, feed_info, feed_warn};
use url::Url;

use crate::pagination::Completion;
use crate::query_signal::DEFAULT_QUIET_INTERVAL;
use crate::trigger::{Visibility, DEFAULT_LOOKAHEAD};
use crate::view_model::FeedSnapshot;
use crate::{
    Effect, FeedItem, FetchTicket, FetchTrigger, LoadStatus, Outcome, Pagination, Query,
    QuerySignal,
};

/// Timing and distance knobs for the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedTuning {
    pub quiet_interval: Duration,
    pub lookahead: usize,
}

impl Default for FeedTuning {
    fn default() -> Self {
        Self {
            quiet_interval: DEFAULT_QUIET_INTERVAL,
            lookahead: DEFAULT_LOOKAHEAD,
        }
    }
}

/// Everything one feed owns: committed query, accumulated items, and the
/// pagination machine. Mutated only through [`crate::update`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedState {
    endpoint: Url,
    signal: QuerySignal,
    trigger: FetchTrigger,
    pagination: Pagination,
    query: Option<Query>,
    items: Vec<FeedItem>,
    dirty: bool,
}

impl FeedState {
    pub fn new(endpoint: Url) -> Self {
        Self::with_tuning(endpoint, FeedTuning::default())
    }

    pub fn with_tuning(endpoint: Url, tuning: FeedTuning) -> Self {
        Self {
            endpoint,
            signal: QuerySignal::new(tuning.quiet_interval),
            trigger: FetchTrigger::new(tuning.lookahead),
            pagination: Pagination::new(),
            query: None,
            items: Vec::new(),
            dirty: false,
        }
    }

    pub fn view(&self) -> FeedSnapshot {
        FeedSnapshot {
            query: self.query.as_ref().map(|query| query.text().to_string()),
            generation: self.pagination.generation(),
            items: self.items.clone(),
            status: self.pagination.status(),
        }
    }

    pub fn query(&self) -> Option<&Query> {
        self.query.as_ref()
    }

    pub fn items(&self) -> &[FeedItem] {
        &self.items
    }

    pub fn status(&self) -> LoadStatus {
        self.pagination.status()
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// When the pending query input should be re-examined.
    pub fn next_deadline(&self) -> Option<Instant> {
        self.signal.deadline()
    }

    /// Returns whether the visible state changed since the last call.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn record_input(&mut self, text: String, at: Instant) {
        self.signal.push(text, at);
    }

    pub(crate) fn poll_input(&mut self, now: Instant) -> Option<Query> {
        let text = self.signal.poll(now)?;
        Query::new(&text, self.endpoint.clone())
    }

    /// Clears the list, resets pagination to page 1 and requests it.
    pub(crate) fn start_query(&mut self, query: Query) -> Vec<Effect> {
        let mut effects = Vec::with_capacity(2);
        if let Some(ticket) = self.pagination.reset() {
            feed_debug!(
                "Abandoning page {} of generation {}",
                ticket.page,
                ticket.generation
            );
            effects.push(Effect::CancelFetch { ticket });
        }
        feed_info!(
            "Committed query {} (generation {})",
            query,
            self.pagination.generation()
        );
        self.items.clear();
        self.trigger.reset();
        self.query = Some(query);
        self.dirty = true;
        effects.extend(self.request_page(Visibility::LoadMore));
        effects
    }

    pub(crate) fn request_page(&mut self, notification: Visibility) -> Option<Effect> {
        let query = self.query.clone()?;
        if !self.pagination.status().is_ready() {
            feed_debug!(
                "Dropping {:?} while {}",
                notification,
                self.pagination.status()
            );
            return None;
        }
        self.trigger.evaluate(&self.items, notification)?;
        let ticket = self.pagination.begin()?;
        self.dirty = true;
        feed_debug!("Requesting page {} of {}", ticket.page, query);
        Some(Effect::Fetch { query, ticket })
    }

    pub(crate) fn apply_outcome(&mut self, ticket: FetchTicket, outcome: Outcome) {
        match self.pagination.complete(ticket, &outcome) {
            Completion::Stale => {
                feed_debug!(
                    "Discarding stale outcome for page {} of generation {}",
                    ticket.page,
                    ticket.generation
                );
                return;
            }
            Completion::Advanced { next_page } => {
                if let Outcome::Items(items) = outcome {
                    feed_debug!(
                        "Page {} delivered {} items; next page {}",
                        ticket.page,
                        items.len(),
                        next_page
                    );
                    self.items.extend(items);
                }
            }
            Completion::Exhausted => {
                if let Outcome::Exhausted(reason) = &outcome {
                    feed_info!("Feed exhausted at page {}: {}", ticket.page, reason);
                }
            }
            Completion::Failed => match &outcome {
                Outcome::Malformed(detail) => {
                    feed_warn!("Unable to parse page {}: {}", ticket.page, detail)
                }
                Outcome::TransportFailed(detail) => {
                    feed_warn!("Fetch of page {} failed: {}", ticket.page, detail)
                }
                _ => {}
            },
        }
        self.dirty = true;
    }
}
