//! Turns raw keystroke-level query text into committed query strings.
//!
//! The transformation is driven by caller-supplied timestamps so it can be
//! exercised without real timers: `push` records the latest raw text,
//! `deadline` says when the input will have been quiet long enough, and `poll`
//! releases the committed value once that deadline has passed.

use std::time::{Duration, Instant};

/// Reference quiet interval before raw input is committed.
pub const DEFAULT_QUIET_INTERVAL: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuerySignal {
    quiet: Duration,
    pending: Option<Pending>,
    last_committed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Pending {
    raw: String,
    at: Instant,
}

impl Default for QuerySignal {
    fn default() -> Self {
        Self::new(DEFAULT_QUIET_INTERVAL)
    }
}

impl QuerySignal {
    pub fn new(quiet: Duration) -> Self {
        Self {
            quiet,
            pending: None,
            last_committed: None,
        }
    }

    /// Records a raw emission, restarting the quiet interval.
    pub fn push(&mut self, raw: impl Into<String>, at: Instant) {
        self.pending = Some(Pending {
            raw: raw.into(),
            at,
        });
    }

    /// When the pending emission becomes eligible, if there is one. A quiet
    /// interval too large to represent never elapses.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending
            .as_ref()
            .and_then(|pending| pending.at.checked_add(self.quiet))
    }

    /// Releases the pending emission if it has been stable for the quiet
    /// interval and survives trimming, blank filtering and deduplication
    /// against the previous committed value.
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let deadline = self.deadline()?;
        if now < deadline {
            return None;
        }
        let pending = self.pending.take()?;
        let text = pending.raw.trim();
        if text.is_empty() {
            return None;
        }
        if self.last_committed.as_deref() == Some(text) {
            return None;
        }
        let text = text.to_string();
        self.last_committed = Some(text.clone());
        Some(text)
    }

    pub fn last_committed(&self) -> Option<&str> {
        self.last_committed.as_deref()
    }

    pub fn quiet_interval(&self) -> Duration {
        self.quiet
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn nothing_pending_means_no_deadline() {
        let mut signal = QuerySignal::default();
        assert_eq!(signal.deadline(), None);
        assert_eq!(signal.poll(Instant::now()), None);
    }

    #[test]
    fn commits_only_after_quiet_interval() {
        let t0 = Instant::now();
        let mut signal = QuerySignal::default();
        signal.push("apple", t0);

        assert_eq!(signal.poll(t0 + 499 * MS), None);
        assert_eq!(signal.poll(t0 + 500 * MS), Some("apple".to_string()));
        assert_eq!(signal.deadline(), None);
    }

    #[test]
    fn later_push_restarts_interval_and_replaces_text() {
        let t0 = Instant::now();
        let mut signal = QuerySignal::default();
        signal.push("a", t0);
        signal.push("apple", t0 + 300 * MS);

        assert_eq!(signal.poll(t0 + 600 * MS), None);
        assert_eq!(signal.poll(t0 + 800 * MS), Some("apple".to_string()));
    }

    #[test]
    fn trims_filters_blank_and_dedupes() {
        let t0 = Instant::now();
        let mut signal = QuerySignal::default();

        signal.push("   ", t0);
        assert_eq!(signal.poll(t0 + 500 * MS), None);

        signal.push("  apple ", t0 + 600 * MS);
        assert_eq!(signal.poll(t0 + 1100 * MS), Some("apple".to_string()));

        signal.push("apple", t0 + 1200 * MS);
        assert_eq!(signal.poll(t0 + 1700 * MS), None);
        assert_eq!(signal.last_committed(), Some("apple"));
    }

    #[test]
    fn blank_input_does_not_reset_dedupe_memory() {
        let t0 = Instant::now();
        let mut signal = QuerySignal::default();
        signal.push("apple", t0);
        signal.poll(t0 + 500 * MS);

        signal.push("", t0 + 600 * MS);
        assert_eq!(signal.poll(t0 + 1100 * MS), None);
        signal.push("apple", t0 + 1200 * MS);
        assert_eq!(signal.poll(t0 + 1700 * MS), None);
    }

    #[test]
    fn unrepresentable_quiet_interval_never_commits() {
        let t0 = Instant::now();
        let mut signal = QuerySignal::new(Duration::MAX);
        signal.push("apple", t0);

        assert_eq!(signal.deadline(), None);
        assert_eq!(signal.poll(t0 + 3_600_000 * MS), None);
    }
}
