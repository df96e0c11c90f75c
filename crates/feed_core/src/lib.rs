//! Feed core: pure pagination state machine and view-model helpers.
mod effect;
mod msg;
mod pagination;
mod query_signal;
mod state;
mod trigger;
mod types;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::Msg;
pub use pagination::{Completion, FetchTicket, LoadStatus, Pagination};
pub use query_signal::{QuerySignal, DEFAULT_QUIET_INTERVAL};
pub use state::{FeedState, FeedTuning};
pub use trigger::{remaining_after, FetchTrigger, Pulse, Visibility, DEFAULT_LOOKAHEAD};
pub use types::{FeedItem, ItemId, Outcome, Page, Query, UNATTRIBUTED, UNTITLED};
pub use update::update;
pub use view_model::FeedSnapshot;
