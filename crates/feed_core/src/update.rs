use crate::trigger::Visibility;
use crate::{Effect, FeedState, Msg};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: FeedState, msg: Msg) -> (FeedState, Vec<Effect>) {
    let effects = match msg {
        Msg::QueryEdited { text, at } => {
            state.record_input(text, at);
            Vec::new()
        }
        Msg::Tick { now } => match state.poll_input(now) {
            Some(query) => state.start_query(query),
            None => Vec::new(),
        },
        Msg::ItemVisible(id) => state
            .request_page(Visibility::Item(id))
            .into_iter()
            .collect(),
        Msg::LoadMore => state.request_page(Visibility::LoadMore).into_iter().collect(),
        Msg::Restart => match state.query().cloned() {
            Some(query) => state.start_query(query),
            None => Vec::new(),
        },
        Msg::FetchCompleted { ticket, outcome } => {
            state.apply_outcome(ticket, outcome);
            Vec::new()
        }
    };

    (state, effects)
}
