#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Issue the request for `ticket.page` of `query`.
    Fetch {
        query: crate::Query,
        ticket: crate::FetchTicket,
    },
    /// The fetch for `ticket` belongs to a superseded query.
    CancelFetch { ticket: crate::FetchTicket },
}
