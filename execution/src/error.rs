// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
use arbitron_markets::ExchangeId;
use thiserror::Error;

/// Errors raised while submitting, polling, or cancelling an order at a venue, or
/// while writing to the transaction journal.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// No [`TradingClient`](crate::client::TradingClient) is registered for this venue.
    #[error("no trading client registered for {0}")]
    UnknownVenue(ExchangeId),

    /// The venue rejected the order outright (bad symbol, insufficient margin, ...).
    #[error("[{venue}] order rejected: {reason}")]
    Rejected { venue: ExchangeId, reason: String },

    /// `waitForTerminal` exceeded its timeout before the order reached a terminal state.
    #[error("[{venue}] order {venue_order_id} did not reach a terminal state within {timeout_ms}ms")]
    Timeout {
        venue: ExchangeId,
        venue_order_id: String,
        timeout_ms: u64,
    },

    /// The venue has no record of this order id (already purged, or never existed).
    #[error("[{venue}] order {venue_order_id} not found")]
    NotFound { venue: ExchangeId, venue_order_id: String },

    /// A transport-level failure talking to the venue (network, auth, malformed response).
    #[error("[{venue}] transport error: {reason}")]
    Transport { venue: ExchangeId, reason: String },

    /// The transaction journal could not append or read a record.
    #[error("journal I/O error: {0}")]
    Journal(String),
}
