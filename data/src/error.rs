// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
use arbitron_markets::{ExchangeId, Symbol};
use thiserror::Error;

/// Errors raised while ingesting or reconstructing market data.
///
/// `WireError` and `BookInconsistency` are recoverable: the offending event is
/// dropped and the connection (or, for the latter, just the affected book) is
/// preserved / resynchronised. `StreamDisconnected` triggers the adapter's
/// reconnect sequence. `FatalAdapterInit` prevents the adapter from starting at all.
#[derive(Debug, Error)]
pub enum DataError {
    /// A malformed or unexpected venue message. The event is dropped, the
    /// connection is preserved.
    #[error("[{venue}] malformed message for {symbol}: {reason}")]
    WireError {
        venue: ExchangeId,
        symbol: Symbol,
        reason: String,
    },

    /// An update-id gap or a book that stayed crossed beyond one update. The
    /// replica is discarded and a re-snapshot is scheduled.
    #[error("[{venue}] order book inconsistency for {symbol}: {reason}")]
    BookInconsistency {
        venue: ExchangeId,
        symbol: Symbol,
        reason: String,
    },

    /// The streaming connection dropped. Carries the number of reconnect
    /// attempts already made.
    #[error("[{venue}] stream disconnected after {attempts} attempt(s)")]
    StreamDisconnected { venue: ExchangeId, attempts: u32 },

    /// The adapter could not start at all (unsupported venue, missing auth).
    #[error("[{venue}] adapter failed to initialise: {reason}")]
    FatalAdapterInit { venue: ExchangeId, reason: String },
}
