// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Normalized, wire-agnostic event types. Every [`adapter::ExchangeAdapter`](crate::adapter::ExchangeAdapter)
//! produces only these - the rest of the system never sees a venue's own message shapes.

use arbitron_markets::{ExchangeId, Symbol};
use chrono::{DateTime, Utc};
use derive_more::Constructor;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A single ticker update. Replaces the prior tick for the same `(venue, symbol)` in
/// the [`PriceRegistry`](crate::book::registry::PriceRegistry).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Constructor)]
pub struct PriceTick {
    pub venue: ExchangeId,
    pub symbol: Symbol,
    pub last: Decimal,
    pub bid: Decimal,
    pub ask: Decimal,
    pub volume_24h: Decimal,
    pub timestamp: DateTime<Utc>,
}

impl PriceTick {
    /// Age of this tick relative to `now`, in whole milliseconds. Saturates at zero if
    /// `now` predates the tick (clock skew).
    pub fn age_ms(&self, now: DateTime<Utc>) -> i64 {
        (now - self.timestamp).num_milliseconds().max(0)
    }

    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.timestamp) > ttl
    }
}

/// A single price level: a price and the size resting at it. A `size` of zero means
/// "remove this level" when applied as part of a [`BookDelta`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Constructor)]
pub struct BookLevel {
    pub price: Decimal,
    pub size: Decimal,
}

/// A book update for one `(venue, symbol)`, in one of two shapes depending on the
/// venue's wire protocol.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum BookDelta {
    /// Full-state replacement. Clears prior book state entirely.
    Snapshot {
        last_update_id: u64,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
        event_time: DateTime<Utc>,
    },
    /// Incremental update, applied in update-id order on top of existing state.
    Incremental {
        first_update_id: u64,
        last_update_id: u64,
        bids: Vec<BookLevel>,
        asks: Vec<BookLevel>,
        event_time: DateTime<Utc>,
    },
}

impl BookDelta {
    pub fn last_update_id(&self) -> u64 {
        match self {
            BookDelta::Snapshot { last_update_id, .. } => *last_update_id,
            BookDelta::Incremental { last_update_id, .. } => *last_update_id,
        }
    }

    pub fn event_time(&self) -> DateTime<Utc> {
        match self {
            BookDelta::Snapshot { event_time, .. } => *event_time,
            BookDelta::Incremental { event_time, .. } => *event_time,
        }
    }
}

/// Everything an [`ExchangeAdapter`](crate::adapter::ExchangeAdapter) can emit.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum AdapterEvent {
    Tick(PriceTick),
    Book {
        venue: ExchangeId,
        symbol: Symbol,
        delta: BookDelta,
    },
    /// A disconnect invalidated the in-memory book for this symbol; downstream
    /// consumers must stop trusting it until a fresh snapshot arrives.
    BookInvalidate { venue: ExchangeId, symbol: Symbol },
    /// The adapter's reconnect budget was exhausted. Restart is operator-initiated.
    ConnectionLost { venue: ExchangeId },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn tick_at(ts: DateTime<Utc>) -> PriceTick {
        PriceTick::new(
            ExchangeId::Binance,
            Symbol::new("BTC", "USDT"),
            dec!(60000),
            dec!(59990),
            dec!(60010),
            dec!(1000),
            ts,
        )
    }

    #[test]
    fn stale_tick_detected_past_ttl() {
        let tick = tick_at(Utc::now() - chrono::Duration::seconds(5));
        assert!(tick.is_stale(Utc::now(), chrono::Duration::seconds(2)));
        assert!(!tick.is_stale(Utc::now(), chrono::Duration::seconds(10)));
    }

    #[test]
    fn age_ms_does_not_go_negative_on_clock_skew() {
        let tick = tick_at(Utc::now() + chrono::Duration::seconds(5));
        assert_eq!(tick.age_ms(Utc::now()), 0);
    }
}
