// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! The [`ExchangeAdapter`] contract every venue connection implements, and
//! [`TickThrottle`], the rate limiter that keeps a noisy venue from flooding the
//! [`PriceRegistry`](crate::book::registry::PriceRegistry) with redundant updates.
//!
//! A concrete adapter owns the actual WebSocket/REST wire plumbing for its venue; that
//! part is this crate's external collaborator and is deliberately not implemented
//! here. What lives here is the contract such an adapter must satisfy, plus the
//! venue-agnostic machinery ([`reconstruct`]) every implementation reuses to turn raw
//! snapshot/delta frames into a consistent [`OrderBookReplica`](crate::book::OrderBookReplica).

pub mod reconstruct;

use crate::error::DataError;
use crate::event::AdapterEvent;
use arbitron_integration::channel::UnboundedTx;
use arbitron_markets::ExchangeId;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// A live connection to one venue, normalising every message it receives into
/// [`AdapterEvent`]s and pushing them onto `tx`.
///
/// Implementations own their reconnect loop internally, using
/// [`ExchangeId::reconnect_policy`] and
/// [`arbitron_integration::backoff::ReconnectSequence`]; `run` only returns once the
/// reconnect budget is exhausted (after emitting `ConnectionLost`) or it is cancelled.
#[async_trait]
pub trait ExchangeAdapter: Send + Sync {
    fn venue(&self) -> ExchangeId;

    async fn run(&self, tx: UnboundedTx<AdapterEvent>) -> Result<(), DataError>;
}

/// Rate-limits how often a tick for the same key is allowed through, so a venue that
/// pushes updates far faster than any detector needs doesn't dominate registry lock
/// contention.
#[derive(Debug)]
pub struct TickThrottle {
    min_interval: Duration,
    last_emitted: HashMap<ExchangeId, Instant>,
}

impl TickThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_emitted: HashMap::new(),
        }
    }

    /// Returns `true` if a tick for `venue` should be emitted now, recording that
    /// decision so the next call within `min_interval` is suppressed.
    pub fn allow(&mut self, venue: ExchangeId, now: Instant) -> bool {
        match self.last_emitted.get(&venue) {
            Some(&last) if now.duration_since(last) < self.min_interval => false,
            _ => {
                self.last_emitted.insert(venue, now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn throttle_suppresses_within_window_and_allows_after() {
        let mut throttle = TickThrottle::new(Duration::from_millis(100));
        let t0 = Instant::now();
        assert!(throttle.allow(ExchangeId::Binance, t0));
        assert!(!throttle.allow(ExchangeId::Binance, t0 + Duration::from_millis(10)));
        assert!(throttle.allow(ExchangeId::Binance, t0 + Duration::from_millis(150)));
    }

    #[test]
    fn throttle_is_independent_per_venue() {
        let mut throttle = TickThrottle::new(Duration::from_millis(100));
        let t0 = Instant::now();
        assert!(throttle.allow(ExchangeId::Binance, t0));
        assert!(throttle.allow(ExchangeId::Coinbase, t0));
    }
}
