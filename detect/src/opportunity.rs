// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Opportunity records produced by [`crate::cross::CrossVenueDetector`] and
//! [`crate::triangular::TriangularDetector`].

use arbitron_markets::{ExchangeId, Symbol};
use chrono::{DateTime, Utc};
use derive_more::Display;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique opportunity identifier. Monotonically increasing, so ordering by
/// id also orders by creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, Serialize, Deserialize)]
pub struct OpportunityId(pub u64);

impl OpportunityId {
    pub fn next() -> Self {
        Self(NEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A confidence score in `[0, 100]`. Clamped on construction so callers never need to
/// re-check the range before comparing two scores.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Confidence(f64);

impl Confidence {
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, 100.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn meets(&self, threshold: f64) -> bool {
        self.0 >= threshold
    }
}

/// A detected cross-venue price dislocation on one symbol.
///
/// Superseded in the registry only by a strictly higher-confidence opportunity for
/// the same `(symbol, buy_venue, sell_venue)`; expires 5 minutes after creation if
/// not replaced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArbitrageOpportunity {
    pub id: OpportunityId,
    pub symbol: Symbol,
    pub buy_venue: ExchangeId,
    pub sell_venue: ExchangeId,
    pub buy_price: Decimal,
    pub sell_price: Decimal,
    pub effective_buy_price: Decimal,
    pub effective_sell_price: Decimal,
    pub buy_slippage_percent: Decimal,
    pub sell_slippage_percent: Decimal,
    pub fees: Decimal,
    pub recommended_trade_size: Decimal,
    pub available_liquidity: Decimal,
    pub confidence: Confidence,
    pub liquidity_score: f64,
    pub spread_impact_percent: Decimal,
    pub net_profit: Decimal,
    pub net_profit_percent: Decimal,
    pub created_at: DateTime<Utc>,
}

impl ArbitrageOpportunity {
    /// The key two opportunities must share to be considered duplicates of each other.
    pub fn dedup_key(&self) -> (Symbol, ExchangeId, ExchangeId) {
        (self.symbol.clone(), self.buy_venue, self.sell_venue)
    }

    pub fn is_expired(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.created_at) > ttl
    }
}

/// Which side of a [`TriangularOpportunity`] leg is traded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LegDirection {
    Buy,
    Sell,
}

/// A single leg of a [`TriangularPath`](crate::triangular::TriangularPath), evaluated
/// at detection time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LegResult {
    pub symbol: Symbol,
    pub direction: LegDirection,
    pub quoted_price: Decimal,
    pub effective_price: Decimal,
    pub slippage_percent: Decimal,
    pub fee: Decimal,
    pub had_book: bool,
}

/// A detected closed three-leg conversion cycle on a single venue returning a net
/// gain in the starting currency.
///
/// Dominated by an existing opportunity with the same `(venue, path, directions)`
/// and a higher profit; stale 30 seconds after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangularOpportunity {
    pub id: OpportunityId,
    pub venue: ExchangeId,
    pub legs: [LegResult; 3],
    pub start_amount: Decimal,
    pub end_amount: Decimal,
    pub confidence: Confidence,
    pub created_at: DateTime<Utc>,
}

impl TriangularOpportunity {
    pub fn net_profit(&self) -> Decimal {
        self.end_amount - self.start_amount
    }

    pub fn net_profit_percent(&self) -> Decimal {
        if self.start_amount.is_zero() {
            Decimal::ZERO
        } else {
            self.net_profit() / self.start_amount * Decimal::from(100)
        }
    }

    pub fn dedup_key(&self) -> (ExchangeId, [Symbol; 3], [LegDirection; 3]) {
        (
            self.venue,
            [
                self.legs[0].symbol.clone(),
                self.legs[1].symbol.clone(),
                self.legs[2].symbol.clone(),
            ],
            [self.legs[0].direction, self.legs[1].direction, self.legs[2].direction],
        )
    }

    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        now.signed_duration_since(self.created_at) > ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confidence_clamps_out_of_range_values() {
        assert_eq!(Confidence::new(150.0).value(), 100.0);
        assert_eq!(Confidence::new(-10.0).value(), 0.0);
    }

    #[test]
    fn opportunity_ids_are_monotonically_increasing() {
        let a = OpportunityId::next();
        let b = OpportunityId::next();
        assert!(b.0 > a.0);
    }
}
