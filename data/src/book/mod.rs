// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! The local order-book replica and the registries that cache replicas and ticks
//! for detectors to query.

pub mod registry;

use crate::event::BookLevel;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Result of walking a replica's depth to fill `target_size`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepthWalk {
    /// Size-weighted average price across every level consumed.
    pub average_price: Decimal,
    /// Size actually available; less than the requested target if the book ran dry.
    pub filled_size: Decimal,
    /// Worst (last) price touched while filling.
    pub worst_price: Decimal,
}

/// A consistent local replica of one venue's order book for one symbol.
///
/// Bids are kept highest-first, asks lowest-first. Levels with size zero are removed
/// rather than stored, so the book never needs an explicit "is this a deletion" check
/// at read time.
#[derive(Debug, Clone, Default)]
pub struct OrderBookReplica {
    bids: BTreeMap<Decimal, Decimal>,
    asks: BTreeMap<Decimal, Decimal>,
    last_update_id: u64,
    last_event_time: Option<DateTime<Utc>>,
}

impl OrderBookReplica {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discards all state and rebuilds from a full snapshot.
    pub fn apply_snapshot(&mut self, last_update_id: u64, bids: &[BookLevel], asks: &[BookLevel]) {
        self.bids.clear();
        self.asks.clear();
        for level in bids {
            if !level.size.is_zero() {
                self.bids.insert(level.price, level.size);
            }
        }
        for level in asks {
            if !level.size.is_zero() {
                self.asks.insert(level.price, level.size);
            }
        }
        self.last_update_id = last_update_id;
    }

    /// Merges an incremental update. Caller is responsible for having already verified
    /// update-id continuity (see [`adapter::reconstruct`](crate::adapter::reconstruct))
    /// before calling this.
    pub fn apply_incremental(&mut self, last_update_id: u64, bids: &[BookLevel], asks: &[BookLevel]) {
        for level in bids {
            if level.size.is_zero() {
                self.bids.remove(&level.price);
            } else {
                self.bids.insert(level.price, level.size);
            }
        }
        for level in asks {
            if level.size.is_zero() {
                self.asks.remove(&level.price);
            } else {
                self.asks.insert(level.price, level.size);
            }
        }
        self.last_update_id = last_update_id;
    }

    pub fn last_update_id(&self) -> u64 {
        self.last_update_id
    }

    /// Records when the last applied snapshot/delta was generated at the venue.
    /// Called by the [`BookReconstructor`](crate::adapter::reconstruct::BookReconstructor)
    /// alongside each `apply_snapshot`/`apply_incremental`.
    pub fn set_event_time(&mut self, event_time: DateTime<Utc>) {
        self.last_event_time = Some(event_time);
    }

    pub fn last_event_time(&self) -> Option<DateTime<Utc>> {
        self.last_event_time
    }

    /// `true` once the replica has more than `ttl` elapsed since its last applied
    /// event, or if it has never received one at all.
    pub fn is_stale(&self, now: DateTime<Utc>, ttl: chrono::Duration) -> bool {
        match self.last_event_time {
            Some(event_time) => now.signed_duration_since(event_time) > ttl,
            None => true,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.bids.is_empty() || self.asks.is_empty()
    }

    pub fn total_bid_volume(&self) -> Decimal {
        self.bids.values().fold(Decimal::ZERO, |acc, &size| acc + size)
    }

    pub fn total_ask_volume(&self) -> Decimal {
        self.asks.values().fold(Decimal::ZERO, |acc, &size| acc + size)
    }

    pub fn best_bid(&self) -> Option<BookLevel> {
        self.bids
            .iter()
            .next_back()
            .map(|(&price, &size)| BookLevel::new(price, size))
    }

    pub fn best_ask(&self) -> Option<BookLevel> {
        self.asks
            .iter()
            .next()
            .map(|(&price, &size)| BookLevel::new(price, size))
    }

    /// A book that stayed crossed (best bid >= best ask) is no longer trustworthy and
    /// should be invalidated by the caller.
    pub fn is_crossed(&self) -> bool {
        match (self.best_bid(), self.best_ask()) {
            (Some(bid), Some(ask)) => bid.price >= ask.price,
            _ => false,
        }
    }

    /// Walks bid levels (best first) to fill `target_size` on a sell, or ask levels on
    /// a buy. Returns `None` if the book has no levels on the requested side at all.
    pub fn walk_depth(&self, side: arbitron_markets::Side, target_size: Decimal) -> Option<DepthWalk> {
        let levels: Box<dyn Iterator<Item = (&Decimal, &Decimal)>> = match side {
            arbitron_markets::Side::Sell => Box::new(self.bids.iter().rev()),
            arbitron_markets::Side::Buy => Box::new(self.asks.iter()),
        };

        let mut remaining = target_size;
        let mut notional = Decimal::ZERO;
        let mut filled = Decimal::ZERO;
        let mut worst_price = None;

        for (&price, &size) in levels {
            if remaining.is_zero() {
                break;
            }
            let take = remaining.min(size);
            notional += take * price;
            filled += take;
            remaining -= take;
            worst_price = Some(price);
        }

        let worst_price = worst_price?;
        let average_price = if filled.is_zero() {
            worst_price
        } else {
            notional / filled
        };
        Some(DepthWalk {
            average_price,
            filled_size: filled,
            worst_price,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitron_markets::Side;
    use rust_decimal_macros::dec;

    fn level(price: Decimal, size: Decimal) -> BookLevel {
        BookLevel::new(price, size)
    }

    #[test]
    fn snapshot_then_incremental_updates_levels() {
        let mut replica = OrderBookReplica::new();
        replica.apply_snapshot(
            1,
            &[level(dec!(100), dec!(1))],
            &[level(dec!(101), dec!(1))],
        );
        assert_eq!(replica.best_bid().unwrap().price, dec!(100));

        replica.apply_incremental(2, &[level(dec!(100), dec!(0)), level(dec!(99), dec!(2))], &[]);
        assert_eq!(replica.best_bid().unwrap().price, dec!(99));
        assert_eq!(replica.last_update_id(), 2);
    }

    #[test]
    fn staleness_is_true_until_an_event_time_is_recorded() {
        let mut replica = OrderBookReplica::new();
        assert!(replica.is_stale(chrono::Utc::now(), chrono::Duration::seconds(10)));
        replica.set_event_time(chrono::Utc::now());
        assert!(!replica.is_stale(chrono::Utc::now(), chrono::Duration::seconds(10)));
    }

    #[test]
    fn total_volume_sums_each_side_independently() {
        let mut replica = OrderBookReplica::new();
        replica.apply_snapshot(
            1,
            &[level(dec!(100), dec!(1)), level(dec!(99), dec!(2))],
            &[level(dec!(101), dec!(3))],
        );
        assert_eq!(replica.total_bid_volume(), dec!(3));
        assert_eq!(replica.total_ask_volume(), dec!(3));
    }

    #[test]
    fn crossed_book_detected() {
        let mut replica = OrderBookReplica::new();
        replica.apply_snapshot(
            1,
            &[level(dec!(101), dec!(1))],
            &[level(dec!(100), dec!(1))],
        );
        assert!(replica.is_crossed());
    }

    #[test]
    fn walk_depth_averages_across_levels() {
        let mut replica = OrderBookReplica::new();
        replica.apply_snapshot(
            1,
            &[],
            &[level(dec!(100), dec!(1)), level(dec!(101), dec!(2))],
        );
        let walk = replica.walk_depth(Side::Buy, dec!(2)).unwrap();
        assert_eq!(walk.filled_size, dec!(2));
        assert_eq!(walk.worst_price, dec!(101));
        assert_eq!(walk.average_price, (dec!(100) + dec!(101)) / dec!(2));
    }

    #[test]
    fn walk_depth_reports_partial_fill_when_book_runs_dry() {
        let mut replica = OrderBookReplica::new();
        replica.apply_snapshot(1, &[], &[level(dec!(100), dec!(1))]);
        let walk = replica.walk_depth(Side::Buy, dec!(5)).unwrap();
        assert_eq!(walk.filled_size, dec!(1));
    }
}
