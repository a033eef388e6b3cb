// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Many-readers/single-writer caches of the latest tick and book replica per
//! `(venue, symbol)`. Detectors hold an `Arc` to these and read through the lock on
//! every scan pass; adapters are the only writers.

use crate::book::OrderBookReplica;
use crate::event::PriceTick;
use arbitron_markets::{ExchangeId, Symbol};
use fnv::FnvHashMap;
use parking_lot::RwLock;

/// Latest [`PriceTick`] observed for every `(venue, symbol)` pair.
#[derive(Debug, Default)]
pub struct PriceRegistry {
    ticks: RwLock<FnvHashMap<(ExchangeId, Symbol), PriceTick>>,
}

impl PriceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn update(&self, tick: PriceTick) {
        self.ticks.write().insert((tick.venue, tick.symbol.clone()), tick);
    }

    pub fn get(&self, venue: ExchangeId, symbol: &Symbol) -> Option<PriceTick> {
        self.ticks.read().get(&(venue, symbol.clone())).cloned()
    }

    /// Every known tick for a symbol, across all venues currently tracking it.
    pub fn venues_quoting(&self, symbol: &Symbol) -> Vec<PriceTick> {
        self.ticks
            .read()
            .values()
            .filter(|tick| &tick.symbol == symbol)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.ticks.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Latest [`OrderBookReplica`] for every `(venue, symbol)` pair.
#[derive(Debug, Default)]
pub struct BookRegistry {
    books: RwLock<FnvHashMap<(ExchangeId, Symbol), OrderBookReplica>>,
}

impl BookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` against the replica for `(venue, symbol)`, creating an empty one on
    /// first use. Mutation happens entirely under the write lock so a reconstructor's
    /// snapshot-then-incremental sequence is never observed half-applied.
    pub fn with_mut<R>(
        &self,
        venue: ExchangeId,
        symbol: &Symbol,
        f: impl FnOnce(&mut OrderBookReplica) -> R,
    ) -> R {
        let mut guard = self.books.write();
        let replica = guard.entry((venue, symbol.clone())).or_default();
        f(replica)
    }

    /// Runs `f` against the replica for `(venue, symbol)` under a read lock, if one
    /// exists yet. Used by detectors, which only ever read.
    pub fn with<R>(
        &self,
        venue: ExchangeId,
        symbol: &Symbol,
        f: impl FnOnce(&OrderBookReplica) -> R,
    ) -> Option<R> {
        let guard = self.books.read();
        guard.get(&(venue, symbol.clone())).map(f)
    }

    /// Drops the replica entirely; the next update for this key starts from scratch.
    /// Used when a gap or a persistently crossed book makes the replica untrustworthy.
    pub fn invalidate(&self, venue: ExchangeId, symbol: &Symbol) {
        self.books.write().remove(&(venue, symbol.clone()));
    }

    pub fn best_bid_ask(
        &self,
        venue: ExchangeId,
        symbol: &Symbol,
    ) -> Option<(crate::event::BookLevel, crate::event::BookLevel)> {
        let guard = self.books.read();
        let replica = guard.get(&(venue, symbol.clone()))?;
        Some((replica.best_bid()?, replica.best_ask()?))
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn tick(venue: ExchangeId, symbol: Symbol) -> PriceTick {
        PriceTick::new(venue, symbol, dec!(1), dec!(1), dec!(1), dec!(1), Utc::now())
    }

    #[test]
    fn price_registry_overwrites_by_venue_and_symbol() {
        let registry = PriceRegistry::new();
        let symbol = Symbol::new("BTC", "USDT");
        registry.update(tick(ExchangeId::Binance, symbol.clone()));
        registry.update(tick(ExchangeId::Coinbase, symbol.clone()));
        assert_eq!(registry.venues_quoting(&symbol).len(), 2);

        registry.update(tick(ExchangeId::Binance, symbol.clone()));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn book_registry_creates_replica_lazily_and_can_invalidate() {
        let registry = BookRegistry::new();
        let symbol = Symbol::new("BTC", "USDT");
        registry.with_mut(ExchangeId::Binance, &symbol, |replica| {
            replica.apply_snapshot(1, &[], &[]);
        });
        assert_eq!(registry.len(), 1);
        registry.invalidate(ExchangeId::Binance, &symbol);
        assert_eq!(registry.len(), 0);
    }
}
