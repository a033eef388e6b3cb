// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Tracks available balance per `(venue, asset)` and soft-locks funds for the
//! duration of an in-flight trade, so two opportunities competing for the same
//! capital can't both be approved.

use arbitron_markets::ExchangeId;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;

/// A soft lock held against `(venue, asset)` while a trade using that capital is
/// in flight. Dropping it (via [`BalanceLedger::release`]) returns the locked amount
/// to the available pool; it is never enforced by the venue itself, only by this
/// ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FundsLock {
    pub venue: ExchangeId,
    pub asset: String,
    pub amount: Decimal,
}

/// Known balance and outstanding soft locks for one `(venue, asset)` pair.
#[derive(Debug, Clone, Default)]
struct Balance {
    total: Decimal,
    locked: Decimal,
}

impl Balance {
    fn available(&self) -> Decimal {
        self.total - self.locked
    }
}

#[derive(Debug, Default)]
pub struct BalanceLedger {
    balances: RwLock<HashMap<(ExchangeId, String), Balance>>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the known total balance for `(venue, asset)`, as reported by the venue's
    /// account endpoint. Existing locks are preserved.
    pub fn set_total(&self, venue: ExchangeId, asset: impl Into<String>, total: Decimal) {
        let mut balances = self.balances.write();
        balances.entry((venue, asset.into())).or_default().total = total;
    }

    pub fn available(&self, venue: ExchangeId, asset: &str) -> Decimal {
        self.balances
            .read()
            .get(&(venue, asset.to_string()))
            .map(Balance::available)
            .unwrap_or(Decimal::ZERO)
    }

    /// Attempts to lock `amount` of `(venue, asset)`. Fails without mutating state if
    /// insufficient funds are available.
    pub fn try_lock(&self, venue: ExchangeId, asset: impl Into<String>, amount: Decimal) -> Option<FundsLock> {
        let asset = asset.into();
        let mut balances = self.balances.write();
        let balance = balances.entry((venue, asset.clone())).or_default();
        if balance.available() < amount {
            return None;
        }
        balance.locked += amount;
        Some(FundsLock { venue, asset, amount })
    }

    /// Releases a previously acquired lock, returning its amount to the available pool.
    pub fn release(&self, lock: FundsLock) {
        let mut balances = self.balances.write();
        if let Some(balance) = balances.get_mut(&(lock.venue, lock.asset.clone())) {
            balance.locked -= lock.amount;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn lock_reduces_available_and_release_restores_it() {
        let ledger = BalanceLedger::new();
        ledger.set_total(ExchangeId::Binance, "USDT", dec!(1000));
        assert_eq!(ledger.available(ExchangeId::Binance, "USDT"), dec!(1000));

        let lock = ledger.try_lock(ExchangeId::Binance, "USDT", dec!(400)).unwrap();
        assert_eq!(ledger.available(ExchangeId::Binance, "USDT"), dec!(600));

        ledger.release(lock);
        assert_eq!(ledger.available(ExchangeId::Binance, "USDT"), dec!(1000));
    }

    #[test]
    fn lock_fails_when_insufficient_available() {
        let ledger = BalanceLedger::new();
        ledger.set_total(ExchangeId::Binance, "USDT", dec!(100));
        assert!(ledger.try_lock(ExchangeId::Binance, "USDT", dec!(400)).is_none());
        assert_eq!(ledger.available(ExchangeId::Binance, "USDT"), dec!(100));
    }

    #[test]
    fn unknown_asset_reports_zero_available() {
        let ledger = BalanceLedger::new();
        assert_eq!(ledger.available(ExchangeId::Kraken, "XBT"), Decimal::ZERO);
    }
}
