// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Individual risk checks and the [`RiskManager`] that runs them, in order, over a
//! [`TradeRequest`](crate::TradeRequest).

use crate::ledger::balance::{BalanceLedger, FundsLock};
use crate::ledger::daily::DailyLedger;
use crate::{RiskApproved, RiskRefused, TradeRequest};
use arbitron_markets::{ExchangeId, Symbol};
use rust_decimal::Decimal;
use std::collections::HashSet;
use std::sync::Arc;
use thiserror::Error;
use tracing::warn;

/// General interface for a single, composable risk validation.
///
/// Mirrors [`RiskManager`]'s approve/refuse split at the level of one rule, so new
/// checks can be added without touching [`RiskManager::evaluate`]'s control flow.
pub trait RiskCheck {
    type Input;

    fn name(&self) -> &'static str;

    fn check(&self, input: &Self::Input) -> Result<(), RiskRefusal>;
}

/// Why a [`RiskManager`] refused a [`TradeRequest`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RiskRefusal {
    #[error("emergency stop is active")]
    EmergencyStop,
    #[error("daily trade limit reached")]
    DailyTradeLimitReached,
    #[error("venue {0} is blacklisted")]
    VenueBlacklisted(ExchangeId),
    #[error("symbol {0} is blacklisted")]
    SymbolBlacklisted(Symbol),
    #[error("notional {notional} exceeds per-trade cap {cap}")]
    NotionalExceedsCap { notional: Decimal, cap: Decimal },
    #[error("insufficient available balance: need {needed}, have {available}")]
    InsufficientBalance { needed: Decimal, available: Decimal },
}

/// Blocks every request while the daily emergency stop is latched.
#[derive(Debug)]
struct EmergencyStopCheck(Arc<DailyLedger>);

impl RiskCheck for EmergencyStopCheck {
    type Input = TradeRequest;

    fn name(&self) -> &'static str {
        "emergency_stop"
    }

    fn check(&self, _input: &Self::Input) -> Result<(), RiskRefusal> {
        if self.0.is_emergency_stopped() {
            return Err(RiskRefusal::EmergencyStop);
        }
        Ok(())
    }
}

/// Blocks requests once the daily trade cap is reached.
#[derive(Debug)]
struct DailyTradeLimitCheck(Arc<DailyLedger>);

impl RiskCheck for DailyTradeLimitCheck {
    type Input = TradeRequest;

    fn name(&self) -> &'static str {
        "daily_trade_limit"
    }

    fn check(&self, _input: &Self::Input) -> Result<(), RiskRefusal> {
        if self.0.can_trade() {
            Ok(())
        } else {
            Err(RiskRefusal::DailyTradeLimitReached)
        }
    }
}

/// Blocks requests routed through a blacklisted venue or involving a blacklisted symbol.
#[derive(Debug, Default)]
struct BlacklistCheck {
    venues: HashSet<ExchangeId>,
    symbols: HashSet<Symbol>,
}

impl RiskCheck for BlacklistCheck {
    type Input = TradeRequest;

    fn name(&self) -> &'static str {
        "blacklist"
    }

    fn check(&self, input: &Self::Input) -> Result<(), RiskRefusal> {
        if self.venues.contains(&input.venue) {
            return Err(RiskRefusal::VenueBlacklisted(input.venue));
        }
        if self.symbols.contains(&input.symbol) {
            return Err(RiskRefusal::SymbolBlacklisted(input.symbol.clone()));
        }
        Ok(())
    }
}

/// Blocks requests whose notional exceeds the configured per-trade cap.
#[derive(Debug)]
struct NotionalCapCheck(Decimal);

impl RiskCheck for NotionalCapCheck {
    type Input = TradeRequest;

    fn name(&self) -> &'static str {
        "notional_cap"
    }

    fn check(&self, input: &Self::Input) -> Result<(), RiskRefusal> {
        if input.notional > self.0 {
            Err(RiskRefusal::NotionalExceedsCap {
                notional: input.notional,
                cap: self.0,
            })
        } else {
            Ok(())
        }
    }
}

/// Runs every [`RiskCheck`] over a [`TradeRequest`] in order and, if all pass, locks
/// the required funds on [`BalanceLedger`] so the approval is backed by capital that
/// can no longer be claimed by a competing opportunity.
#[derive(Debug)]
pub struct RiskManager {
    daily: Arc<DailyLedger>,
    balances: Arc<BalanceLedger>,
    blacklist: BlacklistCheck,
    notional_cap: NotionalCapCheck,
}

impl RiskManager {
    pub fn new(
        daily: Arc<DailyLedger>,
        balances: Arc<BalanceLedger>,
        max_notional_per_trade: Decimal,
    ) -> Self {
        Self {
            daily,
            balances,
            blacklist: BlacklistCheck::default(),
            notional_cap: NotionalCapCheck(max_notional_per_trade),
        }
    }

    pub fn blacklist_venue(&mut self, venue: ExchangeId) {
        self.blacklist.venues.insert(venue);
    }

    pub fn blacklist_symbol(&mut self, symbol: Symbol) {
        self.blacklist.symbols.insert(symbol);
    }

    pub fn daily_ledger(&self) -> &DailyLedger {
        &self.daily
    }

    pub fn balance_ledger(&self) -> &BalanceLedger {
        &self.balances
    }

    /// Evaluates `request` against every check, collecting every failing reason
    /// rather than stopping at the first (spec 4.5: "all reasons collected"), and
    /// locks `request.notional` of `request.symbol`'s quote asset on `request.venue`
    /// only if all of them pass. On success the returned [`FundsLock`] must be
    /// released (via [`BalanceLedger::release`]) once the trade finishes, win or
    /// lose.
    pub fn evaluate(&self, request: TradeRequest) -> Result<RiskApproved<(TradeRequest, FundsLock)>, RiskRefused<TradeRequest>> {
        let checks: [&dyn RiskCheck<Input = TradeRequest>; 4] = [
            &EmergencyStopCheck(Arc::clone(&self.daily)),
            &DailyTradeLimitCheck(Arc::clone(&self.daily)),
            &self.blacklist,
            &self.notional_cap,
        ];

        let mut reasons = Vec::new();
        for check in checks {
            if let Err(reason) = check.check(&request) {
                warn!(check = check.name(), ?reason, "risk check refused trade request");
                reasons.push(reason);
            }
        }

        let asset = request.symbol.quote.clone();
        let available = self.balances.available(request.venue, &asset);
        if available < request.notional {
            reasons.push(RiskRefusal::InsufficientBalance {
                needed: request.notional,
                available,
            });
        }

        if !reasons.is_empty() {
            return Err(RiskRefused::new(request, reasons));
        }

        let lock = self
            .balances
            .try_lock(request.venue, asset, request.notional)
            .expect("availability already confirmed above");
        Ok(RiskApproved::new((request, lock)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbitron_markets::Symbol;
    use rust_decimal_macros::dec;

    fn manager() -> (RiskManager, Arc<BalanceLedger>) {
        let daily = Arc::new(DailyLedger::new(10, dec!(1000)));
        let balances = Arc::new(BalanceLedger::new());
        balances.set_total(ExchangeId::Binance, "USDT", dec!(5000));
        (
            RiskManager::new(Arc::clone(&daily), Arc::clone(&balances), dec!(2000)),
            balances,
        )
    }

    fn request(notional: Decimal) -> TradeRequest {
        TradeRequest::new(ExchangeId::Binance, Symbol::new("BTC", "USDT"), notional)
    }

    #[test]
    fn approves_within_limits_and_locks_funds() {
        let (manager, balances) = manager();
        let approved = manager.evaluate(request(dec!(500))).unwrap();
        let (_, lock) = approved.into_item();
        assert_eq!(balances.available(ExchangeId::Binance, "USDT"), dec!(4500));
        balances.release(lock);
        assert_eq!(balances.available(ExchangeId::Binance, "USDT"), dec!(5000));
    }

    #[test]
    fn refuses_over_notional_cap() {
        let (manager, _) = manager();
        let refused = manager.evaluate(request(dec!(3000))).unwrap_err();
        assert!(refused.reasons.iter().any(|r| matches!(r, RiskRefusal::NotionalExceedsCap { .. })));
    }

    #[test]
    fn refuses_blacklisted_venue() {
        let (mut manager, _) = manager();
        manager.blacklist_venue(ExchangeId::Binance);
        let refused = manager.evaluate(request(dec!(100))).unwrap_err();
        assert_eq!(refused.reasons, vec![RiskRefusal::VenueBlacklisted(ExchangeId::Binance)]);
    }

    #[test]
    fn refuses_when_emergency_stop_latched() {
        let (manager, _) = manager();
        manager.daily_ledger().record_trade(dec!(-2000));
        let refused = manager.evaluate(request(dec!(100))).unwrap_err();
        assert_eq!(refused.reasons, vec![RiskRefusal::EmergencyStop]);
    }

    #[test]
    fn refuses_over_cap_without_mutating_locks() {
        let (manager, balances) = manager();
        // 6000 notional against a 2000 cap and 5000 available balance fails both
        // the cap check and the balance check; both reasons must surface.
        let refused = manager.evaluate(request(dec!(6000))).unwrap_err();
        assert!(refused.reasons.iter().any(|r| matches!(r, RiskRefusal::NotionalExceedsCap { .. })));
        assert!(refused.reasons.iter().any(|r| matches!(r, RiskRefusal::InsufficientBalance { .. })));
        drop(refused);
        assert_eq!(balances.available(ExchangeId::Binance, "USDT"), dec!(5000));
    }

    #[test]
    fn refuses_insufficient_balance_when_under_cap_but_over_funds() {
        let daily = Arc::new(DailyLedger::new(10, dec!(1000)));
        let balances = Arc::new(BalanceLedger::new());
        balances.set_total(ExchangeId::Binance, "USDT", dec!(100));
        let manager = RiskManager::new(Arc::clone(&daily), Arc::clone(&balances), dec!(2000));
        let refused = manager.evaluate(request(dec!(500))).unwrap_err();
        assert_eq!(
            refused.reasons,
            vec![RiskRefusal::InsufficientBalance {
                needed: dec!(500),
                available: dec!(100),
            }]
        );
    }
}
