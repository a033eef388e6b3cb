// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
#![forbid(unsafe_code)]
#![warn(
    unused,
    clippy::cognitive_complexity,
    unused_crate_dependencies,
    unused_extern_crates,
    clippy::unused_self,
    clippy::useless_let_if_seq,
    missing_debug_implementations,
    rust_2018_idioms
)]
#![allow(clippy::type_complexity, clippy::too_many_arguments)]
//! # 🛡️ Risk - Pre-Trade Risk Management
//!
//! The last gate a detected arbitrage opportunity passes through before an order is
//! ever sent to a venue. Deliberately decoupled from the detection and execution
//! crates: it evaluates a plain [`TradeRequest`], so neither side needs to depend on
//! the other's opportunity types.
//!
//! ## 🏗️ System Components
//!
//! - [`ledger::daily`]: [`DailyLedger`](ledger::daily::DailyLedger) tracks how many
//!   trades and how much realised loss have occurred since the last UTC midnight
//!   reset, and latches the emergency stop once a configured daily loss is breached.
//! - [`ledger::balance`]: [`BalanceLedger`](ledger::balance::BalanceLedger) tracks
//!   available balance per `(venue, asset)` and soft-locks funds for the duration of
//!   an in-flight trade so two opportunities can't race for the same capital.
//! - [`check`]: individual [`RiskCheck`](check::RiskCheck) implementations
//!   (blacklist, daily-loss, emergency-stop, balance-sufficiency) composed by
//!   [`RiskManager`].
//!
//! ## 🔍 Result Structures
//!
//! Every check returns [`RiskApproved<T>`] or [`RiskRefused<T>`], mirroring the
//! approve/refuse split used throughout the system so a refusal always carries the
//! rejected item back to the caller for logging.

/// Daily trade-count/loss tracking and soft balance locking.
pub mod ledger;

/// Individual, composable risk checks and the [`RiskManager`] that runs them in order.
pub mod check;

pub use check::{RiskCheck, RiskManager, RiskRefusal};
pub use ledger::balance::{BalanceLedger, FundsLock};
pub use ledger::daily::DailyLedger;

use derive_more::{Constructor, Display};
use serde::{Deserialize, Serialize};

/// What a [`RiskManager`] evaluates: the minimum information needed to decide whether
/// a prospective trade may proceed, common to both cross-venue and triangular
/// opportunities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Constructor)]
pub struct TradeRequest {
    pub venue: arbitron_markets::ExchangeId,
    pub symbol: arbitron_markets::Symbol,
    pub notional: rust_decimal::Decimal,
}

/// Approved result of a [`RiskCheck`] or [`RiskManager`] evaluation.
#[derive(Debug, Clone, Eq, PartialEq, Display, Constructor)]
#[display("approved({_0:?})")]
pub struct RiskApproved<T>(pub T);

impl<T> RiskApproved<T> {
    pub fn into_item(self) -> T {
        self.0
    }
}

/// Rejected result of a [`RiskManager`] evaluation, carrying the rejected item back
/// alongside every failing reason (spec 4.5: "all reasons collected") so the caller
/// can log the full picture of why a request was refused, not just the first check
/// that failed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct RiskRefused<T> {
    pub item: T,
    pub reasons: Vec<RiskRefusal>,
}

impl<T> RiskRefused<T> {
    pub fn new(item: T, reasons: Vec<RiskRefusal>) -> Self {
        Self { item, reasons }
    }

    pub fn into_item(self) -> T {
        self.item
    }
}
