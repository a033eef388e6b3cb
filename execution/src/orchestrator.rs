// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! The trade state machine: validates an opportunity against risk, locks funds,
//! submits orders, waits for fills, computes realized profit, and journals the
//! outcome. Cross-venue and triangular opportunities share this machine; they
//! differ only in how many legs are submitted and in what order.

use crate::error::ExecutionError;
use crate::executor::OrderExecutor;
use crate::journal::TransactionJournal;
use crate::order::{ExecutedOrder, OrderKind, OrderRequest};
use arbitron_detect::{ArbitrageOpportunity, TriangularOpportunity};
use arbitron_markets::Side;
use arbitron_risk::{FundsLock, RiskManager, TradeRequest};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

static NEXT_ATTEMPT_ID: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TradeAttemptId(pub u64);

impl TradeAttemptId {
    fn next() -> Self {
        Self(NEXT_ATTEMPT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeKind {
    CrossVenue,
    Triangular,
}

/// `VALIDATING → APPROVED → EXECUTING → MONITORING → COMPLETED`, with alternate
/// terminals `REJECTED`, `FAILED`, `PARTIAL`, `ROLLED_BACK`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeStatus {
    Validating,
    Approved,
    Executing,
    Monitoring,
    Completed,
    Rejected,
    Failed,
    Partial,
    RolledBack,
}

impl TradeStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TradeStatus::Completed | TradeStatus::Rejected | TradeStatus::Failed | TradeStatus::Partial | TradeStatus::RolledBack
        )
    }
}

/// One run of the trade state machine, journaled at every status change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeAttempt {
    pub id: TradeAttemptId,
    pub kind: TradeKind,
    pub status: TradeStatus,
    pub orders: Vec<ExecutedOrder>,
    pub realized_profit: Option<Decimal>,
    pub error: Option<String>,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

impl TradeAttempt {
    fn new(kind: TradeKind) -> Self {
        Self {
            id: TradeAttemptId::next(),
            kind,
            status: TradeStatus::Validating,
            orders: Vec::new(),
            realized_profit: None,
            error: None,
            started_at: Utc::now(),
            ended_at: None,
        }
    }

    pub fn execution_ms(&self) -> Option<i64> {
        self.ended_at.map(|end| (end - self.started_at).num_milliseconds())
    }

    fn finish(&mut self, status: TradeStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
    }
}

/// Owns the fund locks taken for one in-flight attempt so they are released
/// exactly once regardless of which exit path the state machine takes.
struct Reservation {
    locks: Vec<FundsLock>,
}

impl Reservation {
    fn release(self, risk: &RiskManager) {
        for lock in self.locks {
            risk.balance_ledger().release(lock);
        }
    }
}

/// Drives [`TradeAttempt`]s to completion for both opportunity kinds. Owns no
/// venue connections itself — all wire work goes through the shared
/// [`OrderExecutor`]; all admission control goes through the shared
/// [`RiskManager`].
#[derive(Debug, Clone)]
pub struct TradeOrchestrator {
    executor: Arc<OrderExecutor>,
    risk: Arc<RiskManager>,
    journal: Arc<TransactionJournal>,
    order_timeout: Duration,
    poll_interval: Duration,
}

impl TradeOrchestrator {
    pub fn new(executor: Arc<OrderExecutor>, risk: Arc<RiskManager>, journal: Arc<TransactionJournal>) -> Self {
        Self {
            executor,
            risk,
            journal,
            order_timeout: Duration::from_secs(30),
            poll_interval: Duration::from_millis(200),
        }
    }

    pub fn with_order_timeout(mut self, timeout: Duration) -> Self {
        self.order_timeout = timeout;
        self
    }

    async fn journal_and_return(&self, attempt: TradeAttempt) -> TradeAttempt {
        self.journal_transition(&attempt).await;
        attempt
    }

    /// Appends one line for the attempt's current status. Called at every
    /// transition, not just terminal ones, so the journal file alone can
    /// reconstruct the full lifecycle.
    async fn journal_transition(&self, attempt: &TradeAttempt) {
        if let Err(error) = self.journal.record(attempt).await {
            tracing::error!(attempt_id = attempt.id.0, %error, "failed to journal trade attempt");
        }
    }

    /// Cross-venue flow (spec 4.7): risk-evaluate the buy leg's quote-currency
    /// exposure, separately lock the sell leg's base-currency exposure, submit
    /// both market orders in parallel, wait for both to terminate, and record the
    /// realized spread minus fees.
    pub async fn execute_cross_venue(&self, opportunity: ArbitrageOpportunity) -> TradeAttempt {
        let mut attempt = TradeAttempt::new(TradeKind::CrossVenue);

        let buy_notional = opportunity.recommended_trade_size * opportunity.buy_price;
        let buy_request = TradeRequest::new(opportunity.buy_venue, opportunity.symbol.clone(), buy_notional);

        let (_, buy_lock) = match self.risk.evaluate(buy_request) {
            Ok(approved) => approved.into_item(),
            Err(refused) => {
                attempt.error = Some(refused.reasons.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));
                attempt.finish(TradeStatus::Rejected);
                return self.journal_and_return(attempt).await;
            }
        };

        let sell_lock = match self.risk.balance_ledger().try_lock(
            opportunity.sell_venue,
            opportunity.symbol.base.clone(),
            opportunity.recommended_trade_size,
        ) {
            Some(lock) => lock,
            None => {
                self.risk.balance_ledger().release(buy_lock);
                attempt.error = Some("insufficient base-asset balance to sell on the sell venue".to_string());
                attempt.finish(TradeStatus::Failed);
                return self.journal_and_return(attempt).await;
            }
        };
        let reservation = Reservation {
            locks: vec![buy_lock, sell_lock],
        };

        attempt.status = TradeStatus::Executing;
        self.journal_transition(&attempt).await;

        let buy_request = OrderRequest::new(
            opportunity.buy_venue,
            opportunity.symbol.clone(),
            Side::Buy,
            OrderKind::Market,
            opportunity.recommended_trade_size,
            None,
        );
        let sell_request = OrderRequest::new(
            opportunity.sell_venue,
            opportunity.symbol.clone(),
            Side::Sell,
            OrderKind::Market,
            opportunity.recommended_trade_size,
            None,
        );

        let (buy_placed, sell_placed) = tokio::join!(self.executor.place(buy_request), self.executor.place(sell_request));

        attempt.status = TradeStatus::Monitoring;
        self.journal_transition(&attempt).await;

        let buy_result = self.settle_leg(buy_placed).await;
        let sell_result = self.settle_leg(sell_placed).await;

        reservation.release(&self.risk);

        match (buy_result, sell_result) {
            (Ok(buy_order), Ok(sell_order)) => {
                let realized_profit = (sell_order.cost() - sell_order.fee) - (buy_order.cost() + buy_order.fee);
                self.risk.daily_ledger().record_trade(realized_profit);
                attempt.orders = vec![buy_order, sell_order];
                attempt.realized_profit = Some(realized_profit);
                attempt.finish(TradeStatus::Completed);
            }
            (Ok(buy_order), Err(sell_error)) => {
                attempt.orders = vec![buy_order];
                attempt.error = Some(sell_error.to_string());
                attempt.finish(TradeStatus::Partial);
            }
            (Err(buy_error), Ok(sell_order)) => {
                attempt.orders = vec![sell_order];
                attempt.error = Some(buy_error.to_string());
                attempt.finish(TradeStatus::Partial);
            }
            (Err(buy_error), Err(sell_error)) => {
                attempt.error = Some(format!("buy leg: {buy_error}; sell leg: {sell_error}"));
                attempt.finish(TradeStatus::Failed);
            }
        }

        self.journal_and_return(attempt).await
    }

    /// Triangular flow (spec 4.7): lock the start currency once, then run the
    /// three legs sequentially — each leg's filled output becomes the next leg's
    /// requested quantity. A failed leg stops the chain; prior fills are not
    /// unwound (out of scope per spec).
    pub async fn execute_triangular(&self, opportunity: TriangularOpportunity) -> TradeAttempt {
        let mut attempt = TradeAttempt::new(TradeKind::Triangular);

        let start_symbol = &opportunity.legs[0].symbol;
        let request = TradeRequest::new(opportunity.venue, start_symbol.clone(), opportunity.start_amount);

        let (_, lock) = match self.risk.evaluate(request) {
            Ok(approved) => approved.into_item(),
            Err(refused) => {
                attempt.error = Some(refused.reasons.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));
                attempt.finish(TradeStatus::Rejected);
                return self.journal_and_return(attempt).await;
            }
        };
        let reservation = Reservation { locks: vec![lock] };

        attempt.status = TradeStatus::Executing;
        self.journal_transition(&attempt).await;

        let mut amount = opportunity.start_amount;
        let mut orders = Vec::with_capacity(opportunity.legs.len());
        let mut leg_error = None;

        for leg in &opportunity.legs {
            let side = match leg.direction {
                arbitron_detect::LegDirection::Buy => Side::Buy,
                arbitron_detect::LegDirection::Sell => Side::Sell,
            };
            let quantity = match leg.direction {
                arbitron_detect::LegDirection::Buy => amount / leg.effective_price,
                arbitron_detect::LegDirection::Sell => amount,
            };
            let request = OrderRequest::new(opportunity.venue, leg.symbol.clone(), side, OrderKind::Market, quantity, None);

            match self.settle_leg(self.executor.place(request).await).await {
                Ok(order) => {
                    amount = match leg.direction {
                        arbitron_detect::LegDirection::Buy => order.filled_quantity - order.fee,
                        arbitron_detect::LegDirection::Sell => order.cost() - order.fee,
                    };
                    orders.push(order);
                }
                Err(error) => {
                    leg_error = Some(error.to_string());
                    break;
                }
            }
        }

        reservation.release(&self.risk);

        let legs_completed = orders.len();
        attempt.orders = orders;
        match leg_error {
            None => {
                let realized_profit = amount - opportunity.start_amount;
                self.risk.daily_ledger().record_trade(realized_profit);
                attempt.realized_profit = Some(realized_profit);
                attempt.finish(TradeStatus::Completed);
            }
            Some(error) if legs_completed == 0 => {
                attempt.error = Some(error);
                attempt.finish(TradeStatus::Failed);
            }
            Some(error) => {
                // A prior leg already moved funds into an intermediate currency; the
                // venue position is not unwound (out of scope per spec).
                attempt.error = Some(error);
                attempt.finish(TradeStatus::Partial);
            }
        }

        self.journal_and_return(attempt).await
    }

    async fn settle_leg(&self, placed: Result<ExecutedOrder, ExecutionError>) -> Result<ExecutedOrder, ExecutionError> {
        let order = placed?;
        self.executor.wait_for_terminal(order, self.order_timeout, self.poll_interval).await
    }
}
