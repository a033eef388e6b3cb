// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Aggregates a batch of completed [`TradeAttempt`]s into one [`PerformanceReport`].
//!
//! The journal (`arbitron_execution::journal`) already tallies attempt/completed/
//! failed counts for the operator-facing daily summary; this module complements it
//! with the risk-adjusted metrics (win rate, profit factor, Sharpe ratio) that only
//! make sense across a batch of realized P&Ls rather than a single day's counts.

use crate::metric::profit_factor::ProfitFactor;
use crate::metric::sharpe::SharpeRatio;
use crate::metric::win_rate::WinRate;
use crate::time::TimeInterval;
use arbitron_execution::{TradeAttempt, TradeStatus};
use rust_decimal::{Decimal, MathematicalOps};

/// Performance over a batch of trade attempts, sampled at `Interval`.
///
/// Per-trade realized profit is treated directly as the return series fed to
/// [`SharpeRatio`] rather than normalizing by notional, since cross-venue and
/// triangular attempts size their legs independently and carry no single
/// "position value" to divide by.
#[derive(Debug, Clone, PartialEq)]
pub struct PerformanceReport<Interval> {
    pub trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub gross_profit: Decimal,
    pub gross_loss: Decimal,
    pub net_profit: Decimal,
    pub win_rate: Option<WinRate>,
    pub profit_factor: Option<ProfitFactor>,
    pub sharpe_ratio: SharpeRatio<Interval>,
}

impl<Interval> PerformanceReport<Interval>
where
    Interval: TimeInterval + Copy,
{
    /// Builds a report from every `Completed` attempt in `attempts`. Non-terminal
    /// and non-completed attempts (rejected, failed, partial, rolled back) carry no
    /// realized profit and are excluded from the P&L series.
    pub fn calculate(attempts: &[TradeAttempt], risk_free_return: Decimal, interval: Interval) -> Self {
        let pnls: Vec<Decimal> = attempts
            .iter()
            .filter(|attempt| attempt.status == TradeStatus::Completed)
            .filter_map(|attempt| attempt.realized_profit)
            .collect();

        let gross_profit: Decimal = pnls.iter().filter(|pnl| **pnl > Decimal::ZERO).sum();
        let gross_loss: Decimal = pnls.iter().filter(|pnl| **pnl < Decimal::ZERO).sum::<Decimal>().abs();
        let net_profit: Decimal = pnls.iter().sum();
        let wins = pnls.iter().filter(|pnl| **pnl > Decimal::ZERO).count();
        let losses = pnls.len() - wins;

        let win_rate = WinRate::calculate(Decimal::from(wins), Decimal::from(pnls.len()));
        let profit_factor = ProfitFactor::calculate(gross_profit, gross_loss);

        let mean_return = mean(&pnls);
        let std_dev_returns = population_std_dev(&pnls, mean_return);
        let sharpe_ratio = SharpeRatio::calculate(risk_free_return, mean_return, std_dev_returns, interval);

        Self { trades: pnls.len(), wins, losses, gross_profit, gross_loss, net_profit, win_rate, profit_factor, sharpe_ratio }
    }
}

fn mean(values: &[Decimal]) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    values.iter().sum::<Decimal>() / Decimal::from(values.len())
}

fn population_std_dev(values: &[Decimal], mean_value: Decimal) -> Decimal {
    if values.is_empty() {
        return Decimal::ZERO;
    }
    let variance = values.iter().map(|value| (*value - mean_value) * (*value - mean_value)).sum::<Decimal>()
        / Decimal::from(values.len());
    variance.sqrt().unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::Daily;
    use arbitron_execution::{TradeAttemptId, TradeKind};
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn completed(profit: Decimal) -> TradeAttempt {
        TradeAttempt {
            id: TradeAttemptId(1),
            kind: TradeKind::CrossVenue,
            status: TradeStatus::Completed,
            orders: Vec::new(),
            realized_profit: Some(profit),
            error: None,
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
        }
    }

    fn rejected() -> TradeAttempt {
        TradeAttempt {
            id: TradeAttemptId(2),
            kind: TradeKind::Triangular,
            status: TradeStatus::Rejected,
            orders: Vec::new(),
            realized_profit: None,
            error: Some("risk refusal".to_string()),
            started_at: Utc::now(),
            ended_at: Some(Utc::now()),
        }
    }

    #[test]
    fn rejected_attempts_are_excluded_from_the_pnl_series() {
        let attempts = vec![completed(dec!(10)), rejected()];
        let report = PerformanceReport::calculate(&attempts, Decimal::ZERO, Daily);
        assert_eq!(report.trades, 1);
        assert_eq!(report.net_profit, dec!(10));
    }

    #[test]
    fn mixed_wins_and_losses_compute_profit_factor_and_win_rate() {
        let attempts = vec![completed(dec!(20)), completed(dec!(-10)), completed(dec!(5))];
        let report = PerformanceReport::calculate(&attempts, Decimal::ZERO, Daily);

        assert_eq!(report.wins, 2);
        assert_eq!(report.losses, 1);
        assert_eq!(report.gross_profit, dec!(25));
        assert_eq!(report.gross_loss, dec!(10));
        assert_eq!(report.net_profit, dec!(15));
        assert_eq!(report.win_rate.unwrap().value, dec!(0.6666666666666666666666666667));
        assert_eq!(report.profit_factor.unwrap().value, dec!(2.5));
    }

    #[test]
    fn empty_batch_yields_no_win_rate_or_profit_factor() {
        let report = PerformanceReport::calculate(&[], Decimal::ZERO, Daily);
        assert_eq!(report.trades, 0);
        assert!(report.win_rate.is_none());
        assert!(report.profit_factor.is_none());
    }
}
