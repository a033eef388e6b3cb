// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Per-UTC-day trade count and realised loss tracking, with a latching emergency
//! stop once the configured daily loss is breached.

use chrono::{NaiveDate, Utc};
use parking_lot::Mutex;
use rust_decimal::Decimal;

#[derive(Debug)]
struct DailyState {
    date: NaiveDate,
    trades_today: u32,
    realised_pnl_today: Decimal,
    emergency_stop: bool,
}

impl DailyState {
    fn fresh(date: NaiveDate) -> Self {
        Self {
            date,
            trades_today: 0,
            realised_pnl_today: Decimal::ZERO,
            emergency_stop: false,
        }
    }
}

/// Tracks how many trades have executed and how much has been won or lost since the
/// last UTC midnight, and latches an emergency stop once `max_daily_loss` is crossed.
///
/// The emergency stop is sticky for the rest of the day: once tripped it stays
/// tripped even if a later trade recovers some of the loss, and is only cleared by
/// the next day's automatic reset or an explicit operator [`DailyLedger::clear_emergency_stop`].
#[derive(Debug)]
pub struct DailyLedger {
    max_trades_per_day: u32,
    max_daily_loss: Decimal,
    state: Mutex<DailyState>,
}

impl DailyLedger {
    pub fn new(max_trades_per_day: u32, max_daily_loss: Decimal) -> Self {
        Self {
            max_trades_per_day,
            max_daily_loss,
            state: Mutex::new(DailyState::fresh(Utc::now().date_naive())),
        }
    }

    fn roll_if_new_day(&self, state: &mut DailyState) {
        let today = Utc::now().date_naive();
        if state.date != today {
            *state = DailyState::fresh(today);
        }
    }

    /// `true` if another trade may start: under the daily trade cap and the
    /// emergency stop has not latched.
    pub fn can_trade(&self) -> bool {
        let mut state = self.state.lock();
        self.roll_if_new_day(&mut state);
        !state.emergency_stop && state.trades_today < self.max_trades_per_day
    }

    pub fn is_emergency_stopped(&self) -> bool {
        let mut state = self.state.lock();
        self.roll_if_new_day(&mut state);
        state.emergency_stop
    }

    pub fn trades_today(&self) -> u32 {
        let mut state = self.state.lock();
        self.roll_if_new_day(&mut state);
        state.trades_today
    }

    pub fn realised_pnl_today(&self) -> Decimal {
        let mut state = self.state.lock();
        self.roll_if_new_day(&mut state);
        state.realised_pnl_today
    }

    /// Records a completed trade's realised PnL, incrementing the trade count and
    /// latching the emergency stop if the cumulative daily loss now exceeds the limit.
    pub fn record_trade(&self, realised_pnl: Decimal) {
        let mut state = self.state.lock();
        self.roll_if_new_day(&mut state);
        state.trades_today += 1;
        state.realised_pnl_today += realised_pnl;
        if -state.realised_pnl_today >= self.max_daily_loss {
            state.emergency_stop = true;
        }
    }

    pub fn clear_emergency_stop(&self) {
        self.state.lock().emergency_stop = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn trade_cap_blocks_once_reached() {
        let ledger = DailyLedger::new(2, dec!(1000));
        assert!(ledger.can_trade());
        ledger.record_trade(dec!(10));
        assert!(ledger.can_trade());
        ledger.record_trade(dec!(10));
        assert!(!ledger.can_trade());
        assert_eq!(ledger.trades_today(), 2);
    }

    #[test]
    fn emergency_stop_latches_on_loss_breach_and_stays_latched() {
        let ledger = DailyLedger::new(100, dec!(50));
        ledger.record_trade(dec!(-60));
        assert!(ledger.is_emergency_stopped());
        ledger.record_trade(dec!(1000));
        assert!(ledger.is_emergency_stopped(), "stop must not self-clear on a later win");
        ledger.clear_emergency_stop();
        assert!(!ledger.is_emergency_stopped());
    }
}
