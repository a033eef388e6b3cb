// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Fraction of completed trades that closed with a profit, in `[0, 1]`.
///
/// `None` when there were no trades to evaluate.
///
/// Reference: <https://www.investopedia.com/terms/w/win-loss-ratio.asp>
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct WinRate {
    pub value: Decimal,
}

impl WinRate {
    /// Calculates [`WinRate`] from a winning-trade count and the total trade count.
    pub fn calculate(wins: Decimal, total: Decimal) -> Option<Self> {
        if total == Decimal::ZERO {
            None
        } else {
            let value = wins.abs().checked_div(total.abs())?;
            Some(Self { value })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn no_trades_is_undefined() {
        assert_eq!(WinRate::calculate(Decimal::ZERO, Decimal::ZERO), None);
    }

    #[test]
    fn all_winners_is_one() {
        assert_eq!(WinRate::calculate(Decimal::TEN, Decimal::TEN).unwrap().value, Decimal::ONE);
    }

    #[test]
    fn no_winners_is_zero() {
        assert_eq!(WinRate::calculate(Decimal::ZERO, Decimal::TEN).unwrap().value, Decimal::ZERO);
    }

    #[test]
    fn mixed_outcomes_divide() {
        assert_eq!(WinRate::calculate(dec!(6), Decimal::TEN).unwrap().value, dec!(0.6));
    }
}
