// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gross profit divided by gross loss (both taken as absolute values). Above 1.0
/// the strategy is net profitable.
///
/// Special cases:
/// - `None` when both profits and losses are zero (no closed trades yet)
/// - `Decimal::MAX` when there are profits and no losses
/// - `Decimal::MIN` when there are losses and no profits
///
/// Reference: <https://www.investopedia.com/articles/fundamental-analysis/10/strategy-performance-reports.asp#toc-profit-factor>
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct ProfitFactor {
    pub value: Decimal,
}

impl ProfitFactor {
    /// Calculates [`ProfitFactor`] from gross profit and gross loss (absolute values).
    pub fn calculate(profits_gross_abs: Decimal, losses_gross_abs: Decimal) -> Option<Self> {
        if profits_gross_abs.is_zero() && losses_gross_abs.is_zero() {
            return None;
        }

        let value = if losses_gross_abs.is_zero() {
            Decimal::MAX
        } else if profits_gross_abs.is_zero() {
            Decimal::MIN
        } else {
            profits_gross_abs.abs().checked_div(losses_gross_abs.abs())?
        };

        Some(Self { value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn both_zero_is_undefined() {
        assert_eq!(ProfitFactor::calculate(dec!(0.0), dec!(0.0)), None);
    }

    #[test]
    fn no_losses_saturates_at_max() {
        assert_eq!(ProfitFactor::calculate(dec!(1.0), dec!(0.0)).unwrap().value, Decimal::MAX);
    }

    #[test]
    fn no_profits_saturates_at_min() {
        assert_eq!(ProfitFactor::calculate(dec!(0.0), dec!(1.0)).unwrap().value, Decimal::MIN);
    }

    #[test]
    fn mixed_profits_and_losses_divide() {
        assert_eq!(ProfitFactor::calculate(dec!(10.0), dec!(5.0)).unwrap().value, dec!(2.0));
    }

    #[test]
    fn losses_need_not_be_pre_abs() {
        assert_eq!(ProfitFactor::calculate(dec!(10.0), dec!(-5.0)).unwrap().value, dec!(2.0));
    }

    #[test]
    fn precise_decimal_inputs_keep_precision() {
        assert_eq!(
            ProfitFactor::calculate(dec!(10.5555), dec!(5.2345)).unwrap().value,
            Decimal::from_str("2.016524978507975928933040405").unwrap()
        );
    }
}
