// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
use crate::time::TimeInterval;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

/// Risk-adjusted return over a [`TimeInterval`]: excess return over the std. dev. of
/// returns sampled at that interval.
///
/// Reference: <https://www.investopedia.com/articles/07/sharpe_ratio.asp>
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct SharpeRatio<Interval> {
    pub value: Decimal,
    pub interval: Interval,
}

impl<Interval> SharpeRatio<Interval>
where
    Interval: TimeInterval,
{
    /// Calculates [`SharpeRatio`] for the given `returns_period`.
    pub fn calculate(risk_free_return: Decimal, mean_return: Decimal, std_dev_returns: Decimal, returns_period: Interval) -> Self {
        if std_dev_returns.is_zero() {
            return Self { value: Decimal::MAX, interval: returns_period };
        }

        let excess_returns = mean_return - risk_free_return;
        let value = excess_returns.checked_div(std_dev_returns).unwrap_or(Decimal::MAX);
        Self { value, interval: returns_period }
    }

    /// Re-bases this ratio onto `target`, assuming returns are i.i.d. so the scale
    /// factor is the square root of the ratio of interval lengths.
    pub fn scale<TargetInterval>(self, target: TargetInterval) -> SharpeRatio<TargetInterval>
    where
        TargetInterval: TimeInterval,
    {
        let target_secs = Decimal::from(target.interval().num_seconds());
        let current_secs = Decimal::from(self.interval.interval().num_seconds());

        let scale = target_secs
            .abs()
            .checked_div(current_secs.abs())
            .unwrap_or(Decimal::MAX)
            .sqrt()
            .expect("interval lengths are always positive");

        SharpeRatio { value: self.value.checked_mul(scale).unwrap_or(Decimal::MAX), interval: target }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::{Annual252, Daily};
    use chrono::TimeDelta;
    use rust_decimal_macros::dec;

    #[test]
    fn zero_std_dev_saturates_at_max() {
        let result = SharpeRatio::calculate(dec!(0.001), dec!(0.002), dec!(0.0), TimeDelta::hours(2));
        assert_eq!(result.value, Decimal::MAX);
    }

    #[test]
    fn custom_interval_divides_excess_by_std_dev() {
        let actual = SharpeRatio::calculate(dec!(0.0015), dec!(0.0025), dec!(0.02), TimeDelta::hours(2));
        assert_eq!(actual.value, dec!(0.05));
    }

    #[test]
    fn daily_interval_divides_excess_by_std_dev() {
        let actual = SharpeRatio::calculate(dec!(0.0015), dec!(0.0025), dec!(0.02), Daily);
        assert_eq!(actual.value, dec!(0.05));
        assert_eq!(actual.interval, Daily);
    }

    #[test]
    fn scaling_daily_to_annual_252_multiplies_by_sqrt_252() {
        let input = SharpeRatio { value: dec!(0.05), interval: Daily };
        let actual = input.scale(Annual252);
        assert_eq!(actual.value, dec!(0.7937253933193771771504847261));
        assert_eq!(actual.interval, Annual252);
    }
}
