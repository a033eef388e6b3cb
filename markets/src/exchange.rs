// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Exchange identifiers and the static per-venue metadata the rest of the system reads:
//! taker fee rate, and the reconnect policy an [`ExchangeAdapter`](arbitron_data::adapter::ExchangeAdapter)
//! applies after a dropped stream.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use std::time::Duration;

/// Spot venues Arbitron streams market data from and may route orders to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Deserialize, Serialize)]
pub enum ExchangeId {
    Binance,
    Coinbase,
    Kraken,
    Bybit,
    Okx,
}

impl ExchangeId {
    pub const ALL: [ExchangeId; 5] = [
        ExchangeId::Binance,
        ExchangeId::Coinbase,
        ExchangeId::Kraken,
        ExchangeId::Bybit,
        ExchangeId::Okx,
    ];

    /// Canonical string representation used in logs, journal records and config.
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeId::Binance => "binance",
            ExchangeId::Coinbase => "coinbase",
            ExchangeId::Kraken => "kraken",
            ExchangeId::Bybit => "bybit",
            ExchangeId::Okx => "okx",
        }
    }

    /// Static taker fee rate charged by the venue on an aggressive market order.
    ///
    /// Per-venue defaults from the detector spec: binance 0.10%, coinbase 0.50%,
    /// kraken 0.26%, bybit 0.10%, okx 0.10%.
    pub fn taker_fee_rate(&self) -> Decimal {
        match self {
            ExchangeId::Binance => dec!(0.0010),
            ExchangeId::Coinbase => dec!(0.0050),
            ExchangeId::Kraken => dec!(0.0026),
            ExchangeId::Bybit => dec!(0.0010),
            ExchangeId::Okx => dec!(0.0010),
        }
    }

    /// Reconnect policy applied by this venue's [`ExchangeAdapter`](arbitron_data::adapter::ExchangeAdapter).
    pub fn reconnect_policy(&self) -> ReconnectPolicy {
        match self {
            // Venues whose book reconstruction chains off a REST snapshot are given
            // fewer attempts: a fresh snapshot fetch is cheap, so fail fast and let the
            // operator restart rather than hammering the REST endpoint.
            ExchangeId::Binance => ReconnectPolicy::new(Duration::from_secs(5), 2, 2),
            _ => ReconnectPolicy::new(Duration::from_secs(5), 2, 5),
        }
    }

    /// Client-initiated keep-alive interval, if the venue requires one.
    pub fn heartbeat_interval(&self) -> Option<Duration> {
        match self {
            ExchangeId::Coinbase | ExchangeId::Okx | ExchangeId::Bybit => {
                Some(Duration::from_secs(20))
            }
            ExchangeId::Binance | ExchangeId::Kraken => None,
        }
    }

    /// Maximum number of subscription topics a venue accepts in a single subscribe frame.
    /// Topic counts above this are chunked by the adapter.
    pub fn max_topics_per_frame(&self) -> usize {
        match self {
            ExchangeId::Binance => 200,
            ExchangeId::Coinbase => 100,
            ExchangeId::Kraken => 50,
            ExchangeId::Bybit => 10,
            ExchangeId::Okx => 100,
        }
    }
}

/// Exponential backoff policy governing `ExchangeAdapter` reconnects.
///
/// After `max_attempts` consecutive failures the adapter gives up and emits
/// `ConnectionLost`; restart is operator-initiated from then on.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReconnectPolicy {
    pub initial_backoff: Duration,
    pub factor: u32,
    pub max_attempts: u32,
}

impl ReconnectPolicy {
    pub const fn new(initial_backoff: Duration, factor: u32, max_attempts: u32) -> Self {
        Self {
            initial_backoff,
            factor,
            max_attempts,
        }
    }

    /// Backoff duration before the `attempt`'th reconnect (1-indexed).
    pub fn backoff_for_attempt(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        self.initial_backoff * self.factor.pow(exponent)
    }
}

impl FromStr for ExchangeId {
    type Err = UnknownExchange;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "binance" => Ok(ExchangeId::Binance),
            "coinbase" => Ok(ExchangeId::Coinbase),
            "kraken" => Ok(ExchangeId::Kraken),
            "bybit" => Ok(ExchangeId::Bybit),
            "okx" => Ok(ExchangeId::Okx),
            other => Err(UnknownExchange(other.to_string())),
        }
    }
}

/// Returned when a string does not match any supported [`ExchangeId`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown exchange: {0}")]
pub struct UnknownExchange(pub String);

impl Display for ExchangeId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fee_rates_match_spec_defaults() {
        assert_eq!(ExchangeId::Binance.taker_fee_rate(), dec!(0.0010));
        assert_eq!(ExchangeId::Coinbase.taker_fee_rate(), dec!(0.0050));
        assert_eq!(ExchangeId::Kraken.taker_fee_rate(), dec!(0.0026));
    }

    #[test]
    fn round_trips_through_str() {
        for exchange in ExchangeId::ALL {
            assert_eq!(ExchangeId::from_str(exchange.as_str()).unwrap(), exchange);
        }
        assert!(ExchangeId::from_str("deribit").is_err());
    }

    #[test]
    fn backoff_doubles_each_attempt() {
        let policy = ReconnectPolicy::new(Duration::from_secs(5), 2, 5);
        assert_eq!(policy.backoff_for_attempt(1), Duration::from_secs(5));
        assert_eq!(policy.backoff_for_attempt(2), Duration::from_secs(10));
        assert_eq!(policy.backoff_for_attempt(3), Duration::from_secs(20));
    }
}
