// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! # Engine Configuration
//!
//! Every tunable named in the external-interfaces contract, read once at startup
//! from the process environment. Nothing under [`Config`] is re-read at runtime —
//! a change requires a restart.

use crate::error::CoreError;
use arbitron_execution::OrderKind;
use arbitron_markets::{ExchangeId, Symbol};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// API credentials for one venue's trading API.
#[derive(Debug, Clone)]
pub struct VenueCredentials {
    pub api_key: String,
    pub api_secret: String,
    pub passphrase: Option<String>,
}

/// Tunables for the cross-venue strategy.
#[derive(Debug, Clone)]
pub struct CrossVenueSettings {
    pub enabled: bool,
    pub min_profit_percent: Decimal,
    pub max_position_size: Decimal,
    pub max_concurrent: usize,
}

/// Tunables for the triangular strategy.
#[derive(Debug, Clone)]
pub struct TriangularSettings {
    pub enabled: bool,
    pub min_profit_percent: Decimal,
    pub max_position_size: Decimal,
    pub max_concurrent: usize,
}

/// Tunables shared by both strategies' order placement.
#[derive(Debug, Clone)]
pub struct OrderSettings {
    pub order_type: OrderKind,
    pub timeout: Duration,
    pub retry_attempts: u32,
    pub slippage_tolerance: Decimal,
}

/// Top-level engine configuration, assembled once from the environment at
/// startup (spec 6, "Configuration").
#[derive(Debug, Clone)]
pub struct Config {
    pub trading_enabled: bool,
    pub test_mode: bool,
    pub cross: CrossVenueSettings,
    pub triangular: TriangularSettings,
    pub orders: OrderSettings,
    pub max_daily_loss: Decimal,
    pub max_daily_trades: u32,
    pub blacklisted_symbols: Vec<Symbol>,
    pub blacklisted_exchanges: Vec<ExchangeId>,
    pub credentials: HashMap<ExchangeId, VenueCredentials>,
    pub journal_dir: PathBuf,
    pub log_file: PathBuf,
}

impl Config {
    /// Reads every variable enumerated in spec section 6 from the process
    /// environment, applying the same defaults the control-plane docs describe.
    pub fn from_env() -> Result<Self, CoreError> {
        let cross = CrossVenueSettings {
            enabled: env_bool("CROSS_TRADING_ENABLED", true)?,
            min_profit_percent: env_decimal("CROSS_MIN_PROFIT", Decimal::new(5, 1))?,
            max_position_size: env_decimal("CROSS_MAX_POSITION_SIZE", Decimal::new(1000, 0))?,
            max_concurrent: env_usize("CROSS_MAX_CONCURRENT", 3)?,
        };
        let triangular = TriangularSettings {
            enabled: env_bool("TRIANGULAR_TRADING_ENABLED", true)?,
            min_profit_percent: env_decimal("TRIANGULAR_MIN_PROFIT", Decimal::new(8, 1))?,
            max_position_size: env_decimal("TRIANGULAR_MAX_POSITION_SIZE", Decimal::new(1000, 0))?,
            max_concurrent: env_usize("TRIANGULAR_MAX_CONCURRENT", 2)?,
        };
        let orders = OrderSettings {
            order_type: env_order_kind("ORDER_TYPE", OrderKind::Market)?,
            timeout: Duration::from_millis(env_u64("ORDER_TIMEOUT_MS", 30_000)?),
            retry_attempts: env_u32("ORDER_RETRY_ATTEMPTS", 0)?,
            slippage_tolerance: env_decimal("SLIPPAGE_TOLERANCE", Decimal::new(1, 2))?,
        };

        let mut credentials = HashMap::new();
        for venue in ExchangeId::ALL {
            if let Some(creds) = venue_credentials(venue)? {
                credentials.insert(venue, creds);
            }
        }

        Ok(Self {
            trading_enabled: env_bool("TRADING_ENABLED", false)?,
            test_mode: env_bool("TEST_MODE", true)?,
            cross,
            triangular,
            orders,
            max_daily_loss: env_decimal("MAX_DAILY_LOSS", Decimal::new(500, 0))?,
            max_daily_trades: env_u32("MAX_DAILY_TRADES", 100)?,
            blacklisted_symbols: env_symbol_list("BLACKLISTED_SYMBOLS")?,
            blacklisted_exchanges: env_exchange_list("BLACKLISTED_EXCHANGES")?,
            credentials,
            journal_dir: PathBuf::from("logs/trades"),
            log_file: PathBuf::from("logs/app.log"),
        })
    }
}

fn venue_credentials(venue: ExchangeId) -> Result<Option<VenueCredentials>, CoreError> {
    let prefix = venue.as_str().to_uppercase();
    let key = std::env::var(format!("{prefix}_API_KEY")).ok();
    let secret = std::env::var(format!("{prefix}_API_SECRET")).ok();
    let (Some(api_key), Some(api_secret)) = (key, secret) else {
        return Ok(None);
    };
    let passphrase = std::env::var(format!("{prefix}_API_PASSPHRASE")).ok();
    Ok(Some(VenueCredentials { api_key, api_secret, passphrase }))
}

fn env_bool(name: &str, default: bool) -> Result<bool, CoreError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.to_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            other => Err(CoreError::Config(format!("{name}: not a boolean: {other}"))),
        },
    }
}

fn env_decimal(name: &str, default: Decimal) -> Result<Decimal, CoreError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => Decimal::from_str(raw.trim()).map_err(|e| CoreError::Config(format!("{name}: {e}"))),
    }
}

fn env_u32(name: &str, default: u32) -> Result<u32, CoreError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.trim().parse().map_err(|e| CoreError::Config(format!("{name}: {e}"))),
    }
}

fn env_u64(name: &str, default: u64) -> Result<u64, CoreError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.trim().parse().map_err(|e| CoreError::Config(format!("{name}: {e}"))),
    }
}

fn env_usize(name: &str, default: usize) -> Result<usize, CoreError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => raw.trim().parse().map_err(|e| CoreError::Config(format!("{name}: {e}"))),
    }
}

fn env_order_kind(name: &str, default: OrderKind) -> Result<OrderKind, CoreError> {
    match std::env::var(name) {
        Err(_) => Ok(default),
        Ok(raw) => match raw.to_uppercase().as_str() {
            "MARKET" => Ok(OrderKind::Market),
            "LIMIT" => Ok(OrderKind::Limit),
            other => Err(CoreError::Config(format!("{name}: unknown order type: {other}"))),
        },
    }
}

fn env_symbol_list(name: &str) -> Result<Vec<Symbol>, CoreError> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| Symbol::parse_canonical(s).ok_or_else(|| CoreError::Config(format!("{name}: invalid symbol: {s}"))))
        .collect()
}

fn env_exchange_list(name: &str) -> Result<Vec<ExchangeId>, CoreError> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(Vec::new());
    };
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| ExchangeId::from_str(s).map_err(|e| CoreError::Config(format!("{name}: {e}"))))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_blacklist_env_var_yields_empty_list() {
        std::env::remove_var("ARBITRON_TEST_UNSET_BLACKLIST");
        assert!(env_symbol_list("ARBITRON_TEST_UNSET_BLACKLIST").unwrap().is_empty());
    }

    #[test]
    fn symbol_list_parses_canonical_pairs() {
        std::env::set_var("ARBITRON_TEST_SYMBOLS", "btc/usdt, eth/usdt");
        let symbols = env_symbol_list("ARBITRON_TEST_SYMBOLS").unwrap();
        assert_eq!(symbols, vec![Symbol::new("BTC", "USDT"), Symbol::new("ETH", "USDT")]);
        std::env::remove_var("ARBITRON_TEST_SYMBOLS");
    }

    #[test]
    fn unknown_order_type_is_rejected() {
        std::env::set_var("ARBITRON_TEST_ORDER_TYPE", "STOP");
        let err = env_order_kind("ARBITRON_TEST_ORDER_TYPE", OrderKind::Market).unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
        std::env::remove_var("ARBITRON_TEST_ORDER_TYPE");
    }
}
