// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
#![forbid(unsafe_code)]
//! # 🦜 Arbitron
//!
//! Single-dependency façade over the arbitrage scanner/executor workspace.
//! Re-exports every subsystem crate under one namespace so a downstream
//! consumer (or [`main`](crate) itself) only needs one line in its `Cargo.toml`.
//!
//! ```no_run
//! use arbitron::core;
//! use arbitron::markets::ExchangeId;
//! let _venue = ExchangeId::Binance;
//! // Engine construction lives at arbitron::core::engine::Engine.
//! ```

pub use arbitron_analytics as analytics;
pub use arbitron_core as core;
pub use arbitron_data as data;
pub use arbitron_detect as detect;
pub use arbitron_execution as execution;
pub use arbitron_integration as integration;
pub use arbitron_markets as markets;
pub use arbitron_risk as risk;

pub use arbitron_core::{Config, CoreError, Engine, EngineDeps};
pub use arbitron_markets::{ExchangeId, Symbol};

/// Single-import convenience for binaries embedding the engine.
pub mod prelude {
    pub use crate::core::{engine::Engine, Config, CoreError, EngineDeps};
    pub use crate::detect::{CrossVenueDetector, TriangularDetector, TriangularPath};
    pub use crate::execution::{MockTradingClient, TradeOrchestrator, TradingClient};
    pub use crate::markets::{ExchangeId, Side, Symbol};
}
