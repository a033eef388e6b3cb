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
//! # 📊 Analytics - Performance Metrics
//!
//! Computes risk-adjusted performance metrics from completed trade attempts:
//! win rate, profit factor, and Sharpe ratio. The journal (see
//! `arbitron_execution::journal`) already tallies the operational counts
//! (attempted/completed/failed/rejected) for the daily text summary; this crate
//! complements it with the statistics that need a batch of realized P&Ls rather
//! than a single day's totals.
//!
//! ```rust
//! use arbitron_analytics::metric::sharpe::SharpeRatio;
//! use arbitron_analytics::time::Daily;
//! use rust_decimal_macros::dec;
//!
//! let risk_free = dec!(0.0015);
//! let mean_return = dec!(0.0025);
//! let std_dev = dec!(0.0200);
//!
//! let sharpe = SharpeRatio::calculate(risk_free, mean_return, std_dev, Daily);
//! assert_eq!(sharpe.value, dec!(0.05));
//! ```

/// Individual metrics: win rate, profit factor, Sharpe ratio.
pub mod metric;

/// Aggregates a batch of trade attempts into a [`summary::PerformanceReport`].
pub mod summary;

/// Time conventions ([`time::Daily`], [`time::Annual252`], [`time::Annual365`])
/// used to re-base a metric sampled at one frequency onto another.
pub mod time;

pub use summary::PerformanceReport;
