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
#![allow(clippy::type_complexity, clippy::too_many_arguments)]
//! # 🔍 Detect - Arbitrage Opportunity Detection
//!
//! Turns the live tick/book state cached by `arbitron-data`'s registries into
//! concrete, scored arbitrage opportunities.
//!
//! ## 🏗️ System Components
//!
//! - [`cross`]: [`CrossVenueDetector`] compares the same symbol across two venues,
//!   walking order-book depth to estimate realistic fill prices before accepting a
//!   spread as tradeable.
//! - [`triangular`]: [`TriangularDetector`] simulates a fixed three-leg conversion
//!   cycle on a single venue and accepts it only if the simulated round trip returns
//!   more than it started with, after fees and slippage.
//! - [`opportunity`]: the [`ArbitrageOpportunity`] and [`TriangularOpportunity`]
//!   records both detectors produce, plus the shared [`Confidence`] score and
//!   [`OpportunityId`] allocator.
//! - [`registry`]: [`OpportunityStore`](registry::OpportunityStore), the generic
//!   dedup-and-expire map both detectors use to avoid re-announcing the same
//!   opportunity on every tick.

/// Opportunity records and their shared identifiers/scoring types.
pub mod opportunity;

/// Generic dedup-and-expire store shared by both detectors.
pub mod registry;

/// Cross-venue spread detection.
pub mod cross;

/// Triangular conversion-cycle detection.
pub mod triangular;

pub use cross::{CrossVenueConfig, CrossVenueDetector};
pub use opportunity::{ArbitrageOpportunity, Confidence, LegDirection, LegResult, OpportunityId, TriangularOpportunity};
pub use registry::OpportunityStore;
pub use triangular::{TriangularConfig, TriangularDetector, TriangularPath};
