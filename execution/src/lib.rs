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
//! # ⚡ Execution - Order Execution
//!
//! Turns an approved opportunity into orders at one or more venues, watches them
//! to a terminal state, and journals the outcome.
//!
//! ## 🏗️ System Components
//!
//! - [`client`]: the [`TradingClient`](client::TradingClient) trait every venue
//!   integration implements, plus [`MockTradingClient`](client::MockTradingClient)
//!   for tests and paper trading.
//! - [`order`]: the normalized [`OrderRequest`](order::OrderRequest) and
//!   [`ExecutedOrder`](order::ExecutedOrder) records every client speaks in.
//! - [`executor`]: [`OrderExecutor`](executor::OrderExecutor) — place, poll,
//!   cancel, wait-for-terminal — against whichever client a
//!   [`ClientRegistry`](executor::ClientRegistry) resolves for the order's venue.
//! - [`orchestrator`]: [`TradeOrchestrator`](orchestrator::TradeOrchestrator), the
//!   shared state machine for both the cross-venue and triangular trade flows.
//! - [`journal`]: [`TransactionJournal`](journal::TransactionJournal), the
//!   append-only per-day trade log and its end-of-day summary.

/// Venue trading contract and the in-memory mock implementation.
pub mod client;

/// Execution errors.
pub mod error;

/// Order lifecycle operations against a registry of trading clients.
pub mod executor;

/// Per-day trade journal and summary generation.
pub mod journal;

/// Normalized order request/response records.
pub mod order;

/// The cross-venue and triangular trade state machines.
pub mod orchestrator;

pub use client::{MockTradingClient, TradingClient};
pub use error::ExecutionError;
pub use executor::{ClientRegistry, OrderExecutor};
pub use journal::{DailySummary, TransactionJournal};
pub use order::{ExecutedOrder, OrderKind, OrderRequest, OrderStatus};
pub use orchestrator::{TradeAttempt, TradeAttemptId, TradeKind, TradeOrchestrator, TradeStatus};
