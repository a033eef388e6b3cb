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
//! # 🏦 Markets - Venue & Symbol Primitives
//!
//! Shared, dependency-light types describing the venues Arbitron connects to and the
//! canonical symbol representation used across detection, risk and execution.
//!
//! ## 🎯 Main Features
//!
//! * **🆔 ExchangeId**: a closed enum of supported spot venues, each carrying its
//!   static taker fee rate and reconnect defaults.
//! * **🔤 Symbol**: canonical `BASE/QUOTE` representation, independent of any venue's
//!   wire casing, plus the [`SymbolTranslator`] trait each venue adapter implements.
//! * **↔️ Side**: the `Buy` / `Sell` leg direction shared by order books and orders.

/// [`ExchangeId`] and venue metadata (fee rates, reconnect policy defaults).
pub mod exchange;

/// Canonical [`Symbol`] representation and venue-specific translation.
pub mod symbol;

/// [`Side`] of a quote, book level or order.
pub mod side;

pub use exchange::{ExchangeId, ReconnectPolicy};
pub use side::Side;
pub use symbol::{Symbol, SymbolTranslator};
