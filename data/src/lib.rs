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
//! # 📊 Data - Market Data Replication
//!
//! Normalises streaming ticker and depth messages from every supported venue into a
//! single model, and keeps a consistent local replica of each venue's order book.
//!
//! ## 🏗️ Layout
//!
//! - [`event`]: the normalized [`PriceTick`](event::PriceTick) and
//!   [`BookDelta`](event::BookDelta) wire-agnostic event types every adapter emits.
//! - [`book`]: [`OrderBookReplica`](book::OrderBookReplica) (bid/ask ladders, depth
//!   walking) and the [`PriceRegistry`](book::registry::PriceRegistry) /
//!   [`BookRegistry`](book::registry::BookRegistry) caches detectors query.
//! - [`adapter`]: the [`ExchangeAdapter`](adapter::ExchangeAdapter) contract and the
//!   per-venue [`BookReconstructor`](adapter::reconstruct::BookReconstructor) state
//!   machines that implement each venue's snapshot/delta consistency rules.
//!
//! The wire-level parsing of a specific venue's JSON frames is an external
//! collaborator's concern; this crate owns the normalization contract and the
//! book-consistency logic downstream of it.

/// Errors raised while ingesting or reconstructing market data.
pub mod error;

/// Normalized event types emitted by every [`adapter::ExchangeAdapter`].
pub mod event;

/// [`book::OrderBookReplica`] and the registries detectors query.
pub mod book;

/// [`adapter::ExchangeAdapter`] contract, reconnect sequencing and per-venue book
/// reconstruction.
pub mod adapter;

pub use error::DataError;
pub use event::{AdapterEvent, BookDelta, BookLevel, PriceTick};
