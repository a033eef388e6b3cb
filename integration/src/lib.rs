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
//! # 🔄 Integration - Low-Level Exchange Plumbing
//!
//! Shared, low-level abstractions for composing flexible web integrations with
//! financial exchanges. Used by `arbitron-data` (market data streams) and
//! `arbitron-execution` (trading API clients) so neither has to reinvent
//! backoff, request signing or channel wiring.
//!
//! ## 🏗️ Abstractions
//!
//! * [`channel`]: a thin `Tx` abstraction over `tokio::sync::mpsc` so producers
//!   don't need to know whether the send is bounded, unbounded, or dropped.
//! * [`signing`]: HMAC-SHA256 request signing shared by every authenticated
//!   trading API client.
//! * [`backoff`]: reconnect backoff sequencing shared by every adapter.

/// All [`std::error::Error`]s generated in Integration.
pub mod error;

/// Request signing helpers (HMAC-SHA256) for authenticated trading API calls.
pub mod signing;

/// Reconnect backoff sequencing.
pub mod backoff;

/// Lightweight channel abstractions.
pub mod channel;
