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
//! # 🧠 Core - Engine Wiring
//!
//! Turns the other crates into one running system: reads [`config::Config`] from
//! the environment, initialises logging, constructs the shared registries,
//! detectors, risk managers and orchestrators, and drives the event loop that
//! connects them (spec section 5).
//!
//! ## 🏗️ System Components
//!
//! - [`config`]: [`Config::from_env`](config::Config::from_env), every tunable
//!   named in the external-interfaces contract.
//! - [`logging`]: `tracing` initialisation, human-readable or JSON.
//! - [`shutdown`]: the [`SyncShutdown`](shutdown::SyncShutdown) /
//!   [`AsyncShutdown`](shutdown::AsyncShutdown) traits and the signal future
//!   `main` races against the engine loop.
//! - [`engine`]: [`Engine`](engine::Engine), the wired system and its dispatch loop.
//! - [`error`]: [`CoreError`](error::CoreError), the top-level error `main` matches on.

/// Environment-derived configuration.
pub mod config;

/// Top-level error type.
pub mod error;

/// The wired system and its event loop.
pub mod engine;

/// `tracing` initialisation.
pub mod logging;

/// Graceful shutdown traits and signal.
pub mod shutdown;

pub use config::Config;
pub use engine::{Engine, EngineDeps};
pub use error::CoreError;
