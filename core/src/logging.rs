// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! # Logging Configuration
//!
//! Standardized `tracing` setup for the engine binary.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use arbitron_core::logging::init_logging;
//!
//! fn main() {
//!     init_logging();
//!     tracing::info!("arbitron starting");
//! }
//! ```
//!
//! ### JSON logging (for log aggregators)
//! ```rust,ignore
//! use arbitron_core::logging::init_json_logging;
//!
//! fn main() {
//!     init_json_logging();
//! }
//! ```
//!
//! ### Environment configuration
//! ```bash
//! export RUST_LOG=debug
//! # or per-module:
//! export RUST_LOG=arbitron_core=info,arbitron_execution=debug,arbitron_data=warn
//! ```

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initializes human-readable logging, honoring `RUST_LOG` (default: `info`).
pub fn init_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer())
        .init()
}

/// Initializes JSON logging, honoring `RUST_LOG` (default: `info`).
pub fn init_json_logging() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::filter::EnvFilter::builder()
                .with_default_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with(tracing_subscriber::fmt::layer().json().flatten_event(true))
        .init()
}
