// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Graceful shutdown traits and signal.
//!
//! ## Shutdown Patterns
//!
//! ### Synchronous
//! For components that can tear down without awaiting anything:
//! ```rust,ignore
//! use arbitron_core::shutdown::SyncShutdown;
//!
//! struct SimpleComponent;
//!
//! impl SyncShutdown for SimpleComponent {
//!     type Result = ();
//!     fn shutdown(&mut self) -> Self::Result {
//!         println!("component shut down");
//!     }
//! }
//! ```
//!
//! ### Asynchronous
//! For components that must flush or drain before they can report done:
//! ```rust,ignore
//! use arbitron_core::shutdown::AsyncShutdown;
//!
//! struct AsyncComponent;
//!
//! impl AsyncShutdown for AsyncComponent {
//!     type Result = Result<(), String>;
//!     fn shutdown(&mut self) -> impl Future<Output = Self::Result> {
//!         async move {
//!             tokio::time::sleep(std::time::Duration::from_millis(100)).await;
//!             Ok(())
//!         }
//!     }
//! }
//! ```

use std::future::Future;

/// A component that can shut down immediately, without suspending.
pub trait SyncShutdown {
    type Result;
    fn shutdown(&mut self) -> Self::Result;
}

/// A component that needs to await something (draining a channel, flushing a
/// writer) to complete its shutdown.
pub trait AsyncShutdown {
    type Result;
    fn shutdown(&mut self) -> impl Future<Output = Self::Result>;
}

/// Marker signal that a graceful shutdown has been requested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Shutdown;

/// Resolves once SIGINT (or, on Unix, SIGTERM) is received.
///
/// Intended to be raced against the engine's run loop in `main`: adapters stop
/// subscribing, in-flight trades are given a bounded grace period, the journal
/// flushes, then the process exits (spec 5, "Cancellation").
pub async fn wait_for_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut terminate = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = terminate.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
