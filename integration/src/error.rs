// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
use thiserror::Error;

/// Low-level protocol errors shared by market data and execution clients.
#[derive(Debug, Error)]
pub enum SocketError {
    #[error("failed to connect to {url}: {error}")]
    Connect { url: String, error: String },

    #[error("received malformed message: {0}")]
    Deserialize(String),

    #[error("subscription rejected by venue: {0}")]
    Subscribe(String),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("signing payload failed: {0}")]
    Sign(String),
}
