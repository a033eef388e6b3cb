// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Individual performance metrics, each computed from a simple aggregate so they
//! compose independently of how the caller gathers its trade history.

/// Gross profit over gross loss.
pub mod profit_factor;

/// Risk-adjusted return over a [`TimeInterval`](crate::time::TimeInterval).
pub mod sharpe;

/// Fraction of trades that closed profitable.
pub mod win_rate;
