// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Mutable risk state: today's trade/loss counters and the soft balance locks held
//! against in-flight trades.

pub mod balance;
pub mod daily;
