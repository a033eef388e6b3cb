// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Time conventions used to annualise or re-base a per-trade statistic.
//!
//! A [`SharpeRatio`](crate::metric::sharpe::SharpeRatio) calculated over one sampling
//! frequency (say, daily) is only comparable to one calculated over another (say,
//! annual) once both have been scaled to the same [`TimeInterval`].

use chrono::TimeDelta;

/// A fixed sampling period a statistic was computed over.
pub trait TimeInterval {
    /// The wall-clock duration this interval represents.
    fn interval(&self) -> TimeDelta;
}

impl TimeInterval for TimeDelta {
    fn interval(&self) -> TimeDelta {
        *self
    }
}

/// One calendar day.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize)]
pub struct Daily;

impl TimeInterval for Daily {
    fn interval(&self) -> TimeDelta {
        TimeDelta::days(1)
    }
}

/// A 365-day trading year, used for crypto markets that trade around the clock.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize)]
pub struct Annual365;

impl TimeInterval for Annual365 {
    fn interval(&self) -> TimeDelta {
        TimeDelta::days(365)
    }
}

/// A 252-business-day trading year, the convention for markets with scheduled closures.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Deserialize, serde::Serialize)]
pub struct Annual252;

impl TimeInterval for Annual252 {
    fn interval(&self) -> TimeDelta {
        TimeDelta::days(252)
    }
}
