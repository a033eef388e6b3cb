// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Reconnect attempt sequencing shared by every `ExchangeAdapter`.
//!
//! Wraps a [`ReconnectPolicy`](arbitron_markets::ReconnectPolicy) with the mutable attempt
//! counter an adapter advances on each dropped stream, and resets on a successful connect.

use arbitron_markets::ReconnectPolicy;
use std::time::Duration;

/// Tracks reconnect attempts for a single adapter against its configured policy.
#[derive(Debug, Clone)]
pub struct ReconnectSequence {
    policy: ReconnectPolicy,
    attempt: u32,
}

impl ReconnectSequence {
    pub fn new(policy: ReconnectPolicy) -> Self {
        Self { policy, attempt: 0 }
    }

    /// Call once a stream drops. Returns the backoff to wait before the next connect
    /// attempt, or `None` once `max_attempts` has been exhausted (caller should emit
    /// `ConnectionLost` and stop).
    pub fn next_backoff(&mut self) -> Option<Duration> {
        self.attempt += 1;
        if self.attempt > self.policy.max_attempts {
            return None;
        }
        Some(self.policy.backoff_for_attempt(self.attempt))
    }

    /// Call after a successful connect to forgive prior failures.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    pub fn attempts_made(&self) -> u32 {
        self.attempt
    }

    pub fn exhausted(&self) -> bool {
        self.attempt >= self.policy.max_attempts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stops_after_max_attempts() {
        let mut seq = ReconnectSequence::new(ReconnectPolicy::new(Duration::from_secs(1), 2, 2));
        assert_eq!(seq.next_backoff(), Some(Duration::from_secs(1)));
        assert_eq!(seq.next_backoff(), Some(Duration::from_secs(2)));
        assert_eq!(seq.next_backoff(), None);
        assert!(seq.exhausted());
    }

    #[test]
    fn reset_forgives_prior_failures() {
        let mut seq = ReconnectSequence::new(ReconnectPolicy::new(Duration::from_secs(1), 2, 2));
        seq.next_backoff();
        seq.reset();
        assert_eq!(seq.attempts_made(), 0);
        assert!(!seq.exhausted());
    }
}
