// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Per-venue order-book consistency protocols.
//!
//! Every supported venue reconciles a REST or stream snapshot with a stream of
//! incremental deltas differently. Each [`BookReconstructor`] implementation below
//! encodes one of the four protocol shapes observed across venues; the
//! [`ExchangeAdapter`](crate::adapter::ExchangeAdapter) for a given venue owns exactly
//! one and feeds it every [`BookDelta`] it receives, in receipt order.

use crate::book::OrderBookReplica;
use crate::error::DataError;
use crate::event::BookDelta;
use arbitron_markets::{ExchangeId, Symbol};

/// Feeds [`BookDelta`]s to an [`OrderBookReplica`], enforcing one venue's snapshot/delta
/// consistency rules and surfacing a gap as [`DataError::BookInconsistency`] so the
/// caller can invalidate the replica and request a fresh snapshot.
pub trait BookReconstructor: Send {
    fn ingest(
        &mut self,
        replica: &mut OrderBookReplica,
        venue: ExchangeId,
        symbol: &Symbol,
        delta: BookDelta,
    ) -> Result<(), DataError>;

    /// Forgets all buffered/sequencing state, e.g. after the replica was invalidated
    /// and a fresh snapshot has been requested.
    fn reset(&mut self);
}

fn inconsistency(venue: ExchangeId, symbol: &Symbol, reason: impl Into<String>) -> DataError {
    DataError::BookInconsistency {
        venue,
        symbol: symbol.clone(),
        reason: reason.into(),
    }
}

/// Protocol A: incremental deltas stream continuously over the websocket from the
/// moment of subscription, but the book's true starting state is a REST snapshot
/// fetched out-of-band (Binance). Deltas are buffered until the snapshot lands;
/// deltas that predate it are dropped, and the first applied delta must bridge
/// exactly to the snapshot's update id.
#[derive(Debug, Default)]
pub struct RestSnapshotThenDelta {
    buffered: Vec<BookDelta>,
    snapshot_applied: bool,
}

impl RestSnapshotThenDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called once the out-of-band REST snapshot fetch completes.
    pub fn apply_rest_snapshot(
        &mut self,
        replica: &mut OrderBookReplica,
        venue: ExchangeId,
        symbol: &Symbol,
        last_update_id: u64,
        bids: &[crate::event::BookLevel],
        asks: &[crate::event::BookLevel],
    ) -> Result<(), DataError> {
        replica.apply_snapshot(last_update_id, bids, asks);
        replica.set_event_time(chrono::Utc::now());
        self.snapshot_applied = true;

        let buffered = std::mem::take(&mut self.buffered);
        for delta in buffered {
            self.apply_buffered_after_snapshot(replica, venue, symbol, delta)?;
        }
        Ok(())
    }

    fn apply_buffered_after_snapshot(
        &mut self,
        replica: &mut OrderBookReplica,
        venue: ExchangeId,
        symbol: &Symbol,
        delta: BookDelta,
    ) -> Result<(), DataError> {
        match delta {
            BookDelta::Incremental {
                first_update_id,
                last_update_id,
                bids,
                asks,
                event_time,
            } => {
                let current = replica.last_update_id();
                if last_update_id <= current {
                    // Entirely predates the snapshot; safe to drop.
                    return Ok(());
                }
                if first_update_id > current + 1 {
                    return Err(inconsistency(
                        venue,
                        symbol,
                        format!(
                            "gap bridging snapshot: snapshot id {current}, next delta starts at {first_update_id}"
                        ),
                    ));
                }
                replica.apply_incremental(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                Ok(())
            }
            BookDelta::Snapshot { .. } => Ok(()),
        }
    }
}

impl BookReconstructor for RestSnapshotThenDelta {
    fn ingest(
        &mut self,
        replica: &mut OrderBookReplica,
        venue: ExchangeId,
        symbol: &Symbol,
        delta: BookDelta,
    ) -> Result<(), DataError> {
        if !self.snapshot_applied {
            self.buffered.push(delta);
            return Ok(());
        }
        match delta {
            BookDelta::Incremental {
                first_update_id,
                last_update_id,
                bids,
                asks,
                event_time,
            } => {
                let current = replica.last_update_id();
                if first_update_id != current + 1 {
                    return Err(inconsistency(
                        venue,
                        symbol,
                        format!("update id gap: expected {}, got {first_update_id}", current + 1),
                    ));
                }
                replica.apply_incremental(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                Ok(())
            }
            BookDelta::Snapshot { .. } => Ok(()),
        }
    }

    fn reset(&mut self) {
        self.buffered.clear();
        self.snapshot_applied = false;
    }
}

/// Protocol B: the stream itself delivers a snapshot as its first message for a
/// subscription, followed by incrementals referencing it (Okx, Bybit).
#[derive(Debug, Default)]
pub struct StreamSnapshotThenDelta {
    snapshot_seen: bool,
}

impl StreamSnapshotThenDelta {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookReconstructor for StreamSnapshotThenDelta {
    fn ingest(
        &mut self,
        replica: &mut OrderBookReplica,
        venue: ExchangeId,
        symbol: &Symbol,
        delta: BookDelta,
    ) -> Result<(), DataError> {
        match delta {
            BookDelta::Snapshot {
                last_update_id,
                bids,
                asks,
                event_time,
            } => {
                replica.apply_snapshot(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                self.snapshot_seen = true;
                Ok(())
            }
            BookDelta::Incremental {
                first_update_id,
                last_update_id,
                bids,
                asks,
                event_time,
            } => {
                if !self.snapshot_seen {
                    return Err(inconsistency(
                        venue,
                        symbol,
                        "incremental delta received before stream snapshot",
                    ));
                }
                let current = replica.last_update_id();
                if first_update_id != current + 1 {
                    return Err(inconsistency(
                        venue,
                        symbol,
                        format!("update id gap: expected {}, got {first_update_id}", current + 1),
                    ));
                }
                replica.apply_incremental(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.snapshot_seen = false;
    }
}

/// Protocol C: a `level2` snapshot followed by `l2update` messages with no update-id
/// field at all (Coinbase). Consistency rests entirely on receiving every message in
/// order over a single unbroken connection; there is nothing to validate beyond "a
/// snapshot arrived before any update".
#[derive(Debug, Default)]
pub struct Level2ThenL2Update {
    snapshot_seen: bool,
}

impl Level2ThenL2Update {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookReconstructor for Level2ThenL2Update {
    fn ingest(
        &mut self,
        replica: &mut OrderBookReplica,
        venue: ExchangeId,
        symbol: &Symbol,
        delta: BookDelta,
    ) -> Result<(), DataError> {
        match delta {
            BookDelta::Snapshot {
                last_update_id,
                bids,
                asks,
                event_time,
            } => {
                replica.apply_snapshot(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                self.snapshot_seen = true;
                Ok(())
            }
            BookDelta::Incremental {
                last_update_id,
                bids,
                asks,
                event_time,
                ..
            } => {
                if !self.snapshot_seen {
                    return Err(inconsistency(venue, symbol, "l2update received before level2 snapshot"));
                }
                replica.apply_incremental(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.snapshot_seen = false;
    }
}

/// Protocol D: snapshot plus updates each carrying a monotonic sequence number
/// checked independently of Binance/Okx-style update-id ranges (Kraken).
#[derive(Debug, Default)]
pub struct SequencedSnapshotUpdate {
    snapshot_seen: bool,
}

impl SequencedSnapshotUpdate {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookReconstructor for SequencedSnapshotUpdate {
    fn ingest(
        &mut self,
        replica: &mut OrderBookReplica,
        venue: ExchangeId,
        symbol: &Symbol,
        delta: BookDelta,
    ) -> Result<(), DataError> {
        match delta {
            BookDelta::Snapshot {
                last_update_id,
                bids,
                asks,
                event_time,
            } => {
                replica.apply_snapshot(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                self.snapshot_seen = true;
                Ok(())
            }
            BookDelta::Incremental {
                last_update_id,
                bids,
                asks,
                event_time,
                ..
            } => {
                if !self.snapshot_seen {
                    return Err(inconsistency(venue, symbol, "update received before snapshot"));
                }
                let current = replica.last_update_id();
                if last_update_id != current + 1 {
                    return Err(inconsistency(
                        venue,
                        symbol,
                        format!("sequence gap: expected {}, got {last_update_id}", current + 1),
                    ));
                }
                replica.apply_incremental(last_update_id, &bids, &asks);
                replica.set_event_time(event_time);
                Ok(())
            }
        }
    }

    fn reset(&mut self) {
        self.snapshot_seen = false;
    }
}

/// Picks the consistency protocol matching `venue`'s wire behaviour.
///
/// Binance bridges an out-of-band REST snapshot to a continuous delta stream
/// (protocol A); Okx and Bybit push a snapshot as the stream's first message
/// (protocol B); Coinbase's `level2`/`l2update` pair carries no update-id at all
/// (protocol C); Kraken's snapshot-plus-sequenced-updates is protocol D.
pub fn for_venue(venue: ExchangeId) -> Box<dyn BookReconstructor> {
    match venue {
        ExchangeId::Binance => Box::new(RestSnapshotThenDelta::new()),
        ExchangeId::Okx | ExchangeId::Bybit => Box::new(StreamSnapshotThenDelta::new()),
        ExchangeId::Coinbase => Box::new(Level2ThenL2Update::new()),
        ExchangeId::Kraken => Box::new(SequencedSnapshotUpdate::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::BookLevel;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn incremental(first: u64, last: u64) -> BookDelta {
        BookDelta::Incremental {
            first_update_id: first,
            last_update_id: last,
            bids: vec![BookLevel::new(dec!(100), dec!(1))],
            asks: vec![],
            event_time: Utc::now(),
        }
    }

    fn snapshot(id: u64) -> BookDelta {
        BookDelta::Snapshot {
            last_update_id: id,
            bids: vec![BookLevel::new(dec!(99), dec!(1))],
            asks: vec![BookLevel::new(dec!(101), dec!(1))],
            event_time: Utc::now(),
        }
    }

    #[test]
    fn rest_snapshot_then_delta_buffers_until_snapshot_then_bridges() {
        let mut reconstructor = RestSnapshotThenDelta::new();
        let mut replica = OrderBookReplica::new();
        let symbol = Symbol::new("BTC", "USDT");

        reconstructor
            .ingest(&mut replica, ExchangeId::Binance, &symbol, incremental(10, 11))
            .unwrap();
        assert_eq!(replica.last_update_id(), 0);

        reconstructor
            .apply_rest_snapshot(&mut replica, ExchangeId::Binance, &symbol, 11, &[], &[])
            .unwrap();
        assert_eq!(replica.last_update_id(), 11);

        reconstructor
            .ingest(&mut replica, ExchangeId::Binance, &symbol, incremental(12, 12))
            .unwrap();
        assert_eq!(replica.last_update_id(), 12);
    }

    #[test]
    fn rest_snapshot_then_delta_detects_gap_after_live() {
        let mut reconstructor = RestSnapshotThenDelta::new();
        let mut replica = OrderBookReplica::new();
        let symbol = Symbol::new("BTC", "USDT");
        reconstructor
            .apply_rest_snapshot(&mut replica, ExchangeId::Binance, &symbol, 10, &[], &[])
            .unwrap();

        let err = reconstructor
            .ingest(&mut replica, ExchangeId::Binance, &symbol, incremental(12, 13))
            .unwrap_err();
        assert!(matches!(err, DataError::BookInconsistency { .. }));
    }

    #[test]
    fn stream_snapshot_then_delta_rejects_incremental_before_snapshot() {
        let mut reconstructor = StreamSnapshotThenDelta::new();
        let mut replica = OrderBookReplica::new();
        let symbol = Symbol::new("BTC", "USDT");
        let err = reconstructor
            .ingest(&mut replica, ExchangeId::Okx, &symbol, incremental(1, 1))
            .unwrap_err();
        assert!(matches!(err, DataError::BookInconsistency { .. }));
    }

    #[test]
    fn stream_snapshot_then_delta_accepts_continuous_sequence() {
        let mut reconstructor = StreamSnapshotThenDelta::new();
        let mut replica = OrderBookReplica::new();
        let symbol = Symbol::new("BTC", "USDT");
        reconstructor
            .ingest(&mut replica, ExchangeId::Okx, &symbol, snapshot(5))
            .unwrap();
        reconstructor
            .ingest(&mut replica, ExchangeId::Okx, &symbol, incremental(6, 6))
            .unwrap();
        assert_eq!(replica.last_update_id(), 6);
    }

    #[test]
    fn level2_then_l2update_requires_snapshot_first() {
        let mut reconstructor = Level2ThenL2Update::new();
        let mut replica = OrderBookReplica::new();
        let symbol = Symbol::new("BTC", "USD");
        assert!(reconstructor
            .ingest(&mut replica, ExchangeId::Coinbase, &symbol, incremental(1, 1))
            .is_err());
        reconstructor
            .ingest(&mut replica, ExchangeId::Coinbase, &symbol, snapshot(1))
            .unwrap();
        assert!(reconstructor
            .ingest(&mut replica, ExchangeId::Coinbase, &symbol, incremental(2, 2))
            .is_ok());
    }

    #[test]
    fn sequenced_snapshot_update_detects_sequence_gap() {
        let mut reconstructor = SequencedSnapshotUpdate::new();
        let mut replica = OrderBookReplica::new();
        let symbol = Symbol::new("XBT", "USD");
        reconstructor
            .ingest(&mut replica, ExchangeId::Kraken, &symbol, snapshot(1))
            .unwrap();
        let err = reconstructor
            .ingest(&mut replica, ExchangeId::Kraken, &symbol, incremental(3, 3))
            .unwrap_err();
        assert!(matches!(err, DataError::BookInconsistency { .. }));
    }

    #[test]
    fn reset_clears_buffered_and_seen_state() {
        let mut reconstructor = RestSnapshotThenDelta::new();
        let mut replica = OrderBookReplica::new();
        let symbol = Symbol::new("BTC", "USDT");
        reconstructor
            .ingest(&mut replica, ExchangeId::Binance, &symbol, incremental(1, 1))
            .unwrap();
        reconstructor.reset();
        assert!(!reconstructor.snapshot_applied);
        assert!(reconstructor.buffered.is_empty());
    }
}
