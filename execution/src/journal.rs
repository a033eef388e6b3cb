// Mini-Disclaimer: Educational/experimental use; not investment advice or affiliation; see README & DISCLAIMER.
//! Append-only per-day trade record and end-of-day summary generator.
//!
//! Every [`TradeAttempt`] state transition is appended as one JSON line to
//! `trades-YYYY-MM-DD.jsonl`. Writes are serialized through a single async mutex
//! so concurrent trade completions never interleave mid-line.

use crate::error::ExecutionError;
use crate::orchestrator::{TradeAttempt, TradeKind, TradeStatus};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Totals computed from one day's journal file, matching spec 4.9's end-of-day
/// report.
#[derive(Debug, Clone, PartialEq)]
pub struct DailySummary {
    pub date: NaiveDate,
    pub attempted: u32,
    pub completed: u32,
    pub failed: u32,
    pub rejected: u32,
    pub partial: u32,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    pub average_execution_ms: f64,
    pub success_rate: f64,
    pub by_kind: HashMap<&'static str, u32>,
}

impl DailySummary {
    /// Human-readable rendering written to `summary-YYYY-MM-DD.txt`.
    pub fn render(&self) -> String {
        let mut out = format!(
            "Trade summary for {}\n\
             ---------------------------------\n\
             attempted:      {}\n\
             completed:      {}\n\
             failed:         {}\n\
             rejected:       {}\n\
             partial:        {}\n\
             success rate:   {:.1}%\n\
             gross profit:   {}\n\
             net profit:     {}\n\
             avg exec time:  {:.1}ms\n",
            self.date,
            self.attempted,
            self.completed,
            self.failed,
            self.rejected,
            self.partial,
            self.success_rate * 100.0,
            self.gross_profit,
            self.net_profit,
            self.average_execution_ms,
        );
        out.push_str("by kind:\n");
        for (kind, count) in &self.by_kind {
            out.push_str(&format!("  {kind}: {count}\n"));
        }
        out
    }
}

/// Serializes every [`TradeAttempt`] to its day's JSONL file through a single
/// writer task, so concurrent trade completions append whole lines only.
#[derive(Debug)]
pub struct TransactionJournal {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl TransactionJournal {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn trades_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("trades-{date}.jsonl"))
    }

    fn summary_path(&self, date: NaiveDate) -> PathBuf {
        self.dir.join(format!("summary-{date}.txt"))
    }

    /// Appends one line for the attempt's current state. Called on every status
    /// transition, not just terminal ones, so an operator can reconstruct the full
    /// lifecycle from the file alone.
    pub async fn record(&self, attempt: &TradeAttempt) -> Result<(), ExecutionError> {
        let date = attempt.started_at.date_naive();
        let mut line = serde_json::to_string(attempt).map_err(|e| ExecutionError::Journal(e.to_string()))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| ExecutionError::Journal(e.to_string()))?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.trades_path(date))
            .await
            .map_err(|e| ExecutionError::Journal(e.to_string()))?;
        file.write_all(line.as_bytes()).await.map_err(|e| ExecutionError::Journal(e.to_string()))?;
        Ok(())
    }

    /// Reads back every record for `date` (each line one [`TradeAttempt`]) and
    /// tallies spec 4.9's daily summary.
    pub async fn summarize(&self, date: NaiveDate) -> Result<DailySummary, ExecutionError> {
        let contents = match tokio::fs::read_to_string(self.trades_path(date)).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
            Err(e) => return Err(ExecutionError::Journal(e.to_string())),
        };

        let mut latest_by_id: HashMap<u64, TradeAttempt> = HashMap::new();
        for line in contents.lines().filter(|l| !l.is_empty()) {
            let attempt: TradeAttempt = serde_json::from_str(line).map_err(|e| ExecutionError::Journal(e.to_string()))?;
            latest_by_id.insert(attempt.id.0, attempt);
        }

        let mut summary = DailySummary {
            date,
            attempted: 0,
            completed: 0,
            failed: 0,
            rejected: 0,
            partial: 0,
            gross_profit: Decimal::ZERO,
            net_profit: Decimal::ZERO,
            average_execution_ms: 0.0,
            success_rate: 0.0,
            by_kind: HashMap::new(),
        };
        let mut exec_ms_total = 0i64;
        let mut exec_ms_count = 0i64;

        for attempt in latest_by_id.values() {
            if !attempt.status.is_terminal() {
                continue;
            }
            summary.attempted += 1;
            let kind_label = match attempt.kind {
                TradeKind::CrossVenue => "cross_venue",
                TradeKind::Triangular => "triangular",
            };
            *summary.by_kind.entry(kind_label).or_insert(0) += 1;

            match attempt.status {
                TradeStatus::Completed => summary.completed += 1,
                TradeStatus::Failed => summary.failed += 1,
                TradeStatus::Rejected => summary.rejected += 1,
                TradeStatus::Partial | TradeStatus::RolledBack => summary.partial += 1,
                _ => {}
            }

            if let Some(profit) = attempt.realized_profit {
                summary.net_profit += profit;
                if profit > Decimal::ZERO {
                    summary.gross_profit += profit;
                }
            }

            if let Some(ms) = attempt.execution_ms() {
                exec_ms_total += ms;
                exec_ms_count += 1;
            }
        }

        summary.success_rate = if summary.attempted == 0 {
            0.0
        } else {
            summary.completed as f64 / summary.attempted as f64
        };
        summary.average_execution_ms = if exec_ms_count == 0 {
            0.0
        } else {
            exec_ms_total as f64 / exec_ms_count as f64
        };

        Ok(summary)
    }

    /// Writes `summary-YYYY-MM-DD.txt` for `date`. Called at end-of-day and on
    /// shutdown.
    pub async fn write_summary(&self, date: NaiveDate) -> Result<DailySummary, ExecutionError> {
        let summary = self.summarize(date).await?;
        tokio::fs::create_dir_all(&self.dir).await.map_err(|e| ExecutionError::Journal(e.to_string()))?;
        tokio::fs::write(self.summary_path(date), summary.render())
            .await
            .map_err(|e| ExecutionError::Journal(e.to_string()))?;
        Ok(summary)
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().date_naive()
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::orchestrator::TradeAttemptId;
    use rust_decimal_macros::dec;

    fn completed_attempt(profit: Decimal) -> TradeAttempt {
        let started_at = Utc::now();
        TradeAttempt {
            id: TradeAttemptId(1),
            kind: TradeKind::CrossVenue,
            status: TradeStatus::Completed,
            orders: Vec::new(),
            realized_profit: Some(profit),
            error: None,
            started_at,
            ended_at: Some(started_at + chrono::Duration::milliseconds(250)),
        }
    }

    #[tokio::test]
    async fn record_then_summarize_round_trips_profit_and_counts() {
        let dir = std::env::temp_dir().join(format!("arbitron-journal-test-{}", std::process::id()));
        let journal = TransactionJournal::new(&dir);
        let attempt = completed_attempt(dec!(12.50));
        let date = attempt.started_at.date_naive();

        journal.record(&attempt).await.unwrap();
        let summary = journal.summarize(date).await.unwrap();

        assert_eq!(summary.attempted, 1);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.net_profit, dec!(12.50));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn summarize_on_a_day_with_no_file_reports_zero_totals() {
        let dir = std::env::temp_dir().join(format!("arbitron-journal-empty-{}", std::process::id()));
        let journal = TransactionJournal::new(&dir);
        let summary = journal.summarize(Utc::now().date_naive()).await.unwrap();
        assert_eq!(summary.attempted, 0);
        assert_eq!(summary.success_rate, 0.0);
    }
}
