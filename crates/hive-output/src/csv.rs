//! CSV run logs.
//!
//! | File                 | One row per                          |
//! |----------------------|--------------------------------------|
//! | `tick_summaries.csv` | executed tick                        |
//! | `bee_snapshots.csv`  | bee, at every View output interval   |

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{BeeSnapshotRow, OutputResult, TickSummaryRow};

pub const SUMMARY_HEADER: [&str; 12] = [
    "tick",
    "t",
    "bees",
    "delivered",
    "processed",
    "total_deposited",
    "receiver_queue",
    "signals_queued",
    "queue_avg",
    "waggle_active",
    "receivers_active",
    "role_changes",
];

pub const SNAPSHOT_HEADER: [&str; 8] = ["bee_id", "tick", "x", "y", "kind", "role", "state", "carrying"];

/// Writes run logs to two CSV files.
pub struct CsvWriter {
    summaries: Writer<File>,
    snapshots: Writer<File>,
    finished:  bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open both files and write their header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut summaries = Writer::from_path(dir.join("tick_summaries.csv"))?;
        summaries.write_record(SUMMARY_HEADER)?;

        let mut snapshots = Writer::from_path(dir.join("bee_snapshots.csv"))?;
        snapshots.write_record(SNAPSHOT_HEADER)?;

        Ok(Self { summaries, snapshots, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_snapshots(&mut self, rows: &[BeeSnapshotRow]) -> OutputResult<()> {
        for row in rows {
            self.snapshots.write_record(&[
                row.bee_id.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.kind.to_owned(),
                row.role.to_owned(),
                row.state.clone(),
                row.carrying.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()> {
        self.summaries.write_record(&[
            row.tick.to_string(),
            format!("{:.4}", row.t),
            row.bees.to_string(),
            row.delivered.to_string(),
            row.processed.to_string(),
            row.total_deposited.to_string(),
            row.receiver_queue.to_string(),
            row.signals_queued.to_string(),
            row.queue_avg.to_string(),
            row.waggle_active.to_string(),
            row.receivers_active.to_string(),
            row.role_changes.to_string(),
        ])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.summaries.flush()?;
        self.snapshots.flush()?;
        Ok(())
    }
}
