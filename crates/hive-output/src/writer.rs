//! The `OutputWriter` trait implemented by backend writers.

use crate::{BeeSnapshotRow, OutputResult, TickSummaryRow};

/// A sink for run logs.
///
/// Errors never interrupt the simulation: the observer stores them and hands
/// them out through [`SimOutputObserver::take_error`][crate::SimOutputObserver::take_error].
pub trait OutputWriter {
    /// Write a batch of bee snapshots.
    fn write_snapshots(&mut self, rows: &[BeeSnapshotRow]) -> OutputResult<()>;

    /// Write one tick summary row.
    fn write_tick_summary(&mut self, row: &TickSummaryRow) -> OutputResult<()>;

    /// Flush all underlying file handles.  Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}
