//! Feeds simulation hooks into an [`OutputWriter`].

use hive_core::Tick;
use hive_sim::{SimObserver, TickReport, View};

use crate::row::{BeeSnapshotRow, TickSummaryRow};
use crate::writer::OutputWriter;
use crate::{OutputError, OutputResult};

/// A [`SimObserver`] that logs tick summaries and bee snapshots to any
/// [`OutputWriter`].
///
/// `SimObserver` methods return nothing, so the first write error is stored
/// and later ones are dropped.  Check [`take_error`][Self::take_error] after
/// the run.
pub struct SimOutputObserver<W: OutputWriter> {
    writer:     W,
    last_error: Option<OutputError>,
}

impl<W: OutputWriter> SimOutputObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, last_error: None }
    }

    /// Take the stored write error, if any.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.last_error.take()
    }

    /// Unwrap the inner writer.
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: OutputResult<()>) {
        if let Err(e) = result {
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }
}

impl<W: OutputWriter> SimObserver for SimOutputObserver<W> {
    fn on_tick_end(&mut self, report: &TickReport) {
        let result = self.writer.write_tick_summary(&TickSummaryRow::from(report));
        self.store_err(result);
    }

    fn on_view(&mut self, view: &View) {
        if view.bees.is_empty() {
            return;
        }
        let rows: Vec<BeeSnapshotRow> = view.bees.iter().map(|b| BeeSnapshotRow::of(b, view.tick)).collect();
        let result = self.writer.write_snapshots(&rows);
        self.store_err(result);
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
