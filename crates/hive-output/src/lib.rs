//! `hive-output` — run logs for the hive colony simulation.
//!
//! | Backend | Files created                               |
//! |---------|---------------------------------------------|
//! | CSV     | `tick_summaries.csv`, `bee_snapshots.csv`   |
//!
//! Writers implement [`OutputWriter`] and are driven by
//! [`SimOutputObserver`], which implements `hive_sim::SimObserver`: one
//! summary row per executed tick, one snapshot row per bee at every
//! `output_interval_ticks`.
//!
//! # Usage
//!
//! ```rust,ignore
//! use hive_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer);
//! sim.run_ticks(3_600, &mut obs);
//! sim.finish(&mut obs);
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{BeeSnapshotRow, TickSummaryRow};
pub use writer::OutputWriter;
