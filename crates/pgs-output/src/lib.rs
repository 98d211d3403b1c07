//! `pgs-output` — metric sink for simulation runs.
//!
//! | File                  | One row per                                        |
//! |-----------------------|----------------------------------------------------|
//! | `car_kpis.csv`        | named KPI of a car that parked or reached its destination |
//! | `world_summaries.csv` | world diagnostics snapshot (every `output_interval_ticks`) |
//!
//! [`CsvWriter`] implements [`OutputWriter`]; [`SimOutputObserver`] drives
//! any writer from `pgs_sim::SimObserver` callbacks.
//!
//! # Usage
//!
//! ```rust,ignore
//! use pgs_output::{CsvWriter, SimOutputObserver};
//!
//! let writer = CsvWriter::new(Path::new("./output"))?;
//! let mut obs = SimOutputObserver::new(writer, &config);
//! sim.run(&mut obs)?;
//! if let Some(e) = obs.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod observer;
pub mod row;
pub mod writer;


pub use self::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use observer::SimOutputObserver;
pub use row::{KpiRow, WorldSummaryRow};
pub use writer::OutputWriter;
