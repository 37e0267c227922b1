//! `wsn-output` — result persistence for the WSN fault simulator.
//!
//! Two backends are provided, the second behind a Cargo feature:
//!
//! | Feature   | Backend | Files created                              |
//! |-----------|---------|--------------------------------------------|
//! | *(none)*  | CSV     | `problems.csv`, `runs.csv`, `nodes.csv`    |
//! | `sqlite`  | SQLite  | `results.db`                               |
//!
//! Both implement [`OutputWriter`].  Batch execution wraps one in a
//! [`WriteBehind`] so runs never wait on disk.
//!
//! # Usage
//!
//! ```rust,ignore
//! use wsn_output::{CsvWriter, NodeRow, Record, RunRow, WriteBehind};
//!
//! let sink = WriteBehind::spawn(CsvWriter::new(Path::new("./out"))?)?;
//! sink.submit(Record::Run {
//!     run:   RunRow::new(run_id, problem_id, "default", seed, &params, &report.summary),
//!     nodes: NodeRow::from_report(run_id, problem_id, &report),
//! })?;
//! let stats = sink.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod sink;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(test)]
mod tests;

pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{NodeRow, ProblemRow, RunRow};
pub use sink::{Record, SinkHandle, SinkStats, WriteBehind};
pub use writer::OutputWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;
