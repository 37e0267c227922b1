//! The `OutputWriter` trait implemented by all backend writers.

use crate::{NodeRow, OutputResult, ProblemRow, RunRow};

/// Trait implemented by the CSV and SQLite writers.
///
/// Writers are driven from a single thread (see
/// [`WriteBehind`](crate::WriteBehind)), so they only need to be `Send`.
pub trait OutputWriter: Send {
    /// Record one problem instance.
    fn write_problem(&mut self, row: &ProblemRow) -> OutputResult<()>;

    /// Record one run summary.
    fn write_run(&mut self, row: &RunRow) -> OutputResult<()>;

    /// Record the per-node results of one run.
    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent: safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}
