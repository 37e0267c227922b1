//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `problems.csv`
//! - `runs.csv`
//! - `nodes.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::OutputWriter;
use crate::{NodeRow, OutputResult, ProblemRow, RunRow};

pub const PROBLEM_HEADERS: [&str; 3] = ["problem_id", "description", "node_count"];

pub const RUN_HEADERS: [&str; 14] = [
    "run_id",
    "problem_id",
    "variant",
    "seed",
    "total_simulation_time",
    "transfer_time",
    "recovery_time",
    "energy_rate_sensing",
    "energy_rate_transfer",
    "transmission_range",
    "interference_range",
    "actual_total_duration",
    "final_failure_count",
    "delivered_volume",
];

pub const NODE_HEADERS: [&str; 21] = [
    "run_id",
    "problem_id",
    "node_id",
    "x",
    "y",
    "parent",
    "level",
    "child_count",
    "descendant_count",
    "color",
    "delta_opt",
    "collection_time",
    "wasted_time",
    "total_data_sent",
    "energy_consumed",
    "energy_wasted",
    "sent_packet_total_delay",
    "sent_packet_count",
    "failure_count",
    "failure_mean_interval",
    "timeline_exhausted",
];

/// Writes results to three CSV files.
pub struct CsvWriter {
    problems: Writer<File>,
    runs:     Writer<File>,
    nodes:    Writer<File>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed, open the three CSV files, and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;

        let mut problems = Writer::from_path(dir.join("problems.csv"))?;
        problems.write_record(PROBLEM_HEADERS)?;

        let mut runs = Writer::from_path(dir.join("runs.csv"))?;
        runs.write_record(RUN_HEADERS)?;

        let mut nodes = Writer::from_path(dir.join("nodes.csv"))?;
        nodes.write_record(NODE_HEADERS)?;

        Ok(Self { problems, runs, nodes, finished: false })
    }
}

impl OutputWriter for CsvWriter {
    fn write_problem(&mut self, row: &ProblemRow) -> OutputResult<()> {
        self.problems.write_record(&[
            row.problem_id.to_string(),
            row.description.clone(),
            row.node_count.to_string(),
        ])?;
        Ok(())
    }

    fn write_run(&mut self, row: &RunRow) -> OutputResult<()> {
        self.runs.write_record(&[
            row.run_id.to_string(),
            row.problem_id.to_string(),
            row.variant.clone(),
            row.seed.to_string(),
            row.total_simulation_time.to_string(),
            row.transfer_time.to_string(),
            row.recovery_time.to_string(),
            row.energy_rate_sensing.to_string(),
            row.energy_rate_transfer.to_string(),
            row.transmission_range.to_string(),
            row.interference_range.to_string(),
            row.actual_total_duration.to_string(),
            row.final_failure_count.to_string(),
            row.delivered_volume.to_string(),
        ])?;
        Ok(())
    }

    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        for row in rows {
            self.nodes.write_record(&[
                row.run_id.to_string(),
                row.problem_id.to_string(),
                row.node_id.to_string(),
                row.x.to_string(),
                row.y.to_string(),
                row.parent.to_string(),
                row.level.to_string(),
                row.child_count.to_string(),
                row.descendant_count.to_string(),
                row.color.to_string(),
                row.delta_opt.to_string(),
                row.collection_time.to_string(),
                row.wasted_time.to_string(),
                row.total_data_sent.to_string(),
                row.energy_consumed.to_string(),
                row.energy_wasted.to_string(),
                row.sent_packet_total_delay.to_string(),
                row.sent_packet_count.to_string(),
                row.failure_count.to_string(),
                row.failure_mean_interval.to_string(),
                (row.timeline_exhausted as u8).to_string(),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.problems.flush()?;
        self.runs.flush()?;
        self.nodes.flush()?;
        Ok(())
    }
}
