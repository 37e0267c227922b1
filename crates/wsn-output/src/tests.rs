//! Integration tests for wsn-output.

use tempfile::TempDir;

use wsn_core::{Position, ProblemId, RunId, SimParams};
use wsn_sim::{NoopObserver, RunReport, SimBuilder};

use crate::{NodeRow, ProblemRow, RunRow};

fn tmp() -> TempDir {
    tempfile::tempdir().expect("create temp dir")
}

/// Two routed nodes and one out of range.
fn small_report() -> (SimParams, RunReport) {
    let params = SimParams { total_simulation_time: 5_000.0, ..SimParams::default() };
    let positions = vec![
        Position::new(50.0, 0.0),
        Position::new(120.0, 0.0),
        Position::new(800.0, 800.0),
    ];
    let failures = vec![vec![2_500.0], vec![], vec![10.0]];
    let mut sim = SimBuilder::new(params.clone(), positions, failures).seed(3).build().unwrap();
    let report = sim.run(&mut NoopObserver).unwrap();
    (params, report)
}

fn run_row(run: u32) -> RunRow {
    let (params, report) = small_report();
    RunRow::new(RunId(run), ProblemId(1), "default", 3, &params, &report.summary)
}

// ── Rows ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod row_tests {
    use super::*;

    #[test]
    fn node_rows_flatten_optionals() {
        let (_, report) = small_report();
        let rows = NodeRow::from_report(RunId(4), ProblemId(6), &report);
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.run_id == 4 && r.problem_id == 6));

        assert_eq!(rows[0].parent, -1);
        assert_eq!(rows[0].level, 0);
        assert_eq!(rows[1].parent, 0);
        assert_eq!(rows[1].level, 1);
        assert!(rows[1].is_routed());

        let far = &rows[2];
        assert_eq!(far.parent, -2);
        assert_eq!(far.level, -1);
        assert_eq!(far.color, -1);
        assert!(!far.is_routed());
    }

    #[test]
    fn run_row_copies_params_and_summary() {
        let (params, report) = small_report();
        let row = RunRow::new(RunId(9), ProblemId(2), "v", 11, &params, &report.summary);
        assert_eq!(row.run_id, 9);
        assert_eq!(row.problem_id, 2);
        assert_eq!(row.transfer_time, params.transfer_time);
        assert_eq!(row.final_failure_count, report.summary.final_failure_count);
        assert_eq!(row.delivered_volume, report.summary.delivered_volume);
    }
}

// ── CSV ───────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use super::*;
    use crate::csv::{CsvWriter, NODE_HEADERS, RUN_HEADERS};
    use crate::writer::OutputWriter;

    #[test]
    fn csv_files_created() {
        let dir = tmp();
        let _w = CsvWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("problems.csv").exists());
        assert!(dir.path().join("runs.csv").exists());
        assert!(dir.path().join("nodes.csv").exists());
    }

    #[test]
    fn csv_creates_missing_directory() {
        let dir = tmp();
        let nested = dir.path().join("a").join("b");
        let mut w = CsvWriter::new(&nested).unwrap();
        w.finish().unwrap();
        assert!(nested.join("runs.csv").exists());
    }

    #[test]
    fn csv_headers_correct() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("runs.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, RUN_HEADERS);

        let mut rdr = csv::Reader::from_path(dir.path().join("nodes.csv")).unwrap();
        let headers: Vec<_> = rdr.headers().unwrap().iter().map(str::to_owned).collect();
        assert_eq!(headers, NODE_HEADERS);
    }

    #[test]
    fn csv_rows_written() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        let (_, report) = small_report();
        w.write_problem(&ProblemRow::new(ProblemId(1), "three nodes", 3)).unwrap();
        w.write_run(&run_row(7)).unwrap();
        w.write_nodes(&NodeRow::from_report(RunId(7), ProblemId(1), &report)).unwrap();
        w.finish().unwrap();

        let mut rdr = csv::Reader::from_path(dir.path().join("problems.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][1], "three nodes");

        let mut rdr = csv::Reader::from_path(dir.path().join("runs.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "7");
        assert_eq!(&rows[0][2], "default");

        let mut rdr = csv::Reader::from_path(dir.path().join("nodes.csv")).unwrap();
        let rows: Vec<_> = rdr.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[2][1], "1");  // problem_id
        assert_eq!(&rows[2][2], "2");  // node_id
        assert_eq!(&rows[2][5], "-2"); // parent: no route
    }

    #[test]
    fn csv_finish_idempotent() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }

    #[test]
    fn csv_empty_nodes_ok() {
        let dir = tmp();
        let mut w = CsvWriter::new(dir.path()).unwrap();
        w.write_nodes(&[]).unwrap();
    }
}

// ── Write-behind sink ─────────────────────────────────────────────────────────

#[cfg(test)]
mod sink_tests {
    use std::io;

    use super::*;
    use crate::{CsvWriter, OutputError, OutputResult, OutputWriter, Record, WriteBehind};

    /// Fails every run write.
    struct BrokenWriter;

    impl OutputWriter for BrokenWriter {
        fn write_problem(&mut self, _row: &ProblemRow) -> OutputResult<()> {
            Ok(())
        }
        fn write_run(&mut self, _row: &RunRow) -> OutputResult<()> {
            Err(OutputError::Io(io::Error::other("disk full")))
        }
        fn write_nodes(&mut self, _rows: &[NodeRow]) -> OutputResult<()> {
            Ok(())
        }
        fn finish(&mut self) -> OutputResult<()> {
            Ok(())
        }
    }

    #[test]
    fn records_from_many_producers_are_written() {
        let dir = tmp();
        let sink = WriteBehind::spawn(CsvWriter::new(dir.path()).unwrap()).unwrap();
        let (_, report) = small_report();
        let row = run_row(0);

        std::thread::scope(|s| {
            for t in 0..4u32 {
                let handle = sink.handle();
                let report = &report;
                let row = &row;
                s.spawn(move || {
                    for i in 0..5u32 {
                        let run = RunId(t * 5 + i);
                        handle
                            .submit(Record::Run {
                                run:   RunRow { run_id: run.0, ..row.clone() },
                                nodes: NodeRow::from_report(run, ProblemId(1), report),
                            })
                            .unwrap();
                    }
                });
            }
        });
        sink.submit(Record::Problem(ProblemRow::new(ProblemId(1), "p", 3))).unwrap();

        let stats = sink.finish().unwrap();
        assert_eq!(stats.problems, 1);
        assert_eq!(stats.runs, 20);
        assert_eq!(stats.nodes, 60);
        assert_eq!(stats.failed, 0);

        let mut rdr = csv::Reader::from_path(dir.path().join("runs.csv")).unwrap();
        assert_eq!(rdr.records().count(), 20);
    }

    #[test]
    fn first_error_is_reported_and_later_records_still_tried() {
        let sink = WriteBehind::spawn(BrokenWriter).unwrap();
        sink.submit(Record::Run { run: run_row(1), nodes: vec![] }).unwrap();
        sink.submit(Record::Problem(ProblemRow::new(ProblemId(1), "p", 0))).unwrap();
        sink.submit(Record::Run { run: run_row(2), nodes: vec![] }).unwrap();
        let err = sink.finish().unwrap_err();
        assert!(matches!(err, OutputError::Io(_)));
    }

    #[test]
    fn empty_sink_finishes_cleanly() {
        let dir = tmp();
        let sink = WriteBehind::spawn(CsvWriter::new(dir.path()).unwrap()).unwrap();
        assert_eq!(sink.finish().unwrap(), Default::default());
    }
}

// ── SQLite tests ──────────────────────────────────────────────────────────────

#[cfg(all(test, feature = "sqlite"))]
mod sqlite_tests {
    use super::*;
    use crate::sqlite::SqliteWriter;
    use crate::writer::OutputWriter;

    #[test]
    fn sqlite_db_created() {
        let dir = tmp();
        let _w = SqliteWriter::new(dir.path()).unwrap();
        assert!(dir.path().join("results.db").exists());
    }

    #[test]
    fn sqlite_rows_counted() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let (_, report) = small_report();
        w.write_problem(&ProblemRow::new(ProblemId(1), "three nodes", 3)).unwrap();
        w.write_run(&run_row(5)).unwrap();
        w.write_nodes(&NodeRow::from_report(RunId(5), ProblemId(1), &report)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("results.db")).unwrap();
        let count = |table: &str| -> i64 {
            conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |r| r.get(0)).unwrap()
        };
        assert_eq!(count("problems"), 1);
        assert_eq!(count("runs"), 1);
        assert_eq!(count("sensor_nodes"), 3);
    }

    #[test]
    fn sqlite_unrouted_node_stored_with_sentinels() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        let (_, report) = small_report();
        w.write_nodes(&NodeRow::from_report(RunId(1), ProblemId(2), &report)).unwrap();
        w.finish().unwrap();

        let conn = rusqlite::Connection::open(dir.path().join("results.db")).unwrap();
        let (parent, level, color): (i64, i64, i64) = conn
            .query_row(
                "SELECT parent, level, color FROM sensor_nodes WHERE node_id = 2",
                [],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!((parent, level, color), (-2, -1, -1));

        let problem: i64 = conn
            .query_row("SELECT DISTINCT problem_id FROM sensor_nodes", [], |r| r.get(0))
            .unwrap();
        assert_eq!(problem, 2);
    }

    #[test]
    fn sqlite_finish_idempotent() {
        let dir = tmp();
        let mut w = SqliteWriter::new(dir.path()).unwrap();
        w.finish().unwrap();
        w.finish().unwrap();
    }
}
