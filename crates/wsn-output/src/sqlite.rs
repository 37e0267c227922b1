//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `results.db` file in the configured output directory with
//! three tables: `problems`, `runs`, and `sensor_nodes`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::OutputWriter;
use crate::{NodeRow, OutputResult, ProblemRow, RunRow};

/// Writes results to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `results.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let conn = Connection::open(dir.join("results.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS problems (
                 problem_id  INTEGER PRIMARY KEY,
                 description TEXT    NOT NULL,
                 node_count  INTEGER NOT NULL
             );
             CREATE TABLE IF NOT EXISTS runs (
                 run_id                INTEGER PRIMARY KEY,
                 problem_id            INTEGER NOT NULL,
                 variant               TEXT    NOT NULL,
                 seed                  INTEGER NOT NULL,
                 total_simulation_time REAL    NOT NULL,
                 transfer_time         REAL    NOT NULL,
                 recovery_time         REAL    NOT NULL,
                 energy_rate_sensing   REAL    NOT NULL,
                 energy_rate_transfer  REAL    NOT NULL,
                 transmission_range    REAL    NOT NULL,
                 interference_range    REAL    NOT NULL,
                 actual_total_duration REAL    NOT NULL,
                 final_failure_count   INTEGER NOT NULL,
                 delivered_volume      REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS sensor_nodes (
                 run_id                  INTEGER NOT NULL,
                 problem_id              INTEGER NOT NULL,
                 node_id                 INTEGER NOT NULL,
                 x                       REAL    NOT NULL,
                 y                       REAL    NOT NULL,
                 parent                  INTEGER NOT NULL,
                 level                   INTEGER NOT NULL,
                 child_count             INTEGER NOT NULL,
                 descendant_count        INTEGER NOT NULL,
                 color                   INTEGER NOT NULL,
                 delta_opt               REAL    NOT NULL,
                 collection_time         REAL    NOT NULL,
                 wasted_time             REAL    NOT NULL,
                 total_data_sent         REAL    NOT NULL,
                 energy_consumed         REAL    NOT NULL,
                 energy_wasted           REAL    NOT NULL,
                 sent_packet_total_delay REAL    NOT NULL,
                 sent_packet_count       INTEGER NOT NULL,
                 failure_count           INTEGER NOT NULL,
                 failure_mean_interval   REAL    NOT NULL,
                 timeline_exhausted      INTEGER NOT NULL,
                 PRIMARY KEY (run_id, node_id)
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl OutputWriter for SqliteWriter {
    fn write_problem(&mut self, row: &ProblemRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO problems (problem_id, description, node_count) VALUES (?1, ?2, ?3)",
            rusqlite::params![row.problem_id, row.description, row.node_count],
        )?;
        Ok(())
    }

    fn write_run(&mut self, row: &RunRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO runs \
             (run_id, problem_id, variant, seed, total_simulation_time, transfer_time, \
              recovery_time, energy_rate_sensing, energy_rate_transfer, transmission_range, \
              interference_range, actual_total_duration, final_failure_count, delivered_volume) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14)",
            rusqlite::params![
                row.run_id,
                row.problem_id,
                row.variant,
                row.seed as i64,
                row.total_simulation_time,
                row.transfer_time,
                row.recovery_time,
                row.energy_rate_sensing,
                row.energy_rate_transfer,
                row.transmission_range,
                row.interference_range,
                row.actual_total_duration,
                row.final_failure_count as i64,
                row.delivered_volume,
            ],
        )?;
        Ok(())
    }

    fn write_nodes(&mut self, rows: &[NodeRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO sensor_nodes \
                 (run_id, problem_id, node_id, x, y, parent, level, child_count, descendant_count, \
                  color, delta_opt, collection_time, wasted_time, total_data_sent, energy_consumed, \
                  energy_wasted, sent_packet_total_delay, sent_packet_count, failure_count, \
                  failure_mean_interval, timeline_exhausted) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, \
                         ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18, ?19, ?20, ?21)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.run_id,
                    row.problem_id,
                    row.node_id,
                    row.x,
                    row.y,
                    row.parent,
                    row.level,
                    row.child_count,
                    row.descendant_count,
                    row.color,
                    row.delta_opt,
                    row.collection_time,
                    row.wasted_time,
                    row.total_data_sent,
                    row.energy_consumed,
                    row.energy_wasted,
                    row.sent_packet_total_delay,
                    row.sent_packet_count as i64,
                    row.failure_count as i64,
                    row.failure_mean_interval,
                    row.timeline_exhausted as i64,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
