//! `WriteBehind` — asynchronous result sink.
//!
//! Producers (batch workers) hand finished records to a channel and return
//! immediately; one dedicated thread owns the [`OutputWriter`] and performs
//! all I/O.  A failing write is logged and remembered, and later records are
//! still attempted.  [`WriteBehind::finish`] drains the channel, flushes the
//! writer, and reports the first error.

use std::thread::{self, JoinHandle};

use crossbeam_channel::{Receiver, Sender};
use tracing::warn;

use crate::{NodeRow, OutputError, OutputResult, OutputWriter, ProblemRow, RunRow};

/// A unit of work for the sink.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Problem(ProblemRow),
    /// A run summary together with its per-node rows.
    Run { run: RunRow, nodes: Vec<NodeRow> },
}

/// Counts of records the sink wrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SinkStats {
    pub problems: u64,
    pub runs:     u64,
    pub nodes:    u64,
    pub failed:   u64,
}

/// Cloneable producer side of a [`WriteBehind`].
#[derive(Clone)]
pub struct SinkHandle {
    tx: Sender<Record>,
}

impl SinkHandle {
    /// Queue a record.  Never blocks on I/O.
    pub fn submit(&self, record: Record) -> OutputResult<()> {
        self.tx.send(record).map_err(|_| OutputError::Closed)
    }
}

/// Owns the writer thread.
pub struct WriteBehind {
    handle: SinkHandle,
    thread: JoinHandle<OutputResult<SinkStats>>,
}

impl WriteBehind {
    /// Move `writer` onto a dedicated thread fed by an unbounded channel.
    pub fn spawn<W: OutputWriter + 'static>(writer: W) -> OutputResult<Self> {
        let (tx, rx) = crossbeam_channel::unbounded();
        let thread = thread::Builder::new()
            .name("wsn-sink".into())
            .spawn(move || drain(writer, rx))?;
        Ok(Self { handle: SinkHandle { tx }, thread })
    }

    /// A producer handle.  Every clone must be dropped before
    /// [`finish`](Self::finish) can return.
    pub fn handle(&self) -> SinkHandle {
        self.handle.clone()
    }

    pub fn submit(&self, record: Record) -> OutputResult<()> {
        self.handle.submit(record)
    }

    /// Close the channel, wait for every queued record to be written, and
    /// flush the writer.
    pub fn finish(self) -> OutputResult<SinkStats> {
        drop(self.handle);
        self.thread.join().map_err(|_| OutputError::Panicked)?
    }
}

fn drain<W: OutputWriter>(mut writer: W, rx: Receiver<Record>) -> OutputResult<SinkStats> {
    let mut stats = SinkStats::default();
    let mut first_error: Option<OutputError> = None;

    for record in rx {
        let result = match &record {
            Record::Problem(row) => writer.write_problem(row).map(|()| stats.problems += 1),
            Record::Run { run, nodes } => writer
                .write_run(run)
                .and_then(|()| writer.write_nodes(nodes))
                .map(|()| {
                    stats.runs += 1;
                    stats.nodes += nodes.len() as u64;
                }),
        };
        if let Err(e) = result {
            warn!(error = %e, "result write failed");
            stats.failed += 1;
            if first_error.is_none() {
                first_error = Some(e);
            }
        }
    }

    let flushed = writer.finish();
    match first_error {
        Some(e) => Err(e),
        None => flushed.map(|()| stats),
    }
}
