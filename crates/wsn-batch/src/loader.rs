//! CSV problem inputs.
//!
//! Positions file (`id,x,y`): one row per node, ids dense from 0 in any
//! order.  Failures file (`node_id,time`): one row per failure; rows may be
//! in any order and nodes may have no rows at all.

use std::path::Path;

use serde::Deserialize;

use wsn_core::{Position, ProblemId};

use crate::{BatchError, BatchResult, Problem};

#[derive(Debug, Deserialize)]
struct PositionRecord {
    id: u32,
    x:  f64,
    y:  f64,
}

#[derive(Debug, Deserialize)]
struct FailureRecord {
    node_id: u32,
    time:    f64,
}

fn input_error(path: &Path, reason: impl Into<String>) -> BatchError {
    BatchError::Input { path: path.display().to_string(), reason: reason.into() }
}

/// Read a positions file into a `NodeId`-indexed vector.
pub fn load_positions_csv(path: impl AsRef<Path>) -> BatchResult<Vec<Position>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)?;
    let mut slots: Vec<Option<Position>> = Vec::new();

    for record in rdr.deserialize() {
        let PositionRecord { id, x, y } = record?;
        let idx = id as usize;
        if idx >= slots.len() {
            slots.resize(idx + 1, None);
        }
        if slots[idx].replace(Position::new(x, y)).is_some() {
            return Err(input_error(path, format!("duplicate node id {id}")));
        }
    }

    slots
        .into_iter()
        .enumerate()
        .map(|(i, slot)| slot.ok_or_else(|| input_error(path, format!("missing node id {i}"))))
        .collect()
}

/// Read a failures file into per-node timelines sorted by time.
///
/// `node_count` bounds the ids; a row naming an unknown node is an error.
/// Ordering and sign are checked later when the run is built.
pub fn load_failures_csv(path: impl AsRef<Path>, node_count: usize) -> BatchResult<Vec<Vec<f64>>> {
    let path = path.as_ref();
    let mut rdr = csv::Reader::from_path(path)?;
    let mut failures = vec![Vec::new(); node_count];

    for record in rdr.deserialize() {
        let FailureRecord { node_id, time } = record?;
        let stamps = failures
            .get_mut(node_id as usize)
            .ok_or_else(|| input_error(path, format!("node id {node_id} out of range (n = {node_count})")))?;
        stamps.push(time);
    }

    for stamps in &mut failures {
        stamps.sort_by(f64::total_cmp);
    }
    Ok(failures)
}

/// Load both files as one problem.
pub fn load_problem(
    id:        ProblemId,
    positions: impl AsRef<Path>,
    failures:  impl AsRef<Path>,
) -> BatchResult<Problem> {
    let description = positions.as_ref().display().to_string();
    let positions = load_positions_csv(positions)?;
    let failures = load_failures_csv(failures, positions.len())?;
    Problem::new(id, description, positions, failures)
}
