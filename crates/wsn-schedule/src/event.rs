//! `EventQueue` — time-ordered per-node state transitions.
//!
//! # Ordering
//!
//! Events pop earliest time first; equal times pop in ascending `NodeId`
//! order.  Timestamps compare with `f64::total_cmp`, so the order is total
//! and runs are reproducible bit for bit.
//!
//! There is no cancel operation.  A transition that a failure pre-empts is
//! simply never pushed; the simulator pushes the Recovery event instead.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use wsn_core::NodeId;

/// Operating state of a node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WorkingState {
    Collection,
    Transfer,
    Recovery,
}

impl std::fmt::Display for WorkingState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            WorkingState::Collection => "collection",
            WorkingState::Transfer => "transfer",
            WorkingState::Recovery => "recovery",
        })
    }
}

/// "At `time`, `node` enters `state`."
#[derive(Copy, Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Event {
    pub node:  NodeId,
    pub state: WorkingState,
    pub time:  f64,
}

impl Event {
    pub fn new(node: NodeId, state: WorkingState, time: f64) -> Self {
        Self { node, state, time }
    }
}

impl PartialEq for Event {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Event {}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.node.cmp(&other.node))
            .then(self.state.cmp(&other.state))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Min-heap of pending events keyed by `(time, node)`.
#[derive(Debug, Default)]
pub struct EventQueue {
    heap: BinaryHeap<Reverse<Event>>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self { heap: BinaryHeap::with_capacity(capacity) }
    }

    pub fn push(&mut self, event: Event) {
        self.heap.push(Reverse(event));
    }

    /// Remove and return the earliest event.
    pub fn pop(&mut self) -> Option<Event> {
        self.heap.pop().map(|Reverse(e)| e)
    }

    /// The earliest event without removing it.
    pub fn peek(&self) -> Option<&Event> {
        self.heap.peek().map(|Reverse(e)| e)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}
