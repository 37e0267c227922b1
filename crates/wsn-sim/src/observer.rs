//! Simulation observer trait for progress reporting and data collection.

use wsn_core::NodeId;
use wsn_schedule::Event;

use crate::{RunLedger, RunSummary};

/// Callbacks invoked by [`Simulator::run`][crate::Simulator::run].
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: recovery counter
///
/// ```rust,ignore
/// struct Recoveries(Vec<NodeId>);
///
/// impl SimObserver for Recoveries {
///     fn on_failure(&mut self, node: NodeId, _at: f64) {
///         self.0.push(node);
///     }
/// }
/// ```
pub trait SimObserver {
    /// Called after an event's transition has been applied.
    fn on_event(&mut self, _event: &Event, _ledger: &RunLedger) {}

    /// Called when a node enters Recovery.
    fn on_failure(&mut self, _node: NodeId, _at: f64) {}

    /// Called the first time a node's failure timeline runs dry.
    fn on_timeline_exhausted(&mut self, _node: NodeId, _now: f64) {}

    /// Called once when the run ends.
    fn on_sim_end(&mut self, _summary: &RunSummary) {}
}

/// A [`SimObserver`] that does nothing.
pub struct NoopObserver;

impl SimObserver for NoopObserver {}
