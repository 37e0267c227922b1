//! Pluggable run stages.
//!
//! A run is assembled from four strategies: routing-tree construction,
//! slot colouring, delta assignment, and the stop predicate.  The first
//! three run once inside [`SimBuilder::build`](crate::SimBuilder::build);
//! the stop predicate is consulted for every popped event.  None of them
//! touch the event core, so swapping one never requires changes to
//! [`Simulator`](crate::Simulator).

use std::sync::Arc;

use wsn_core::SimParams;
use wsn_schedule::{DeltaPlanner, RandomDeltas};
use wsn_topology::{DiskTopology, InterferenceColorer, TopologyBuilder, WelshPowellColorer};

use crate::RunLedger;

// ── Stop predicate ────────────────────────────────────────────────────────────

/// Decides when a run ends.
///
/// Called after the clock has moved to the popped event's time and before
/// that event is applied.  Returning `true` ends the run with the event
/// unapplied.
pub trait StopCondition: Send + Sync {
    fn should_stop(&self, now: f64, ledger: &RunLedger, params: &SimParams) -> bool;
}

/// Stop once the clock reaches `total_simulation_time`.
#[derive(Copy, Clone, Debug, Default)]
pub struct TimeLimit;

impl StopCondition for TimeLimit {
    fn should_stop(&self, now: f64, _ledger: &RunLedger, params: &SimParams) -> bool {
        now >= params.total_simulation_time
    }
}

/// Stop at the time limit or once `max_failures` recoveries have happened,
/// whichever comes first.
#[derive(Copy, Clone, Debug)]
pub struct FailureBudget {
    pub max_failures: u64,
}

impl StopCondition for FailureBudget {
    fn should_stop(&self, now: f64, ledger: &RunLedger, params: &SimParams) -> bool {
        ledger.failure_count >= self.max_failures || TimeLimit.should_stop(now, ledger, params)
    }
}

// ── Stage bundle ──────────────────────────────────────────────────────────────

/// The strategies one run is built from.
///
/// Cloning is cheap (four `Arc` bumps), so one bundle can be shared by every
/// job of a batch.
#[derive(Clone)]
pub struct Stages {
    pub topology: Arc<dyn TopologyBuilder>,
    pub colorer:  Arc<dyn InterferenceColorer>,
    pub deltas:   Arc<dyn DeltaPlanner>,
    pub stop:     Arc<dyn StopCondition>,
}

impl Default for Stages {
    /// Disk BFS tree, Welsh–Powell colouring, uniform deltas around 1000 s,
    /// and the plain time limit.
    fn default() -> Self {
        Self {
            topology: Arc::new(DiskTopology),
            colorer:  Arc::new(WelshPowellColorer),
            deltas:   Arc::new(RandomDeltas::default()),
            stop:     Arc::new(TimeLimit),
        }
    }
}

impl Stages {
    pub fn topology(mut self, topology: impl TopologyBuilder + 'static) -> Self {
        self.topology = Arc::new(topology);
        self
    }

    pub fn colorer(mut self, colorer: impl InterferenceColorer + 'static) -> Self {
        self.colorer = Arc::new(colorer);
        self
    }

    pub fn deltas(mut self, deltas: impl DeltaPlanner + 'static) -> Self {
        self.deltas = Arc::new(deltas);
        self
    }

    pub fn stop(mut self, stop: impl StopCondition + 'static) -> Self {
        self.stop = Arc::new(stop);
        self
    }
}

impl std::fmt::Debug for Stages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Stages").finish_non_exhaustive()
    }
}
