//! `DeltaPlanner` — hook assigning each node its preferred collection
//! duration.
//!
//! The delta is how long a node would ideally keep collecting before it
//! transfers.  The simulator reconciles it against the shared slot schedule
//! every time the node leaves Collection.

use wsn_core::{Distribution, SimRng, WsnResult};
use wsn_topology::SensorNetwork;

// ── Trait ─────────────────────────────────────────────────────────────────────

/// Pluggable delta assignment.
///
/// # Contract
///
/// - Return exactly one value per node, indexed by `NodeId`.
/// - Must be deterministic given the same `rng` state.
/// - Implementations must be `Send + Sync` (shared across batch workers).
pub trait DeltaPlanner: Send + Sync {
    fn plan(&self, network: &SensorNetwork, rng: &mut SimRng) -> Vec<f64>;
}

// ── Random deltas ─────────────────────────────────────────────────────────────

/// Independent draws from one distribution, in ascending id order.
///
/// Negative draws (possible with a wide uniform) are clamped to zero so a
/// node never asks to transfer before it starts collecting.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomDeltas {
    pub distribution: Distribution,
}

impl RandomDeltas {
    pub fn new(distribution: Distribution) -> WsnResult<Self> {
        distribution.validate()?;
        Ok(Self { distribution })
    }
}

impl Default for RandomDeltas {
    /// Uniform around 1000 s with a standard deviation of 1 s.
    fn default() -> Self {
        Self {
            distribution: Distribution::Uniform { mean: 1000.0, std_dev: 1.0 },
        }
    }
}

impl DeltaPlanner for RandomDeltas {
    fn plan(&self, network: &SensorNetwork, rng: &mut SimRng) -> Vec<f64> {
        (0..network.len())
            .map(|_| self.distribution.sample(rng).max(0.0))
            .collect()
    }
}
