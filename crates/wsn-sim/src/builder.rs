//! Fluent builder for constructing a [`Simulator`].

use tracing::debug;

use wsn_core::{FailureTimeline, NodeId, Position, SimParams, SimRng};
use wsn_schedule::SlotSchedule;
use wsn_topology::SensorNetwork;

use crate::{NodeState, RunLedger, SimError, SimResult, Simulator, Stages};

/// Fluent builder for [`Simulator`].
///
/// # Required inputs
///
/// - [`SimParams`]: run times, energy rates and radio ranges
/// - node positions, ordered by id
/// - one failure timeline per node (strictly increasing, non-negative)
///
/// # Optional inputs (have defaults)
///
/// | Method        | Default              |
/// |---------------|----------------------|
/// | `.stages(s)`  | `Stages::default()`  |
/// | `.seed(n)`    | `0`                  |
///
/// # Example
///
/// ```rust,ignore
/// let mut sim = SimBuilder::new(params, positions, failures)
///     .seed(7)
///     .build()?;
/// let report = sim.run(&mut NoopObserver)?;
/// ```
pub struct SimBuilder {
    params:    SimParams,
    positions: Vec<Position>,
    failures:  Vec<Vec<f64>>,
    stages:    Stages,
    seed:      u64,
}

impl SimBuilder {
    pub fn new(params: SimParams, positions: Vec<Position>, failures: Vec<Vec<f64>>) -> Self {
        Self {
            params,
            positions,
            failures,
            stages: Stages::default(),
            seed:   0,
        }
    }

    /// Replace the topology / colouring / delta / stop strategies.
    pub fn stages(mut self, stages: Stages) -> Self {
        self.stages = stages;
        self
    }

    /// Seed for the delta planner.
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate inputs, run the topology, colouring and delta stages, and
    /// return a ready-to-run [`Simulator`].
    pub fn build(self) -> SimResult<Simulator> {
        self.params.validate()?;

        let n = self.positions.len();
        if self.failures.len() != n {
            return Err(SimError::LengthMismatch {
                expected: n,
                got:      self.failures.len(),
                what:     "failure timelines",
            });
        }
        if let Some(bad) = self.positions.iter().find(|p| !(p.x.is_finite() && p.y.is_finite())) {
            return Err(SimError::Config(format!("node position {bad} is not finite")));
        }

        let mut timelines = Vec::with_capacity(n);
        for (i, stamps) in self.failures.into_iter().enumerate() {
            let id = NodeId(i as u32);
            if let Some(&first) = stamps.first() {
                if first < 0.0 {
                    return Err(SimError::Config(format!(
                        "{id} has a failure at negative time {first}"
                    )));
                }
            }
            timelines.push(FailureTimeline::new(id, stamps)?);
        }

        // ── Static stages ─────────────────────────────────────────────────
        let mut network = SensorNetwork::from_positions(self.positions);

        let routes = self.stages.topology.construct(&network, &self.params);
        network.apply_routes(routes)?;

        let colors = self.stages.colorer.color(&network, &self.params);
        network.apply_colors(colors)?;

        let mut rng = SimRng::new(self.seed);
        let deltas = self.stages.deltas.plan(&network, &mut rng);
        network.apply_deltas(deltas)?;

        let schedule = SlotSchedule::new(self.params.transfer_time, network.color_count())?;

        debug!(
            nodes  = n,
            routed = network.routed().count(),
            colors = schedule.color_count(),
            "run prepared"
        );

        // ── Per-run state ─────────────────────────────────────────────────
        let states = network
            .nodes()
            .iter()
            .zip(timelines)
            .map(|(node, timeline)| NodeState::new(node, timeline))
            .collect();

        Ok(Simulator::new(
            self.params,
            network,
            RunLedger::new(states),
            schedule,
            self.stages,
        ))
    }
}
