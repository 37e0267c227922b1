//! Problem instances and their generators.
//!
//! A problem is one node layout plus one failure timeline per node.  Every
//! run of a batch gets its own copy of the problem's inputs, so problems are
//! read-only once generated.

use wsn_core::{Distribution, Position, ProblemId, SimRng};
use wsn_output::ProblemRow;

use crate::{BatchError, BatchResult};

/// Seed salt separating problem streams from run streams.
const PROBLEM_SALT: u64 = 0xa076_1d64_78bd_642f;

/// Node layout and failure timelines shared by every run of one problem.
#[derive(Clone, Debug, PartialEq)]
pub struct Problem {
    pub id:          ProblemId,
    pub description: String,
    /// Node positions, indexed by `NodeId`.
    pub positions:   Vec<Position>,
    /// Absolute failure times per node, indexed by `NodeId`.
    pub failures:    Vec<Vec<f64>>,
}

impl Problem {
    pub fn new(
        id:          ProblemId,
        description: impl Into<String>,
        positions:   Vec<Position>,
        failures:    Vec<Vec<f64>>,
    ) -> BatchResult<Self> {
        if positions.len() != failures.len() {
            return Err(BatchError::Config(format!(
                "problem {id} has {} positions but {} failure timelines",
                positions.len(),
                failures.len()
            )));
        }
        Ok(Self { id, description: description.into(), positions, failures })
    }

    pub fn node_count(&self) -> usize {
        self.positions.len()
    }

    pub fn row(&self) -> ProblemRow {
        ProblemRow::new(self.id, self.description.clone(), self.node_count())
    }
}

// ── Generator trait ───────────────────────────────────────────────────────────

/// Pluggable source of problem instances.
///
/// # Contract
///
/// - `failures` returns one strictly increasing, non-negative timeline per
///   position.
/// - Output must be deterministic given the same `rng` state.
pub trait ProblemGenerator: Send + Sync {
    fn positions(&self, rng: &mut SimRng) -> Vec<Position>;

    fn failures(&self, positions: &[Position], rng: &mut SimRng) -> Vec<Vec<f64>>;

    fn generate(&self, id: ProblemId, description: &str, rng: &mut SimRng) -> Problem {
        let positions = self.positions(rng);
        let failures = self.failures(&positions, rng);
        Problem { id, description: description.to_owned(), positions, failures }
    }
}

/// Generate `count` problems with ids `1..=count`, each from its own RNG
/// stream of `seed`.
pub fn generate_problems(
    generator:   &dyn ProblemGenerator,
    count:       u32,
    seed:        u64,
    description: &str,
) -> Vec<Problem> {
    (1..=count)
        .map(|i| {
            let mut rng = SimRng::for_stream(seed ^ PROBLEM_SALT, i as u64);
            generator.generate(ProblemId(i), description, &mut rng)
        })
        .collect()
}

// ── Scatter generator ─────────────────────────────────────────────────────────

/// Nodes scattered over a square field centred on the sink, with renewal
/// failure processes.
///
/// Each coordinate is uniform on `[0, field]` with a random sign, so nodes
/// cover `[-field, field]²`.  Each node's failures are the partial sums of
/// independent `failure_gap` draws, continued until one passes `horizon`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct ScatterGenerator {
    pub node_count:  usize,
    pub field:       f64,
    pub failure_gap: Distribution,
    pub horizon:     f64,
}

impl Default for ScatterGenerator {
    /// 100 nodes on a 300 m field, daily mean failures over 90 days.
    fn default() -> Self {
        Self {
            node_count:  100,
            field:       300.0,
            failure_gap: Distribution::Exponential { mean: 86_400.0 },
            horizon:     3_600.0 * 24.0 * 90.0,
        }
    }
}

impl ScatterGenerator {
    pub fn new(
        node_count:  usize,
        field:       f64,
        failure_gap: Distribution,
        horizon:     f64,
    ) -> BatchResult<Self> {
        let generator = Self { node_count, field, failure_gap, horizon };
        generator.validate()?;
        Ok(generator)
    }

    pub fn validate(&self) -> BatchResult<()> {
        if !(self.field.is_finite() && self.field >= 0.0) {
            return Err(BatchError::Config(format!("field must be finite and >= 0, got {}", self.field)));
        }
        if !(self.horizon.is_finite() && self.horizon >= 0.0) {
            return Err(BatchError::Config(format!(
                "failure horizon must be finite and >= 0, got {}",
                self.horizon
            )));
        }
        self.failure_gap.validate()?;
        if self.failure_gap.mean() <= 0.0 {
            return Err(BatchError::Config(format!(
                "failure gap must have a positive mean, got {}",
                self.failure_gap.mean()
            )));
        }
        Ok(())
    }
}

impl ProblemGenerator for ScatterGenerator {
    fn positions(&self, rng: &mut SimRng) -> Vec<Position> {
        let axis = Distribution::uniform_between(0.0, self.field);
        let coordinate = |rng: &mut SimRng| {
            let magnitude = axis.sample(rng);
            if rng.gen_bool(0.5) { -magnitude } else { magnitude }
        };
        (0..self.node_count)
            .map(|_| {
                let x = coordinate(rng);
                let y = coordinate(rng);
                Position::new(x, y)
            })
            .collect()
    }

    fn failures(&self, positions: &[Position], rng: &mut SimRng) -> Vec<Vec<f64>> {
        positions
            .iter()
            .map(|_| {
                let mut stamps = Vec::new();
                let mut now = 0.0;
                while now < self.horizon {
                    let next = now + self.failure_gap.sample(rng);
                    // Zero or negative gaps would break strict ordering.
                    if next > now {
                        stamps.push(next);
                        now = next;
                    }
                }
                stamps
            })
            .collect()
    }
}
