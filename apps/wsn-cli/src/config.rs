//! TOML batch configuration.
//!
//! Every section is optional; an empty file runs one default problem with
//! the default parameters and stage bundle.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::Deserialize;

use wsn_batch::{ParamGrid, Problem, ScatterGenerator, Variant, generate_problems, load_problem};
use wsn_core::{Distribution, ProblemId};
use wsn_schedule::RandomDeltas;
use wsn_sim::{FailureBudget, Stages, TimeLimit};

// ── Top level ─────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BatchConfig {
    pub seed:     u64,
    /// Worker threads; 0 uses every core.
    pub threads:  usize,
    pub out:      PathBuf,
    pub backend:  Backend,
    pub problems: ProblemConfig,
    pub grid:     ParamGrid,
    pub variants: Vec<VariantConfig>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            seed:     42,
            threads:  0,
            out:      PathBuf::from("results"),
            backend:  Backend::Csv,
            problems: ProblemConfig::default(),
            grid:     ParamGrid::default(),
            variants: Vec::new(),
        }
    }
}

impl BatchConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        toml::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Configured variants, or the single default bundle when none are given.
    pub fn variants(&self) -> Result<Vec<Variant>> {
        if self.variants.is_empty() {
            return Ok(vec![Variant::default()]);
        }
        self.variants.iter().map(VariantConfig::build).collect()
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    #[default]
    Csv,
    Sqlite,
}

// ── Problems ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum ProblemConfig {
    /// Randomly scattered nodes with renewal failures.
    Scatter {
        #[serde(default = "default_count")]
        count:       u32,
        #[serde(default = "default_node_count")]
        node_count:  usize,
        #[serde(default = "default_field")]
        field:       f64,
        #[serde(default = "default_failure_gap")]
        failure_gap: Distribution,
        #[serde(default = "default_horizon")]
        horizon:     f64,
    },
    /// One problem read from CSV files.
    Files { positions: PathBuf, failures: PathBuf },
}

fn default_count() -> u32 {
    1
}
fn default_node_count() -> usize {
    ScatterGenerator::default().node_count
}
fn default_field() -> f64 {
    ScatterGenerator::default().field
}
fn default_failure_gap() -> Distribution {
    ScatterGenerator::default().failure_gap
}
fn default_horizon() -> f64 {
    ScatterGenerator::default().horizon
}

impl Default for ProblemConfig {
    fn default() -> Self {
        ProblemConfig::Scatter {
            count:       default_count(),
            node_count:  default_node_count(),
            field:       default_field(),
            failure_gap: default_failure_gap(),
            horizon:     default_horizon(),
        }
    }
}

impl ProblemConfig {
    pub fn build(&self, seed: u64) -> Result<Vec<Problem>> {
        match self {
            ProblemConfig::Scatter { count, node_count, field, failure_gap, horizon } => {
                let generator = ScatterGenerator::new(*node_count, *field, *failure_gap, *horizon)?;
                Ok(generate_problems(&generator, *count, seed, "scatter"))
            }
            ProblemConfig::Files { positions, failures } => {
                Ok(vec![load_problem(ProblemId(1), positions, failures)?])
            }
        }
    }
}

// ── Variants ──────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VariantConfig {
    pub name:   String,
    /// Delta distribution; the stage default when absent.
    #[serde(default)]
    pub deltas: Option<Distribution>,
    #[serde(default)]
    pub stop:   StopConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StopConfig {
    #[default]
    TimeLimit,
    FailureBudget { max_failures: u64 },
}

impl VariantConfig {
    pub fn build(&self) -> Result<Variant> {
        if self.name.is_empty() {
            bail!("variant names must not be empty");
        }
        let mut stages = Stages::default();
        if let Some(distribution) = self.deltas {
            stages = stages.deltas(RandomDeltas::new(distribution)?);
        }
        stages = match self.stop {
            StopConfig::TimeLimit => stages.stop(TimeLimit),
            StopConfig::FailureBudget { max_failures } => stages.stop(FailureBudget { max_failures }),
        };
        Ok(Variant::new(self.name.clone(), stages))
    }
}
