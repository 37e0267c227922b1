//! Scalar sampling distributions used for deltas, positions and failure gaps.
//!
//! Uniform distributions are parameterised by mean and standard deviation
//! rather than bounds, so the half-width is `std_dev * sqrt(3)`.  A uniform on
//! `[0, 300]` is therefore `Uniform { mean: 150, std_dev: 300 / sqrt(12) }`.

use rand::distributions::{Distribution as _, Uniform};
use rand_distr::Exp;

use crate::{SimRng, WsnError, WsnResult};

/// A univariate distribution over `f64`.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Distribution {
    /// Uniform with the given mean and standard deviation.
    Uniform { mean: f64, std_dev: f64 },
    /// Exponential with the given mean (rate = 1 / mean).
    Exponential { mean: f64 },
    /// Always returns the value.
    Constant { value: f64 },
}

impl Distribution {
    /// Uniform on `[low, high]`.
    pub fn uniform_between(low: f64, high: f64) -> Self {
        Distribution::Uniform {
            mean:    (low + high) * 0.5,
            std_dev: (high - low) / 12f64.sqrt(),
        }
    }

    /// Check that the parameters describe a samplable distribution.
    pub fn validate(&self) -> WsnResult<()> {
        match *self {
            Distribution::Uniform { mean, std_dev } => {
                if !mean.is_finite() || !std_dev.is_finite() || std_dev < 0.0 {
                    return Err(WsnError::Config(format!(
                        "uniform distribution needs finite mean and std_dev >= 0, got mean={mean} std_dev={std_dev}"
                    )));
                }
                let half = std_dev * 3f64.sqrt();
                let (low, high) = (mean - half, mean + half);
                if !(low.is_finite() && high.is_finite() && (high - low).is_finite()) {
                    return Err(WsnError::Config(format!(
                        "uniform distribution bounds overflow, got mean={mean} std_dev={std_dev}"
                    )));
                }
            }
            Distribution::Exponential { mean } => {
                if !(mean.is_finite() && mean > 0.0) {
                    return Err(WsnError::Config(format!(
                        "exponential distribution needs a positive finite mean, got {mean}"
                    )));
                }
            }
            Distribution::Constant { value } => {
                if !value.is_finite() {
                    return Err(WsnError::Config(format!(
                        "constant distribution needs a finite value, got {value}"
                    )));
                }
            }
        }
        Ok(())
    }

    /// The distribution mean.
    pub fn mean(&self) -> f64 {
        match *self {
            Distribution::Uniform { mean, .. } => mean,
            Distribution::Exponential { mean } => mean,
            Distribution::Constant { value } => value,
        }
    }

    /// Draw one value.
    ///
    /// Call [`validate`](Self::validate) first; invalid parameters fall back
    /// to the mean rather than panicking.
    pub fn sample(&self, rng: &mut SimRng) -> f64 {
        match *self {
            Distribution::Uniform { mean, std_dev } => {
                let half = std_dev * 3f64.sqrt();
                if half <= 0.0 {
                    return mean;
                }
                Uniform::new_inclusive(mean - half, mean + half).sample(rng.inner())
            }
            Distribution::Exponential { mean } => match Exp::new(1.0 / mean) {
                Ok(exp) => exp.sample(rng.inner()),
                Err(_) => mean,
            },
            Distribution::Constant { value } => value,
        }
    }
}
