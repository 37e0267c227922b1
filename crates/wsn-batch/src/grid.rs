//! Cartesian parameter grids.

use serde::{Deserialize, Serialize};

use wsn_core::SimParams;

use crate::{BatchError, BatchResult};

/// One list of candidate values per [`SimParams`] field.
///
/// Expansion is the full cross product.  Missing axes in a config file fall
/// back to the single default value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ParamGrid {
    pub total_simulation_time: Vec<f64>,
    pub transfer_time:         Vec<f64>,
    pub recovery_time:         Vec<f64>,
    pub energy_rate_sensing:   Vec<f64>,
    pub energy_rate_transfer:  Vec<f64>,
    pub transmission_range:    Vec<f64>,
    pub interference_range:    Vec<f64>,
}

impl Default for ParamGrid {
    fn default() -> Self {
        Self::from_params(&SimParams::default())
    }
}

impl ParamGrid {
    /// A grid holding exactly `params`.
    pub fn from_params(params: &SimParams) -> Self {
        Self {
            total_simulation_time: vec![params.total_simulation_time],
            transfer_time:         vec![params.transfer_time],
            recovery_time:         vec![params.recovery_time],
            energy_rate_sensing:   vec![params.energy_rate_sensing],
            energy_rate_transfer:  vec![params.energy_rate_transfer],
            transmission_range:    vec![params.transmission_range],
            interference_range:    vec![params.interference_range],
        }
    }

    fn axes(&self) -> [(&'static str, &[f64]); 7] {
        [
            ("total_simulation_time", self.total_simulation_time.as_slice()),
            ("transfer_time", self.transfer_time.as_slice()),
            ("recovery_time", self.recovery_time.as_slice()),
            ("energy_rate_sensing", self.energy_rate_sensing.as_slice()),
            ("energy_rate_transfer", self.energy_rate_transfer.as_slice()),
            ("transmission_range", self.transmission_range.as_slice()),
            ("interference_range", self.interference_range.as_slice()),
        ]
    }

    /// Number of parameter sets in the product.
    pub fn len(&self) -> usize {
        self.axes().iter().map(|(_, values)| values.len()).product()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Every axis must be non-empty and every combination must validate.
    pub fn validate(&self) -> BatchResult<()> {
        if let Some((name, _)) = self.axes().iter().find(|(_, values)| values.is_empty()) {
            return Err(BatchError::Config(format!("parameter axis `{name}` has no values")));
        }
        for params in self.expand() {
            params.validate()?;
        }
        Ok(())
    }

    /// Expand into parameter sets.
    ///
    /// Nesting order, outermost first: recovery time, transfer time, total
    /// time, sensing rate, transfer rate, transmission range, interference
    /// range.
    pub fn expand(&self) -> Vec<SimParams> {
        let mut out = Vec::with_capacity(self.len());
        for &recovery_time in &self.recovery_time {
            for &transfer_time in &self.transfer_time {
                for &total_simulation_time in &self.total_simulation_time {
                    for &energy_rate_sensing in &self.energy_rate_sensing {
                        for &energy_rate_transfer in &self.energy_rate_transfer {
                            for &transmission_range in &self.transmission_range {
                                for &interference_range in &self.interference_range {
                                    out.push(SimParams {
                                        total_simulation_time,
                                        transfer_time,
                                        recovery_time,
                                        energy_rate_sensing,
                                        energy_rate_transfer,
                                        transmission_range,
                                        interference_range,
                                    });
                                }
                            }
                        }
                    }
                }
            }
        }
        out
    }
}
