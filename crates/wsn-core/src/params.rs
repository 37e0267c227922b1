//! Per-run parameter record.
//!
//! All times are simulated seconds, all ranges share the unit of
//! [`Position`](crate::Position).  A `SimParams` is immutable for the whole
//! run; validate it with [`SimParams::validate`] before building a simulator.

use crate::{WsnError, WsnResult};

/// Parameters of a single simulation run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SimParams {
    /// Simulated duration after which the default stop predicate fires.
    pub total_simulation_time: f64,

    /// Length of one transfer slot.  Also the slot width of the colour-
    /// partitioned schedule.
    pub transfer_time: f64,

    /// Time a failed node spends recovering before it collects again.
    pub recovery_time: f64,

    /// Energy per second of sensing (collection).
    pub energy_rate_sensing: f64,

    /// Energy per second of transfer per squared unit of link distance.
    pub energy_rate_transfer: f64,

    /// Disk radius within which a node can reach a parent or the sink.
    pub transmission_range: f64,

    /// Disk radius within which two transmitters interfere.
    pub interference_range: f64,
}

impl Default for SimParams {
    /// One 90-day run with 60 s slots and the reference radio constants.
    fn default() -> Self {
        Self {
            total_simulation_time: 3_600.0 * 24.0 * 90.0,
            transfer_time:         60.0,
            recovery_time:         60.0,
            energy_rate_sensing:   17.4 * 2.0 * 0.001 * 0.125,
            energy_rate_transfer:  17.4 * 2.0 * 0.001,
            transmission_range:    100.0,
            interference_range:    300.0,
        }
    }
}

impl SimParams {
    /// Reject malformed values before a run starts.
    ///
    /// Times must be finite and non-negative; `transfer_time` must be
    /// strictly positive because it is the slot width.  Energy rates and
    /// ranges must be finite and non-negative.
    pub fn validate(&self) -> WsnResult<()> {
        non_negative("total_simulation_time", self.total_simulation_time)?;
        non_negative("recovery_time", self.recovery_time)?;
        non_negative("energy_rate_sensing", self.energy_rate_sensing)?;
        non_negative("energy_rate_transfer", self.energy_rate_transfer)?;
        non_negative("transmission_range", self.transmission_range)?;
        non_negative("interference_range", self.interference_range)?;

        if !(self.transfer_time.is_finite() && self.transfer_time > 0.0) {
            return Err(WsnError::Config(format!(
                "transfer_time must be a positive finite number, got {}",
                self.transfer_time
            )));
        }
        Ok(())
    }
}

fn non_negative(name: &str, value: f64) -> WsnResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(WsnError::Config(format!(
            "{name} must be a non-negative finite number, got {value}"
        )))
    }
}
