//! Colour-partitioned transfer slots.

use crate::{ScheduleError, ScheduleResult};

/// Superslot arithmetic for one run.
///
/// Cheap to copy; holds no heap data.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SlotSchedule {
    transfer_time: f64,
    color_count:   u32,
}

impl SlotSchedule {
    /// `transfer_time` must be positive and finite.  A `color_count` of zero
    /// (nothing routed) is accepted but such a schedule is never queried.
    pub fn new(transfer_time: f64, color_count: u32) -> ScheduleResult<Self> {
        if !(transfer_time.is_finite() && transfer_time > 0.0) {
            return Err(ScheduleError::Slot(format!(
                "transfer_time must be positive and finite, got {transfer_time}"
            )));
        }
        Ok(Self { transfer_time, color_count })
    }

    pub fn transfer_time(&self) -> f64 {
        self.transfer_time
    }

    pub fn color_count(&self) -> u32 {
        self.color_count
    }

    /// Length of one full cycle of colour windows.
    #[inline]
    pub fn superslot(&self) -> f64 {
        self.transfer_time * self.color_count.max(1) as f64
    }

    /// Start of colour `color`'s window in cycle `k`.
    #[inline]
    pub fn slot_start(&self, k: i64, color: u32) -> f64 {
        (k as f64 * self.color_count.max(1) as f64 + color as f64) * self.transfer_time
    }

    /// Index of the cycle containing `time`.
    #[inline]
    pub fn cycle_of(&self, time: f64) -> i64 {
        (time / self.superslot()).floor() as i64
    }

    /// Transfer start for a node of `color` that would like to finish
    /// collecting at `optimal`.
    ///
    /// Takes the first slot of that colour at or after `optimal`, swaps it
    /// for the previous cycle's slot when that one is strictly closer to
    /// `optimal`, then moves forward whole cycles until the time is not
    /// before `now`.  The result is always `>= now`.
    pub fn next_transfer(&self, now: f64, optimal: f64, color: u32) -> f64 {
        let colors = self.color_count.max(1) as f64;
        let cycle = self.superslot();

        let k = ((optimal / self.transfer_time - color as f64) / colors).ceil() as i64;
        let mut slot = self.slot_start(k, color);

        let earlier = slot - cycle;
        if (slot - optimal).abs() > (earlier - optimal).abs() {
            slot = earlier;
        }
        while slot < now {
            slot += cycle;
        }
        slot
    }
}
