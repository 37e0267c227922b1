//! Per-node failure timelines.
//!
//! A timeline is a strictly increasing sequence of absolute failure
//! timestamps plus a cursor.  The simulator only ever looks at the next
//! unconsumed timestamp and advances the cursor when it injects that
//! failure, so consumption is monotonic.

use crate::{NodeId, WsnError, WsnResult};

/// Ordered failure timestamps for one node, consumed front to back.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FailureTimeline {
    stamps: Vec<f64>,
    cursor: usize,
}

impl FailureTimeline {
    /// Build a timeline for `node`, rejecting non-finite or non-increasing
    /// timestamps.
    pub fn new(node: NodeId, stamps: Vec<f64>) -> WsnResult<Self> {
        if let Some(bad) = stamps.iter().find(|t| !t.is_finite()) {
            return Err(WsnError::Timeline {
                node,
                reason: format!("timestamp {bad} is not finite"),
            });
        }
        if let Some(w) = stamps.windows(2).find(|w| w[1] <= w[0]) {
            return Err(WsnError::Timeline {
                node,
                reason: format!("timestamps must be strictly increasing ({} then {})", w[0], w[1]),
            });
        }
        Ok(Self { stamps, cursor: 0 })
    }

    /// A timeline with no failures at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The next unconsumed failure time, or `None` once exhausted.
    #[inline]
    pub fn peek(&self) -> Option<f64> {
        self.stamps.get(self.cursor).copied()
    }

    /// Consume and return the next failure time.
    #[inline]
    pub fn consume(&mut self) -> Option<f64> {
        let next = self.peek()?;
        self.cursor += 1;
        Some(next)
    }

    /// `true` once every timestamp has been consumed.
    #[inline]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.stamps.len()
    }

    /// How many failures have been consumed so far.
    pub fn consumed(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.stamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stamps.is_empty()
    }

    pub fn stamps(&self) -> &[f64] {
        &self.stamps
    }

    /// Rewind the cursor so the timeline can drive another run.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }

    /// Mean gap between consecutive failures, counting the first timestamp
    /// as the gap from time zero.  `0.0` for an empty timeline.
    pub fn mean_interval(&self) -> f64 {
        // Gaps telescope to the last timestamp.
        match self.stamps.last() {
            Some(&last) => last / self.stamps.len() as f64,
            None => 0.0,
        }
    }
}
