//! Planar node positions.
//!
//! Positions live in an arbitrary metric plane (metres in practice).  The
//! sink (base station) is fixed at the origin and is not itself a node.

/// A point in the simulation plane.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// Location of the sink.
pub const SINK: Position = Position { x: 0.0, y: 0.0 };

impl Position {
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance.
    #[inline]
    pub fn distance(self, other: Position) -> f64 {
        self.distance_sq(other).sqrt()
    }

    /// Squared Euclidean distance.  Transfer energy scales with this value.
    #[inline]
    pub fn distance_sq(self, other: Position) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Distance to the sink at the origin.
    #[inline]
    pub fn distance_to_sink(self) -> f64 {
        self.distance(SINK)
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}
