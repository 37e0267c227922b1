//! Strongly typed, zero-cost identifier wrappers.
//!
//! Node ids are dense (`0..n`) and never reused within a run, so the inner
//! integer doubles as the index into the node arena.  Prefer `.index()` over
//! `id.0 as usize` at call sites.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a sensor node in the per-run node arena.
    pub struct NodeId(u32);
}

typed_id! {
    /// Identifier of one simulation run (one parameter set on one problem).
    pub struct RunId(u32);
}

typed_id! {
    /// Identifier of a problem instance (node layout + failure timelines).
    pub struct ProblemId(u32);
}
