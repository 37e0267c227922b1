//! `wsn-core` — foundational types for the WSN fault simulator.
//!
//! This crate is a dependency of every other `wsn-*` crate.  It has no
//! `wsn-*` dependencies and few external ones (`rand`, `rand_distr`,
//! `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module           | Contents                                                 |
//! |------------------|----------------------------------------------------------|
//! | [`ids`]          | `NodeId`, `RunId`, `ProblemId`                           |
//! | [`geo`]          | `Position`, Euclidean distance, the sink location        |
//! | [`params`]       | `SimParams` (per-run parameter record) and validation    |
//! | [`distribution`] | `Distribution` (uniform / exponential / constant)        |
//! | [`failure`]      | `FailureTimeline` (ordered timestamps + cursor)          |
//! | [`rng`]          | `SimRng`, seed mixing                                    |
//! | [`error`]        | `WsnError`, `WsnResult`                                  |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public value types.  |

pub mod distribution;
pub mod error;
pub mod failure;
pub mod geo;
pub mod ids;
pub mod params;
pub mod rng;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use distribution::Distribution;
pub use error::{WsnError, WsnResult};
pub use failure::FailureTimeline;
pub use geo::{Position, SINK};
pub use ids::{NodeId, ProblemId, RunId};
pub use params::SimParams;
pub use rng::{SimRng, mix_seed};
