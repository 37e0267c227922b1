//! `wsn-sim` — discrete-event run engine for the WSN fault simulator.
//!
//! # Node life cycle
//!
//! ```text
//!            slot of own colour              + transfer_time
//! Collection ───────────────────▶ Transfer ───────────────────▶ Collection
//!      │                              │
//!      │ failure                      │ failure
//!      ▼                              ▼
//!   Recovery ── + recovery_time ──▶ Collection      (Recovery may fail again)
//! ```
//!
//! Data moves up the routing tree: at the end of a transfer a node's buffer
//! goes to its parent, or to the sink for level-0 nodes.  A failure drops the
//! failing node's buffer and charges everyone who already spent energy on
//! the lost packets.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`builder`]  | `SimBuilder` (validation + static stages)                  |
//! | [`sim`]      | `Simulator` (event loop and transitions)                   |
//! | [`strategy`] | `StopCondition`, `TimeLimit`, `FailureBudget`, `Stages`    |
//! | [`state`]    | `Packet`, `NodeState`, `RunLedger`                         |
//! | [`report`]   | `RunSummary`, `NodeReport`, `RunReport`                    |
//! | [`observer`] | `SimObserver`, `NoopObserver`                              |
//! | [`error`]    | `SimError`, `SimResult<T>`                                 |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use wsn_core::SimParams;
//! use wsn_sim::{NoopObserver, SimBuilder};
//!
//! let mut sim = SimBuilder::new(SimParams::default(), positions, failures)
//!     .seed(42)
//!     .build()?;
//! let report = sim.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod error;
pub mod observer;
pub mod report;
pub mod sim;
pub mod state;
pub mod strategy;

#[cfg(test)]
mod tests;

pub use builder::SimBuilder;
pub use error::{SimError, SimResult};
pub use observer::{NoopObserver, SimObserver};
pub use report::{NodeReport, RunReport, RunSummary};
pub use sim::Simulator;
pub use state::{NodeState, Packet, RunLedger};
pub use strategy::{FailureBudget, Stages, StopCondition, TimeLimit};
