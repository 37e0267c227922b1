//! `wsn-schedule` — preferred collection durations, transfer slots, and the
//! event queue.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                 |
//! |-----------|----------------------------------------------------------|
//! | [`delta`] | `DeltaPlanner` trait, `RandomDeltas`                     |
//! | [`slot`]  | `SlotSchedule` (colour-partitioned superslot arithmetic) |
//! | [`event`] | `WorkingState`, `Event`, `EventQueue` (min-heap)         |
//! | [`error`] | `ScheduleError`, `ScheduleResult<T>`                     |
//!
//! # Slot model (summary)
//!
//! Time is cut into repeating superslots of `transfer_time * color_count`.
//! Colour `c` owns the window starting at `c * transfer_time` inside every
//! superslot:
//!
//! ```text
//! slot(k, c) = (k * color_count + c) * transfer_time
//! ```
//!
//! A node that wants to finish collecting at `now + delta` transfers in the
//! slot of its colour nearest that moment, but never before `now`.

pub mod delta;
pub mod error;
pub mod event;
pub mod slot;


pub use delta::{DeltaPlanner, RandomDeltas};
pub use error::{ScheduleError, ScheduleResult};
pub use event::{Event, EventQueue, WorkingState};
pub use slot::SlotSchedule;
