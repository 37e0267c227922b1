//! `wsn-topology` — node arena, routing tree, and interference colouring.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                     |
//! |--------------|--------------------------------------------------------------|
//! | [`node`]     | `Parent`, `Route`, `SensorNode`                              |
//! | [`network`]  | `SensorNetwork` (flat arena indexed by `NodeId`)             |
//! | [`topology`] | `TopologyBuilder` trait, `DiskTopology` (level-by-level BFS) |
//! | [`coloring`] | `InterferenceColorer` trait, `WelshPowellColorer`            |
//! | [`error`]    | `TopologyError`, `TopologyResult<T>`                         |
//!
//! Both strategies are pure: they read the arena and return new per-node
//! assignments, which [`SensorNetwork`] validates and stores.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod coloring;
pub mod error;
pub mod network;
pub mod node;
pub mod topology;


pub use coloring::{InterferenceColorer, WelshPowellColorer};
pub use error::{TopologyError, TopologyResult};
pub use network::{Ancestors, SensorNetwork};
pub use node::{Parent, Route, SensorNode};
pub use topology::{DiskTopology, TopologyBuilder};
