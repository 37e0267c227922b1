//! Static per-node data.

use wsn_core::{NodeId, Position};

/// Where a node forwards its data.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Parent {
    /// Not yet decided.  Only observable while a topology is being built.
    #[default]
    Unassigned,
    /// Direct neighbour of the base station.
    Sink,
    /// Unreachable within transmission range.  The node exists but never
    /// takes part in events.
    NoRoute,
    /// Relays through another node.
    Node(NodeId),
}

impl Parent {
    /// `true` for nodes that have a path to the sink.
    #[inline]
    pub fn is_routed(self) -> bool {
        matches!(self, Parent::Sink | Parent::Node(_))
    }

    /// The relaying node, if any.
    #[inline]
    pub fn node(self) -> Option<NodeId> {
        match self {
            Parent::Node(id) => Some(id),
            _ => None,
        }
    }

    /// Integer encoding used by tabular outputs: the parent's id, or
    /// `-1` (sink), `-2` (no route), `-3` (unassigned).
    pub fn code(self) -> i64 {
        match self {
            Parent::Node(id) => id.0 as i64,
            Parent::Sink => -1,
            Parent::NoRoute => -2,
            Parent::Unassigned => -3,
        }
    }
}

impl std::fmt::Display for Parent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Parent::Unassigned => f.write_str("unassigned"),
            Parent::Sink => f.write_str("sink"),
            Parent::NoRoute => f.write_str("no-route"),
            Parent::Node(id) => write!(f, "{id}"),
        }
    }
}

/// One node's routing decision as produced by a
/// [`TopologyBuilder`](crate::TopologyBuilder).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    pub parent: Parent,
    /// Tree depth; `Some(0)` for sink neighbours, `None` when unrouted.
    pub level:  Option<u32>,
}

impl Route {
    pub const NO_ROUTE: Route = Route { parent: Parent::NoRoute, level: None };

    pub fn sink() -> Self {
        Route { parent: Parent::Sink, level: Some(0) }
    }

    pub fn via(parent: NodeId, level: u32) -> Self {
        Route { parent: Parent::Node(parent), level: Some(level) }
    }
}

/// A sensor node's static, write-once-per-run attributes.
///
/// Everything except `id` and `position` is filled in by the topology,
/// colouring and delta stages and then read-only while events run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorNode {
    pub id:               NodeId,
    pub position:         Position,
    pub parent:           Parent,
    pub level:            Option<u32>,
    pub child_count:      u32,
    pub descendant_count: u32,
    /// Transmission slot colour; `None` for unrouted nodes.
    pub color:            Option<u32>,
    /// Preferred collection duration before transferring.
    pub delta_opt:        f64,
}

impl SensorNode {
    pub fn new(id: NodeId, position: Position) -> Self {
        Self {
            id,
            position,
            parent:           Parent::Unassigned,
            level:            None,
            child_count:      0,
            descendant_count: 0,
            color:            None,
            delta_opt:        0.0,
        }
    }

    #[inline]
    pub fn is_routed(&self) -> bool {
        self.parent.is_routed()
    }
}
