//! Mutable per-run state.
//!
//! Everything the event loop changes lives in one [`RunLedger`], threaded
//! explicitly through every transition.  The static [`SensorNetwork`]
//! (wsn_topology) stays read-only for the whole run.
//!
//! [`SensorNetwork`]: wsn_topology::SensorNetwork

use wsn_core::{FailureTimeline, NodeId};
use wsn_topology::{Parent, SensorNode};

/// A unit of sensed data travelling towards the sink.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Packet {
    /// Node that sensed the data.
    pub origin:  NodeId,
    /// Time collection of this packet started.
    pub created: f64,
    /// Collected volume (seconds of sensing).
    pub size:    f64,
}

impl Packet {
    pub fn open(origin: NodeId, created: f64) -> Self {
        Self { origin, created, size: 0.0 }
    }
}

/// Per-run mutable state of one node.
#[derive(Clone, Debug, Default)]
pub struct NodeState {
    /// Copy of the static parent.  Kept separate so a rerouting strategy can
    /// change it mid-run without touching the arena.
    pub current_parent: Parent,
    /// Copy of the static colour, for the same reason.
    pub current_color:  Option<u32>,

    /// Buffered data volume awaiting transfer.
    pub current_data: f64,
    /// Closed packets awaiting transfer, own and relayed.
    pub packets:      Vec<Packet>,
    /// Packet currently being collected, if any.
    pub open_packet:  Option<Packet>,

    pub collection_time:         f64,
    pub wasted_time:             f64,
    pub energy_consumed:         f64,
    pub energy_wasted:           f64,
    /// Volume of this node's own data that reached the sink.
    pub total_data_sent:         f64,
    pub sent_packet_total_delay: f64,
    pub sent_packet_count:       u64,
    /// Recovery transitions applied to this node.
    pub failures:                u64,

    pub timeline:           FailureTimeline,
    /// Set once a failure lookup found the timeline empty.
    pub timeline_exhausted: bool,
}

impl NodeState {
    pub fn new(node: &SensorNode, timeline: FailureTimeline) -> Self {
        Self {
            current_parent: node.parent,
            current_color: node.color,
            timeline,
            ..Self::default()
        }
    }

    /// Start collecting a fresh packet at `now`.
    pub fn open_packet(&mut self, id: NodeId, now: f64) {
        self.open_packet = Some(Packet::open(id, now));
    }

    /// Close the open packet at `now` and queue it for transfer.
    pub fn close_packet(&mut self, now: f64) {
        if let Some(mut p) = self.open_packet.take() {
            p.size += now - p.created;
            self.packets.push(p);
        }
    }

    /// Drop everything buffered.
    pub fn clear_buffer(&mut self) {
        self.current_data = 0.0;
        self.packets.clear();
        self.open_packet = None;
    }
}

/// The single mutable accumulator of a run.
#[derive(Clone, Debug, Default)]
pub struct RunLedger {
    /// Time of the most recently popped event.
    pub now:              f64,
    pub failure_count:    u64,
    /// Volume that reached the sink.
    pub delivered_volume: f64,
    pub events_applied:   u64,
    nodes:                Vec<NodeState>,
}

impl RunLedger {
    pub fn new(nodes: Vec<NodeState>) -> Self {
        Self { nodes, ..Self::default() }
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &NodeState {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut NodeState {
        &mut self.nodes[id.index()]
    }

    pub fn nodes(&self) -> &[NodeState] {
        &self.nodes
    }
}
