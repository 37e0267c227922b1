//! Results of a finished run.

use wsn_core::{NodeId, Position};
use wsn_topology::{Parent, SensorNode};

use crate::NodeState;

/// Run-level result record.
#[derive(Copy, Clone, Debug, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// Clock value when the run ended.
    pub actual_total_duration: f64,
    pub final_failure_count:   u64,
    pub delivered_volume:      f64,
    pub events_applied:        u64,
}

/// Per-node result record: static attributes plus accumulated counters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeReport {
    pub id:                      NodeId,
    pub position:                Position,
    pub parent:                  Parent,
    pub level:                   Option<u32>,
    pub child_count:             u32,
    pub descendant_count:        u32,
    pub color:                   Option<u32>,
    pub delta_opt:               f64,
    pub collection_time:         f64,
    pub wasted_time:             f64,
    pub total_data_sent:         f64,
    pub energy_consumed:         f64,
    pub energy_wasted:           f64,
    pub sent_packet_total_delay: f64,
    pub sent_packet_count:       u64,
    pub failure_count:           u64,
    /// Mean gap of the node's supplied failure timeline.
    pub failure_mean_interval:   f64,
    pub timeline_exhausted:      bool,
}

impl NodeReport {
    pub(crate) fn new(node: &SensorNode, state: &NodeState) -> Self {
        Self {
            id:                      node.id,
            position:                node.position,
            parent:                  node.parent,
            level:                   node.level,
            child_count:             node.child_count,
            descendant_count:        node.descendant_count,
            color:                   node.color,
            delta_opt:               node.delta_opt,
            collection_time:         state.collection_time,
            wasted_time:             state.wasted_time,
            total_data_sent:         state.total_data_sent,
            energy_consumed:         state.energy_consumed,
            energy_wasted:           state.energy_wasted,
            sent_packet_total_delay: state.sent_packet_total_delay,
            sent_packet_count:       state.sent_packet_count,
            failure_count:           state.failures,
            failure_mean_interval:   state.timeline.mean_interval(),
            timeline_exhausted:      state.timeline_exhausted,
        }
    }

    /// Mean delivery delay of this node's packets, `0.0` if none arrived.
    pub fn mean_packet_delay(&self) -> f64 {
        if self.sent_packet_count == 0 {
            0.0
        } else {
            self.sent_packet_total_delay / self.sent_packet_count as f64
        }
    }
}

/// Everything a run produces.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunReport {
    pub summary: RunSummary,
    /// One entry per node, indexed by `NodeId`.
    pub nodes:   Vec<NodeReport>,
}

impl RunReport {
    pub fn node(&self, id: NodeId) -> &NodeReport {
        &self.nodes[id.index()]
    }

    pub fn total_energy_consumed(&self) -> f64 {
        self.nodes.iter().map(|n| n.energy_consumed).sum()
    }

    pub fn total_energy_wasted(&self) -> f64 {
        self.nodes.iter().map(|n| n.energy_wasted).sum()
    }
}
