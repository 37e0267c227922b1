//! Interference-graph colouring.
//!
//! Two routed nodes interfere when their distance is at most
//! `interference_range`.  A proper colouring of that graph partitions the
//! transfer schedule into collision-free slots, and `color_count` derived
//! from it parameterises all slot arithmetic, so the colouring must be
//! deterministic for a given arena.

use wsn_core::{NodeId, SimParams};

use crate::SensorNetwork;

/// Pluggable colouring of the interference graph.
///
/// Returns one entry per node, indexed by `NodeId`: `Some(color)` for every
/// routed node, `None` for every unrouted node.
pub trait InterferenceColorer: Send + Sync {
    fn color(&self, network: &SensorNetwork, params: &SimParams) -> Vec<Option<u32>>;
}

/// Sequential greedy colouring in Welsh–Powell order.
///
/// Degree is the number of routed nodes within range *including the node
/// itself*, so every degree is at least 1.  Nodes are stably sorted by
/// descending degree (equal degrees keep ascending id order).  Colour `c`
/// is then given, in one scan of that order, to every uncoloured node with
/// no already-`c` node in range; the next colour repeats the scan until
/// everything is coloured.
#[derive(Copy, Clone, Debug, Default)]
pub struct WelshPowellColorer;

impl WelshPowellColorer {
    /// Interference degree of every routed node, in ascending id order.
    pub fn degrees(network: &SensorNetwork, range: f64) -> Vec<(NodeId, usize)> {
        let routed: Vec<NodeId> = network.routed().collect();
        routed
            .iter()
            .map(|&a| {
                let degree = routed
                    .iter()
                    .filter(|&&b| network.distance(a, b) <= range)
                    .count();
                (a, degree)
            })
            .collect()
    }
}

impl InterferenceColorer for WelshPowellColorer {
    fn color(&self, network: &SensorNetwork, params: &SimParams) -> Vec<Option<u32>> {
        let range = params.interference_range;

        let mut order = Self::degrees(network, range);
        order.sort_by(|a, b| b.1.cmp(&a.1));
        let order: Vec<NodeId> = order.into_iter().map(|(id, _)| id).collect();

        let mut colors: Vec<Option<u32>> = vec![None; network.len()];
        let mut holders: Vec<NodeId> = Vec::new();
        let mut uncolored = order.len();
        let mut color = 0u32;

        while uncolored > 0 {
            holders.clear();
            for &id in &order {
                if colors[id.index()].is_some() {
                    continue;
                }
                let conflict = holders
                    .iter()
                    .any(|&other| network.distance(id, other) <= range);
                if !conflict {
                    colors[id.index()] = Some(color);
                    holders.push(id);
                    uncolored -= 1;
                }
            }
            color += 1;
        }

        tracing::debug!(routed = order.len(), colors = color, "interference graph coloured");
        colors
    }
}
