//! Routing-tree construction.

use wsn_core::{NodeId, SimParams};

use crate::{Parent, Route, SensorNetwork};

/// Pluggable routing-tree construction.
///
/// Implementations read node positions from the arena and return one
/// [`Route`] per node, indexed by `NodeId`.  They must not leave any node
/// `Unassigned`; [`SensorNetwork::apply_routes`] rejects such output along
/// with chains that do not reach the sink.
pub trait TopologyBuilder: Send + Sync {
    fn construct(&self, network: &SensorNetwork, params: &SimParams) -> Vec<Route>;
}

/// Level-by-level breadth-first tree over a disk radio model.
///
/// Nodes strictly inside `transmission_range` of the sink form level 0.
/// Each later pass attaches every still-unassigned node to its closest
/// level−1 node strictly inside range; the first node in id order wins
/// equal distances.  Passes stop when one attaches nothing, and leftover
/// nodes become [`Parent::NoRoute`].
#[derive(Copy, Clone, Debug, Default)]
pub struct DiskTopology;

impl TopologyBuilder for DiskTopology {
    fn construct(&self, network: &SensorNetwork, params: &SimParams) -> Vec<Route> {
        let range = params.transmission_range;
        let nodes = network.nodes();
        let mut routes = vec![Route::default(); nodes.len()];

        for (route, node) in routes.iter_mut().zip(nodes) {
            if node.position.distance_to_sink() < range {
                *route = Route::sink();
            }
        }

        let mut level = 1u32;
        loop {
            let mut assigned = false;
            let mut remaining = false;

            for i in 0..nodes.len() {
                if routes[i].parent != Parent::Unassigned {
                    continue;
                }

                let mut closest: Option<(usize, f64)> = None;
                for (j, candidate) in nodes.iter().enumerate() {
                    if routes[j].level != Some(level - 1) {
                        continue;
                    }
                    let d = nodes[i].position.distance(candidate.position);
                    if d < range && closest.is_none_or(|(_, best)| d < best) {
                        closest = Some((j, d));
                    }
                }

                match closest {
                    Some((j, _)) => {
                        routes[i] = Route::via(NodeId(j as u32), level);
                        assigned = true;
                    }
                    None => remaining = true,
                }
            }

            if !assigned || !remaining {
                break;
            }
            level += 1;
        }

        for route in &mut routes {
            if route.parent == Parent::Unassigned {
                *route = Route::NO_ROUTE;
            }
        }

        tracing::debug!(nodes = nodes.len(), depth = level, "routing tree constructed");
        routes
    }
}
