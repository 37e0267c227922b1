//! The node arena.
//!
//! # Data layout
//!
//! Nodes live in one flat `Vec<SensorNode>` indexed by `NodeId`.  Parent
//! links are ids, never references: no node owns another, and walking up
//! the tree is index-chasing.  Index validity holds by construction because
//! ids are dense (`0..n`) and never reused within a run, and every route
//! installed through [`SensorNetwork::apply_routes`] is checked to point at
//! an existing node.

use wsn_core::{NodeId, Position};

use crate::{Parent, Route, SensorNode, TopologyError, TopologyResult};

/// Flat arena of sensor nodes for one run.
#[derive(Clone, Debug, Default)]
pub struct SensorNetwork {
    nodes: Vec<SensorNode>,
}

impl SensorNetwork {
    /// Create an arena with ids assigned in iteration order.
    pub fn from_positions<I>(positions: I) -> Self
    where
        I: IntoIterator<Item = Position>,
    {
        let nodes = positions
            .into_iter()
            .enumerate()
            .map(|(i, p)| SensorNode::new(NodeId(i as u32), p))
            .collect();
        Self { nodes }
    }

    // ── Dimensions and access ─────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[SensorNode] {
        &self.nodes
    }

    /// # Panics
    /// Panics if `id` is out of range.  Ids handed out by this arena are
    /// always in range.
    #[inline]
    pub fn node(&self, id: NodeId) -> &SensorNode {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&SensorNode> {
        self.nodes.get(id.index())
    }

    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len() as u32).map(NodeId)
    }

    /// Ids of nodes with a route to the sink, ascending.
    pub fn routed(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter(|n| n.is_routed()).map(|n| n.id)
    }

    // ── Geometry ──────────────────────────────────────────────────────────

    #[inline]
    pub fn distance(&self, a: NodeId, b: NodeId) -> f64 {
        self.node(a).position.distance(self.node(b).position)
    }

    /// Squared distance from `id` to whatever `parent` designates.
    ///
    /// `None` for `NoRoute` / `Unassigned`.
    pub fn link_distance_sq(&self, id: NodeId, parent: Parent) -> Option<f64> {
        let here = self.node(id).position;
        match parent {
            Parent::Sink => Some(here.distance_sq(wsn_core::SINK)),
            Parent::Node(p) => Some(here.distance_sq(self.node(p).position)),
            Parent::NoRoute | Parent::Unassigned => None,
        }
    }

    // ── Stage results ─────────────────────────────────────────────────────

    /// Install routes produced by a topology strategy and derive child and
    /// descendant counts.
    ///
    /// Every parent chain must terminate at the sink within `len()` steps.
    pub fn apply_routes(&mut self, routes: Vec<Route>) -> TopologyResult<()> {
        if routes.len() != self.nodes.len() {
            return Err(TopologyError::LengthMismatch {
                expected: self.nodes.len(),
                got:      routes.len(),
                what:     "routes",
            });
        }

        for (i, route) in routes.iter().enumerate() {
            let node = NodeId(i as u32);
            match route.parent {
                Parent::Unassigned => return Err(TopologyError::Unassigned { node }),
                Parent::Node(p) if p.index() >= self.nodes.len() => {
                    return Err(TopologyError::UnknownParent { node, parent: p });
                }
                _ => {}
            }
        }

        // Chains must reach the sink; a chain longer than n has a cycle.
        let n = routes.len();
        for (i, route) in routes.iter().enumerate() {
            if !route.parent.is_routed() {
                continue;
            }
            let mut cursor = route.parent;
            let mut steps = 0;
            while let Parent::Node(p) = cursor {
                steps += 1;
                if steps > n {
                    return Err(TopologyError::BrokenChain(NodeId(i as u32)));
                }
                cursor = routes[p.index()].parent;
            }
            if cursor != Parent::Sink {
                return Err(TopologyError::BrokenChain(NodeId(i as u32)));
            }
        }

        for (node, route) in self.nodes.iter_mut().zip(&routes) {
            node.parent = route.parent;
            node.level = if route.parent.is_routed() { route.level } else { None };
            node.child_count = 0;
            node.descendant_count = 0;
        }

        for i in 0..n {
            let mut cursor = self.nodes[i].parent;
            if let Parent::Node(p) = cursor {
                self.nodes[p.index()].child_count += 1;
            }
            while let Parent::Node(p) = cursor {
                self.nodes[p.index()].descendant_count += 1;
                cursor = self.nodes[p.index()].parent;
            }
        }
        Ok(())
    }

    /// Install colours produced by a colouring strategy.
    ///
    /// Exactly the routed nodes must be coloured.
    pub fn apply_colors(&mut self, colors: Vec<Option<u32>>) -> TopologyResult<()> {
        if colors.len() != self.nodes.len() {
            return Err(TopologyError::LengthMismatch {
                expected: self.nodes.len(),
                got:      colors.len(),
                what:     "colours",
            });
        }
        for (node, color) in self.nodes.iter().zip(&colors) {
            match (node.is_routed(), color) {
                (true, None) => {
                    return Err(TopologyError::Coloring { node: node.id, reason: "routed node has no colour" });
                }
                (false, Some(_)) => {
                    return Err(TopologyError::Coloring { node: node.id, reason: "unrouted node was coloured" });
                }
                _ => {}
            }
        }
        for (node, color) in self.nodes.iter_mut().zip(colors) {
            node.color = color;
        }
        Ok(())
    }

    /// Install per-node preferred collection durations.
    pub fn apply_deltas(&mut self, deltas: Vec<f64>) -> TopologyResult<()> {
        if deltas.len() != self.nodes.len() {
            return Err(TopologyError::LengthMismatch {
                expected: self.nodes.len(),
                got:      deltas.len(),
                what:     "deltas",
            });
        }
        for (node, delta) in self.nodes.iter_mut().zip(deltas) {
            node.delta_opt = delta;
        }
        Ok(())
    }

    /// Number of slot colours in use: `max(color) + 1`, or 0 when nothing is
    /// coloured.
    pub fn color_count(&self) -> u32 {
        self.nodes
            .iter()
            .filter_map(|n| n.color)
            .max()
            .map_or(0, |c| c + 1)
    }

    /// Iterator over the ancestors of `id`, nearest first, excluding the
    /// sink.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors { network: self, cursor: self.node(id).parent }
    }
}

/// Iterator returned by [`SensorNetwork::ancestors`].
pub struct Ancestors<'a> {
    network: &'a SensorNetwork,
    cursor:  Parent,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.cursor.node()?;
        self.cursor = self.network.node(id).parent;
        Some(id)
    }
}
