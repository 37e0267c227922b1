//! Topology-subsystem error type.

use thiserror::Error;

use wsn_core::NodeId;

/// Errors produced by `wsn-topology`.
///
/// The built-in strategies never fail; these variants guard the contract of
/// user-supplied strategies.
#[derive(Debug, Error)]
pub enum TopologyError {
    #[error("{what} length {got} does not match node count {expected}")]
    LengthMismatch {
        expected: usize,
        got:      usize,
        what:     &'static str,
    },

    #[error("{node} has parent {parent}, which does not exist")]
    UnknownParent { node: NodeId, parent: NodeId },

    #[error("parent chain of {0} does not reach the sink")]
    BrokenChain(NodeId),

    #[error("{node} is left unassigned by the topology strategy")]
    Unassigned { node: NodeId },

    #[error("{node} routing and colouring disagree: {reason}")]
    Coloring { node: NodeId, reason: &'static str },
}

pub type TopologyResult<T> = Result<T, TopologyError>;
