use thiserror::Error;

use crate::scene_graph::node::NodeId;

/// Ways a hierarchy edit can be rejected.
///
/// None of these occur on a well-formed scene; they indicate stale handles
/// or a host that broke the tree invariants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("node {0:?} does not exist or has been removed")]
    MissingNode(NodeId),

    #[error("node {0:?} is a leaf and cannot hold children")]
    LeafParent(NodeId),

    #[error("node {0:?} is not a pivot")]
    NotAPivot(NodeId),

    #[error("cannot move node {node:?} under its own descendant {parent:?}")]
    Cycle { node: NodeId, parent: NodeId },
}
