use thiserror::Error;

use super::NodeId;

/// Errors raised while inspecting or mutating a node.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomError {
    #[error("Unknown node {0}")]
    UnknownNode(NodeId),
    #[error("Node {0} is not an element")]
    NotAnElement(NodeId),
    #[error("Node {0} is not a text node")]
    NotText(NodeId),
    #[error("Node {0} is read-only")]
    ReadOnly(NodeId),
    #[error("Cannot insert node {child} into {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },
}
