// ABOUTME: Recoverable errors reported by the layout engine.
// ABOUTME: Caller misuse that would corrupt the tree panics instead.

use crate::NodeId;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LayoutError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Node {0:?} is not a pane")]
    NotAPane(NodeId),

    #[error("Node {0:?} is not a container")]
    NotAContainer(NodeId),

    #[error("Divider {index} does not exist in container {container:?}")]
    DividerOutOfRange { container: NodeId, index: usize },

    #[error("A prompt is still waiting for an answer")]
    Busy,
}
