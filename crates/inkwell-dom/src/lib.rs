//! Inkwell DOM - Document tree
//!
//! Arena-based document tree the style resolver matches selectors against.

mod node;
mod tree;
mod document;

pub use node::{Attribute, ElementData, ElementStates, Node, NodeData, TextData};
pub use tree::DomTree;
pub use document::{Document, ElementBuilder};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Root node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Check whether this ID refers to a real node
    #[inline]
    pub fn is_valid(self) -> bool {
        self != Self::NONE
    }

    /// Raw index value
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Tree error
#[derive(Debug, thiserror::Error)]
pub enum DomError {
    #[error("invalid node id {0}")]
    InvalidNode(u32),
}
