//! DOM Tree (arena-based allocation)

use tracing::trace;

use crate::{DomError, Node, NodeId};

/// Arena-based DOM tree
///
/// Node 0 is always the document node. Nodes are never removed; the style
/// resolver only needs a stable snapshot of the tree.
#[derive(Debug)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a new tree containing only the document node
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::document()],
        }
    }

    /// Document root ID
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get(id.index())
    }

    /// Get a mutable node by ID
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if !id.is_valid() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree holds only the document node
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Allocate a detached element node
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        let id = self.push(Node::element(tag));
        trace!(id = id.0, tag, "create element");
        id
    }

    /// Allocate a detached text node
    pub fn create_text(&mut self, content: &str) -> NodeId {
        self.push(Node::text(content.to_string()))
    }

    fn push(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) -> Result<(), DomError> {
        if self.get(parent).is_none() {
            return Err(DomError::InvalidNode(parent.0));
        }
        if self.get(child).is_none() {
            return Err(DomError::InvalidNode(child.0));
        }

        let prev_last = self.nodes[parent.index()].last_child;

        {
            let node = &mut self.nodes[child.index()];
            node.parent = parent;
            node.prev_sibling = prev_last;
            node.next_sibling = NodeId::NONE;
        }

        if prev_last.is_valid() {
            self.nodes[prev_last.index()].next_sibling = child;
        } else {
            self.nodes[parent.index()].first_child = child;
        }
        self.nodes[parent.index()].last_child = child;
        trace!(parent = parent.0, child = child.0, "append child");
        Ok(())
    }

    /// Parent of a node
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.get(id)?.parent;
        parent.is_valid().then_some(parent)
    }

    /// Iterate direct children front to back
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.get(id).map(|n| n.first_child).unwrap_or(NodeId::NONE);
        ChildIter { tree: self, next: first }
    }

    /// Iterate ancestors from the parent upward
    pub fn ancestors(&self, id: NodeId) -> AncestorIter<'_> {
        let parent = self.get(id).map(|n| n.parent).unwrap_or(NodeId::NONE);
        AncestorIter { tree: self, next: parent }
    }

    /// Iterate the whole tree in pre-order, document node excluded
    pub fn descendants(&self) -> DescendantIter<'_> {
        let mut stack: Vec<NodeId> = self.children(NodeId::ROOT).map(|(id, _)| id).collect();
        stack.reverse();
        DescendantIter { tree: self, stack }
    }

    /// Previous sibling that is an element
    pub fn prev_sibling_element(&self, id: NodeId) -> Option<NodeId> {
        let mut cur = self.get(id)?.prev_sibling;
        while cur.is_valid() {
            let node = &self.nodes[cur.index()];
            if node.is_element() {
                return Some(cur);
            }
            cur = node.prev_sibling;
        }
        None
    }

    /// True if no earlier sibling is an element
    pub fn is_first_element_child(&self, id: NodeId) -> bool {
        self.prev_sibling_element(id).is_none()
    }

    /// True if no later sibling is an element
    pub fn is_last_element_child(&self, id: NodeId) -> bool {
        let Some(node) = self.get(id) else {
            return false;
        };
        let mut cur = node.next_sibling;
        while cur.is_valid() {
            let node = &self.nodes[cur.index()];
            if node.is_element() {
                return false;
            }
            cur = node.next_sibling;
        }
        true
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over direct children
pub struct ChildIter<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for ChildIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.next_sibling;
        Some((id, node))
    }
}

/// Iterator over ancestors
pub struct AncestorIter<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl<'a> Iterator for AncestorIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next;
        let node = self.tree.get(id)?;
        self.next = node.parent;
        Some((id, node))
    }
}

/// Pre-order iterator over every node below the document node
pub struct DescendantIter<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for DescendantIter<'a> {
    type Item = (NodeId, &'a Node);

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = self.tree.get(id)?;
        let children: Vec<NodeId> = self.tree.children(id).map(|(c, _)| c).collect();
        self.stack.extend(children.into_iter().rev());
        Some((id, node))
    }
}
