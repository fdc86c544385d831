//! Document - High-level document API

use crate::{DomTree, NodeId};

/// A document: the tree plus cached references to its skeleton elements
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Cached reference to <html> element
    html_element: NodeId,
    /// Cached reference to <body> element
    body_element: NodeId,
}

impl Document {
    /// Create a new document with the html/body skeleton
    pub fn new() -> Self {
        let mut tree = DomTree::new();
        let html = tree.create_element("html");
        let body = tree.create_element("body");
        // Freshly allocated ids are always valid to link.
        tree.append_child(tree.root(), html).expect("fresh node id");
        tree.append_child(html, body).expect("fresh node id");

        Self {
            tree,
            html_element: html,
            body_element: body,
        }
    }

    /// The <html> element
    pub fn html(&self) -> NodeId {
        self.html_element
    }

    /// The <body> element
    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Start building an element attached under `parent`.
    ///
    /// Panics if `parent` is not a node in this document; use
    /// [`DomTree::append_child`] directly for fallible linking.
    pub fn element(&mut self, parent: NodeId, tag: &str) -> ElementBuilder<'_> {
        let id = self.tree.create_element(tag);
        self.tree
            .append_child(parent, id)
            .expect("parent is a node in this document");
        ElementBuilder { doc: self, id }
    }

    /// Append a text node under `parent`.
    ///
    /// Panics if `parent` is not a node in this document.
    pub fn text(&mut self, parent: NodeId, content: &str) -> NodeId {
        let id = self.tree.create_text(content);
        self.tree
            .append_child(parent, id)
            .expect("parent is a node in this document");
        id
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Fluent helper for attaching attributes to a freshly created element
pub struct ElementBuilder<'a> {
    doc: &'a mut Document,
    id: NodeId,
}

impl ElementBuilder<'_> {
    /// Set an attribute
    pub fn attr(self, name: &str, value: &str) -> Self {
        if let Some(elem) = self
            .doc
            .tree
            .get_mut(self.id)
            .and_then(|n| n.as_element_mut())
        {
            elem.set_attribute(name, value);
        }
        self
    }

    /// Shorthand for the class attribute
    pub fn class(self, value: &str) -> Self {
        self.attr("class", value)
    }

    /// Shorthand for the id attribute
    pub fn id(self, value: &str) -> Self {
        self.attr("id", value)
    }

    /// Finish, returning the node ID
    pub fn finish(self) -> NodeId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton() {
        let doc = Document::new();
        let html = doc.tree.get(doc.html()).unwrap();
        assert_eq!(html.as_element().unwrap().tag, "html");
        assert_eq!(doc.tree.parent(doc.body()), Some(doc.html()));
    }

    #[test]
    fn test_builder() {
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc
            .element(body, "div")
            .class("card-item featured")
            .id("lead")
            .finish();

        let elem = doc.tree.get(card).unwrap().as_element().unwrap();
        assert!(elem.has_class("card-item"));
        assert_eq!(elem.id.as_deref(), Some("lead"));
        assert_eq!(doc.tree.parent(card), Some(body));
    }
}
