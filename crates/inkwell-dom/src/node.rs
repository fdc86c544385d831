//! DOM Node - Compact representation
//!
//! Sibling/child links are NodeIds into the arena rather than pointers.

use crate::NodeId;

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    /// Parent node (NONE if root)
    pub parent: NodeId,
    /// First child
    pub first_child: NodeId,
    /// Last child (for O(1) append)
    pub last_child: NodeId,
    /// Previous sibling
    pub prev_sibling: NodeId,
    /// Next sibling
    pub next_sibling: NodeId,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    fn detached(data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            data,
        }
    }

    /// Create a new element node
    pub fn element(tag: &str) -> Self {
        Self::detached(NodeData::Element(ElementData::new(tag)))
    }

    /// Create a new text node
    pub fn text(content: String) -> Self {
        Self::detached(NodeData::Text(TextData { content }))
    }

    /// Create a document node
    pub fn document() -> Self {
        Self::detached(NodeData::Document)
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get text content if this is a text node
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match &self.data {
            NodeData::Text(t) => Some(&t.content),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
    /// Text content
    Text(TextData),
    /// Comment
    Comment(String),
}

/// Text node payload
#[derive(Debug, Clone)]
pub struct TextData {
    pub content: String,
}

/// Element attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (lowercase)
    pub tag: String,
    /// Attributes in document order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// Cached class list
    pub classes: Vec<String>,
    /// Interaction pseudo-state flags
    pub states: ElementStates,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            id: None,
            classes: Vec::new(),
            states: ElementStates::default(),
        }
    }

    /// Set an attribute, refreshing the id/class caches
    pub fn set_attribute(&mut self, name: &str, value: &str) {
        let name = name.to_ascii_lowercase();
        match name.as_str() {
            "id" => self.id = Some(value.to_string()),
            "class" => {
                self.classes = value.split_whitespace().map(str::to_string).collect();
            }
            _ => {}
        }
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value.to_string();
        } else {
            self.attrs.push(Attribute {
                name,
                value: value.to_string(),
            });
        }
    }

    /// Get an attribute value by name
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|a| a.name.eq_ignore_ascii_case(name))
            .map(|a| a.value.as_str())
    }

    /// Check class membership
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

/// Bitmask of interaction pseudo-states (hover/active/focus)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementStates(u8);

impl ElementStates {
    pub const HOVER: u8 = 1 << 0;
    pub const ACTIVE: u8 = 1 << 1;
    pub const FOCUS: u8 = 1 << 2;

    /// Create empty state set
    pub fn new() -> Self {
        Self(0)
    }

    /// Set a state bit
    pub fn set(&mut self, bit: u8) {
        self.0 |= bit;
    }

    /// Clear a state bit
    pub fn clear(&mut self, bit: u8) {
        self.0 &= !bit;
    }

    /// Check if a state is set
    pub fn contains(&self, bit: u8) -> bool {
        (self.0 & bit) != 0
    }

    pub fn is_hovered(&self) -> bool {
        self.contains(Self::HOVER)
    }

    pub fn is_active(&self) -> bool {
        self.contains(Self::ACTIVE)
    }

    pub fn is_focused(&self) -> bool {
        self.contains(Self::FOCUS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_states() {
        let mut states = ElementStates::new();
        assert!(!states.is_hovered());

        states.set(ElementStates::HOVER);
        states.set(ElementStates::FOCUS);
        assert!(states.is_hovered());
        assert!(states.is_focused());
        assert!(!states.is_active());

        states.clear(ElementStates::HOVER);
        assert!(!states.is_hovered());
        assert!(states.is_focused());
    }

    #[test]
    fn test_class_cache() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.tag, "div");

        elem.set_attribute("class", "card-item featured");
        assert!(elem.has_class("card-item"));
        assert!(elem.has_class("featured"));
        assert!(!elem.has_class("card"));

        elem.set_attribute("id", "main");
        assert_eq!(elem.id.as_deref(), Some("main"));
        assert_eq!(elem.attribute("id"), Some("main"));
    }
}
