//! Inkwell Engine - minimal style resolution
//!
//! Ties the document tree and the style system together: one synchronous
//! render pass computes the style of every node for a viewport snapshot.
//! The host re-runs the pass whenever a triggering input changes (load,
//! resize, hover enter/exit).

use std::collections::HashMap;

use tracing::debug;

pub use inkwell_css::{
    parse_stylesheet, ComputedStyle, CssError, MediaCondition, PropertyId, PropertyValue,
    Selector, Specificity, StyleResolver, Stylesheet, Viewport,
};
pub use inkwell_dom::{Document, DomTree, ElementStates, Node, NodeData, NodeId};

/// Computed style per node, the output of one render pass
pub type StyleMap = HashMap<NodeId, ComputedStyle>;

/// Resolve styles for every node in the document.
///
/// Single-threaded pre-order walk; each element sees its parent's computed
/// style for inheritance, text nodes carry only the inherited subset.
/// Side-effect-free: identical (tree, rules, viewport) inputs yield an
/// identical map.
pub fn resolve_document(
    document: &Document,
    resolver: &StyleResolver,
    viewport: &Viewport,
) -> StyleMap {
    let tree = &document.tree;
    let mut styles = StyleMap::new();
    // Pre-order guarantees the parent's style is in the map before its
    // children are visited; top-level nodes hang off the document node,
    // which has no style, so they see no parent.
    for (id, node) in tree.descendants() {
        let parent = tree.parent(id).and_then(|p| styles.get(&p));
        let style = if node.is_element() {
            resolver.compute_style(tree, id, viewport, parent)
        } else {
            match parent {
                Some(parent) => ComputedStyle::inherit_from(parent),
                None => ComputedStyle::default(),
            }
        };
        styles.insert(id, style);
    }
    debug!(nodes = styles.len(), width = viewport.width, "resolved document");
    styles
}

#[cfg(test)]
mod tests {
    use super::*;
    use inkwell_css::computed::SizeValue;

    fn page() -> (Document, NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc.element(body, "div").class("card-item").finish();
        doc.text(card, "hello");
        (doc, card)
    }

    #[test]
    fn test_resolve_document_covers_all_nodes() {
        let (doc, _) = page();
        let resolver = StyleResolver::new();
        let styles = resolve_document(&doc, &resolver, &Viewport::new(800.0, 600.0));
        // html, body, div, text
        assert_eq!(styles.len(), 4);
    }

    #[test]
    fn test_text_inherits_from_element() {
        let (doc, card) = page();
        let text = doc.tree.children(card).next().map(|(id, _)| id).expect("text child");

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(
            parse_stylesheet(".card-item { color: crimson; width: 50%; }").expect("parses"),
        );
        let styles = resolve_document(&doc, &resolver, &Viewport::new(800.0, 600.0));

        let text_style = &styles[&text];
        assert_eq!(text_style.color, styles[&card].color);
        // width does not inherit
        assert_eq!(text_style.width, SizeValue::Auto);
    }

    #[test]
    fn test_inheritance_reaches_deep_descendants() {
        let mut doc = Document::new();
        let body = doc.body();
        let outer = doc.element(body, "div").finish();
        let inner = doc.element(outer, "div").finish();
        let span = doc.element(inner, "span").finish();

        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(parse_stylesheet("body { color: crimson; }").expect("parses"));
        let styles = resolve_document(&doc, &resolver, &Viewport::new(800.0, 600.0));
        assert_eq!(styles[&span].color, styles[&body].color);
    }

    #[test]
    fn test_repass_after_viewport_change() {
        let (doc, card) = page();
        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(
            parse_stylesheet(
                ".card-item { width: 100% } @media (min-width: 40rem) { .card-item { width: 50% } }",
            )
            .expect("parses"),
        );

        let narrow = resolve_document(&doc, &resolver, &Viewport::new(500.0, 600.0));
        let wide = resolve_document(&doc, &resolver, &Viewport::new(800.0, 600.0));
        assert_eq!(narrow[&card].width, SizeValue::Percent(100.0));
        assert_eq!(wide[&card].width, SizeValue::Percent(50.0));
    }
}
