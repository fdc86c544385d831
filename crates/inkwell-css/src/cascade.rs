//! Style cascade & resolver
//!
//! Computes the final style for DOM elements by:
//! 1. Matching selectors against elements, filtered by active media guards
//! 2. Sorting by importance, origin, specificity and source order
//! 3. Applying declarations over inherited/initial values
//!
//! Resolution is a pure function of (tree, rule set, viewport): no state is
//! kept between passes, so identical inputs always produce identical styles.

use tracing::trace;

use crate::computed::ComputedStyle;
use crate::media::Viewport;
use crate::properties::{Keyword, PropertyId, PropertyValue};
use crate::selectors::Specificity;
use crate::{CssParser, Declaration, Stylesheet};
use inkwell_dom::{DomTree, NodeId};

/// Browser default styles. Small on purpose: block-level display for the
/// usual document elements, underlined links, heading sizes.
const UA_CSS: &str = "
    html, body, div, p, h1, h2, h3, h4, h5, h6, ul, ol, li,
    header, footer, main, nav, section, article, aside, figure, blockquote {
        display: block;
    }
    body { margin: 8px; }
    a { text-decoration: underline; }
    h1 { font-size: 2em; font-weight: bold; }
    h2 { font-size: 1.5em; font-weight: bold; }
    h3 { font-size: 1.17em; font-weight: bold; }
    p, ul, ol, blockquote { margin-top: 1em; margin-bottom: 1em; }
";

/// Style resolver: computes styles for DOM elements
pub struct StyleResolver {
    /// User agent stylesheet (browser defaults)
    ua_styles: Stylesheet,
    /// Author stylesheets (page CSS), in load order
    author_styles: Vec<Stylesheet>,
}

/// Cascade origin, in ascending precedence
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Origin {
    UserAgent,
    Author,
}

struct MatchedDeclaration<'a> {
    declaration: &'a Declaration,
    origin: Origin,
    specificity: Specificity,
    /// Position in overall declaration order, ties broken later-wins
    seq: usize,
}

impl StyleResolver {
    pub fn new() -> Self {
        let ua_styles = CssParser::new().parse(UA_CSS).unwrap_or_default();
        Self {
            ua_styles,
            author_styles: Vec::new(),
        }
    }

    /// Add an author stylesheet
    pub fn add_stylesheet(&mut self, stylesheet: Stylesheet) {
        self.author_styles.push(stylesheet);
    }

    /// Compute the style for one element.
    ///
    /// `parent` supplies inherited values; pass None for the root.
    pub fn compute_style(
        &self,
        tree: &DomTree,
        node: NodeId,
        viewport: &Viewport,
        parent: Option<&ComputedStyle>,
    ) -> ComputedStyle {
        let mut matches: Vec<MatchedDeclaration<'_>> = Vec::new();
        let mut seq = 0usize;

        collect_matches(tree, node, viewport, &self.ua_styles, Origin::UserAgent, &mut seq, &mut matches);
        for stylesheet in &self.author_styles {
            collect_matches(tree, node, viewport, stylesheet, Origin::Author, &mut seq, &mut matches);
        }

        trace!(node = node.index(), matched = matches.len(), "cascade");

        matches.sort_by_key(|m| (m.declaration.important, m.origin, m.specificity, m.seq));

        let mut style = match parent {
            Some(parent) => ComputedStyle::inherit_from(parent),
            None => ComputedStyle::default(),
        };

        // font-size first: em/% on other properties resolve against it
        for matched in matches
            .iter()
            .filter(|m| m.declaration.property == PropertyId::FontSize)
            .chain(matches.iter().filter(|m| m.declaration.property != PropertyId::FontSize))
        {
            apply(&mut style, matched.declaration, viewport, parent);
        }

        style
    }
}

impl Default for StyleResolver {
    fn default() -> Self {
        Self::new()
    }
}

fn apply(
    style: &mut ComputedStyle,
    declaration: &Declaration,
    viewport: &Viewport,
    parent: Option<&ComputedStyle>,
) {
    if declaration.value == PropertyValue::Keyword(Keyword::Inherit) {
        style.inherit_property(declaration.property, parent);
    } else {
        style.apply_declaration(declaration, viewport);
    }
}

fn collect_matches<'a>(
    tree: &DomTree,
    node: NodeId,
    viewport: &Viewport,
    stylesheet: &'a Stylesheet,
    origin: Origin,
    seq: &mut usize,
    matches: &mut Vec<MatchedDeclaration<'a>>,
) {
    for rule in &stylesheet.rules {
        if let Some(media) = &rule.media {
            if !media.matches(viewport) {
                continue;
            }
        }
        for selector in &rule.selectors {
            if selector.matches(tree, node) {
                for declaration in &rule.declarations {
                    matches.push(MatchedDeclaration {
                        declaration,
                        origin,
                        specificity: selector.specificity,
                        seq: *seq,
                    });
                    *seq += 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::computed::{Display, SizeValue, TextDecoration};
    use crate::parse_stylesheet;
    use crate::properties::Color;
    use inkwell_dom::Document;

    fn resolver(css: &str) -> StyleResolver {
        let mut resolver = StyleResolver::new();
        resolver.add_stylesheet(parse_stylesheet(css).expect("fixture css parses"));
        resolver
    }

    #[test]
    fn test_specificity_beats_source_order() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.element(body, "div").class("note").finish();

        let resolver = resolver("
            .note { color: crimson; }
            div { color: blue; }
        ");
        let viewport = Viewport::new(800.0, 600.0);
        let style = resolver.compute_style(&doc.tree, div, &viewport, None);
        assert_eq!(style.color, Color::rgb(220, 20, 60));
    }

    #[test]
    fn test_source_order_breaks_ties() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.element(body, "div").finish();

        let resolver = resolver("
            div { color: blue; }
            div { color: green; }
        ");
        let viewport = Viewport::new(800.0, 600.0);
        let style = resolver.compute_style(&doc.tree, div, &viewport, None);
        assert_eq!(style.color, Color::rgb(0, 128, 0));
    }

    #[test]
    fn test_important_outranks_specificity() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.element(body, "div").id("hero").finish();

        let resolver = resolver("
            div { color: blue !important; }
            #hero { color: green; }
        ");
        let viewport = Viewport::new(800.0, 600.0);
        let style = resolver.compute_style(&doc.tree, div, &viewport, None);
        assert_eq!(style.color, Color::rgb(0, 0, 255));
    }

    #[test]
    fn test_author_overrides_ua() {
        let mut doc = Document::new();
        let body = doc.body();
        let a = doc.element(body, "a").finish();

        let viewport = Viewport::new(800.0, 600.0);

        // UA underlines links
        let plain = StyleResolver::new().compute_style(&doc.tree, a, &viewport, None);
        assert_eq!(plain.text_decoration, TextDecoration::Underline);

        let resolver = resolver("a { text-decoration: none; }");
        let styled = resolver.compute_style(&doc.tree, a, &viewport, None);
        assert_eq!(styled.text_decoration, TextDecoration::None);
    }

    #[test]
    fn test_ua_display_defaults() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.element(body, "p").finish();
        let span = doc.element(body, "span").finish();

        let resolver = StyleResolver::new();
        let viewport = Viewport::new(800.0, 600.0);
        assert_eq!(resolver.compute_style(&doc.tree, p, &viewport, None).display, Display::Block);
        assert_eq!(
            resolver.compute_style(&doc.tree, span, &viewport, None).display,
            Display::Inline
        );
    }

    #[test]
    fn test_media_guard_filters_rules() {
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc.element(body, "div").class("card-item").finish();

        let resolver = resolver("
            .card-item { width: 100%; }
            @media (min-width: 40rem) { .card-item { width: 50%; } }
        ");

        let narrow = resolver.compute_style(&doc.tree, card, &Viewport::new(500.0, 600.0), None);
        assert_eq!(narrow.width, SizeValue::Percent(100.0));

        let wide = resolver.compute_style(&doc.tree, card, &Viewport::new(700.0, 600.0), None);
        assert_eq!(wide.width, SizeValue::Percent(50.0));
    }

    #[test]
    fn test_inheritance_through_parent() {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.element(body, "p").finish();
        let a = doc.element(p, "a").finish();

        let resolver = resolver("p { color: crimson; }");
        let viewport = Viewport::new(800.0, 600.0);

        let body_style = resolver.compute_style(&doc.tree, body, &viewport, None);
        let p_style = resolver.compute_style(&doc.tree, p, &viewport, Some(&body_style));
        let a_style = resolver.compute_style(&doc.tree, a, &viewport, Some(&p_style));

        assert_eq!(p_style.color, Color::rgb(220, 20, 60));
        assert_eq!(a_style.color, Color::rgb(220, 20, 60));
        // background-color does not inherit
        assert_eq!(a_style.background_color, Color::TRANSPARENT);
    }

    #[test]
    fn test_inherit_keyword_restores_parent_value() {
        let mut doc = Document::new();
        let body = doc.body();
        let div = doc.element(body, "div").finish();

        let resolver = resolver("
            body { background-color: whitesmoke; }
            div { background-color: inherit; }
        ");
        let viewport = Viewport::new(800.0, 600.0);
        let body_style = resolver.compute_style(&doc.tree, body, &viewport, None);
        let div_style = resolver.compute_style(&doc.tree, div, &viewport, Some(&body_style));
        assert_eq!(div_style.background_color, Color::rgb(245, 245, 245));
    }

    #[test]
    fn test_idempotent_resolution() {
        let mut doc = Document::new();
        let body = doc.body();
        let card = doc.element(body, "div").class("card-item").finish();

        let resolver = resolver("
            .card-item { width: 100%; padding: 1rem; background-color: #fff; }
            @media (min-width: 40rem) { .card-item { width: 50%; } }
        ");
        let viewport = Viewport::new(700.0, 600.0);
        let first = resolver.compute_style(&doc.tree, card, &viewport, None);
        let second = resolver.compute_style(&doc.tree, card, &viewport, None);
        assert_eq!(first, second);
    }
}
