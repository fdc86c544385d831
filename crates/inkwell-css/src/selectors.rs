//! Selectors: parsing, specificity, and matching
//!
//! Complex selectors are stored rightmost-compound-first so matching can walk
//! right-to-left: the subject compound must match the candidate node, then
//! each combinator steps through ancestors or siblings.

use crate::tokenizer::Token;
use inkwell_dom::{DomTree, ElementData, NodeId};

/// Combinator between compound selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Combinator {
    /// Whitespace: ancestor descendant
    Descendant,
    /// `>`: parent > child
    Child,
    /// `+`: prev + next
    NextSibling,
    /// `~`: prev ~ subsequent
    SubsequentSibling,
}

/// Attribute selector operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrOp {
    /// `[attr]`
    Exists,
    /// `[attr=val]`
    Eq,
    /// `[attr~=val]`
    Includes,
}

/// Pseudo-class selectors
#[derive(Debug, Clone, PartialEq)]
pub enum PseudoClass {
    Hover,
    Active,
    Focus,
    FirstChild,
    LastChild,
    Root,
    /// `:not(...)` containing a compound selector
    Not(Box<CompoundSelector>),
}

impl PseudoClass {
    /// Parse a plain (non-functional) pseudo-class name
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "hover" => Some(Self::Hover),
            "active" => Some(Self::Active),
            "focus" => Some(Self::Focus),
            "first-child" => Some(Self::FirstChild),
            "last-child" => Some(Self::LastChild),
            "root" => Some(Self::Root),
            _ => None,
        }
    }
}

/// A single simple selector component
#[derive(Debug, Clone, PartialEq)]
pub enum SimpleSelector {
    /// Type selector, e.g. `div`, `p`
    Type(String),
    /// Universal selector `*`
    Universal,
    /// ID selector `#foo`
    Id(String),
    /// Class selector `.bar`
    Class(String),
    /// Attribute selector `[name op value]`
    Attribute {
        name: String,
        op: AttrOp,
        value: Option<String>,
    },
    /// Pseudo-class selector
    PseudoClass(PseudoClass),
    /// Pseudo-element selector (never matched by this engine)
    PseudoElement(String),
}

/// A compound selector: simple selectors with no combinator between them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompoundSelector {
    pub simples: Vec<SimpleSelector>,
}

impl CompoundSelector {
    fn is_empty(&self) -> bool {
        self.simples.is_empty()
    }
}

/// Selector specificity (a, b, c): id / class-attr-pseudo / type counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Specificity(pub u32, pub u32, pub u32);

impl Specificity {
    fn add(&mut self, other: Specificity) {
        self.0 += other.0;
        self.1 += other.1;
        self.2 += other.2;
    }
}

/// A complex selector: compounds joined by combinators, stored rightmost-first.
///
/// `parts[0]` is the subject compound; each following entry carries the
/// combinator relating it to the part before it (to its right in source).
#[derive(Debug, Clone, PartialEq)]
pub struct Selector {
    pub parts: Vec<(CompoundSelector, Option<Combinator>)>,
    pub specificity: Specificity,
}

impl Selector {
    /// Whether this selector matches the given element node
    pub fn matches(&self, tree: &DomTree, node: NodeId) -> bool {
        match_from(tree, node, &self.parts, 0)
    }
}

fn match_from(
    tree: &DomTree,
    node: NodeId,
    parts: &[(CompoundSelector, Option<Combinator>)],
    idx: usize,
) -> bool {
    let Some((compound, _)) = parts.get(idx) else {
        return true;
    };
    if !match_compound(tree, node, compound) {
        return false;
    }
    let Some((_, Some(combinator))) = parts.get(idx + 1).map(|p| (&p.0, p.1)) else {
        // No further parts, or a malformed chain missing its combinator.
        return parts.len() <= idx + 1;
    };

    match combinator {
        Combinator::Child => tree
            .parent(node)
            .is_some_and(|p| match_from(tree, p, parts, idx + 1)),
        Combinator::Descendant => tree
            .ancestors(node)
            .any(|(anc, n)| n.is_element() && match_from(tree, anc, parts, idx + 1)),
        Combinator::NextSibling => tree
            .prev_sibling_element(node)
            .is_some_and(|s| match_from(tree, s, parts, idx + 1)),
        Combinator::SubsequentSibling => {
            let mut cur = tree.prev_sibling_element(node);
            while let Some(s) = cur {
                if match_from(tree, s, parts, idx + 1) {
                    return true;
                }
                cur = tree.prev_sibling_element(s);
            }
            false
        }
    }
}

fn match_compound(tree: &DomTree, node: NodeId, compound: &CompoundSelector) -> bool {
    let Some(elem) = tree.get(node).and_then(|n| n.as_element()) else {
        return false;
    };
    compound
        .simples
        .iter()
        .all(|simple| match_simple(tree, node, elem, simple))
}

fn match_simple(tree: &DomTree, node: NodeId, elem: &ElementData, simple: &SimpleSelector) -> bool {
    match simple {
        SimpleSelector::Type(tag) => elem.tag.eq_ignore_ascii_case(tag),
        SimpleSelector::Universal => true,
        SimpleSelector::Id(id) => elem.id.as_deref() == Some(id.as_str()),
        SimpleSelector::Class(class) => elem.has_class(class),
        SimpleSelector::Attribute { name, op, value } => match (op, value) {
            (AttrOp::Exists, _) => elem.attribute(name).is_some(),
            (AttrOp::Eq, Some(v)) => elem.attribute(name) == Some(v.as_str()),
            (AttrOp::Includes, Some(v)) => elem
                .attribute(name)
                .is_some_and(|av| av.split_whitespace().any(|part| part == v)),
            _ => false,
        },
        SimpleSelector::PseudoClass(pseudo) => match pseudo {
            PseudoClass::Hover => elem.states.is_hovered(),
            PseudoClass::Active => elem.states.is_active(),
            PseudoClass::Focus => elem.states.is_focused(),
            PseudoClass::FirstChild => tree.is_first_element_child(node),
            PseudoClass::LastChild => tree.is_last_element_child(node),
            PseudoClass::Root => elem.tag == "html",
            PseudoClass::Not(inner) => !match_compound(tree, node, inner),
        },
        // No generated content: pseudo-element selectors match nothing
        SimpleSelector::PseudoElement(_) => false,
    }
}

/// Parse a comma-separated selector list from the tokens before a `{`.
///
/// Returns None if any selector in the list is malformed; per CSS error
/// handling the whole rule is then dropped.
pub fn parse_selector_list(tokens: &[Token]) -> Option<Vec<Selector>> {
    let mut selectors = Vec::new();
    for group in tokens.split(|t| *t == Token::Comma) {
        selectors.push(parse_complex_selector(group)?);
    }
    Some(selectors)
}

/// Parse one complex selector
pub fn parse_complex_selector(tokens: &[Token]) -> Option<Selector> {
    // Build left-to-right, then reverse into rightmost-first order.
    let mut compounds: Vec<(CompoundSelector, Option<Combinator>)> = Vec::new();
    let mut current = CompoundSelector::default();
    // Combinator between `current` and the previous compound
    let mut pending: Option<Combinator> = None;
    let mut saw_whitespace = false;

    let mut pos = 0;
    while pos < tokens.len() {
        match &tokens[pos] {
            Token::Whitespace => {
                saw_whitespace = true;
                pos += 1;
                continue;
            }
            Token::Delim(c @ ('>' | '+' | '~')) => {
                if current.is_empty() {
                    return None;
                }
                compounds.push((std::mem::take(&mut current), pending));
                pending = Some(match c {
                    '>' => Combinator::Child,
                    '+' => Combinator::NextSibling,
                    _ => Combinator::SubsequentSibling,
                });
                saw_whitespace = false;
                pos += 1;
                continue;
            }
            _ => {}
        }

        if saw_whitespace && !current.is_empty() {
            compounds.push((std::mem::take(&mut current), pending));
            pending = Some(Combinator::Descendant);
        }
        saw_whitespace = false;

        let (simple, consumed) = parse_simple_selector(&tokens[pos..])?;
        current.simples.push(simple);
        pos += consumed;
    }

    if current.is_empty() {
        return None;
    }
    compounds.push((current, pending));

    // Reverse: parts[0] becomes the subject; shift combinators so each entry
    // carries the combinator to the part on its right in source order.
    let mut parts: Vec<(CompoundSelector, Option<Combinator>)> = Vec::with_capacity(compounds.len());
    let mut carried: Option<Combinator> = None;
    for (compound, comb) in compounds.into_iter().rev() {
        parts.push((compound, carried));
        carried = comb;
    }

    let mut specificity = Specificity::default();
    for (compound, _) in &parts {
        specificity.add(compound_specificity(compound));
    }

    Some(Selector { parts, specificity })
}

fn compound_specificity(compound: &CompoundSelector) -> Specificity {
    let mut spec = Specificity::default();
    for simple in &compound.simples {
        match simple {
            SimpleSelector::Id(_) => spec.0 += 1,
            SimpleSelector::Class(_) | SimpleSelector::Attribute { .. } => spec.1 += 1,
            SimpleSelector::PseudoClass(PseudoClass::Not(inner)) => {
                spec.add(compound_specificity(inner));
            }
            SimpleSelector::PseudoClass(_) => spec.1 += 1,
            SimpleSelector::Type(_) | SimpleSelector::PseudoElement(_) => spec.2 += 1,
            SimpleSelector::Universal => {}
        }
    }
    spec
}

/// Parse one simple selector at the head of the token slice.
///
/// Returns the selector and the number of tokens consumed.
fn parse_simple_selector(tokens: &[Token]) -> Option<(SimpleSelector, usize)> {
    match tokens.first()? {
        Token::Ident(name) => Some((SimpleSelector::Type(name.clone()), 1)),
        Token::Delim('*') => Some((SimpleSelector::Universal, 1)),
        Token::Hash { value, is_id } if *is_id => Some((SimpleSelector::Id(value.clone()), 1)),
        Token::Delim('.') => match tokens.get(1)? {
            Token::Ident(name) => Some((SimpleSelector::Class(name.clone()), 2)),
            _ => None,
        },
        Token::LBracket => parse_attribute_selector(tokens),
        Token::Colon => match tokens.get(1)? {
            // ::pseudo-element
            Token::Colon => match tokens.get(2)? {
                Token::Ident(name) => Some((SimpleSelector::PseudoElement(name.clone()), 3)),
                _ => None,
            },
            Token::Ident(name) => {
                let pseudo = PseudoClass::parse(name)?;
                Some((SimpleSelector::PseudoClass(pseudo), 2))
            }
            Token::Function(name) if name.eq_ignore_ascii_case("not") => {
                let close = tokens.iter().position(|t| *t == Token::RParen)?;
                let inner_tokens = &tokens[2..close];
                let mut inner = CompoundSelector::default();
                let mut pos = 0;
                while pos < inner_tokens.len() {
                    if inner_tokens[pos] == Token::Whitespace {
                        pos += 1;
                        continue;
                    }
                    let (simple, consumed) = parse_simple_selector(&inner_tokens[pos..])?;
                    inner.simples.push(simple);
                    pos += consumed;
                }
                if inner.is_empty() {
                    return None;
                }
                Some((
                    SimpleSelector::PseudoClass(PseudoClass::Not(Box::new(inner))),
                    close + 1,
                ))
            }
            _ => None,
        },
        _ => None,
    }
}

fn parse_attribute_selector(tokens: &[Token]) -> Option<(SimpleSelector, usize)> {
    let close = tokens.iter().position(|t| *t == Token::RBracket)?;
    let inner: Vec<&Token> = tokens[1..close]
        .iter()
        .filter(|t| **t != Token::Whitespace)
        .collect();

    let selector = match inner.as_slice() {
        [Token::Ident(name)] => SimpleSelector::Attribute {
            name: name.to_ascii_lowercase(),
            op: AttrOp::Exists,
            value: None,
        },
        [Token::Ident(name), Token::Delim('='), value] => SimpleSelector::Attribute {
            name: name.to_ascii_lowercase(),
            op: AttrOp::Eq,
            value: Some(attr_value(value)?),
        },
        [Token::Ident(name), Token::Delim('~'), Token::Delim('='), value] => {
            SimpleSelector::Attribute {
                name: name.to_ascii_lowercase(),
                op: AttrOp::Includes,
                value: Some(attr_value(value)?),
            }
        }
        _ => return None,
    };
    Some((selector, close + 1))
}

fn attr_value(token: &Token) -> Option<String> {
    match token {
        Token::Ident(s) | Token::Str(s) => Some(s.clone()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;
    use inkwell_dom::{Document, ElementStates};

    fn selector(input: &str) -> Selector {
        let tokens = Tokenizer::new(input).tokenize_all();
        parse_complex_selector(&tokens).expect("selector should parse")
    }

    #[test]
    fn test_specificity() {
        assert_eq!(selector("p").specificity, Specificity(0, 0, 1));
        assert_eq!(selector(".card-item").specificity, Specificity(0, 1, 0));
        assert_eq!(selector("#main").specificity, Specificity(1, 0, 0));
        assert_eq!(selector("p a:hover").specificity, Specificity(0, 1, 2));
        assert_eq!(selector("div.card > p").specificity, Specificity(0, 1, 2));
        assert_eq!(selector("a:not(.external)").specificity, Specificity(0, 1, 1));
        assert_eq!(selector("*").specificity, Specificity(0, 0, 0));
    }

    #[test]
    fn test_specificity_ordering() {
        assert!(Specificity(1, 0, 0) > Specificity(0, 9, 9));
        assert!(Specificity(0, 1, 0) > Specificity(0, 0, 9));
        assert!(Specificity(0, 1, 1) > Specificity(0, 1, 0));
    }

    #[test]
    fn test_parts_rightmost_first() {
        let sel = selector("ul > li a");
        assert_eq!(sel.parts.len(), 3);
        assert_eq!(sel.parts[0].0.simples, vec![SimpleSelector::Type("a".into())]);
        assert_eq!(sel.parts[1].1, Some(Combinator::Descendant));
        assert_eq!(sel.parts[2].1, Some(Combinator::Child));
    }

    fn sample_doc() -> (Document, inkwell_dom::NodeId, inkwell_dom::NodeId) {
        let mut doc = Document::new();
        let body = doc.body();
        let p = doc.element(body, "p").finish();
        let a = doc
            .element(p, "a")
            .attr("href", "https://example.com")
            .class("external")
            .finish();
        (doc, p, a)
    }

    #[test]
    fn test_type_and_class_match() {
        let (doc, p, a) = sample_doc();
        assert!(selector("p").matches(&doc.tree, p));
        assert!(!selector("p").matches(&doc.tree, a));
        assert!(selector(".external").matches(&doc.tree, a));
        assert!(selector("a.external").matches(&doc.tree, a));
        assert!(!selector("a.internal").matches(&doc.tree, a));
    }

    #[test]
    fn test_combinators() {
        let (doc, _, a) = sample_doc();
        assert!(selector("p a").matches(&doc.tree, a));
        assert!(selector("p > a").matches(&doc.tree, a));
        assert!(selector("body a").matches(&doc.tree, a));
        assert!(!selector("body > a").matches(&doc.tree, a));
        assert!(!selector("ul a").matches(&doc.tree, a));
    }

    #[test]
    fn test_sibling_combinators() {
        let mut doc = Document::new();
        let body = doc.body();
        let h1 = doc.element(body, "h1").finish();
        let p1 = doc.element(body, "p").finish();
        let p2 = doc.element(body, "p").finish();

        assert!(selector("h1 + p").matches(&doc.tree, p1));
        assert!(!selector("h1 + p").matches(&doc.tree, p2));
        assert!(selector("h1 ~ p").matches(&doc.tree, p2));
        assert!(!selector("p + h1").matches(&doc.tree, h1));
    }

    #[test]
    fn test_pseudo_classes() {
        let (mut doc, _, a) = sample_doc();
        assert!(!selector("a:hover").matches(&doc.tree, a));

        if let Some(elem) = doc.tree.get_mut(a).and_then(|n| n.as_element_mut()) {
            elem.states.set(ElementStates::HOVER);
        }
        assert!(selector("a:hover").matches(&doc.tree, a));
        assert!(selector("p a:hover").matches(&doc.tree, a));
    }

    #[test]
    fn test_structural_pseudo_classes() {
        let mut doc = Document::new();
        let body = doc.body();
        let first = doc.element(body, "li").finish();
        let last = doc.element(body, "li").finish();

        assert!(selector("li:first-child").matches(&doc.tree, first));
        assert!(!selector("li:first-child").matches(&doc.tree, last));
        assert!(selector("li:last-child").matches(&doc.tree, last));
    }

    #[test]
    fn test_not() {
        let (doc, _, a) = sample_doc();
        assert!(!selector("a:not(.external)").matches(&doc.tree, a));
        assert!(selector("a:not(.internal)").matches(&doc.tree, a));
    }

    #[test]
    fn test_attribute_selectors() {
        let (doc, _, a) = sample_doc();
        assert!(selector("a[href]").matches(&doc.tree, a));
        assert!(selector("[href=\"https://example.com\"]").matches(&doc.tree, a));
        assert!(!selector("a[target]").matches(&doc.tree, a));
        assert!(selector("a[class~=external]").matches(&doc.tree, a));
    }

    #[test]
    fn test_pseudo_element_never_matches() {
        let (doc, p, _) = sample_doc();
        assert!(!selector("p::first-line").matches(&doc.tree, p));
    }

    #[test]
    fn test_selector_list() {
        let tokens = Tokenizer::new("h1, h2, .title").tokenize_all();
        let list = parse_selector_list(&tokens).expect("list should parse");
        assert_eq!(list.len(), 3);
    }

    #[test]
    fn test_malformed_selector_rejected() {
        let tokens = Tokenizer::new(".").tokenize_all();
        assert!(parse_selector_list(&tokens).is_none());
        let tokens = Tokenizer::new("p >").tokenize_all();
        assert!(parse_complex_selector(&tokens).is_none());
    }
}
