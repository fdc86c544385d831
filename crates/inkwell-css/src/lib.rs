//! Inkwell CSS Parser & Style System
//!
//! CSS parsing and cascade implementation for a small, well-defined subset:
//! style rules, `@media` width conditions, specificity-ordered cascade and
//! inheritance. Malformed input degrades to skipped rules, never to a failed
//! parse, matching how browsers treat author stylesheets.

pub mod tokenizer;
mod parser;
pub mod selectors;
pub mod media;
pub mod properties;
pub mod computed;
mod cascade;

pub use cascade::StyleResolver;
pub use computed::ComputedStyle;
pub use media::{MediaCondition, Viewport};
pub use parser::CssParser;
pub use properties::{PropertyId, PropertyValue};
pub use selectors::{Selector, Specificity};

/// Parse a CSS stylesheet
pub fn parse_stylesheet(css: &str) -> Result<Stylesheet, CssError> {
    CssParser::new().parse(css)
}

/// Parsed stylesheet
#[derive(Debug, Default)]
pub struct Stylesheet {
    pub rules: Vec<Rule>,
}

impl Stylesheet {
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// CSS style rule: selector list, declarations, optional media guard
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub declarations: Vec<Declaration>,
    /// Condition inherited from an enclosing `@media` block
    pub media: Option<MediaCondition>,
}

/// CSS declaration (property: value)
#[derive(Debug, Clone)]
pub struct Declaration {
    pub property: PropertyId,
    pub value: PropertyValue,
    pub important: bool,
}

/// CSS parsing error
#[derive(Debug, thiserror::Error)]
pub enum CssError {
    #[error("Parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },
}
