//! CSS parser
//!
//! Token-stream parser producing a `Stylesheet`. Error handling follows
//! browser behavior: a malformed declaration skips to the next `;`, a
//! malformed selector drops its rule, unknown at-rules are skipped wholesale.
//! The top-level parse never fails on recoverable garbage.

use tracing::{debug, trace};

use crate::media::{self, MediaCondition};
use crate::properties::{self, PropertyId, PropertyValue};
use crate::selectors;
use crate::tokenizer::{Token, Tokenizer};
use crate::{CssError, Declaration, Rule, Stylesheet};

/// CSS parser
pub struct CssParser {
    skipped_rules: usize,
    skipped_declarations: usize,
}

impl CssParser {
    pub fn new() -> Self {
        Self {
            skipped_rules: 0,
            skipped_declarations: 0,
        }
    }

    /// Parse a CSS stylesheet
    pub fn parse(&mut self, css: &str) -> Result<Stylesheet, CssError> {
        let tokens = Tokenizer::new(css).tokenize_all();
        let rules = self.parse_rules(&tokens, None);

        debug!(
            rules = rules.len(),
            skipped_rules = self.skipped_rules,
            skipped_declarations = self.skipped_declarations,
            "parsed stylesheet"
        );
        Ok(Stylesheet { rules })
    }

    /// Parse a rule list, tagging every rule with the enclosing media guard
    fn parse_rules(&mut self, tokens: &[Token], media: Option<&MediaCondition>) -> Vec<Rule> {
        let mut rules = Vec::new();
        let mut pos = 0;

        while pos < tokens.len() {
            if tokens[pos] == Token::Whitespace {
                pos += 1;
                continue;
            }

            if let Token::AtKeyword(name) = &tokens[pos] {
                if name.eq_ignore_ascii_case("media") {
                    pos = self.parse_media_block(tokens, pos + 1, media, &mut rules);
                } else {
                    trace!(at_rule = %name, "skipping unsupported at-rule");
                    pos = skip_at_rule(tokens, pos);
                }
                continue;
            }

            match self.parse_qualified_rule(tokens, pos, media) {
                Some((rule, next)) => {
                    if let Some(rule) = rule {
                        rules.push(rule);
                    }
                    pos = next;
                }
                None => {
                    self.skipped_rules += 1;
                    pos = skip_to_next_rule(tokens, pos);
                }
            }
        }

        rules
    }

    /// Parse `@media <condition> { rules }`, `pos` pointing past the keyword
    fn parse_media_block(
        &mut self,
        tokens: &[Token],
        pos: usize,
        outer: Option<&MediaCondition>,
        rules: &mut Vec<Rule>,
    ) -> usize {
        let Some(open) = tokens[pos..].iter().position(|t| *t == Token::LBrace) else {
            return tokens.len();
        };
        let open = pos + open;
        let condition = media::parse_media_condition(&tokens[pos..open]);
        let condition = match outer {
            // Nested @media: both conditions must hold
            Some(outer) => MediaCondition::And(vec![outer.clone(), condition]),
            None => condition,
        };

        let close = matching_brace(tokens, open);
        let inner = &tokens[open + 1..close];
        rules.extend(self.parse_rules(inner, Some(&condition)));
        (close + 1).min(tokens.len())
    }

    /// Parse `selectors { declarations }` starting at `pos`.
    ///
    /// Outer None means no block structure was found (unrecoverable here,
    /// caller skips forward); inner None means the selector list was
    /// malformed and the whole rule is dropped per CSS error handling.
    fn parse_qualified_rule(
        &mut self,
        tokens: &[Token],
        pos: usize,
        media: Option<&MediaCondition>,
    ) -> Option<(Option<Rule>, usize)> {
        let open = pos + tokens[pos..].iter().position(|t| *t == Token::LBrace)?;
        let close = matching_brace(tokens, open);
        let next = (close + 1).min(tokens.len());

        let Some(selector_list) = selectors::parse_selector_list(&tokens[pos..open]) else {
            self.skipped_rules += 1;
            return Some((None, next));
        };

        let declarations = self.parse_declarations(&tokens[open + 1..close]);
        let rule = Rule {
            selectors: selector_list,
            declarations,
            media: media.cloned(),
        };
        Some((Some(rule), next))
    }

    /// Parse the inside of a declaration block
    fn parse_declarations(&mut self, tokens: &[Token]) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        for chunk in tokens.split(|t| *t == Token::Semicolon) {
            let significant: Vec<&Token> = chunk
                .iter()
                .filter(|t| **t != Token::Whitespace)
                .collect();
            if significant.is_empty() {
                continue;
            }
            match self.parse_declaration(&significant) {
                Some(parsed) => declarations.extend(parsed),
                None => {
                    self.skipped_declarations += 1;
                    trace!("skipping malformed declaration");
                }
            }
        }
        declarations
    }

    /// Parse one `property: value [!important]` declaration.
    ///
    /// Box shorthands expand into per-side declarations, so one source
    /// declaration may produce several.
    fn parse_declaration(&mut self, tokens: &[&Token]) -> Option<Vec<Declaration>> {
        let [Token::Ident(name), Token::Colon, rest @ ..] = tokens else {
            return None;
        };
        let property = PropertyId::from_name(&name.to_ascii_lowercase())?;

        let (value_tokens, important) = split_important(rest);
        if value_tokens.is_empty() {
            return None;
        }

        if matches!(property, PropertyId::Margin | PropertyId::Padding) && value_tokens.len() > 1 {
            return expand_box_shorthand(property, value_tokens, important);
        }

        let owned: Vec<Token> = value_tokens.iter().map(|t| (*t).clone()).collect();
        let value = properties::parse_value(property, &owned)?;
        Some(vec![Declaration { property, value, important }])
    }
}

impl Default for CssParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a trailing `! important` off the value tokens
fn split_important<'t>(tokens: &[&'t Token]) -> (Vec<&'t Token>, bool) {
    if let [value @ .., Token::Delim('!'), Token::Ident(word)] = tokens {
        if word.eq_ignore_ascii_case("important") {
            return (value.to_vec(), true);
        }
    }
    (tokens.to_vec(), false)
}

/// Expand `margin`/`padding` with 2-4 values into per-side declarations
fn expand_box_shorthand(
    property: PropertyId,
    value_tokens: Vec<&Token>,
    important: bool,
) -> Option<Vec<Declaration>> {
    let values: Option<Vec<PropertyValue>> = value_tokens
        .iter()
        .map(|t| properties::length_or_auto(t))
        .collect();
    let values = values?;

    let (top, right, bottom, left) = match values.as_slice() {
        [v] => (v.clone(), v.clone(), v.clone(), v.clone()),
        [tb, lr] => (tb.clone(), lr.clone(), tb.clone(), lr.clone()),
        [t, lr, b] => (t.clone(), lr.clone(), b.clone(), lr.clone()),
        [t, r, b, l] => (t.clone(), r.clone(), b.clone(), l.clone()),
        _ => return None,
    };

    let sides = match property {
        PropertyId::Margin => [
            PropertyId::MarginTop,
            PropertyId::MarginRight,
            PropertyId::MarginBottom,
            PropertyId::MarginLeft,
        ],
        _ => [
            PropertyId::PaddingTop,
            PropertyId::PaddingRight,
            PropertyId::PaddingBottom,
            PropertyId::PaddingLeft,
        ],
    };
    Some(
        sides
            .into_iter()
            .zip([top, right, bottom, left])
            .map(|(property, value)| Declaration { property, value, important })
            .collect(),
    )
}

/// Skip an at-rule: consume through `;` or a balanced `{ ... }`
fn skip_at_rule(tokens: &[Token], start: usize) -> usize {
    let mut pos = start + 1;
    while pos < tokens.len() {
        match tokens[pos] {
            Token::Semicolon => return pos + 1,
            Token::LBrace => return matching_brace(tokens, pos) + 1,
            _ => pos += 1,
        }
    }
    pos
}

/// Skip forward past the next balanced block (rule-level error recovery)
fn skip_to_next_rule(tokens: &[Token], start: usize) -> usize {
    let mut pos = start;
    while pos < tokens.len() {
        match tokens[pos] {
            Token::LBrace => return matching_brace(tokens, pos) + 1,
            Token::Semicolon => return pos + 1,
            _ => pos += 1,
        }
    }
    pos
}

/// Index of the `}` matching the `{` at `open` (or end of input)
fn matching_brace(tokens: &[Token], open: usize) -> usize {
    let mut depth = 0usize;
    for (offset, token) in tokens[open..].iter().enumerate() {
        match token {
            Token::LBrace => depth += 1,
            Token::RBrace => {
                depth -= 1;
                if depth == 0 {
                    return open + offset;
                }
            }
            _ => {}
        }
    }
    tokens.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::Viewport;
    use crate::properties::{Color, Length};
    use crate::selectors::Specificity;

    fn parse(css: &str) -> Stylesheet {
        CssParser::new().parse(css).expect("parse should not fail")
    }

    #[test]
    fn test_empty() {
        assert_eq!(parse("").len(), 0);
        assert_eq!(parse("  /* comment only */  ").len(), 0);
    }

    #[test]
    fn test_single_rule() {
        let sheet = parse(".card { color: crimson; }");
        assert_eq!(sheet.len(), 1);
        let rule = &sheet.rules[0];
        assert_eq!(rule.selectors[0].specificity, Specificity(0, 1, 0));
        assert_eq!(rule.declarations.len(), 1);
        assert_eq!(
            rule.declarations[0].value,
            PropertyValue::Color(Color::rgb(220, 20, 60))
        );
        assert!(rule.media.is_none());
    }

    #[test]
    fn test_media_guard_attached() {
        let css = "@media (min-width: 40rem) { .card-item { width: 50%; } }";
        let sheet = parse(css);
        assert_eq!(sheet.len(), 1);
        let media = sheet.rules[0].media.as_ref().expect("media guard");
        assert!(media.matches(&Viewport::new(700.0, 600.0)));
        assert!(!media.matches(&Viewport::new(500.0, 600.0)));
    }

    #[test]
    fn test_nested_media_conjunction() {
        let css = "@media screen { @media (min-width: 600px) { p { color: red; } } }";
        let sheet = parse(css);
        assert_eq!(sheet.len(), 1);
        let media = sheet.rules[0].media.as_ref().expect("media guard");
        assert!(media.matches(&Viewport::new(800.0, 600.0)));
        assert!(!media.matches(&Viewport::new(400.0, 600.0)));
    }

    #[test]
    fn test_malformed_declaration_skipped() {
        let css = "p { color:; font-weight: bold; widthx: 10px; }";
        let sheet = parse(css);
        assert_eq!(sheet.len(), 1);
        // Only font-weight survives
        assert_eq!(sheet.rules[0].declarations.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].property, PropertyId::FontWeight);
    }

    #[test]
    fn test_unknown_property_skipped() {
        let sheet = parse(".card { box-shadow: 0 1px 3px rgba(0,0,0,0.1); width: 50%; }");
        assert_eq!(sheet.rules[0].declarations.len(), 1);
        assert_eq!(sheet.rules[0].declarations[0].property, PropertyId::Width);
    }

    #[test]
    fn test_malformed_selector_drops_rule_only() {
        let css = "p { color: red; } !!bad{} a { color: blue; }";
        let sheet = parse(css);
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_unknown_at_rule_skipped() {
        let css = "@import url(x.css); @font-face { font-family: X; } p { color: red; }";
        let sheet = parse(css);
        assert_eq!(sheet.len(), 1);
    }

    #[test]
    fn test_box_shorthand_expansion() {
        let sheet = parse("div { margin: 1rem auto; padding: 1px 2px 3px 4px; }");
        let decls = &sheet.rules[0].declarations;
        assert_eq!(decls.len(), 8);
        assert_eq!(decls[0].property, PropertyId::MarginTop);
        assert_eq!(decls[1].property, PropertyId::MarginRight);
        assert_eq!(decls[1].value, PropertyValue::Keyword(crate::properties::Keyword::Auto));
        assert_eq!(decls[7].property, PropertyId::PaddingLeft);
        assert_eq!(decls[7].value, PropertyValue::Length(Length::px(4.0)));
    }

    #[test]
    fn test_important_flag() {
        let sheet = parse("p { color: red !important; }");
        assert!(sheet.rules[0].declarations[0].important);
    }

    #[test]
    fn test_selector_list_shared_declarations() {
        let sheet = parse("h1, h2, h3 { margin-top: 0; }");
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.rules[0].selectors.len(), 3);
    }

    #[test]
    fn test_unclosed_block_recovers() {
        let sheet = parse("p { color: red;");
        assert_eq!(sheet.len(), 1);
        assert_eq!(sheet.rules[0].declarations.len(), 1);
    }
}
