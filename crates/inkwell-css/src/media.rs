//! Media queries
//!
//! Width conditions guarding rules inside `@media` blocks. Conditions are
//! pure predicates over the viewport, evaluated on every resolve pass.

use crate::tokenizer::Token;

/// Initial font size used to resolve rem/em inside media conditions
pub const DEFAULT_ROOT_FONT_SIZE: f32 = 16.0;

/// Viewport snapshot a resolve pass runs against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Width in px
    pub width: f32,
    /// Height in px
    pub height: f32,
    /// Root font size in px (resolves rem, and em in media conditions)
    pub root_font_size: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            root_font_size: DEFAULT_ROOT_FONT_SIZE,
        }
    }
}

/// A length usable inside a media condition
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MediaLength {
    pub value: f32,
    pub unit: MediaLengthUnit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaLengthUnit {
    Px,
    /// Relative to the initial font size, as CSS defines for media queries
    Em,
    Rem,
}

impl MediaLength {
    fn to_px(self, viewport: &Viewport) -> f32 {
        match self.unit {
            MediaLengthUnit::Px => self.value,
            MediaLengthUnit::Em | MediaLengthUnit::Rem => self.value * viewport.root_font_size,
        }
    }
}

/// Media query condition
#[derive(Debug, Clone, PartialEq)]
pub enum MediaCondition {
    MinWidth(MediaLength),
    MaxWidth(MediaLength),
    Width(MediaLength),
    /// Media type: this engine renders for screen
    Screen,
    And(Vec<MediaCondition>),
    Not(Box<MediaCondition>),
    /// Unrecognized media type or feature: never matches, rule kept parsed
    Never,
}

impl MediaCondition {
    /// Check if the condition holds for the viewport
    pub fn matches(&self, viewport: &Viewport) -> bool {
        match self {
            Self::MinWidth(len) => viewport.width >= len.to_px(viewport),
            Self::MaxWidth(len) => viewport.width <= len.to_px(viewport),
            Self::Width(len) => (viewport.width - len.to_px(viewport)).abs() < 0.01,
            Self::Screen => true,
            Self::And(conditions) => conditions.iter().all(|c| c.matches(viewport)),
            Self::Not(condition) => !condition.matches(viewport),
            Self::Never => false,
        }
    }
}

/// Parse the condition tokens between `@media` and `{`.
///
/// Grammar subset: `[only] <type>`, `(feature: value)`, joined by `and`.
/// Anything unrecognized produces `Never` for that term; the block still
/// parses so later viewport changes see a consistent rule list.
pub fn parse_media_condition(tokens: &[Token]) -> MediaCondition {
    let mut terms = Vec::new();
    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| **t != Token::Whitespace)
        .collect();

    let mut pos = 0;
    let mut negate_next = false;
    while pos < significant.len() {
        match significant[pos] {
            Token::Ident(word) => {
                match word.to_ascii_lowercase().as_str() {
                    "only" | "and" => {}
                    "not" => negate_next = true,
                    "screen" | "all" => {
                        terms.push(apply_not(MediaCondition::Screen, &mut negate_next));
                    }
                    // print, speech, anything vendor-specific
                    _ => terms.push(apply_not(MediaCondition::Never, &mut negate_next)),
                }
                pos += 1;
            }
            Token::LParen => {
                let close = significant[pos..]
                    .iter()
                    .position(|t| **t == Token::RParen)
                    .map(|off| pos + off);
                let Some(close) = close else {
                    terms.push(MediaCondition::Never);
                    break;
                };
                let feature = parse_feature(&significant[pos + 1..close]);
                terms.push(apply_not(feature, &mut negate_next));
                pos = close + 1;
            }
            _ => {
                terms.push(MediaCondition::Never);
                pos += 1;
            }
        }
    }

    match terms.len() {
        0 => MediaCondition::Never,
        1 => terms.remove(0),
        _ => MediaCondition::And(terms),
    }
}

fn apply_not(condition: MediaCondition, negate: &mut bool) -> MediaCondition {
    if std::mem::take(negate) {
        MediaCondition::Not(Box::new(condition))
    } else {
        condition
    }
}

/// Parse `feature : value` (whitespace already stripped)
fn parse_feature(tokens: &[&Token]) -> MediaCondition {
    let [Token::Ident(name), Token::Colon, value] = tokens else {
        return MediaCondition::Never;
    };
    let Some(length) = media_length(value) else {
        return MediaCondition::Never;
    };
    match name.to_ascii_lowercase().as_str() {
        "min-width" => MediaCondition::MinWidth(length),
        "max-width" => MediaCondition::MaxWidth(length),
        "width" => MediaCondition::Width(length),
        _ => MediaCondition::Never,
    }
}

fn media_length(token: &Token) -> Option<MediaLength> {
    match token {
        Token::Dimension { value, unit } => {
            let unit = match unit.to_ascii_lowercase().as_str() {
                "px" => MediaLengthUnit::Px,
                "em" => MediaLengthUnit::Em,
                "rem" => MediaLengthUnit::Rem,
                _ => return None,
            };
            Some(MediaLength { value: *value, unit })
        }
        Token::Number { value, .. } if *value == 0.0 => Some(MediaLength {
            value: 0.0,
            unit: MediaLengthUnit::Px,
        }),
        _ => None,
    }
}
