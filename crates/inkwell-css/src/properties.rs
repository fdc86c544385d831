//! CSS property definitions
//!
//! Supported properties and their value types. Enums for fixed values keep
//! the computed representation compact; anything outside the table is an
//! unknown property and its declaration is skipped at parse time.

use crate::tokenizer::Token;

/// Property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    // Display & layout
    Display,

    // Flexbox
    FlexDirection,
    FlexWrap,
    JustifyContent,
    AlignItems,
    Gap,

    // Box model
    Width,
    Height,
    MinHeight,
    MaxWidth,
    Margin,
    MarginTop,
    MarginRight,
    MarginBottom,
    MarginLeft,
    Padding,
    PaddingTop,
    PaddingRight,
    PaddingBottom,
    PaddingLeft,
    BorderRadius,

    // Colors & background
    Color,
    BackgroundColor,

    // Text
    FontFamily,
    FontSize,
    FontWeight,
    LineHeight,
    TextAlign,
    TextDecoration,
}

impl PropertyId {
    /// Parse a property name into a PropertyId
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "display" => Self::Display,

            "flex-direction" => Self::FlexDirection,
            "flex-wrap" => Self::FlexWrap,
            "justify-content" => Self::JustifyContent,
            "align-items" => Self::AlignItems,
            "gap" => Self::Gap,

            "width" => Self::Width,
            "height" => Self::Height,
            "min-height" => Self::MinHeight,
            "max-width" => Self::MaxWidth,

            "margin" => Self::Margin,
            "margin-top" => Self::MarginTop,
            "margin-right" => Self::MarginRight,
            "margin-bottom" => Self::MarginBottom,
            "margin-left" => Self::MarginLeft,

            "padding" => Self::Padding,
            "padding-top" => Self::PaddingTop,
            "padding-right" => Self::PaddingRight,
            "padding-bottom" => Self::PaddingBottom,
            "padding-left" => Self::PaddingLeft,

            "border-radius" => Self::BorderRadius,

            "color" => Self::Color,
            "background-color" => Self::BackgroundColor,

            "font-family" => Self::FontFamily,
            "font-size" => Self::FontSize,
            "font-weight" => Self::FontWeight,
            "line-height" => Self::LineHeight,
            "text-align" => Self::TextAlign,
            "text-decoration" => Self::TextDecoration,

            _ => return None,
        })
    }

    /// Every supported property, in declaration order
    pub const ALL: &'static [Self] = &[
        Self::Display,
        Self::FlexDirection,
        Self::FlexWrap,
        Self::JustifyContent,
        Self::AlignItems,
        Self::Gap,
        Self::Width,
        Self::Height,
        Self::MinHeight,
        Self::MaxWidth,
        Self::Margin,
        Self::MarginTop,
        Self::MarginRight,
        Self::MarginBottom,
        Self::MarginLeft,
        Self::Padding,
        Self::PaddingTop,
        Self::PaddingRight,
        Self::PaddingBottom,
        Self::PaddingLeft,
        Self::BorderRadius,
        Self::Color,
        Self::BackgroundColor,
        Self::FontFamily,
        Self::FontSize,
        Self::FontWeight,
        Self::LineHeight,
        Self::TextAlign,
        Self::TextDecoration,
    ];

    /// Whether the property inherits from the parent when not set
    pub fn inherits(self) -> bool {
        matches!(
            self,
            Self::Color
                | Self::FontFamily
                | Self::FontSize
                | Self::FontWeight
                | Self::LineHeight
                | Self::TextAlign
        )
    }
}

/// Keyword values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Keyword {
    // display
    None,
    Block,
    Inline,
    InlineBlock,
    Flex,

    // flex-direction / wrap
    Row,
    Column,
    Wrap,
    Nowrap,

    // alignment
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
    Stretch,
    Baseline,

    // text-align
    Left,
    Right,
    Justify,

    // text-decoration
    Underline,

    // font-weight
    Normal,
    Bold,

    // sizing
    Auto,

    // global
    Inherit,
}

impl Keyword {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "none" => Self::None,
            "block" => Self::Block,
            "inline" => Self::Inline,
            "inline-block" => Self::InlineBlock,
            "flex" => Self::Flex,
            "row" => Self::Row,
            "column" => Self::Column,
            "wrap" => Self::Wrap,
            "nowrap" => Self::Nowrap,
            "flex-start" => Self::FlexStart,
            "flex-end" => Self::FlexEnd,
            "center" => Self::Center,
            "space-between" => Self::SpaceBetween,
            "space-around" => Self::SpaceAround,
            "stretch" => Self::Stretch,
            "baseline" => Self::Baseline,
            "left" => Self::Left,
            "right" => Self::Right,
            "justify" => Self::Justify,
            "underline" => Self::Underline,
            "normal" => Self::Normal,
            "bold" => Self::Bold,
            "auto" => Self::Auto,
            "inherit" => Self::Inherit,
            _ => return None,
        })
    }
}

/// Length unit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Px,
    Em,
    Rem,
    Percent,
    Vw,
    Vh,
}

/// A length with its unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub fn px(value: f32) -> Self {
        Self { value, unit: LengthUnit::Px }
    }

    pub fn percent(value: f32) -> Self {
        Self { value, unit: LengthUnit::Percent }
    }
}

/// RGBA color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const TRANSPARENT: Color = Color { r: 0, g: 0, b: 0, a: 0 };

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse a hex color body (after `#`): 3, 4, 6 or 8 digits
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digit = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
        let pair = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            3 | 4 => {
                let r = digit(0)?;
                let g = digit(1)?;
                let b = digit(2)?;
                let a = if hex.len() == 4 { digit(3)? * 17 } else { 255 };
                Some(Self { r: r * 17, g: g * 17, b: b * 17, a })
            }
            6 | 8 => {
                let r = pair(0)?;
                let g = pair(2)?;
                let b = pair(4)?;
                let a = if hex.len() == 8 { pair(6)? } else { 255 };
                Some(Self { r, g, b, a })
            }
            _ => None,
        }
    }

    /// Parse a named color (small table covering common names)
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name.to_ascii_lowercase().as_str() {
            "black" => Self::rgb(0, 0, 0),
            "white" => Self::rgb(255, 255, 255),
            "red" => Self::rgb(255, 0, 0),
            "green" => Self::rgb(0, 128, 0),
            "blue" => Self::rgb(0, 0, 255),
            "gray" | "grey" => Self::rgb(128, 128, 128),
            "silver" => Self::rgb(192, 192, 192),
            "orange" => Self::rgb(255, 165, 0),
            "yellow" => Self::rgb(255, 255, 0),
            "purple" => Self::rgb(128, 0, 128),
            "teal" => Self::rgb(0, 128, 128),
            "navy" => Self::rgb(0, 0, 128),
            "maroon" => Self::rgb(128, 0, 0),
            "crimson" => Self::rgb(220, 20, 60),
            "rebeccapurple" => Self::rgb(102, 51, 153),
            "whitesmoke" => Self::rgb(245, 245, 245),
            "transparent" => Self::TRANSPARENT,
            _ => return None,
        })
    }
}

/// Parsed property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Keyword(Keyword),
    Length(Length),
    Number(f32),
    Color(Color),
    /// Font stack: family names in preference order
    FontStack(Vec<String>),
}

/// Parse the value tokens of a declaration for a given property.
///
/// Returns None for values the property cannot take; the declaration is then
/// skipped, as a browser skips invalid declarations.
pub fn parse_value(property: PropertyId, tokens: &[Token]) -> Option<PropertyValue> {
    let significant: Vec<&Token> = tokens
        .iter()
        .filter(|t| !matches!(t, Token::Whitespace))
        .collect();
    if significant.is_empty() {
        return None;
    }

    // Global keyword applies to every property
    if let [Token::Ident(name)] = significant.as_slice() {
        if name.eq_ignore_ascii_case("inherit") {
            return Some(PropertyValue::Keyword(Keyword::Inherit));
        }
    }

    match property {
        PropertyId::Display
        | PropertyId::FlexDirection
        | PropertyId::FlexWrap
        | PropertyId::JustifyContent
        | PropertyId::AlignItems
        | PropertyId::TextAlign
        | PropertyId::TextDecoration => keyword_value(&significant),

        PropertyId::Width
        | PropertyId::Height
        | PropertyId::MinHeight
        | PropertyId::MaxWidth
        | PropertyId::MarginTop
        | PropertyId::MarginRight
        | PropertyId::MarginBottom
        | PropertyId::MarginLeft
        | PropertyId::PaddingTop
        | PropertyId::PaddingRight
        | PropertyId::PaddingBottom
        | PropertyId::PaddingLeft
        | PropertyId::Gap
        | PropertyId::BorderRadius => length_or_auto(significant.first()?),

        // Shorthands are expanded by the parser before reaching here; a bare
        // single-value form is still accepted.
        PropertyId::Margin | PropertyId::Padding => length_or_auto(significant.first()?),

        PropertyId::Color | PropertyId::BackgroundColor => color_value(&significant),

        PropertyId::FontFamily => font_stack(&significant),

        PropertyId::FontSize => length_or_auto(significant.first()?),

        PropertyId::FontWeight => match significant.as_slice() {
            [Token::Number { value, .. }] => {
                let weight = *value;
                (100.0..=900.0).contains(&weight).then_some(PropertyValue::Number(weight))
            }
            [Token::Ident(name)] => match name.to_ascii_lowercase().as_str() {
                "normal" => Some(PropertyValue::Number(400.0)),
                "bold" => Some(PropertyValue::Number(700.0)),
                _ => None,
            },
            _ => None,
        },

        PropertyId::LineHeight => match significant.first()? {
            Token::Number { value, .. } => Some(PropertyValue::Number(*value)),
            other => length_or_auto(other),
        },
    }
}

fn keyword_value(tokens: &[&Token]) -> Option<PropertyValue> {
    match tokens {
        [Token::Ident(name)] => Keyword::from_name(name).map(PropertyValue::Keyword),
        _ => None,
    }
}

/// Parse a single length token, `auto`, or unitless zero
pub fn length_or_auto(token: &Token) -> Option<PropertyValue> {
    match token {
        Token::Dimension { value, unit } => {
            let unit = match unit.to_ascii_lowercase().as_str() {
                "px" => LengthUnit::Px,
                "em" => LengthUnit::Em,
                "rem" => LengthUnit::Rem,
                "vw" => LengthUnit::Vw,
                "vh" => LengthUnit::Vh,
                _ => return None,
            };
            Some(PropertyValue::Length(Length { value: *value, unit }))
        }
        Token::Percentage(value) => Some(PropertyValue::Length(Length::percent(*value))),
        Token::Number { value, .. } if *value == 0.0 => {
            Some(PropertyValue::Length(Length::px(0.0)))
        }
        Token::Ident(name) if name.eq_ignore_ascii_case("auto") => {
            Some(PropertyValue::Keyword(Keyword::Auto))
        }
        _ => None,
    }
}

fn color_value(tokens: &[&Token]) -> Option<PropertyValue> {
    match tokens {
        [Token::Hash { value, .. }] => Color::from_hex(value).map(PropertyValue::Color),
        [Token::Ident(name)] => Color::from_name(name).map(PropertyValue::Color),
        [Token::Function(name), args @ .., Token::RParen]
            if name.eq_ignore_ascii_case("rgb") || name.eq_ignore_ascii_case("rgba") =>
        {
            rgb_function(args).map(PropertyValue::Color)
        }
        _ => None,
    }
}

fn rgb_function(args: &[&Token]) -> Option<Color> {
    let mut numbers: Vec<f32> = Vec::new();
    for token in args {
        match token {
            Token::Number { value, .. } => numbers.push(*value),
            Token::Percentage(value) => numbers.push(value / 100.0 * 255.0),
            Token::Comma | Token::Delim('/') => {}
            _ => return None,
        }
    }
    match numbers.as_slice() {
        [r, g, b] => Some(Color {
            r: channel(*r),
            g: channel(*g),
            b: channel(*b),
            a: 255,
        }),
        [r, g, b, a] => Some(Color {
            r: channel(*r),
            g: channel(*g),
            b: channel(*b),
            a: (a.clamp(0.0, 1.0) * 255.0).round() as u8,
        }),
        _ => None,
    }
}

fn channel(value: f32) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

fn font_stack(tokens: &[&Token]) -> Option<PropertyValue> {
    let mut families = Vec::new();
    let mut current: Vec<String> = Vec::new();
    for token in tokens {
        match token {
            Token::Ident(name) => current.push(name.clone()),
            Token::Str(name) => current.push(name.clone()),
            Token::Comma => {
                if !current.is_empty() {
                    families.push(current.join(" "));
                    current.clear();
                }
            }
            _ => return None,
        }
    }
    if !current.is_empty() {
        families.push(current.join(" "));
    }
    (!families.is_empty()).then_some(PropertyValue::FontStack(families))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::Tokenizer;

    fn value(property: PropertyId, input: &str) -> Option<PropertyValue> {
        let tokens = Tokenizer::new(input).tokenize_all();
        parse_value(property, &tokens)
    }

    #[test]
    fn test_lengths() {
        assert_eq!(
            value(PropertyId::Width, "50%"),
            Some(PropertyValue::Length(Length::percent(50.0)))
        );
        assert_eq!(
            value(PropertyId::MaxWidth, "42rem"),
            Some(PropertyValue::Length(Length { value: 42.0, unit: LengthUnit::Rem }))
        );
        assert_eq!(
            value(PropertyId::Margin, "0"),
            Some(PropertyValue::Length(Length::px(0.0)))
        );
        assert_eq!(
            value(PropertyId::Width, "auto"),
            Some(PropertyValue::Keyword(Keyword::Auto))
        );
        assert_eq!(value(PropertyId::Width, "fast"), None);
    }

    #[test]
    fn test_colors() {
        assert_eq!(
            value(PropertyId::Color, "#fff"),
            Some(PropertyValue::Color(Color::WHITE))
        );
        assert_eq!(
            value(PropertyId::Color, "#2a2a2a"),
            Some(PropertyValue::Color(Color::rgb(42, 42, 42)))
        );
        assert_eq!(
            value(PropertyId::BackgroundColor, "rgba(0, 0, 0, 0.5)"),
            Some(PropertyValue::Color(Color { r: 0, g: 0, b: 0, a: 128 }))
        );
        assert_eq!(
            value(PropertyId::Color, "crimson"),
            Some(PropertyValue::Color(Color::rgb(220, 20, 60)))
        );
        assert_eq!(value(PropertyId::Color, "notacolor"), None);
    }

    #[test]
    fn test_font_stack() {
        assert_eq!(
            value(PropertyId::FontFamily, "Georgia, \"Times New Roman\", serif"),
            Some(PropertyValue::FontStack(vec![
                "Georgia".into(),
                "Times New Roman".into(),
                "serif".into(),
            ]))
        );
    }

    #[test]
    fn test_font_weight() {
        assert_eq!(value(PropertyId::FontWeight, "bold"), Some(PropertyValue::Number(700.0)));
        assert_eq!(value(PropertyId::FontWeight, "650"), Some(PropertyValue::Number(650.0)));
        assert_eq!(value(PropertyId::FontWeight, "950"), None);
    }

    #[test]
    fn test_line_height() {
        assert_eq!(value(PropertyId::LineHeight, "1.6"), Some(PropertyValue::Number(1.6)));
        assert_eq!(
            value(PropertyId::LineHeight, "24px"),
            Some(PropertyValue::Length(Length::px(24.0)))
        );
    }

    #[test]
    fn test_inherit_keyword() {
        assert_eq!(
            value(PropertyId::Color, "inherit"),
            Some(PropertyValue::Keyword(Keyword::Inherit))
        );
    }

    #[test]
    fn test_property_table() {
        assert_eq!(PropertyId::from_name("margin-top"), Some(PropertyId::MarginTop));
        assert_eq!(PropertyId::from_name("box-shadow"), None);
        assert!(PropertyId::Color.inherits());
        assert!(!PropertyId::Width.inherits());
        assert!(!PropertyId::TextDecoration.inherits());
    }
}
