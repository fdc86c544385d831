//! Computed styles
//!
//! The final computed values for an element after cascade and inheritance.
//! A presence bitmask records which properties the cascade set explicitly so
//! inheritance can tell "set to the initial value" apart from "never set".

use crate::media::Viewport;
use crate::properties::{Color, Keyword, Length, LengthUnit, PropertyId, PropertyValue};
use crate::Declaration;

/// display
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Display {
    #[default]
    Inline,
    Block,
    InlineBlock,
    Flex,
    None,
}

/// flex-direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlexDirection {
    #[default]
    Row,
    Column,
}

/// flex-wrap
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlexWrap {
    #[default]
    Nowrap,
    Wrap,
}

/// justify-content
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum JustifyContent {
    #[default]
    FlexStart,
    FlexEnd,
    Center,
    SpaceBetween,
    SpaceAround,
}

/// align-items
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AlignItems {
    #[default]
    Stretch,
    FlexStart,
    FlexEnd,
    Center,
    Baseline,
}

/// text-align
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    Justify,
}

/// text-decoration (line only)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
}

/// A used size: absolute px, percentage of the containing block, or auto
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum SizeValue {
    #[default]
    Auto,
    Px(f32),
    Percent(f32),
}

/// Per-edge sizes (margins, padding)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSizes {
    pub top: SizeValue,
    pub right: SizeValue,
    pub bottom: SizeValue,
    pub left: SizeValue,
}

impl Default for EdgeSizes {
    fn default() -> Self {
        let zero = SizeValue::Px(0.0);
        Self { top: zero, right: zero, bottom: zero, left: zero }
    }
}

/// Bitmask for tracking which properties are explicitly set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyMask(pub u32);

impl PropertyMask {
    pub const DISPLAY: u32 = 1 << 0;
    pub const WIDTH: u32 = 1 << 1;
    pub const HEIGHT: u32 = 1 << 2;
    pub const MIN_HEIGHT: u32 = 1 << 3;
    pub const MAX_WIDTH: u32 = 1 << 4;
    pub const MARGIN: u32 = 1 << 5;
    pub const PADDING: u32 = 1 << 6;
    pub const BORDER_RADIUS: u32 = 1 << 7;
    pub const COLOR: u32 = 1 << 8;
    pub const BACKGROUND: u32 = 1 << 9;
    pub const FONT_FAMILY: u32 = 1 << 10;
    pub const FONT_SIZE: u32 = 1 << 11;
    pub const FONT_WEIGHT: u32 = 1 << 12;
    pub const LINE_HEIGHT: u32 = 1 << 13;
    pub const TEXT_ALIGN: u32 = 1 << 14;
    pub const TEXT_DECORATION: u32 = 1 << 15;
    pub const FLEX_DIRECTION: u32 = 1 << 16;
    pub const FLEX_WRAP: u32 = 1 << 17;
    pub const JUSTIFY_CONTENT: u32 = 1 << 18;
    pub const ALIGN_ITEMS: u32 = 1 << 19;
    pub const GAP: u32 = 1 << 20;

    pub fn new() -> Self {
        Self(0)
    }

    pub fn set(&mut self, bit: u32) {
        self.0 |= bit;
    }

    pub fn is_set(&self, bit: u32) -> bool {
        (self.0 & bit) != 0
    }
}

/// Computed style for an element
#[derive(Debug, Clone, PartialEq)]
pub struct ComputedStyle {
    pub display: Display,

    pub width: SizeValue,
    pub height: SizeValue,
    pub min_height: SizeValue,
    pub max_width: SizeValue,

    pub margin: EdgeSizes,
    pub padding: EdgeSizes,
    pub border_radius: f32,

    pub color: Color,
    pub background_color: Color,

    pub font_family: Vec<String>,
    /// In px
    pub font_size: f32,
    /// 100-900
    pub font_weight: u16,
    /// Multiplier of font size
    pub line_height: f32,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,

    pub flex_direction: FlexDirection,
    pub flex_wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    /// In px
    pub gap: f32,

    /// Which properties the cascade set explicitly
    pub property_mask: PropertyMask,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: Display::default(),
            width: SizeValue::Auto,
            height: SizeValue::Auto,
            min_height: SizeValue::Auto,
            max_width: SizeValue::Auto,
            margin: EdgeSizes::default(),
            padding: EdgeSizes::default(),
            border_radius: 0.0,
            color: Color::BLACK,
            background_color: Color::TRANSPARENT,
            font_family: vec!["serif".to_string()],
            font_size: 16.0,
            font_weight: 400,
            line_height: 1.2,
            text_align: TextAlign::default(),
            text_decoration: TextDecoration::default(),
            flex_direction: FlexDirection::default(),
            flex_wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            gap: 0.0,
            property_mask: PropertyMask::new(),
        }
    }
}

impl ComputedStyle {
    /// Start a child style: initial values, then every property that
    /// [`PropertyId::inherits`] copied from the parent. The mask starts
    /// empty; only cascade hits set bits.
    pub fn inherit_from(parent: &ComputedStyle) -> Self {
        let mut style = Self::default();
        for &property in PropertyId::ALL {
            if property.inherits() {
                style.inherit_property(property, Some(parent));
            }
        }
        style
    }

    /// Apply one winning declaration.
    ///
    /// `em` resolves against this style's current font size, so the cascade
    /// applies font-size before other length-valued properties.
    pub fn apply_declaration(&mut self, decl: &Declaration, viewport: &Viewport) {
        use PropertyId as P;

        let value = &decl.value;
        match decl.property {
            P::Display => {
                if let Some(display) = display_keyword(value) {
                    self.display = display;
                    self.property_mask.set(PropertyMask::DISPLAY);
                }
            }
            P::Width => {
                if let Some(size) = self.size_value(value, viewport) {
                    self.width = size;
                    self.property_mask.set(PropertyMask::WIDTH);
                }
            }
            P::Height => {
                if let Some(size) = self.size_value(value, viewport) {
                    self.height = size;
                    self.property_mask.set(PropertyMask::HEIGHT);
                }
            }
            P::MinHeight => {
                if let Some(size) = self.size_value(value, viewport) {
                    self.min_height = size;
                    self.property_mask.set(PropertyMask::MIN_HEIGHT);
                }
            }
            P::MaxWidth => {
                if let Some(size) = self.size_value(value, viewport) {
                    self.max_width = size;
                    self.property_mask.set(PropertyMask::MAX_WIDTH);
                }
            }
            P::Margin | P::MarginTop | P::MarginRight | P::MarginBottom | P::MarginLeft => {
                if let Some(size) = self.size_value(value, viewport) {
                    match decl.property {
                        P::MarginTop => self.margin.top = size,
                        P::MarginRight => self.margin.right = size,
                        P::MarginBottom => self.margin.bottom = size,
                        P::MarginLeft => self.margin.left = size,
                        _ => self.margin = EdgeSizes { top: size, right: size, bottom: size, left: size },
                    }
                    self.property_mask.set(PropertyMask::MARGIN);
                }
            }
            P::Padding | P::PaddingTop | P::PaddingRight | P::PaddingBottom | P::PaddingLeft => {
                if let Some(size) = self.size_value(value, viewport) {
                    match decl.property {
                        P::PaddingTop => self.padding.top = size,
                        P::PaddingRight => self.padding.right = size,
                        P::PaddingBottom => self.padding.bottom = size,
                        P::PaddingLeft => self.padding.left = size,
                        _ => self.padding = EdgeSizes { top: size, right: size, bottom: size, left: size },
                    }
                    self.property_mask.set(PropertyMask::PADDING);
                }
            }
            P::BorderRadius => {
                if let Some(px) = self.px_value(value, viewport) {
                    self.border_radius = px;
                    self.property_mask.set(PropertyMask::BORDER_RADIUS);
                }
            }
            P::Color => {
                if let PropertyValue::Color(color) = value {
                    self.color = *color;
                    self.property_mask.set(PropertyMask::COLOR);
                }
            }
            P::BackgroundColor => {
                if let PropertyValue::Color(color) = value {
                    self.background_color = *color;
                    self.property_mask.set(PropertyMask::BACKGROUND);
                }
            }
            P::FontFamily => {
                if let PropertyValue::FontStack(families) = value {
                    self.font_family = families.clone();
                    self.property_mask.set(PropertyMask::FONT_FAMILY);
                }
            }
            P::FontSize => {
                // em and % resolve against the inherited font size
                let resolved = match value {
                    PropertyValue::Length(Length { value, unit: LengthUnit::Percent }) => {
                        Some(self.font_size * value / 100.0)
                    }
                    other => self.px_value(other, viewport),
                };
                if let Some(px) = resolved {
                    self.font_size = px;
                    self.property_mask.set(PropertyMask::FONT_SIZE);
                }
            }
            P::FontWeight => {
                if let PropertyValue::Number(weight) = value {
                    self.font_weight = *weight as u16;
                    self.property_mask.set(PropertyMask::FONT_WEIGHT);
                }
            }
            P::LineHeight => {
                let resolved = match value {
                    PropertyValue::Number(multiplier) => Some(*multiplier),
                    other => self
                        .px_value(other, viewport)
                        .map(|px| px / self.font_size.max(1.0)),
                };
                if let Some(multiplier) = resolved {
                    self.line_height = multiplier;
                    self.property_mask.set(PropertyMask::LINE_HEIGHT);
                }
            }
            P::TextAlign => {
                if let PropertyValue::Keyword(kw) = value {
                    let align = match kw {
                        Keyword::Left => Some(TextAlign::Left),
                        Keyword::Right => Some(TextAlign::Right),
                        Keyword::Center => Some(TextAlign::Center),
                        Keyword::Justify => Some(TextAlign::Justify),
                        _ => None,
                    };
                    if let Some(align) = align {
                        self.text_align = align;
                        self.property_mask.set(PropertyMask::TEXT_ALIGN);
                    }
                }
            }
            P::TextDecoration => {
                if let PropertyValue::Keyword(kw) = value {
                    let decoration = match kw {
                        Keyword::None => Some(TextDecoration::None),
                        Keyword::Underline => Some(TextDecoration::Underline),
                        _ => None,
                    };
                    if let Some(decoration) = decoration {
                        self.text_decoration = decoration;
                        self.property_mask.set(PropertyMask::TEXT_DECORATION);
                    }
                }
            }
            P::FlexDirection => {
                if let PropertyValue::Keyword(kw) = value {
                    let direction = match kw {
                        Keyword::Row => Some(FlexDirection::Row),
                        Keyword::Column => Some(FlexDirection::Column),
                        _ => None,
                    };
                    if let Some(direction) = direction {
                        self.flex_direction = direction;
                        self.property_mask.set(PropertyMask::FLEX_DIRECTION);
                    }
                }
            }
            P::FlexWrap => {
                if let PropertyValue::Keyword(kw) = value {
                    let wrap = match kw {
                        Keyword::Wrap => Some(FlexWrap::Wrap),
                        Keyword::Nowrap => Some(FlexWrap::Nowrap),
                        _ => None,
                    };
                    if let Some(wrap) = wrap {
                        self.flex_wrap = wrap;
                        self.property_mask.set(PropertyMask::FLEX_WRAP);
                    }
                }
            }
            P::JustifyContent => {
                if let PropertyValue::Keyword(kw) = value {
                    let justify = match kw {
                        Keyword::FlexStart => Some(JustifyContent::FlexStart),
                        Keyword::FlexEnd => Some(JustifyContent::FlexEnd),
                        Keyword::Center => Some(JustifyContent::Center),
                        Keyword::SpaceBetween => Some(JustifyContent::SpaceBetween),
                        Keyword::SpaceAround => Some(JustifyContent::SpaceAround),
                        _ => None,
                    };
                    if let Some(justify) = justify {
                        self.justify_content = justify;
                        self.property_mask.set(PropertyMask::JUSTIFY_CONTENT);
                    }
                }
            }
            P::AlignItems => {
                if let PropertyValue::Keyword(kw) = value {
                    let align = match kw {
                        Keyword::Stretch => Some(AlignItems::Stretch),
                        Keyword::FlexStart => Some(AlignItems::FlexStart),
                        Keyword::FlexEnd => Some(AlignItems::FlexEnd),
                        Keyword::Center => Some(AlignItems::Center),
                        Keyword::Baseline => Some(AlignItems::Baseline),
                        _ => None,
                    };
                    if let Some(align) = align {
                        self.align_items = align;
                        self.property_mask.set(PropertyMask::ALIGN_ITEMS);
                    }
                }
            }
            P::Gap => {
                if let Some(px) = self.px_value(value, viewport) {
                    self.gap = px;
                    self.property_mask.set(PropertyMask::GAP);
                }
            }
        }
    }

    /// Restore a property to its inherited (or initial) value.
    ///
    /// Backs `color: inherit` and friends; for properties that inherit by
    /// default this re-copies the parent value over whatever the cascade set.
    pub fn inherit_property(&mut self, property: PropertyId, parent: Option<&ComputedStyle>) {
        use PropertyId as P;

        let initial;
        let source = match parent {
            Some(p) => p,
            None => {
                initial = ComputedStyle::default();
                &initial
            }
        };
        match property {
            P::Display => self.display = source.display,
            P::Width => self.width = source.width,
            P::Height => self.height = source.height,
            P::MinHeight => self.min_height = source.min_height,
            P::MaxWidth => self.max_width = source.max_width,
            P::Margin | P::MarginTop | P::MarginRight | P::MarginBottom | P::MarginLeft => {
                self.margin = source.margin;
            }
            P::Padding | P::PaddingTop | P::PaddingRight | P::PaddingBottom | P::PaddingLeft => {
                self.padding = source.padding;
            }
            P::BorderRadius => self.border_radius = source.border_radius,
            P::Color => self.color = source.color,
            P::BackgroundColor => self.background_color = source.background_color,
            P::FontFamily => self.font_family = source.font_family.clone(),
            P::FontSize => self.font_size = source.font_size,
            P::FontWeight => self.font_weight = source.font_weight,
            P::LineHeight => self.line_height = source.line_height,
            P::TextAlign => self.text_align = source.text_align,
            P::TextDecoration => self.text_decoration = source.text_decoration,
            P::FlexDirection => self.flex_direction = source.flex_direction,
            P::FlexWrap => self.flex_wrap = source.flex_wrap,
            P::JustifyContent => self.justify_content = source.justify_content,
            P::AlignItems => self.align_items = source.align_items,
            P::Gap => self.gap = source.gap,
        }
    }

    /// Resolve a length-or-auto value into a SizeValue
    fn size_value(&self, value: &PropertyValue, viewport: &Viewport) -> Option<SizeValue> {
        match value {
            PropertyValue::Keyword(Keyword::Auto) => Some(SizeValue::Auto),
            PropertyValue::Length(Length { value, unit: LengthUnit::Percent }) => {
                Some(SizeValue::Percent(*value))
            }
            PropertyValue::Length(length) => {
                Some(SizeValue::Px(self.resolve_length(*length, viewport)))
            }
            _ => None,
        }
    }

    /// Resolve an absolute length value into px (no percent, no auto)
    fn px_value(&self, value: &PropertyValue, viewport: &Viewport) -> Option<f32> {
        match value {
            PropertyValue::Length(Length { unit: LengthUnit::Percent, .. }) => None,
            PropertyValue::Length(length) => Some(self.resolve_length(*length, viewport)),
            _ => None,
        }
    }

    fn resolve_length(&self, length: Length, viewport: &Viewport) -> f32 {
        match length.unit {
            LengthUnit::Px => length.value,
            LengthUnit::Em => length.value * self.font_size,
            LengthUnit::Rem => length.value * viewport.root_font_size,
            LengthUnit::Percent => length.value, // callers handle percent
            LengthUnit::Vw => length.value / 100.0 * viewport.width,
            LengthUnit::Vh => length.value / 100.0 * viewport.height,
        }
    }
}

fn display_keyword(value: &PropertyValue) -> Option<Display> {
    match value {
        PropertyValue::Keyword(Keyword::None) => Some(Display::None),
        PropertyValue::Keyword(Keyword::Block) => Some(Display::Block),
        PropertyValue::Keyword(Keyword::Inline) => Some(Display::Inline),
        PropertyValue::Keyword(Keyword::InlineBlock) => Some(Display::InlineBlock),
        PropertyValue::Keyword(Keyword::Flex) => Some(Display::Flex),
        _ => None,
    }
}
