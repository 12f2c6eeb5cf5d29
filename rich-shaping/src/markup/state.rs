//! The nested style state driven by markup tags

use crate::classify::{hash_ascii_case_insensitive, hash_case_insensitive};
use crate::error::Error;
use crate::stack::NestingStack;
use crate::toggle::{FontStyle, StyleFlag, StyleToggleCounters};

use super::color::Rgba8;
use super::tag::{MarkupElement, MarkupTag};

/// Slots in each of the value stacks, including the baseline.
const VALUE_STACK_CAPACITY: usize = 16;

// indices into `StyleState::colors`
const TEXT: usize = 0;
const UNDERLINE: usize = 1;
const STRIKETHROUGH: usize = 2;

/// Glyphs rendered as small capitals are scaled by this factor.
pub const SMALL_CAPS_SCALE: f32 = 0.8;

const DEFAULT_HIGHLIGHT: Rgba8 = Rgba8::new(255, 255, 0, 64);

/// A named font weight.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FontWeight {
    Thin = 100,
    ExtraLight = 200,
    Light = 300,
    #[default]
    Regular = 400,
    Medium = 500,
    SemiBold = 600,
    Bold = 700,
    Heavy = 800,
    Black = 900,
}

impl FontWeight {
    /// The weight for a CSS-style numeric value, if it names one exactly.
    pub fn from_value(value: i32) -> Option<Self> {
        Some(match value {
            100 => FontWeight::Thin,
            200 => FontWeight::ExtraLight,
            300 => FontWeight::Light,
            400 => FontWeight::Regular,
            500 => FontWeight::Medium,
            600 => FontWeight::SemiBold,
            700 => FontWeight::Bold,
            800 => FontWeight::Heavy,
            900 => FontWeight::Black,
            _ => return None,
        })
    }

    pub fn value(self) -> i32 {
        self as i32
    }
}

/// Horizontal alignment of a line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    Justified,
    Flush,
}

const ALIGNMENT_KEYWORDS: &[(i32, HorizontalAlignment)] = &[
    (hash_ascii_case_insensitive(b"left"), HorizontalAlignment::Left),
    (hash_ascii_case_insensitive(b"right"), HorizontalAlignment::Right),
    (hash_ascii_case_insensitive(b"center"), HorizontalAlignment::Center),
    (hash_ascii_case_insensitive(b"justified"), HorizontalAlignment::Justified),
    (hash_ascii_case_insensitive(b"flush"), HorizontalAlignment::Flush),
];

impl HorizontalAlignment {
    /// Parse one of `left`, `right`, `center`, `justified` or `flush`.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        let hash = hash_case_insensitive(keyword);
        ALIGNMENT_KEYWORDS
            .iter()
            .find_map(|(kw, align)| (*kw == hash).then_some(*align))
    }
}

/// The fill behind highlighted text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HighlightState {
    pub color: Rgba8,
    /// Left, right, top and bottom padding around the glyphs.
    pub padding: [f32; 4],
}

/// The style in effect before any markup is applied.
///
/// Offsets are in em of the current font size.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StyleDefaults {
    pub font_size: f32,
    pub color: Rgba8,
    pub font_weight: FontWeight,
    /// Styles that are always on; closing tags never turn these off.
    pub font_style: FontStyle,
    pub alignment: HorizontalAlignment,
    pub italic_angle: f32,
    pub superscript_offset: f32,
    pub superscript_size: f32,
    pub subscript_offset: f32,
    pub subscript_size: f32,
    /// The width that percentage indents are relative to.
    pub margin_width: f32,
}

impl Default for StyleDefaults {
    fn default() -> Self {
        StyleDefaults {
            font_size: 36.0,
            color: Rgba8::WHITE,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::NORMAL,
            alignment: HorizontalAlignment::Left,
            italic_angle: 35.0,
            superscript_offset: 0.5,
            superscript_size: 0.5,
            subscript_offset: -0.25,
            subscript_size: 0.5,
            margin_width: 0.0,
        }
    }
}

impl StyleDefaults {
    pub fn with_font_size(mut self, font_size: f32) -> Self {
        self.font_size = font_size;
        self
    }

    pub fn with_color(mut self, color: Rgba8) -> Self {
        self.color = color;
        self
    }

    pub fn with_font_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }

    pub fn with_font_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }

    pub fn with_alignment(mut self, alignment: HorizontalAlignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn with_italic_angle(mut self, italic_angle: f32) -> Self {
        self.italic_angle = italic_angle;
        self
    }

    /// Set the superscript baseline offset (in em) and size multiplier.
    pub fn with_superscript(mut self, offset: f32, size: f32) -> Self {
        self.superscript_offset = offset;
        self.superscript_size = size;
        self
    }

    /// Set the subscript baseline offset (in em) and size multiplier.
    pub fn with_subscript(mut self, offset: f32, size: f32) -> Self {
        self.subscript_offset = offset;
        self.subscript_size = size;
        self
    }

    pub fn with_margin_width(mut self, margin_width: f32) -> Self {
        self.margin_width = margin_width;
        self
    }
}

/// The style to apply to the next character.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedStyle {
    pub color: Rgba8,
    pub underline_color: Rgba8,
    pub strikethrough_color: Rgba8,
    /// Set while a highlight is open.
    pub highlight: Option<HighlightState>,
    /// The font size, including any superscript or subscript scaling.
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub italic_angle: f32,
    pub baseline_offset: f32,
    pub indent: f32,
    pub alignment: HorizontalAlignment,
    pub link: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq)]
enum Unit {
    Pixels,
    Em,
    Percent,
}

/// Split a numeric tag value into its number and unit.
fn parse_length(value: &str) -> Option<(f32, Unit)> {
    let (number, unit) = if let Some(number) = value.strip_suffix("px") {
        (number, Unit::Pixels)
    } else if let Some(number) = value.strip_suffix("em") {
        (number, Unit::Em)
    } else if let Some(number) = value.strip_suffix('%') {
        (number, Unit::Percent)
    } else {
        (value, Unit::Pixels)
    };
    let number: f32 = number.trim().parse().ok()?;
    number.is_finite().then_some((number, unit))
}

fn invalid_value(tag: MarkupTag, value: &str) -> Error {
    Error::InvalidTagValue {
        tag: tag.name().to_owned(),
        value: value.to_owned(),
    }
}

/// Style stacks and toggle counters for one layout pass.
///
/// Call [`begin`](Self::begin) before each pass, then feed every markup tag
/// to [`open`](Self::open) or [`close`](Self::close) in text order, reading
/// [`resolved`](Self::resolved) for each character in between.
#[derive(Clone, Debug)]
pub struct StyleState {
    defaults: StyleDefaults,
    toggles: StyleToggleCounters,
    colors: [NestingStack<Rgba8>; 3],
    highlight: NestingStack<HighlightState>,
    size: NestingStack<f32>,
    weight: NestingStack<FontWeight>,
    italic_angle: NestingStack<f32>,
    baseline: NestingStack<f32>,
    indent: NestingStack<f32>,
    alignment: NestingStack<HorizontalAlignment>,
    link: NestingStack<Option<String>>,
    font_weight: FontWeight,
    baseline_offset: f32,
    scale: f32,
}

impl StyleState {
    /// Create a new state, ready for a pass with `defaults`.
    pub fn new(defaults: &StyleDefaults) -> Self {
        let mut state = StyleState {
            defaults: defaults.clone(),
            toggles: StyleToggleCounters::new(),
            colors: std::array::from_fn(|_| NestingStack::with_capacity(VALUE_STACK_CAPACITY)),
            highlight: NestingStack::new(),
            size: NestingStack::with_capacity(VALUE_STACK_CAPACITY),
            weight: NestingStack::with_capacity(VALUE_STACK_CAPACITY),
            italic_angle: NestingStack::with_capacity(VALUE_STACK_CAPACITY),
            baseline: NestingStack::new(),
            indent: NestingStack::with_capacity(VALUE_STACK_CAPACITY),
            alignment: NestingStack::with_capacity(VALUE_STACK_CAPACITY),
            link: NestingStack::with_capacity(VALUE_STACK_CAPACITY),
            font_weight: defaults.font_weight,
            baseline_offset: 0.0,
            scale: 1.0,
        };
        state.begin(defaults);
        state
    }

    /// Reset all state to `defaults` for a new layout pass.
    pub fn begin(&mut self, defaults: &StyleDefaults) {
        self.defaults = defaults.clone();
        self.toggles.clear();
        NestingStack::set_default_all(&mut self.colors, defaults.color);
        self.highlight.set_default(HighlightState::default());
        self.size.set_default(defaults.font_size);
        self.weight.set_default(defaults.font_weight);
        self.italic_angle.set_default(defaults.italic_angle);
        self.baseline.set_default(0.0);
        self.indent.set_default(0.0);
        self.alignment.set_default(defaults.alignment);
        self.link.set_default(None);
        self.font_weight = defaults.font_weight;
        self.baseline_offset = 0.0;
        self.scale = 1.0;
    }

    /// The active font styles, including the default style.
    pub fn font_style(&self) -> FontStyle {
        self.defaults.font_style | self.toggles.active_styles()
    }

    pub fn toggles(&self) -> &StyleToggleCounters {
        &self.toggles
    }

    fn is_base_style(&self, flag: StyleFlag) -> bool {
        self.defaults.font_style.contains(flag.font_style())
    }

    /// Apply a tag, returning `false` if it was not applied.
    ///
    /// Closing elements are forwarded to [`close`](Self::close). A tag with
    /// an invalid value, or one nested deeper than its value stack holds, is
    /// logged and leaves the state unchanged.
    pub fn open(&mut self, element: &MarkupElement) -> bool {
        match self.try_open(element) {
            Ok(()) => true,
            Err(e) => {
                log::warn!("ignoring markup: {e}");
                false
            }
        }
    }

    /// Like [`open`](Self::open), but returns the reason a tag was rejected.
    pub fn try_open(&mut self, element: &MarkupElement) -> Result<(), Error> {
        let tag = element.tag;
        if element.closing {
            self.close(tag);
            return Ok(());
        }
        let required_value = || element.value.ok_or_else(|| invalid_value(tag, ""));

        match tag {
            MarkupTag::Bold => {
                self.toggles.increment(StyleFlag::Bold);
                self.font_weight = FontWeight::Bold;
            }
            MarkupTag::Italic => {
                let angle = match element.attribute("angle") {
                    Some(value) => value
                        .parse::<f32>()
                        .ok()
                        .filter(|angle| (-180.0..=180.0).contains(angle))
                        .ok_or_else(|| invalid_value(tag, value))?,
                    None => self.defaults.italic_angle,
                };
                self.italic_angle.add(angle)?;
                self.toggles.increment(StyleFlag::Italic);
            }
            MarkupTag::Underline | MarkupTag::Strikethrough => {
                let color = self.decoration_color(element)?;
                let (flag, stack) = if tag == MarkupTag::Underline {
                    (StyleFlag::Underline, UNDERLINE)
                } else {
                    (StyleFlag::Strikethrough, STRIKETHROUGH)
                };
                self.colors[stack].add(color)?;
                self.toggles.increment(flag);
            }
            MarkupTag::Mark => {
                let highlight = self.highlight_state(element)?;
                self.highlight.push(highlight);
                self.toggles.increment(StyleFlag::Highlight);
            }
            MarkupTag::Superscript | MarkupTag::Subscript => {
                let (flag, offset, size) = if tag == MarkupTag::Superscript {
                    let d = &self.defaults;
                    (StyleFlag::Superscript, d.superscript_offset, d.superscript_size)
                } else {
                    let d = &self.defaults;
                    (StyleFlag::Subscript, d.subscript_offset, d.subscript_size)
                };
                if size > 0.0 {
                    self.scale *= size;
                }
                self.baseline.push(self.baseline_offset);
                self.baseline_offset += offset * self.size.peek() * self.scale;
                self.toggles.increment(flag);
            }
            MarkupTag::Lowercase => {
                self.toggles.increment(StyleFlag::Lowercase);
            }
            MarkupTag::Uppercase | MarkupTag::AllCaps => {
                self.toggles.increment(StyleFlag::Uppercase);
            }
            MarkupTag::SmallCaps => {
                self.toggles.increment(StyleFlag::SmallCaps);
            }
            MarkupTag::Color => {
                let value = required_value()?;
                let color = Rgba8::parse(value)?;
                self.colors[TEXT].add(color)?;
            }
            MarkupTag::Size => {
                let value = required_value()?;
                let size = self
                    .parse_size(value)
                    .ok_or_else(|| invalid_value(tag, value))?;
                self.size.add(size)?;
            }
            MarkupTag::FontWeight => {
                let value = required_value()?;
                let number = value
                    .parse::<f32>()
                    .map_err(|_| invalid_value(tag, value))?;
                let weight = FontWeight::from_value(number as i32).unwrap_or(self.font_weight);
                self.weight.add(weight)?;
                self.font_weight = weight;
            }
            MarkupTag::VerticalOffset => {
                let value = required_value()?;
                self.baseline_offset = match parse_length(value) {
                    Some((number, Unit::Pixels)) => number,
                    Some((number, Unit::Em)) => number * self.size.peek(),
                    _ => return Err(invalid_value(tag, value)),
                };
            }
            MarkupTag::Indent => {
                let value = required_value()?;
                let indent = match parse_length(value) {
                    Some((number, Unit::Pixels)) => number,
                    Some((number, Unit::Em)) => number * self.size.peek(),
                    Some((number, Unit::Percent)) => self.defaults.margin_width * number / 100.0,
                    None => return Err(invalid_value(tag, value)),
                };
                self.indent.add(indent)?;
            }
            MarkupTag::Align => {
                let value = required_value()?;
                let alignment =
                    HorizontalAlignment::from_keyword(value).ok_or_else(|| invalid_value(tag, value))?;
                self.alignment.add(alignment)?;
            }
            MarkupTag::Link => {
                let value = required_value()?;
                self.link.add(Some(value.to_owned()))?;
            }
        }
        Ok(())
    }

    /// Apply a closing tag, returning `true` if the tag is known.
    ///
    /// Closing a tag that was never opened leaves the defaults in place.
    pub fn close(&mut self, tag: MarkupTag) -> bool {
        match tag {
            MarkupTag::Bold => {
                if !self.is_base_style(StyleFlag::Bold)
                    && self.toggles.decrement(StyleFlag::Bold) == 0
                {
                    self.font_weight = self.weight.peek();
                }
            }
            MarkupTag::Italic => {
                if !self.is_base_style(StyleFlag::Italic) {
                    self.italic_angle.remove();
                    self.toggles.decrement(StyleFlag::Italic);
                }
            }
            MarkupTag::Underline => {
                if !self.is_base_style(StyleFlag::Underline) {
                    self.toggles.decrement(StyleFlag::Underline);
                }
                self.colors[UNDERLINE].remove();
            }
            MarkupTag::Strikethrough => {
                if !self.is_base_style(StyleFlag::Strikethrough) {
                    self.toggles.decrement(StyleFlag::Strikethrough);
                }
                self.colors[STRIKETHROUGH].remove();
            }
            MarkupTag::Mark => {
                if !self.is_base_style(StyleFlag::Highlight) {
                    self.highlight.pop();
                    self.toggles.decrement(StyleFlag::Highlight);
                }
            }
            MarkupTag::Superscript | MarkupTag::Subscript => {
                let (flag, size) = if tag == MarkupTag::Superscript {
                    (StyleFlag::Superscript, self.defaults.superscript_size)
                } else {
                    (StyleFlag::Subscript, self.defaults.subscript_size)
                };
                if self.toggles.is_active(flag) {
                    self.baseline_offset = self.baseline.pop();
                    if size > 0.0 {
                        self.scale /= size;
                    }
                    self.toggles.decrement(flag);
                }
            }
            MarkupTag::Lowercase => self.close_case(StyleFlag::Lowercase),
            MarkupTag::Uppercase | MarkupTag::AllCaps => self.close_case(StyleFlag::Uppercase),
            MarkupTag::SmallCaps => self.close_case(StyleFlag::SmallCaps),
            MarkupTag::Color => {
                self.colors[TEXT].remove();
            }
            MarkupTag::Size => {
                self.size.remove();
            }
            MarkupTag::FontWeight => {
                self.weight.remove();
                self.font_weight = if self.font_style().contains(FontStyle::BOLD) {
                    FontWeight::Bold
                } else {
                    self.weight.peek()
                };
            }
            MarkupTag::VerticalOffset => self.baseline_offset = 0.0,
            MarkupTag::Indent => {
                self.indent.remove();
            }
            MarkupTag::Align => {
                self.alignment.remove();
            }
            MarkupTag::Link => {
                self.link.remove();
            }
        }
        true
    }

    fn close_case(&mut self, flag: StyleFlag) {
        if !self.is_base_style(flag) {
            self.toggles.decrement(flag);
        }
    }

    /// The color for an underline or strikethrough: the `color` attribute if
    /// present, otherwise the text color. Alpha never exceeds the text color's.
    fn decoration_color(&self, element: &MarkupElement) -> Result<Rgba8, Error> {
        let text_color = self.colors[TEXT].peek();
        match element.attribute("color") {
            Some(value) => Ok(Rgba8::parse(value)?.with_max_alpha(text_color.a)),
            None => Ok(text_color),
        }
    }

    fn highlight_state(&self, element: &MarkupElement) -> Result<HighlightState, Error> {
        let mut color = match element.value {
            Some(value) => Rgba8::parse(value)?,
            None => DEFAULT_HIGHLIGHT,
        };
        if let Some(value) = element.attribute("color") {
            color = Rgba8::parse(value)?;
        }
        let mut padding = [0.0; 4];
        if let Some(value) = element.attribute("padding") {
            let params = value
                .split(',')
                .map(|p| p.trim().parse::<f32>())
                .collect::<Result<Vec<_>, _>>()
                .ok()
                .filter(|params| params.len() == 4)
                .ok_or_else(|| invalid_value(MarkupTag::Mark, value))?;
            let unit = self.defaults.font_size * 0.01;
            for (slot, param) in padding.iter_mut().zip(params) {
                *slot = param * unit;
            }
        }
        Ok(HighlightState {
            color: color.with_max_alpha(self.colors[TEXT].peek().a),
            padding,
        })
    }

    fn parse_size(&self, value: &str) -> Option<f32> {
        let base = self.defaults.font_size;
        let (number, unit) = parse_length(value)?;
        let size = match unit {
            Unit::Pixels if value.starts_with(['+', '-']) => base + number,
            Unit::Pixels => number,
            Unit::Em => base * number,
            Unit::Percent => base * number / 100.0,
        };
        Some(size)
    }

    /// The style for the next character.
    pub fn resolved(&self) -> ResolvedStyle {
        let font_style = self.font_style();
        ResolvedStyle {
            color: self.colors[TEXT].peek(),
            underline_color: self.colors[UNDERLINE].peek(),
            strikethrough_color: self.colors[STRIKETHROUGH].peek(),
            highlight: font_style
                .contains(FontStyle::HIGHLIGHT)
                .then(|| self.highlight.peek()),
            font_size: self.size.peek() * self.scale,
            font_weight: self.font_weight,
            font_style,
            italic_angle: self.italic_angle.peek(),
            baseline_offset: self.baseline_offset,
            indent: self.indent.peek(),
            alignment: self.alignment.peek(),
            link: self.link.peek(),
        }
    }

    /// Apply the active case transformation to `c`.
    ///
    /// Uppercase takes precedence over lowercase, which takes precedence
    /// over small caps. Characters whose case mapping is not a single
    /// character are left unchanged.
    pub fn transform_case(&self, c: char) -> char {
        let style = self.font_style();
        if style.contains(FontStyle::UPPERCASE) {
            single_char(c.to_uppercase(), c)
        } else if style.contains(FontStyle::LOWERCASE) {
            single_char(c.to_lowercase(), c)
        } else if style.contains(FontStyle::SMALLCAPS) {
            single_char(c.to_uppercase(), c)
        } else {
            c
        }
    }

    /// The extra scale for `c` when rendered as a small capital.
    pub fn small_caps_scale(&self, c: char) -> f32 {
        let style = self.font_style();
        let small_caps = style.contains(FontStyle::SMALLCAPS)
            && !style.contains(FontStyle::UPPERCASE)
            && !style.contains(FontStyle::LOWERCASE);
        if small_caps && c.is_lowercase() {
            SMALL_CAPS_SCALE
        } else {
            1.0
        }
    }
}

fn single_char(mut mapped: impl Iterator<Item = char>, original: char) -> char {
    match (mapped.next(), mapped.next()) {
        (Some(c), None) => c,
        _ => original,
    }
}
