//! Reference counters for boolean font styles
//!
//! Boolean styles like bold may be opened several times before being closed
//! again (`<b>a<b>b</b>c</b>`); a style stays on until its last closing tag.

use core::ops::{BitAnd, BitOr, BitOrAssign};

/// A boolean style that can be toggled by markup.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StyleFlag {
    Bold,
    Italic,
    Underline,
    Strikethrough,
    Highlight,
    Superscript,
    Subscript,
    Uppercase,
    Lowercase,
    SmallCaps,
}

impl StyleFlag {
    /// Every flag, in counter order.
    pub const ALL: [StyleFlag; 10] = [
        StyleFlag::Bold,
        StyleFlag::Italic,
        StyleFlag::Underline,
        StyleFlag::Strikethrough,
        StyleFlag::Highlight,
        StyleFlag::Superscript,
        StyleFlag::Subscript,
        StyleFlag::Uppercase,
        StyleFlag::Lowercase,
        StyleFlag::SmallCaps,
    ];

    /// The corresponding bit in a [`FontStyle`].
    pub const fn font_style(self) -> FontStyle {
        match self {
            StyleFlag::Bold => FontStyle::BOLD,
            StyleFlag::Italic => FontStyle::ITALIC,
            StyleFlag::Underline => FontStyle::UNDERLINE,
            StyleFlag::Strikethrough => FontStyle::STRIKETHROUGH,
            StyleFlag::Highlight => FontStyle::HIGHLIGHT,
            StyleFlag::Superscript => FontStyle::SUPERSCRIPT,
            StyleFlag::Subscript => FontStyle::SUBSCRIPT,
            StyleFlag::Uppercase => FontStyle::UPPERCASE,
            StyleFlag::Lowercase => FontStyle::LOWERCASE,
            StyleFlag::SmallCaps => FontStyle::SMALLCAPS,
        }
    }
}

/// A set of active font styles.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FontStyle(u16);

impl FontStyle {
    pub const NORMAL: Self = FontStyle(0);
    pub const BOLD: Self = FontStyle(0x1);
    pub const ITALIC: Self = FontStyle(0x2);
    pub const UNDERLINE: Self = FontStyle(0x4);
    pub const LOWERCASE: Self = FontStyle(0x8);
    pub const UPPERCASE: Self = FontStyle(0x10);
    pub const SMALLCAPS: Self = FontStyle(0x20);
    pub const STRIKETHROUGH: Self = FontStyle(0x40);
    pub const SUPERSCRIPT: Self = FontStyle(0x80);
    pub const SUBSCRIPT: Self = FontStyle(0x100);
    pub const HIGHLIGHT: Self = FontStyle(0x200);

    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    pub const fn to_bits(self) -> u16 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all of the styles in `other` are set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }
}

impl BitOr for FontStyle {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FontStyle {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for FontStyle {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

/// One nesting counter per [`StyleFlag`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StyleToggleCounters {
    counters: [u8; StyleFlag::ALL.len()],
}

impl StyleToggleCounters {
    pub fn new() -> Self {
        Self::default()
    }

    /// The current nesting depth of `flag`.
    pub fn get(&self, flag: StyleFlag) -> u8 {
        self.counters[flag as usize]
    }

    /// Record an opening tag, returning the new depth.
    ///
    /// The counter wraps on overflow, so 256 unclosed tags turn the style off.
    pub fn increment(&mut self, flag: StyleFlag) -> u8 {
        let counter = &mut self.counters[flag as usize];
        *counter = counter.wrapping_add(1);
        *counter
    }

    /// Record a closing tag, returning the new depth.
    ///
    /// A return value of `0` means the style is now off. Decrementing an
    /// inactive flag is a no-op.
    pub fn decrement(&mut self, flag: StyleFlag) -> u8 {
        let counter = &mut self.counters[flag as usize];
        *counter = counter.saturating_sub(1);
        *counter
    }

    pub fn is_active(&self, flag: StyleFlag) -> bool {
        self.get(flag) > 0
    }

    /// Reset all counters to zero.
    pub fn clear(&mut self) {
        self.counters = Default::default();
    }

    /// The set of styles with a nonzero counter.
    pub fn active_styles(&self) -> FontStyle {
        StyleFlag::ALL
            .iter()
            .filter(|flag| self.is_active(**flag))
            .fold(FontStyle::NORMAL, |style, flag| style | flag.font_style())
    }
}
