//! Color values used by markup tags

use core::fmt;

use crate::classify::{hash_ascii_case_insensitive, hash_case_insensitive};
use crate::error::Error;

/// An 8-bit per channel RGBA color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

const NAMED_COLORS: &[(i32, Rgba8)] = &[
    (hash_ascii_case_insensitive(b"red"), Rgba8::new(255, 0, 0, 255)),
    (hash_ascii_case_insensitive(b"lightblue"), Rgba8::new(173, 216, 230, 255)),
    (hash_ascii_case_insensitive(b"blue"), Rgba8::new(0, 0, 255, 255)),
    (hash_ascii_case_insensitive(b"grey"), Rgba8::new(128, 128, 128, 255)),
    (hash_ascii_case_insensitive(b"black"), Rgba8::BLACK),
    (hash_ascii_case_insensitive(b"green"), Rgba8::new(0, 255, 0, 255)),
    (hash_ascii_case_insensitive(b"white"), Rgba8::WHITE),
    (hash_ascii_case_insensitive(b"orange"), Rgba8::new(255, 128, 0, 255)),
    (hash_ascii_case_insensitive(b"purple"), Rgba8::new(160, 32, 240, 255)),
    (hash_ascii_case_insensitive(b"yellow"), Rgba8::new(255, 235, 4, 255)),
];

impl Rgba8 {
    pub const BLACK: Rgba8 = Rgba8::new(0, 0, 0, 255);
    pub const WHITE: Rgba8 = Rgba8::new(255, 255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Rgba8 { r, g, b, a }
    }

    /// Return this color with its alpha capped at `alpha`.
    pub fn with_max_alpha(self, alpha: u8) -> Self {
        Rgba8 {
            a: self.a.min(alpha),
            ..self
        }
    }

    /// Parse `#RGB`, `#RGBA`, `#RRGGBB` or `#RRGGBBAA`.
    ///
    /// Short forms repeat each digit, so `#f80` is `#ff8800`. A missing alpha
    /// is opaque.
    pub fn from_hex(s: &str) -> Result<Self, Error> {
        let invalid = || Error::InvalidColor(s.to_owned());
        let digits = s.strip_prefix('#').ok_or_else(invalid)?;
        let nibbles = digits
            .chars()
            .map(|c| c.to_digit(16).map(|d| d as u8))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(invalid)?;

        let channels: Vec<u8> = match nibbles.len() {
            3 | 4 => nibbles.iter().map(|n| n * 16 + n).collect(),
            6 | 8 => nibbles.chunks(2).map(|pair| pair[0] * 16 + pair[1]).collect(),
            _ => return Err(invalid()),
        };
        let alpha = channels.get(3).copied().unwrap_or(255);
        Ok(Rgba8::new(channels[0], channels[1], channels[2], alpha))
    }

    /// Look up one of the named colors, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        Self::from_name_hash(hash_case_insensitive(name))
    }

    /// Look up a named color by the case-insensitive hash of its name.
    pub fn from_name_hash(hash: i32) -> Option<Self> {
        NAMED_COLORS
            .iter()
            .find_map(|(name_hash, color)| (*name_hash == hash).then_some(*color))
    }

    /// Parse a hex color or a color name.
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.starts_with('#') {
            Self::from_hex(s)
        } else {
            Self::from_name(s).ok_or_else(|| Error::InvalidColor(s.to_owned()))
        }
    }
}

impl fmt::Display for Rgba8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
    }
}
