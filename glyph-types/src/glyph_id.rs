//! Glyph Identifiers
//!
//! Shaping records store glyph indices as full 32-bit values, even though
//! packed lookup keys only preserve the low 16 bits of each index.

/// A 32-bit glyph identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "bytemuck",
    derive(bytemuck_derive::AnyBitPattern, bytemuck_derive::NoUninit)
)]
#[repr(transparent)]
pub struct GlyphId(u32);

impl GlyphId {
    /// The identifier reserved for unknown glyphs
    pub const NOTDEF: GlyphId = GlyphId(0);

    /// Construct a new `GlyphId`.
    pub const fn new(raw: u32) -> Self {
        GlyphId(raw)
    }

    /// The identifier as a u32.
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// The low 16 bits of the identifier.
    ///
    /// This is the portion that participates in a [`GlyphPairKey`]; any
    /// higher bits are discarded.
    ///
    /// [`GlyphPairKey`]: crate::GlyphPairKey
    pub const fn to_u16_truncated(self) -> u16 {
        self.0 as u16
    }

    /// `true` if this identifier survives packing into a pair key unchanged.
    pub const fn fits_in_u16(self) -> bool {
        self.0 <= u16::MAX as u32
    }
}

impl Default for GlyphId {
    fn default() -> Self {
        GlyphId::NOTDEF
    }
}

impl From<u16> for GlyphId {
    fn from(value: u16) -> Self {
        GlyphId(value as u32)
    }
}

impl From<u32> for GlyphId {
    fn from(value: u32) -> Self {
        GlyphId(value)
    }
}

impl From<GlyphId> for u32 {
    fn from(value: GlyphId) -> Self {
        value.0
    }
}

impl std::fmt::Display for GlyphId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GID_{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation() {
        assert!(GlyphId::new(0xFFFF).fits_in_u16());
        assert!(!GlyphId::new(0x1_0000).fits_in_u16());
        assert_eq!(GlyphId::new(0x1_0042).to_u16_truncated(), 0x42);
    }

    #[test]
    fn display() {
        assert_eq!(format!("{}", GlyphId::new(512)), "GID_512");
    }
}
