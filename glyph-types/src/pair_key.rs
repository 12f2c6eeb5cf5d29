//! Packed keys for glyph pair lookups

use crate::GlyphId;

/// Two glyph identifiers packed into a single 32-bit lookup key.
///
/// The key is `(second << 16) | first`, with each identifier truncated to
/// its low 16 bits. Identifiers above `0xFFFF` therefore alias: distinct
/// pairs can produce the same key. Use [`GlyphPairKey::new_checked`] when
/// the caller wants to detect this.
///
/// Keys are only ever compared, so the decomposition accessors exist for
/// diagnostics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "bytemuck",
    derive(bytemuck_derive::AnyBitPattern, bytemuck_derive::NoUninit)
)]
#[repr(transparent)]
pub struct GlyphPairKey(u32);

impl GlyphPairKey {
    /// Pack two glyphs into a key, discarding the high bits of each.
    pub const fn new(first: GlyphId, second: GlyphId) -> Self {
        Self::from_raw_pair(first.to_u32(), second.to_u32())
    }

    /// Pack two raw glyph indices into a key, discarding the high bits of each.
    pub const fn from_raw_pair(first: u32, second: u32) -> Self {
        GlyphPairKey(((second & 0xFFFF) << 16) | (first & 0xFFFF))
    }

    /// Attempt to pack two glyphs, failing if either would be truncated.
    pub const fn new_checked(first: GlyphId, second: GlyphId) -> Result<Self, InvalidGlyphPair> {
        if !first.fits_in_u16() {
            return Err(InvalidGlyphPair::FirstOutOfRange(first));
        }
        if !second.fits_in_u16() {
            return Err(InvalidGlyphPair::SecondOutOfRange(second));
        }
        Ok(Self::new(first, second))
    }

    /// The raw key.
    pub const fn to_u32(self) -> u32 {
        self.0
    }

    /// The (truncated) first glyph of the pair.
    pub const fn first(self) -> GlyphId {
        GlyphId::new(self.0 & 0xFFFF)
    }

    /// The (truncated) second glyph of the pair.
    pub const fn second(self) -> GlyphId {
        GlyphId::new(self.0 >> 16)
    }
}

impl std::fmt::Display for GlyphPairKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010X}", self.0)
    }
}

/// An error returned when a glyph pair cannot be packed without loss.
///
/// This is returned from [`GlyphPairKey::new_checked`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum InvalidGlyphPair {
    /// The first glyph does not fit in 16 bits.
    FirstOutOfRange(GlyphId),
    /// The second glyph does not fit in 16 bits.
    SecondOutOfRange(GlyphId),
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidGlyphPair {}

impl std::fmt::Display for InvalidGlyphPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidGlyphPair::FirstOutOfRange(gid) => {
                write!(f, "first glyph {gid} does not fit in a pair key")
            }
            InvalidGlyphPair::SecondOutOfRange(gid) => {
                write!(f, "second glyph {gid} does not fit in a pair key")
            }
        }
    }
}
