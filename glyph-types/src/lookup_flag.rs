//! The feature lookup flag type.
//!
//! This mirrors the flags that travel with an imported pair adjustment
//! record. Only a couple of bits have meaning to the layout pass, but unknown
//! bits are preserved so records survive a round trip.

use core::ops::{BitAnd, BitOr, BitOrAssign};

/// Flags modifying how an imported shaping rule participates in layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureLookupFlags(u32);

impl BitOr for FeatureLookupFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for FeatureLookupFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0
    }
}

impl BitAnd for FeatureLookupFlags {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        Self(self.0 & rhs.0)
    }
}

impl FeatureLookupFlags {
    /// No flags set.
    pub const NONE: Self = FeatureLookupFlags(0);
    /// If set, the rule skips over ligatures formed by an earlier lookup.
    pub const IGNORE_LIGATURES: Self = FeatureLookupFlags(0x0004);
    /// If set, character spacing is not applied on top of this adjustment.
    pub const IGNORE_SPACING_ADJUSTMENTS: Self = FeatureLookupFlags(0x0100);

    /// Return new, empty flags
    pub const fn empty() -> Self {
        Self::NONE
    }

    /// Construct flags from a raw value, keeping every bit.
    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    /// Raw transmutation to u32.
    pub const fn to_bits(self) -> u32 {
        self.0
    }

    /// Returns `true` if no flags are set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Returns `true` if all of the flags in `other` are contained within `self`.
    #[inline]
    pub const fn contains(&self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// `true` if ligatures formed elsewhere should be skipped.
    pub const fn ignore_ligatures(self) -> bool {
        self.contains(Self::IGNORE_LIGATURES)
    }

    /// `true` if character spacing should be suppressed for this pair.
    pub const fn ignore_spacing_adjustments(self) -> bool {
        self.contains(Self::IGNORE_SPACING_ADJUSTMENTS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combine_and_query() {
        let flags = FeatureLookupFlags::IGNORE_LIGATURES;
        assert!(flags.ignore_ligatures());
        assert!(!flags.ignore_spacing_adjustments());

        let mut flags = flags;
        flags |= FeatureLookupFlags::IGNORE_SPACING_ADJUSTMENTS;
        assert!(flags.ignore_spacing_adjustments());
        assert_eq!(flags.to_bits(), 0x0104);
        assert_eq!(
            flags & FeatureLookupFlags::IGNORE_LIGATURES,
            FeatureLookupFlags::IGNORE_LIGATURES
        );
    }

    #[test]
    fn unknown_bits_are_kept() {
        let flags = FeatureLookupFlags::from_bits(0x8001);
        assert_eq!(flags.to_bits(), 0x8001);
        assert!(!flags.is_empty());
        assert!(FeatureLookupFlags::empty().is_empty());
    }
}
