//! The shaping rule records kept by a [`FeatureRecordStore`]
//!
//! [`FeatureRecordStore`]: super::FeatureRecordStore

use core::iter::Sum;
use core::ops::{Add, AddAssign};

use glyph_types::{FeatureLookupFlags, GlyphId, Point};

use crate::error::Error;

/// The position of an attachment anchor on a glyph, in design units.
pub type AnchorPoint = Point<i32>;

/// The offset of a mark's own anchor relative to its origin, in design units.
pub type MarkPositionAdjustment = Point<i32>;

/// Positioning offsets applied to a glyph.
///
/// Records from several rules for the same glyph are combined by adding them.
/// Sums saturate at the bounds of `i32`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueRecord {
    pub x_placement: i32,
    pub y_placement: i32,
    pub x_advance: i32,
    pub y_advance: i32,
}

impl ValueRecord {
    pub const fn new(x_placement: i32, y_placement: i32, x_advance: i32, y_advance: i32) -> Self {
        ValueRecord {
            x_placement,
            y_placement,
            x_advance,
            y_advance,
        }
    }

    pub fn with_x_placement(mut self, val: i32) -> Self {
        self.x_placement = val;
        self
    }

    pub fn with_y_placement(mut self, val: i32) -> Self {
        self.y_placement = val;
        self
    }

    pub fn with_x_advance(mut self, val: i32) -> Self {
        self.x_advance = val;
        self
    }

    pub fn with_y_advance(mut self, val: i32) -> Self {
        self.y_advance = val;
        self
    }

    /// `true` if every offset is zero.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }
}

impl Add for ValueRecord {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        ValueRecord {
            x_placement: self.x_placement.saturating_add(rhs.x_placement),
            y_placement: self.y_placement.saturating_add(rhs.y_placement),
            x_advance: self.x_advance.saturating_add(rhs.x_advance),
            y_advance: self.y_advance.saturating_add(rhs.y_advance),
        }
    }
}

impl AddAssign for ValueRecord {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sum for ValueRecord {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(ValueRecord::default(), Add::add)
    }
}

/// A glyph and the offsets to apply to it.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphAdjustmentRecord {
    pub glyph: GlyphId,
    pub value: ValueRecord,
}

impl GlyphAdjustmentRecord {
    pub fn new(glyph: GlyphId, value: ValueRecord) -> Self {
        GlyphAdjustmentRecord { glyph, value }
    }
}

/// A kerning rule: adjustments for the first and second glyph of a pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PairAdjustmentRecord {
    pub first: GlyphAdjustmentRecord,
    pub second: GlyphAdjustmentRecord,
    pub flags: FeatureLookupFlags,
}

impl PairAdjustmentRecord {
    pub fn new(first: GlyphAdjustmentRecord, second: GlyphAdjustmentRecord) -> Self {
        PairAdjustmentRecord {
            first,
            second,
            flags: FeatureLookupFlags::empty(),
        }
    }

    /// A pair that only moves the first glyph's advance.
    pub fn kerning(first: GlyphId, second: GlyphId, x_advance: i32) -> Self {
        Self::new(
            GlyphAdjustmentRecord::new(first, ValueRecord::default().with_x_advance(x_advance)),
            GlyphAdjustmentRecord::new(second, ValueRecord::default()),
        )
    }

    pub fn with_flags(mut self, flags: FeatureLookupFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// A ligature substitution: a sequence of component glyphs replaced by one glyph.
#[derive(Clone, Debug, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LigatureRecord {
    components: Vec<GlyphId>,
    ligature: GlyphId,
}

impl LigatureRecord {
    /// Create a new ligature record.
    ///
    /// Returns an error if `components` is empty.
    pub fn new(components: impl Into<Vec<GlyphId>>, ligature: GlyphId) -> Result<Self, Error> {
        let components = components.into();
        if components.is_empty() {
            return Err(Error::EmptyLigature(ligature));
        }
        Ok(LigatureRecord {
            components,
            ligature,
        })
    }

    /// The glyphs replaced by this ligature, in order.
    pub fn components(&self) -> &[GlyphId] {
        &self.components
    }

    /// The first component; `None` only for records that bypassed [`LigatureRecord::new`].
    pub fn first_component(&self) -> Option<GlyphId> {
        self.components.first().copied()
    }

    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    pub fn ligature(&self) -> GlyphId {
        self.ligature
    }

    /// `true` if this ligature's components are a prefix of `glyphs`.
    pub fn is_prefix_of(&self, glyphs: &[GlyphId]) -> bool {
        glyphs.starts_with(&self.components)
    }
}

impl PartialEq for LigatureRecord {
    fn eq(&self, other: &Self) -> bool {
        self.ligature == other.ligature
            && self.components.len() == other.components.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| a == b)
    }
}

/// Attachment of a mark glyph to a base glyph.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkToBaseRecord {
    pub base_glyph: GlyphId,
    pub base_anchor: AnchorPoint,
    pub mark_glyph: GlyphId,
    pub mark_adjustment: MarkPositionAdjustment,
}

impl MarkToBaseRecord {
    pub fn new(
        base_glyph: GlyphId,
        base_anchor: AnchorPoint,
        mark_glyph: GlyphId,
        mark_adjustment: MarkPositionAdjustment,
    ) -> Self {
        MarkToBaseRecord {
            base_glyph,
            base_anchor,
            mark_glyph,
            mark_adjustment,
        }
    }
}

/// Attachment of a combining mark to a preceding mark.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MarkToMarkRecord {
    pub base_mark_glyph: GlyphId,
    pub base_mark_anchor: AnchorPoint,
    pub combining_mark_glyph: GlyphId,
    pub combining_mark_adjustment: MarkPositionAdjustment,
}

impl MarkToMarkRecord {
    pub fn new(
        base_mark_glyph: GlyphId,
        base_mark_anchor: AnchorPoint,
        combining_mark_glyph: GlyphId,
        combining_mark_adjustment: MarkPositionAdjustment,
    ) -> Self {
        MarkToMarkRecord {
            base_mark_glyph,
            base_mark_anchor,
            combining_mark_glyph,
            combining_mark_adjustment,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    fn random_record(rng: &mut StdRng) -> ValueRecord {
        let mut component = || rng.gen_range(-10_000..10_000);
        ValueRecord::new(component(), component(), component(), component())
    }

    #[test]
    fn value_record_algebra() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            let a = random_record(&mut rng);
            let b = random_record(&mut rng);
            let c = random_record(&mut rng);
            assert_eq!((a + b) + c, a + (b + c));
            assert_eq!(a + b, b + a);
            assert_eq!(a + ValueRecord::default(), a);
        }
    }

    #[test]
    fn value_record_sum() {
        let total: ValueRecord = [
            ValueRecord::new(1, 2, 3, 4),
            ValueRecord::default().with_x_advance(-10),
            ValueRecord::default().with_y_placement(5),
        ]
        .into_iter()
        .sum();
        assert_eq!(total, ValueRecord::new(1, 7, -7, 4));

        let mut acc = ValueRecord::default();
        acc += ValueRecord::default().with_y_advance(3);
        assert_eq!(acc.y_advance, 3);
        assert!(!acc.is_zero());
        assert!(ValueRecord::default().is_zero());
    }

    #[test]
    fn value_record_sum_saturates() {
        let max = ValueRecord::default().with_x_advance(i32::MAX);
        let sum = max + ValueRecord::default().with_x_advance(1);
        assert_eq!(sum.x_advance, i32::MAX);
        let min = ValueRecord::new(i32::MIN, 0, 0, i32::MIN);
        let sum = min + ValueRecord::new(-1, 1, 0, -5);
        assert_eq!(sum, ValueRecord::new(i32::MIN, 1, 0, i32::MIN));
    }

    #[test]
    fn empty_ligature_rejected() {
        let err = LigatureRecord::new(Vec::new(), GlyphId::new(9)).unwrap_err();
        assert_eq!(err, Error::EmptyLigature(GlyphId::new(9)));
    }

    #[test]
    fn ligature_equality() {
        let gids = |ids: &[u32]| ids.iter().copied().map(GlyphId::new).collect::<Vec<_>>();
        let lig = LigatureRecord::new(gids(&[1, 2]), GlyphId::new(10)).unwrap();
        let same = LigatureRecord::new(gids(&[1, 2]), GlyphId::new(10)).unwrap();
        let longer = LigatureRecord::new(gids(&[1, 2, 3]), GlyphId::new(10)).unwrap();
        let other_target = LigatureRecord::new(gids(&[1, 2]), GlyphId::new(11)).unwrap();
        assert_eq!(lig, same);
        assert_ne!(lig, longer);
        assert_ne!(lig, other_target);
        assert!(lig.is_prefix_of(&gids(&[1, 2, 3])));
        assert!(!longer.is_prefix_of(&gids(&[1, 2])));
    }

    #[test]
    fn kerning_pair_shorthand() {
        let pair = PairAdjustmentRecord::kerning(GlyphId::new(1), GlyphId::new(2), -50)
            .with_flags(FeatureLookupFlags::IGNORE_SPACING_ADJUSTMENTS);
        assert_eq!(pair.first.value.x_advance, -50);
        assert!(pair.second.value.is_zero());
        assert!(pair.flags.ignore_spacing_adjustments());
    }
}
