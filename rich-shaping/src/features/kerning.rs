//! The legacy kerning table
//!
//! Older font assets carry a flat list of kerning pairs instead of pair
//! adjustment records. The table can still be edited, and is upgraded into a
//! [`FeatureRecordStore`] before layout.

use glyph_types::{FeatureLookupFlags, GlyphId};

use super::{FeatureRecordStore, GlyphAdjustmentRecord, PairAdjustmentRecord, ValueRecord};
use crate::error::Error;

/// A single kerning pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KerningPair {
    pub first: GlyphAdjustmentRecord,
    pub second: GlyphAdjustmentRecord,
    pub ignore_spacing_adjustments: bool,
}

impl KerningPair {
    /// A pair that moves the second glyph by `x_offset`.
    ///
    /// The offset is stored as the first glyph's advance.
    pub fn new(first: GlyphId, second: GlyphId, x_offset: i32) -> Self {
        KerningPair {
            first: GlyphAdjustmentRecord::new(first, ValueRecord::default().with_x_advance(x_offset)),
            second: GlyphAdjustmentRecord::new(second, ValueRecord::default()),
            ignore_spacing_adjustments: false,
        }
    }

    /// The horizontal offset between the two glyphs.
    pub fn x_offset(&self) -> i32 {
        self.first.value.x_advance
    }

    fn glyphs(&self) -> (GlyphId, GlyphId) {
        (self.first.glyph, self.second.glyph)
    }

    fn to_pair_adjustment(self) -> PairAdjustmentRecord {
        let flags = if self.ignore_spacing_adjustments {
            FeatureLookupFlags::IGNORE_SPACING_ADJUSTMENTS
        } else {
            FeatureLookupFlags::empty()
        };
        PairAdjustmentRecord::new(self.first, self.second).with_flags(flags)
    }
}

/// An editable list of kerning pairs, at most one per glyph pair.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct KerningTable {
    pairs: Vec<KerningPair>,
}

impl KerningTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pairs(&self) -> &[KerningPair] {
        &self.pairs
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Find the pair for `first` followed by `second`.
    pub fn get(&self, first: GlyphId, second: GlyphId) -> Option<&KerningPair> {
        self.pairs.iter().find(|pair| pair.glyphs() == (first, second))
    }

    fn insert(&mut self, pair: KerningPair) -> Result<(), Error> {
        let (first, second) = pair.glyphs();
        if self.get(first, second).is_some() {
            return Err(Error::DuplicatePair { first, second });
        }
        self.pairs.push(pair);
        Ok(())
    }

    /// Add a pair that offsets `second` horizontally by `x_offset`.
    ///
    /// Returns an error if the table already has a pair for these glyphs.
    pub fn add_kerning_pair(
        &mut self,
        first: GlyphId,
        second: GlyphId,
        x_offset: i32,
    ) -> Result<(), Error> {
        self.insert(KerningPair::new(first, second, x_offset))
    }

    /// Add a pair with full adjustments for both glyphs.
    ///
    /// Returns an error if the table already has a pair for these glyphs.
    pub fn add_glyph_pair_adjustment(
        &mut self,
        first: GlyphAdjustmentRecord,
        second: GlyphAdjustmentRecord,
    ) -> Result<(), Error> {
        self.insert(KerningPair {
            first,
            second,
            ignore_spacing_adjustments: false,
        })
    }

    /// Remove the pair for these glyphs, returning it if it existed.
    pub fn remove_pair(&mut self, first: GlyphId, second: GlyphId) -> Option<KerningPair> {
        let idx = self
            .pairs
            .iter()
            .position(|pair| pair.glyphs() == (first, second))?;
        Some(self.pairs.remove(idx))
    }

    /// Sort pairs by first glyph, then second glyph.
    pub fn sort_pairs(&mut self) {
        self.pairs.sort_by_key(KerningPair::glyphs);
    }

    /// Move every pair into `store` as a pair adjustment record.
    ///
    /// The table is empty afterwards. Lookups in `store` are not rebuilt.
    pub fn upgrade_into(&mut self, store: &mut FeatureRecordStore) {
        log::debug!("upgrading {} kerning pairs", self.pairs.len());
        for pair in self.pairs.drain(..) {
            store.add_pair_adjustment(pair.to_pair_adjustment());
        }
    }
}
