//! Glyph substitution and positioning records, and the lookups built from them
//!
//! A [`FeatureRecordStore`] holds four lists of records, usually imported
//! from a font's layout tables:
//!
//! - ligature substitutions ([`LigatureRecord`])
//! - pair adjustments, i.e. kerning ([`PairAdjustmentRecord`])
//! - mark-to-base attachments ([`MarkToBaseRecord`])
//! - mark-to-mark attachments ([`MarkToMarkRecord`])
//!
//! The record lists are the source of truth. Queries go through lookup maps
//! that are only rebuilt by [`FeatureRecordStore::build_lookups`]; records
//! added afterwards are not visible until the next build.
//!
//! ```
//! # use rich_shaping::features::{FeatureRecordStore, LigatureRecord};
//! # use glyph_types::GlyphId;
//! let f = GlyphId::new(0x66);
//! let mut store = FeatureRecordStore::default();
//! store.add_ligature(LigatureRecord::new([f, f], GlyphId::new(0x200)).unwrap());
//! store.build_lookups();
//!
//! let lig = store.try_get_ligature(&[f, f]).unwrap();
//! assert_eq!(lig.ligature(), GlyphId::new(0x200));
//! ```

pub mod kerning;
mod records;

use std::collections::hash_map::Entry;

use fnv::FnvHashMap;
use glyph_types::{GlyphId, GlyphPairKey};
use indexmap::IndexMap;

pub use records::{
    AnchorPoint, GlyphAdjustmentRecord, LigatureRecord, MarkPositionAdjustment, MarkToBaseRecord,
    MarkToMarkRecord, PairAdjustmentRecord, ValueRecord,
};

/// The outcome of [`FeatureRecordStore::build_lookups`].
///
/// Pair, mark-to-base and mark-to-mark records are keyed by a packed
/// [`GlyphPairKey`]. When two records share a key (because they name the
/// same glyphs, or because glyph ids above `0xFFFF` alias after truncation)
/// the first one is kept and the later one is dropped and counted here.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LookupReport {
    /// Number of distinct first components with at least one ligature.
    pub ligature_groups: usize,
    pub pair_adjustments: usize,
    pub mark_to_base: usize,
    pub mark_to_mark: usize,
    /// Ligature records with no components, which cannot be looked up.
    pub skipped_empty_ligatures: usize,
    pub dropped_pair_adjustments: usize,
    pub dropped_mark_to_base: usize,
    pub dropped_mark_to_mark: usize,
}

impl LookupReport {
    /// The total number of records that did not make it into a lookup.
    pub fn dropped(&self) -> usize {
        self.skipped_empty_ligatures
            + self.dropped_pair_adjustments
            + self.dropped_mark_to_base
            + self.dropped_mark_to_mark
    }
}

#[derive(Clone, Debug, Default)]
struct Lookups {
    ligatures: IndexMap<GlyphId, Vec<LigatureRecord>>,
    pair_adjustments: FnvHashMap<GlyphPairKey, PairAdjustmentRecord>,
    mark_to_base: FnvHashMap<GlyphPairKey, MarkToBaseRecord>,
    mark_to_mark: FnvHashMap<GlyphPairKey, MarkToMarkRecord>,
}

impl Lookups {
    fn clear(&mut self) {
        self.ligatures.clear();
        self.pair_adjustments.clear();
        self.mark_to_base.clear();
        self.mark_to_mark.clear();
    }
}

/// Insert `record` unless `key` is taken; returns `false` if it was dropped.
fn insert_first<R: Copy + std::fmt::Debug>(
    map: &mut FnvHashMap<GlyphPairKey, R>,
    key: GlyphPairKey,
    record: &R,
) -> bool {
    match map.entry(key) {
        Entry::Occupied(existing) => {
            log::debug!(
                "key {key} already maps to {:?}, dropping {record:?}",
                existing.get()
            );
            false
        }
        Entry::Vacant(slot) => {
            slot.insert(*record);
            true
        }
    }
}

/// Shaping rules for one font, with lookups for querying them.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FeatureRecordStore {
    ligature_records: Vec<LigatureRecord>,
    pair_adjustment_records: Vec<PairAdjustmentRecord>,
    mark_to_base_records: Vec<MarkToBaseRecord>,
    mark_to_mark_records: Vec<MarkToMarkRecord>,
    #[cfg_attr(feature = "serde", serde(skip))]
    lookups: Lookups,
}

impl FeatureRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_ligature(&mut self, record: LigatureRecord) {
        self.ligature_records.push(record);
    }

    pub fn add_pair_adjustment(&mut self, record: PairAdjustmentRecord) {
        self.pair_adjustment_records.push(record);
    }

    pub fn add_mark_to_base(&mut self, record: MarkToBaseRecord) {
        self.mark_to_base_records.push(record);
    }

    pub fn add_mark_to_mark(&mut self, record: MarkToMarkRecord) {
        self.mark_to_mark_records.push(record);
    }

    pub fn ligature_records(&self) -> &[LigatureRecord] {
        &self.ligature_records
    }

    pub fn pair_adjustment_records(&self) -> &[PairAdjustmentRecord] {
        &self.pair_adjustment_records
    }

    pub fn mark_to_base_records(&self) -> &[MarkToBaseRecord] {
        &self.mark_to_base_records
    }

    pub fn mark_to_mark_records(&self) -> &[MarkToMarkRecord] {
        &self.mark_to_mark_records
    }

    /// `true` if the store holds no records at all.
    pub fn is_empty(&self) -> bool {
        self.ligature_records.is_empty()
            && self.pair_adjustment_records.is_empty()
            && self.mark_to_base_records.is_empty()
            && self.mark_to_mark_records.is_empty()
    }

    /// Remove all records and lookups.
    pub fn clear(&mut self) {
        self.ligature_records.clear();
        self.pair_adjustment_records.clear();
        self.mark_to_base_records.clear();
        self.mark_to_mark_records.clear();
        self.lookups.clear();
    }

    /// Rebuild all lookups from the current record lists.
    ///
    /// Ligatures are grouped by their first component, keeping every record
    /// in insertion order. For the keyed lookups the first record inserted
    /// for a key wins; see [`LookupReport`].
    pub fn build_lookups(&mut self) -> LookupReport {
        let mut report = LookupReport::default();
        let lookups = &mut self.lookups;
        lookups.clear();

        for record in &self.ligature_records {
            let Some(first) = record.first_component() else {
                log::warn!("ligature {} has no components, skipping", record.ligature());
                report.skipped_empty_ligatures += 1;
                continue;
            };
            lookups
                .ligatures
                .entry(first)
                .or_default()
                .push(record.clone());
        }

        for record in &self.pair_adjustment_records {
            let key = GlyphPairKey::new(record.first.glyph, record.second.glyph);
            if !insert_first(&mut lookups.pair_adjustments, key, record) {
                report.dropped_pair_adjustments += 1;
            }
        }

        for record in &self.mark_to_base_records {
            let key = GlyphPairKey::new(record.base_glyph, record.mark_glyph);
            if !insert_first(&mut lookups.mark_to_base, key, record) {
                report.dropped_mark_to_base += 1;
            }
        }

        for record in &self.mark_to_mark_records {
            let key = GlyphPairKey::new(record.base_mark_glyph, record.combining_mark_glyph);
            if !insert_first(&mut lookups.mark_to_mark, key, record) {
                report.dropped_mark_to_mark += 1;
            }
        }

        report.ligature_groups = lookups.ligatures.len();
        report.pair_adjustments = lookups.pair_adjustments.len();
        report.mark_to_base = lookups.mark_to_base.len();
        report.mark_to_mark = lookups.mark_to_mark.len();
        log::debug!(
            "built lookups: {} ligature groups, {} pairs, {} mark-to-base, {} mark-to-mark ({} dropped)",
            report.ligature_groups,
            report.pair_adjustments,
            report.mark_to_base,
            report.mark_to_mark,
            report.dropped(),
        );
        report
    }

    /// Sort the positioning records by glyph.
    ///
    /// Pairs are ordered by (first, second), mark-to-base by (base, mark) and
    /// mark-to-mark by (base mark, combining mark). The sort is stable, so
    /// the first-inserted-wins order between duplicates is preserved.
    /// Ligatures keep their order. Lookups are not rebuilt.
    pub fn sort_records(&mut self) {
        self.pair_adjustment_records
            .sort_by_key(|rec| (rec.first.glyph, rec.second.glyph));
        self.mark_to_base_records
            .sort_by_key(|rec| (rec.base_glyph, rec.mark_glyph));
        self.mark_to_mark_records
            .sort_by_key(|rec| (rec.base_mark_glyph, rec.combining_mark_glyph));
    }

    /// All ligatures starting with `first`, in insertion order.
    pub fn ligature_candidates(&self, first: GlyphId) -> &[LigatureRecord] {
        self.lookups
            .ligatures
            .get(&first)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Find the ligature whose components are exactly `components`.
    ///
    /// If several records match, the first one added is returned.
    pub fn try_get_ligature(&self, components: &[GlyphId]) -> Option<&LigatureRecord> {
        let first = *components.first()?;
        self.ligature_candidates(first)
            .iter()
            .find(|rec| rec.components() == components)
    }

    /// Find the longest ligature whose components are a prefix of `glyphs`.
    ///
    /// Among equally long matches the first one added wins.
    pub fn match_ligature(&self, glyphs: &[GlyphId]) -> Option<&LigatureRecord> {
        let first = *glyphs.first()?;
        self.ligature_candidates(first)
            .iter()
            .filter(|rec| rec.is_prefix_of(glyphs))
            .fold(None, |best: Option<&LigatureRecord>, rec| match best {
                Some(best) if best.component_count() >= rec.component_count() => Some(best),
                _ => Some(rec),
            })
    }

    /// The pair adjustment for `first` followed by `second`.
    pub fn try_get_pair_adjustment(
        &self,
        first: GlyphId,
        second: GlyphId,
    ) -> Option<&PairAdjustmentRecord> {
        self.lookups
            .pair_adjustments
            .get(&GlyphPairKey::new(first, second))
    }

    /// The attachment of `mark` onto `base`.
    pub fn try_get_mark_to_base(&self, base: GlyphId, mark: GlyphId) -> Option<&MarkToBaseRecord> {
        self.lookups
            .mark_to_base
            .get(&GlyphPairKey::new(base, mark))
    }

    /// The attachment of `combining_mark` onto `base_mark`.
    pub fn try_get_mark_to_mark(
        &self,
        base_mark: GlyphId,
        combining_mark: GlyphId,
    ) -> Option<&MarkToMarkRecord> {
        self.lookups
            .mark_to_mark
            .get(&GlyphPairKey::new(base_mark, combining_mark))
    }
}
