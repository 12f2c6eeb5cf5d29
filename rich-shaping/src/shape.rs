//! Apply the rules in a [`FeatureRecordStore`] to a run of glyphs
//!
//! Shaping happens in three stages:
//!
//! 1. ligature substitution, longest match first
//! 2. kerning, where each glyph collects the adjustments of the pairs it
//!    takes part in on either side
//! 3. mark attachment, positioning non-base glyphs relative to the preceding
//!    mark or base glyph
//!
//! The output carries offsets in design units. Scaling and accumulating
//! advances into pen positions is up to the caller.

use glyph_types::GlyphId;

use crate::classify;
use crate::features::{AnchorPoint, FeatureRecordStore, MarkPositionAdjustment, ValueRecord};

/// Which shaping features are applied.
///
/// All features are enabled by default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ShapingOptions {
    pub ligatures: bool,
    pub kerning: bool,
    pub mark_to_base: bool,
    pub mark_to_mark: bool,
}

impl Default for ShapingOptions {
    fn default() -> Self {
        ShapingOptions {
            ligatures: true,
            kerning: true,
            mark_to_base: true,
            mark_to_mark: true,
        }
    }
}

impl ShapingOptions {
    pub fn with_ligatures(mut self, enabled: bool) -> Self {
        self.ligatures = enabled;
        self
    }

    pub fn with_kerning(mut self, enabled: bool) -> Self {
        self.kerning = enabled;
        self
    }

    pub fn with_mark_to_base(mut self, enabled: bool) -> Self {
        self.mark_to_base = enabled;
        self
    }

    pub fn with_mark_to_mark(mut self, enabled: bool) -> Self {
        self.mark_to_mark = enabled;
        self
    }
}

/// A character and the glyph it was mapped to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShapingInput {
    pub codepoint: u32,
    pub glyph: GlyphId,
}

impl ShapingInput {
    pub fn new(codepoint: u32, glyph: GlyphId) -> Self {
        ShapingInput { codepoint, glyph }
    }
}

/// A glyph produced by [`shape`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ShapedGlyph {
    pub glyph: GlyphId,
    /// The code point of the first input this glyph covers.
    pub codepoint: u32,
    /// Index of the first input this glyph covers.
    pub cluster: usize,
    /// Number of inputs covered; greater than one for ligatures.
    pub component_count: usize,
    pub adjustment: ValueRecord,
    /// For attached marks, the index of the glyph in the output they are
    /// positioned against. Placement offsets are relative to that glyph's
    /// origin.
    pub attached_to: Option<usize>,
    /// If set, character spacing should not be added after this glyph.
    pub ignore_spacing: bool,
}

impl ShapedGlyph {
    fn from_input(cluster: usize, input: &ShapingInput) -> Self {
        ShapedGlyph {
            glyph: input.glyph,
            codepoint: input.codepoint,
            cluster,
            component_count: 1,
            ..Default::default()
        }
    }

    fn attach(&mut self, target: usize, anchor: AnchorPoint, adjustment: MarkPositionAdjustment) {
        let offset = anchor.saturating_sub(adjustment);
        self.adjustment.x_placement = offset.x;
        self.adjustment.y_placement = offset.y;
        self.attached_to = Some(target);
        self.ignore_spacing = true;
    }
}

/// Shape a run of glyphs.
///
/// The store's lookups must have been built with
/// [`FeatureRecordStore::build_lookups`].
pub fn shape(
    store: &FeatureRecordStore,
    input: &[ShapingInput],
    options: ShapingOptions,
) -> Vec<ShapedGlyph> {
    let mut glyphs = substitute_ligatures(store, input, options.ligatures);
    if options.kerning {
        apply_kerning(store, &mut glyphs);
    }
    if options.mark_to_base || options.mark_to_mark {
        attach_marks(store, &mut glyphs, options);
    }
    glyphs
}

fn substitute_ligatures(
    store: &FeatureRecordStore,
    input: &[ShapingInput],
    enabled: bool,
) -> Vec<ShapedGlyph> {
    let mut out = Vec::with_capacity(input.len());
    if !enabled {
        out.extend(input.iter().enumerate().map(|(i, inp)| ShapedGlyph::from_input(i, inp)));
        return out;
    }

    let glyph_ids: Vec<GlyphId> = input.iter().map(|inp| inp.glyph).collect();
    let mut i = 0;
    while i < input.len() {
        let mut shaped = ShapedGlyph::from_input(i, &input[i]);
        if let Some(lig) = store.match_ligature(&glyph_ids[i..]) {
            log::trace!(
                "ligature {} replaces {} glyphs at {i}",
                lig.ligature(),
                lig.component_count()
            );
            shaped.glyph = lig.ligature();
            shaped.component_count = lig.component_count();
        }
        i += shaped.component_count;
        out.push(shaped);
    }
    out
}

fn apply_kerning(store: &FeatureRecordStore, glyphs: &mut [ShapedGlyph]) {
    for i in 0..glyphs.len() {
        let current = glyphs[i].glyph;
        let mut value = ValueRecord::default();
        let mut ignore_spacing = false;

        if let Some(next) = glyphs.get(i + 1) {
            if let Some(pair) = store.try_get_pair_adjustment(current, next.glyph) {
                value += pair.first.value;
                ignore_spacing |= pair.flags.ignore_spacing_adjustments();
            }
        }
        if let Some(prev) = i.checked_sub(1).map(|prev| glyphs[prev].glyph) {
            if let Some(pair) = store.try_get_pair_adjustment(prev, current) {
                value += pair.second.value;
                ignore_spacing |= pair.flags.ignore_spacing_adjustments();
            }
        }

        let glyph = &mut glyphs[i];
        glyph.adjustment += value;
        glyph.ignore_spacing |= ignore_spacing;
    }
}

fn attach_marks(store: &FeatureRecordStore, glyphs: &mut [ShapedGlyph], options: ShapingOptions) {
    let mut last_base: Option<usize> = None;
    for i in 0..glyphs.len() {
        if classify::is_base_glyph(glyphs[i].codepoint) {
            last_base = Some(i);
            continue;
        }
        if i == 0 {
            continue;
        }
        let mark = glyphs[i].glyph;

        if last_base == Some(i - 1) {
            if options.mark_to_base {
                attach_to_base(store, glyphs, i, i - 1);
            }
            continue;
        }

        let mut attached = false;
        if options.mark_to_mark {
            let stop = last_base.map(|base| base + 1).unwrap_or(0);
            for prev in (stop..i).rev() {
                if let Some(rec) = store.try_get_mark_to_mark(glyphs[prev].glyph, mark) {
                    glyphs[i].attach(
                        prev,
                        rec.base_mark_anchor,
                        rec.combining_mark_adjustment,
                    );
                    log::trace!("mark {mark} attached to mark at {prev}");
                    attached = true;
                    break;
                }
            }
        }
        if !attached && options.mark_to_base {
            if let Some(base) = last_base {
                attach_to_base(store, glyphs, i, base);
            }
        }
    }
}

fn attach_to_base(store: &FeatureRecordStore, glyphs: &mut [ShapedGlyph], mark: usize, base: usize) {
    let mark_glyph = glyphs[mark].glyph;
    if let Some(rec) = store.try_get_mark_to_base(glyphs[base].glyph, mark_glyph) {
        glyphs[mark].attach(base, rec.base_anchor, rec.mark_adjustment);
        log::trace!("mark {mark_glyph} attached to base at {base}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{
        GlyphAdjustmentRecord, LigatureRecord, MarkToBaseRecord, MarkToMarkRecord,
        PairAdjustmentRecord,
    };
    use glyph_types::FeatureLookupFlags;
    use pretty_assertions::assert_eq;

    const ACUTE: u32 = 0x0301;
    const DOT_BELOW: u32 = 0x0323;

    fn gid(raw: u32) -> GlyphId {
        GlyphId::new(raw)
    }

    /// Maps each char to a glyph with the same id.
    fn run(text: &str) -> Vec<ShapingInput> {
        text.chars()
            .map(|c| ShapingInput::new(c as u32, gid(c as u32)))
            .collect()
    }

    fn ids(glyphs: &[ShapedGlyph]) -> Vec<u32> {
        glyphs.iter().map(|g| g.glyph.to_u32()).collect()
    }

    #[test]
    fn ligatures_then_rest() {
        let mut store = FeatureRecordStore::new();
        store.add_ligature(LigatureRecord::new([gid(0x66), gid(0x66)], gid(0x200)).unwrap());
        store.add_ligature(
            LigatureRecord::new([gid(0x66), gid(0x66), gid(0x69)], gid(0x201)).unwrap(),
        );
        store.build_lookups();

        let shaped = shape(&store, &run("offffig"), ShapingOptions::default());
        assert_eq!(ids(&shaped), vec![0x6F, 0x200, 0x201, 0x67]);
        assert_eq!(shaped[1].cluster, 1);
        assert_eq!(shaped[1].component_count, 2);
        assert_eq!(shaped[2].cluster, 3);
        assert_eq!(shaped[3].cluster, 6);

        let plain = shape(
            &store,
            &run("offffig"),
            ShapingOptions::default().with_ligatures(false),
        );
        assert_eq!(plain.len(), 7);
    }

    #[test]
    fn kerning_sums_both_sides() {
        let (a, v, y) = (gid('A' as u32), gid('V' as u32), gid('Y' as u32));
        let mut store = FeatureRecordStore::new();
        store.add_pair_adjustment(PairAdjustmentRecord::new(
            GlyphAdjustmentRecord::new(a, ValueRecord::default().with_x_advance(-80)),
            GlyphAdjustmentRecord::new(v, ValueRecord::default().with_x_placement(5)),
        ));
        store.add_pair_adjustment(
            PairAdjustmentRecord::kerning(v, y, -20)
                .with_flags(FeatureLookupFlags::IGNORE_SPACING_ADJUSTMENTS),
        );
        store.build_lookups();

        let shaped = shape(&store, &run("AVY"), ShapingOptions::default());
        assert_eq!(shaped[0].adjustment, ValueRecord::default().with_x_advance(-80));
        assert!(!shaped[0].ignore_spacing);
        assert_eq!(shaped[1].adjustment, ValueRecord::new(5, 0, -20, 0));
        assert!(shaped[1].ignore_spacing);
        // the second glyph of the flagged pair
        assert!(shaped[2].ignore_spacing);
        assert!(shaped[2].adjustment.is_zero());

        let unkerned = shape(&store, &run("AVY"), ShapingOptions::default().with_kerning(false));
        assert!(unkerned.iter().all(|g| g.adjustment.is_zero() && !g.ignore_spacing));
    }

    #[test]
    fn kerning_after_ligature() {
        let mut store = FeatureRecordStore::new();
        store.add_ligature(LigatureRecord::new([gid(0x66), gid(0x66)], gid(0x200)).unwrap());
        store.add_pair_adjustment(PairAdjustmentRecord::kerning(gid(0x200), gid(0x6F), -15));
        store.add_pair_adjustment(PairAdjustmentRecord::kerning(gid(0x66), gid(0x6F), -99));
        store.build_lookups();
        let shaped = shape(&store, &run("ffo"), ShapingOptions::default());
        assert_eq!(shaped[0].adjustment.x_advance, -15);
    }

    #[test]
    fn mark_to_base() {
        let mut store = FeatureRecordStore::new();
        store.add_mark_to_base(MarkToBaseRecord::new(
            gid('e' as u32),
            AnchorPoint::new(250, 500),
            gid(ACUTE),
            MarkPositionAdjustment::new(-20, 10),
        ));
        store.build_lookups();

        let shaped = shape(&store, &run("e\u{301}"), ShapingOptions::default());
        let mark = shaped[1];
        assert_eq!(mark.attached_to, Some(0));
        assert_eq!(mark.adjustment.x_placement, 270);
        assert_eq!(mark.adjustment.y_placement, 490);
        assert!(mark.ignore_spacing);

        let disabled = shape(
            &store,
            &run("e\u{301}"),
            ShapingOptions::default().with_mark_to_base(false),
        );
        assert_eq!(disabled[1].attached_to, None);
    }

    #[test]
    fn mark_to_mark_then_fallback() {
        let mut store = FeatureRecordStore::new();
        store.add_mark_to_base(MarkToBaseRecord::new(
            gid('a' as u32),
            AnchorPoint::new(100, 0),
            gid(DOT_BELOW),
            MarkPositionAdjustment::new(0, 0),
        ));
        store.add_mark_to_base(MarkToBaseRecord::new(
            gid('a' as u32),
            AnchorPoint::new(200, 400),
            gid(ACUTE),
            MarkPositionAdjustment::new(0, 0),
        ));
        store.add_mark_to_mark(MarkToMarkRecord::new(
            gid(ACUTE),
            AnchorPoint::new(10, 600),
            gid(ACUTE),
            MarkPositionAdjustment::new(0, 100),
        ));
        store.build_lookups();

        // a, acute, acute: the second acute stacks on the first
        let shaped = shape(&store, &run("a\u{301}\u{301}"), ShapingOptions::default());
        assert_eq!(shaped[1].attached_to, Some(0));
        assert_eq!(shaped[2].attached_to, Some(1));
        assert_eq!(shaped[2].adjustment.x_placement, 10);
        assert_eq!(shaped[2].adjustment.y_placement, 500);

        // a, dot below, acute: no mark-to-mark rule, so the acute goes on the base
        let shaped = shape(&store, &run("a\u{323}\u{301}"), ShapingOptions::default());
        assert_eq!(shaped[1].attached_to, Some(0));
        assert_eq!(shaped[2].attached_to, Some(0));
        assert_eq!(shaped[2].adjustment.x_placement, 200);

        // without mark-to-mark the second acute also attaches to the base
        let shaped = shape(
            &store,
            &run("a\u{301}\u{301}"),
            ShapingOptions::default().with_mark_to_mark(false),
        );
        assert_eq!(shaped[2].attached_to, Some(0));
    }

    #[test]
    fn extreme_offsets_clamp() {
        let e = gid('e' as u32);
        let mut store = FeatureRecordStore::new();
        store.add_mark_to_base(MarkToBaseRecord::new(
            e,
            AnchorPoint::new(i32::MAX, i32::MIN),
            gid(ACUTE),
            MarkPositionAdjustment::new(-1, 1),
        ));
        let wide = ValueRecord::default().with_x_advance(i32::MAX);
        store.add_pair_adjustment(PairAdjustmentRecord::new(
            GlyphAdjustmentRecord::new(e, wide),
            GlyphAdjustmentRecord::new(e, wide),
        ));
        store.build_lookups();

        let shaped = shape(&store, &run("e\u{301}"), ShapingOptions::default());
        assert_eq!(shaped[1].adjustment.x_placement, i32::MAX);
        assert_eq!(shaped[1].adjustment.y_placement, i32::MIN);
        let shaped = shape(&store, &run("eee"), ShapingOptions::default());
        // the middle glyph is in two pairs
        assert_eq!(shaped[1].adjustment.x_advance, i32::MAX);
    }

    #[test]
    fn leading_mark_is_left_alone() {
        let mut store = FeatureRecordStore::new();
        store.add_mark_to_mark(MarkToMarkRecord::new(
            gid(ACUTE),
            AnchorPoint::new(1, 1),
            gid(ACUTE),
            MarkPositionAdjustment::new(0, 0),
        ));
        store.build_lookups();
        let shaped = shape(&store, &run("\u{301}\u{301}"), ShapingOptions::default());
        assert_eq!(shaped[0].attached_to, None);
        // no base yet, but the preceding mark still serves as a mark base
        assert_eq!(shaped[1].attached_to, Some(0));
    }
}
