//! A layout pass over marked-up text: styles from tags, glyphs from the shaper.

use pretty_assertions::assert_eq;
use rich_shaping::{
    features::{
        kerning::KerningTable, AnchorPoint, LigatureRecord, MarkPositionAdjustment,
        MarkToBaseRecord,
    },
    markup::{FontWeight, MarkupElement, MarkupTag, Rgba8, StyleDefaults, StyleState},
    shape, FeatureRecordStore, FontStyle, GlyphId, ShapingInput, ShapingOptions,
};

enum Token<'a> {
    Char(char),
    Tag(&'a str),
}

/// Split text into characters and tag bodies; `<` without a `>` is text.
fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if c == '<' {
            if let Some(end) = rest.find('>') {
                tokens.push(Token::Tag(&rest[1..end]));
                rest = &rest[end + 1..];
                continue;
            }
        }
        tokens.push(Token::Char(c));
        rest = &rest[c.len_utf8()..];
    }
    tokens
}

struct StyledChar {
    c: char,
    color: Rgba8,
    weight: FontWeight,
    style: FontStyle,
    size: f32,
}

fn apply_markup(text: &str, defaults: &StyleDefaults) -> Vec<StyledChar> {
    let mut state = StyleState::new(defaults);
    let mut out = Vec::new();
    for token in tokenize(text) {
        match token {
            Token::Tag(body) => match MarkupElement::parse(body) {
                Some(element) => {
                    assert!(state.open(&element), "rejected <{body}>");
                }
                None => panic!("unknown tag <{body}>"),
            },
            Token::Char(c) => {
                let resolved = state.resolved();
                out.push(StyledChar {
                    c: state.transform_case(c),
                    color: resolved.color,
                    weight: resolved.font_weight,
                    style: resolved.font_style,
                    size: resolved.font_size,
                });
            }
        }
    }
    out
}

fn gid(raw: u32) -> GlyphId {
    GlyphId::new(raw)
}

fn to_input(chars: &[StyledChar]) -> Vec<ShapingInput> {
    chars
        .iter()
        .map(|sc| ShapingInput::new(sc.c as u32, gid(sc.c as u32)))
        .collect()
}

#[test]
fn ff_ligature() {
    let _ = env_logger::builder().is_test(true).try_init();
    let mut store = FeatureRecordStore::new();
    store.add_ligature(LigatureRecord::new([gid(0x66), gid(0x66)], gid(0x200)).unwrap());
    store.build_lookups();

    assert_eq!(
        store.try_get_ligature(&[gid(0x66), gid(0x66)]).map(|l| l.ligature()),
        Some(gid(0x200))
    );
    assert!(store.try_get_ligature(&[gid(0x66), gid(0x67)]).is_none());
}

#[test]
fn styled_and_shaped() {
    let _ = env_logger::builder().is_test(true).try_init();
    let defaults = StyleDefaults::default().with_font_size(20.0);
    let text = "o<b>f<color=red>f</b>i</color> <size=50%><allcaps>x\u{301}</allcaps></size>";
    let chars = apply_markup(text, &defaults);

    let plain: String = chars.iter().map(|sc| sc.c).collect();
    assert_eq!(plain, "offi X\u{301}");

    let red = Rgba8::new(255, 0, 0, 255);
    let colors: Vec<_> = chars.iter().map(|sc| sc.color).collect();
    assert_eq!(
        colors,
        vec![Rgba8::WHITE, Rgba8::WHITE, red, red, Rgba8::WHITE, Rgba8::WHITE, Rgba8::WHITE]
    );
    let weights: Vec<_> = chars.iter().map(|sc| sc.weight).collect();
    assert_eq!(
        weights[..4],
        [
            FontWeight::Regular,
            FontWeight::Bold,
            FontWeight::Bold,
            FontWeight::Regular
        ]
    );
    assert!(chars[5].style.contains(FontStyle::UPPERCASE));
    assert!(!chars[4].style.contains(FontStyle::UPPERCASE));
    assert_eq!(chars[5].size, 10.0);
    assert_eq!(chars[4].size, 20.0);

    let mut store = FeatureRecordStore::new();
    let f = gid('f' as u32);
    store.add_ligature(LigatureRecord::new([f, f], gid(0x200)).unwrap());
    store.add_mark_to_base(MarkToBaseRecord::new(
        gid('X' as u32),
        AnchorPoint::new(300, 700),
        gid(0x301),
        MarkPositionAdjustment::new(50, 0),
    ));
    let mut kerning = KerningTable::new();
    kerning.add_kerning_pair(gid('o' as u32), gid(0x200), -25).unwrap();
    kerning.upgrade_into(&mut store);
    let report = store.build_lookups();
    assert_eq!(report.dropped(), 0);

    let shaped = shape(&store, &to_input(&chars), ShapingOptions::default());
    let glyphs: Vec<_> = shaped.iter().map(|g| g.glyph.to_u32()).collect();
    assert_eq!(
        glyphs,
        vec!['o' as u32, 0x200, 'i' as u32, ' ' as u32, 'X' as u32, 0x301]
    );

    assert_eq!(shaped[0].adjustment.x_advance, -25);
    let lig = &shaped[1];
    assert_eq!((lig.cluster, lig.component_count), (1, 2));
    // the ligature's cluster points back at the styled characters
    assert_eq!(chars[lig.cluster].weight, FontWeight::Bold);

    let mark = &shaped[5];
    assert_eq!(mark.attached_to, Some(4));
    assert_eq!(mark.adjustment.x_placement, 250);
    assert_eq!(mark.adjustment.y_placement, 700);
    assert!(mark.ignore_spacing);
}

#[test]
fn unmatched_closing_tags_keep_defaults() {
    let defaults = StyleDefaults::default().with_color(Rgba8::BLACK);
    let chars = apply_markup("</color></b>a<color=blue>b</color></color>c", &defaults);
    let colors: Vec<_> = chars.iter().map(|sc| sc.color).collect();
    assert_eq!(
        colors,
        vec![Rgba8::BLACK, Rgba8::new(0, 0, 255, 255), Rgba8::BLACK]
    );
    assert!(chars.iter().all(|sc| sc.weight == FontWeight::Regular));
}

#[test]
fn reused_state_between_passes() {
    let defaults = StyleDefaults::default();
    let mut state = StyleState::new(&defaults);
    for _ in 0..3 {
        state.begin(&defaults);
        for body in ["b", "i angle=10", "color=#123", "size=+2"] {
            assert!(state.open(&MarkupElement::parse(body).unwrap()));
        }
        let resolved = state.resolved();
        assert_eq!(resolved.font_size, 38.0);
        assert_eq!(resolved.italic_angle, 10.0);
        assert_eq!(resolved.color, Rgba8::new(0x11, 0x22, 0x33, 255));
        state.close(MarkupTag::Bold);
        assert_eq!(state.resolved().font_weight, FontWeight::Regular);
    }
    let options = ShapingOptions::default()
        .with_ligatures(false)
        .with_kerning(false);
    let shaped = shape(
        &FeatureRecordStore::new(),
        &[ShapingInput::new('a' as u32, gid(1))],
        options,
    );
    assert_eq!(shaped.len(), 1);
}
