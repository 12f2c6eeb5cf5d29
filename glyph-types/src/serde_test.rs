//! ensure serde is working as expected

use super::*;

#[test]
fn test_serde() {
    #[derive(serde::Serialize, serde::Deserialize, Debug, PartialEq, Eq)]
    struct MyTypes {
        gid: GlyphId,
        key: GlyphPairKey,
        anchor: Point<i32>,
        flags: FeatureLookupFlags,
    }

    let my_instance = MyTypes {
        gid: GlyphId::new(69),
        key: GlyphPairKey::new(GlyphId::new(0x66), GlyphId::new(0x69)),
        anchor: Point::new(-120, 700),
        flags: FeatureLookupFlags::IGNORE_SPACING_ADJUSTMENTS,
    };

    let dumped = serde_json::to_string(&my_instance).unwrap();
    let loaded: MyTypes = serde_json::from_str(&dumped).unwrap();
    assert_eq!(my_instance, loaded)
}
