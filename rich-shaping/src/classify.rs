//! Identifier hashing, ASCII case folding and code point classification
//!
//! The hashes here key markup tag names and attribute values, so they must
//! stay stable across releases: changing the mixing function or the folding
//! tables changes every tag constant in [`crate::markup`].

/// Uppercasing table for the ASCII range; everything but `a..=z` maps to itself.
const UPPER_FOLD: [u8; 128] = build_fold_table(true);
/// Lowercasing table for the ASCII range; everything but `A..=Z` maps to itself.
const LOWER_FOLD: [u8; 128] = build_fold_table(false);

const fn build_fold_table(upper: bool) -> [u8; 128] {
    let mut table = [0u8; 128];
    let mut i = 0;
    while i < table.len() {
        let c = i as u8;
        table[i] = if upper && c.is_ascii_lowercase() {
            c - 0x20
        } else if !upper && c.is_ascii_uppercase() {
            c + 0x20
        } else {
            c
        };
        i += 1;
    }
    table
}

const HIGH_SURROGATE_START: u32 = 0xD800;
const LOW_SURROGATE_START: u32 = 0xDC00;
const UNICODE_PLANE01_START: u32 = 0x10000;

/// Uppercase an ASCII code point; all other values are returned unchanged.
#[inline]
pub const fn to_upper_ascii_fast(c: u32) -> u32 {
    if c >= UPPER_FOLD.len() as u32 {
        return c;
    }
    UPPER_FOLD[c as usize] as u32
}

/// Lowercase an ASCII code point; all other values are returned unchanged.
#[inline]
pub const fn to_lower_ascii_fast(c: u32) -> u32 {
    if c >= LOWER_FOLD.len() as u32 {
        return c;
    }
    LOWER_FOLD[c as usize] as u32
}

#[inline]
const fn mix(hash: i32, unit: u32) -> i32 {
    ((hash << 5).wrapping_add(hash)) ^ unit as i32
}

/// Case-insensitive hash of an identifier.
///
/// The hash runs over UTF-16 code units, so characters outside the basic
/// multilingual plane contribute both of their surrogate halves.
pub fn hash_case_insensitive(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0, |hash, unit| mix(hash, to_upper_ascii_fast(unit as u32)))
}

/// Case-sensitive hash of an identifier.
pub fn hash_case_sensitive(s: &str) -> i32 {
    s.encode_utf16().fold(0, |hash, unit| mix(hash, unit as u32))
}

/// Compile-time [`hash_case_insensitive`] for ASCII names.
///
/// Agrees with the runtime function for every ASCII input.
pub const fn hash_ascii_case_insensitive(name: &[u8]) -> i32 {
    extend_hash_ascii(0, name)
}

/// Continue a case-insensitive hash with more ASCII bytes.
///
/// `extend_hash_ascii(hash_ascii_case_insensitive(a), b)` is the hash of `a`
/// followed by `b`.
pub(crate) const fn extend_hash_ascii(mut hash: i32, bytes: &[u8]) -> i32 {
    let mut i = 0;
    while i < bytes.len() {
        hash = mix(hash, to_upper_ascii_fast(bytes[i] as u32));
        i += 1;
    }
    hash
}

/// `true` for a high surrogate, excluding both boundary values.
///
/// `0xD800` and `0xDBFF` are *not* recognized.
pub const fn is_high_surrogate(c: u32) -> bool {
    c > 0xD800 && c < 0xDBFF
}

/// `true` for a low surrogate, excluding both boundary values.
///
/// `0xDC00` and `0xDFFF` are *not* recognized.
pub const fn is_low_surrogate(c: u32) -> bool {
    c > 0xDC00 && c < 0xDFFF
}

/// Combine a UTF-16 surrogate pair into a scalar value.
///
/// The caller must have checked that `high` and `low` are surrogates of the
/// right kind; the result is meaningless otherwise.
pub const fn combine_surrogate_pair(high: u32, low: u32) -> u32 {
    (high.wrapping_sub(HIGH_SURROGATE_START))
        .wrapping_mul(0x400)
        .wrapping_add(low.wrapping_sub(LOW_SURROGATE_START))
        .wrapping_add(UNICODE_PLANE01_START)
}

const COMBINING_MARKS: &[(u32, u32)] = &[
    (0x0300, 0x036F),
    (0x1AB0, 0x1AFF),
    (0x1DC0, 0x1DFF),
    (0x20D0, 0x20FF),
    (0xFE20, 0xFE2F),
];

// script specific non-spacing marks that also never act as a base
const NON_BASE_MARKS: &[(u32, u32)] = &[
    // thai
    (0x0E31, 0x0E31),
    (0x0E34, 0x0E3A),
    (0x0E47, 0x0E4E),
    // hebrew
    (0x0591, 0x05BD),
    (0x05BF, 0x05BF),
    (0x05C1, 0x05C2),
    (0x05C4, 0x05C5),
    (0x05C7, 0x05C7),
    // arabic
    (0x0610, 0x061A),
    (0x064B, 0x065F),
    (0x0670, 0x0670),
    (0x06D6, 0x06DC),
    (0x06DF, 0x06E4),
    (0x06E7, 0x06E8),
    (0x06EA, 0x06ED),
    (0x08D3, 0x08E1),
    (0x08E3, 0x08FF),
    (0xFBB2, 0xFBC1),
];

const HANGUL: &[(u32, u32)] = &[
    (0x1100, 0x11FF),
    (0xA960, 0xA97F),
    (0xD7B0, 0xD7FF),
    (0x3130, 0x318F),
    (0xFFA0, 0xFFDC),
    (0xAC00, 0xD7AF),
];

const CJK: &[(u32, u32)] = &[
    (0x3100, 0x312F),
    (0x31A0, 0x31BF),
    (0x4E00, 0x9FFF),
    (0x3400, 0x4DBF),
    (0x20000, 0x2A6DF),
    (0x2A700, 0x2B73F),
    (0x2B740, 0x2B81F),
    (0x2B820, 0x2CEAF),
    (0x2CEB0, 0x2EBE0),
    (0x30000, 0x3134A),
    (0xF900, 0xFAFF),
    (0x2F800, 0x2FA1F),
    (0x2F00, 0x2FDF),
    (0x2E80, 0x2EFF),
    (0x31C0, 0x31EF),
    (0x2FF0, 0x2FFF),
    (0x3040, 0x309F),
    (0x1B100, 0x1B12F),
    (0x1AFF0, 0x1AFFF),
    (0x1B000, 0x1B0FF),
    (0x1B130, 0x1B16F),
    (0x3190, 0x319F),
    (0x30A0, 0x30FF),
    (0x31F0, 0x31FF),
    (0xFF65, 0xFF9F),
];

fn in_ranges(ranges: &[(u32, u32)], c: u32) -> bool {
    ranges.iter().any(|(start, end)| (*start..=*end).contains(&c))
}

/// `true` for code points in the generic combining diacritical mark blocks.
pub fn is_combining_mark(c: u32) -> bool {
    in_ranges(COMBINING_MARKS, c)
}

/// `true` if `c` can serve as the base that marks attach to.
///
/// This is `false` for the combining diacritical blocks and for the
/// non-spacing marks of Thai, Hebrew and Arabic.
pub fn is_base_glyph(c: u32) -> bool {
    !(is_combining_mark(c) || in_ranges(NON_BASE_MARKS, c))
}

/// `true` for Hangul jamo, compatibility jamo and syllables.
pub fn is_hangul(c: u32) -> bool {
    in_ranges(HANGUL, c)
}

/// `true` for CJK ideographs, radicals, kana, bopomofo and related blocks.
pub fn is_cjk(c: u32) -> bool {
    in_ranges(CJK, c)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn folding_tables() {
        assert_eq!(to_upper_ascii_fast('a' as u32), 'A' as u32);
        assert_eq!(to_upper_ascii_fast('Z' as u32), 'Z' as u32);
        assert_eq!(to_lower_ascii_fast('Q' as u32), 'q' as u32);
        assert_eq!(to_upper_ascii_fast('#' as u32), '#' as u32);
        // outside the table
        assert_eq!(to_upper_ascii_fast(0xE9), 0xE9);
        assert_eq!(to_lower_ascii_fast(0x1F600), 0x1F600);
    }

    #[test]
    fn case_insensitive_hash() {
        let bold = hash_case_insensitive("bold");
        assert_eq!(hash_case_insensitive("Bold"), bold);
        assert_eq!(hash_case_insensitive("BOLD"), bold);
        assert_ne!(hash_case_sensitive("Bold"), hash_case_sensitive("bold"));
    }

    #[test]
    fn known_values() {
        assert_eq!(hash_case_insensitive(""), 0);
        assert_eq!(hash_case_insensitive("b"), 66);
        assert_eq!(hash_case_insensitive("/b"), 1613);
        assert_eq!(hash_case_sensitive("b"), 98);
    }

    #[test]
    fn uppercase_and_symbols_hash_identically() {
        let mut rng = StdRng::seed_from_u64(42);
        let alphabet: Vec<char> = ('A'..='Z')
            .chain("0123456789 !\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~".chars())
            .collect();
        for _ in 0..200 {
            let len = rng.gen_range(0..24);
            let s: String = (0..len)
                .map(|_| alphabet[rng.gen_range(0..alphabet.len())])
                .collect();
            assert_eq!(hash_case_insensitive(&s), hash_case_sensitive(&s), "{s}");
        }
    }

    #[test]
    fn const_hash_matches_runtime() {
        for name in ["b", "/b", "color", "font-weight", "SMALLCAPS", "voffset"] {
            assert_eq!(
                hash_ascii_case_insensitive(name.as_bytes()),
                hash_case_insensitive(name)
            );
        }
    }

    #[test]
    fn extended_hash() {
        let prefix = hash_ascii_case_insensitive(b"/");
        assert_eq!(extend_hash_ascii(prefix, b"size"), hash_case_insensitive("/size"));
    }

    #[test]
    fn non_bmp_hashes_surrogates() {
        // U+1F600 is D83D DE00 in UTF-16
        let expected = mix(mix(0, 0xD83D), 0xDE00);
        assert_eq!(hash_case_sensitive("\u{1F600}"), expected);
    }

    #[test]
    fn surrogate_bounds_are_exclusive() {
        assert!(!is_high_surrogate(0xD800));
        assert!(is_high_surrogate(0xD801));
        assert!(is_high_surrogate(0xDBFE));
        assert!(!is_high_surrogate(0xDBFF));
        assert!(!is_low_surrogate(0xDC00));
        assert!(is_low_surrogate(0xDC01));
        assert!(!is_low_surrogate(0xDFFF));
    }

    #[test]
    fn combine_pairs() {
        assert_eq!(combine_surrogate_pair(0xD83D, 0xDE00), 0x1F600);
        assert_eq!(combine_surrogate_pair(0xD800, 0xDC00), 0x10000);
        assert_eq!(combine_surrogate_pair(0xDBFF, 0xDFFF), 0x10FFFF);
    }

    #[test]
    fn base_glyphs() {
        assert!(is_base_glyph('a' as u32));
        assert!(is_base_glyph(0x0E01)); // thai ko kai
        assert!(!is_base_glyph(0x0301)); // combining acute
        assert!(!is_base_glyph(0x0E31)); // thai mai han-akat
        assert!(!is_base_glyph(0x05BF)); // hebrew rafe
        assert!(is_base_glyph(0x05BE)); // hebrew maqaf
        assert!(!is_base_glyph(0x0670)); // arabic superscript alef
        assert!(is_base_glyph(0x08E2)); // the gap in the extended arabic range
        assert!(is_combining_mark(0x20D0));
        assert!(!is_combining_mark(0x0E31));
    }

    #[test]
    fn scripts() {
        assert!(is_hangul(0xAC00));
        assert!(is_hangul(0x1100));
        assert!(!is_hangul('a' as u32));
        assert!(is_cjk(0x4E2D));
        assert!(is_cjk(0x3042)); // hiragana a
        assert!(is_cjk(0x3134A));
        assert!(!is_cjk(0x3134B));
        assert!(!is_cjk(0xAC00));
    }
}
