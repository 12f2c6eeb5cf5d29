//! Errors produced while building shaping tables or applying markup

use glyph_types::GlyphId;
use thiserror::Error;

/// An error encountered by this crate.
///
/// None of these are fatal to a layout pass, and most callers only log them.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A ligature record must have at least one component.
    #[error("ligature {0} has no component glyphs")]
    EmptyLigature(GlyphId),
    /// A non-growing append was made into a full stack; the item was dropped.
    #[error("stack is full (capacity {capacity}), item dropped")]
    StackFull { capacity: usize },
    /// A kerning pair for these glyphs already exists.
    #[error("a kerning pair for ({first}, {second}) already exists")]
    DuplicatePair { first: GlyphId, second: GlyphId },
    /// A color value could not be parsed.
    #[error("invalid color value '{0}'")]
    InvalidColor(String),
    /// A markup tag carried a value that could not be interpreted.
    #[error("invalid value '{value}' for tag <{tag}>")]
    InvalidTagValue { tag: String, value: String },
}
