//! Glyph shaping lookups and nested markup style state for rich text layout.
//!
//! This crate covers the part of text layout that sits between font data and
//! positioned glyphs:
//!
//! - [`features`] holds ligature, kerning and mark attachment records and
//!   builds the lookups used to query them
//! - [`shape`] applies those lookups to a run of glyphs
//! - [`markup`] tracks the style implied by nested inline tags such as
//!   `<b>`, `<color=red>` or `<size=+4>`
//!
//! The building blocks, [`NestingStack`] and [`StyleToggleCounters`], and the
//! identifier hashing in [`classify`] are public as well.
//!
//! Font parsing, rasterization and rendering are out of scope.

#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod classify;
mod error;
pub mod features;
pub mod markup;
pub mod shape;
mod stack;
mod toggle;

pub use error::Error;
pub use features::{FeatureRecordStore, LookupReport};
pub use shape::{shape, ShapedGlyph, ShapingInput, ShapingOptions};
pub use stack::NestingStack;
pub use toggle::{FontStyle, StyleFlag, StyleToggleCounters};

pub use glyph_types::{FeatureLookupFlags, GlyphId, GlyphPairKey, Point};
