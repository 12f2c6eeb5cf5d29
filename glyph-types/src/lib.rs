//! Common scalar types used by glyph shaping records
//!
//! These are the identifiers and small value types that the shaping tables
//! and the layout pass exchange: glyph identifiers, packed glyph pair keys,
//! anchor points and lookup flags.

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod glyph_id;
mod lookup_flag;
mod pair_key;
mod point;

#[cfg(all(test, feature = "serde"))]
mod serde_test;

pub use glyph_id::GlyphId;
pub use lookup_flag::FeatureLookupFlags;
pub use pair_key::{GlyphPairKey, InvalidGlyphPair};
pub use point::Point;
