//! Inline markup: tag parsing, color values and the style state they drive
//!
//! ```
//! use rich_shaping::markup::{MarkupElement, MarkupTag, Rgba8, StyleDefaults, StyleState};
//!
//! let mut state = StyleState::new(&StyleDefaults::default());
//! state.open(&MarkupElement::parse("color=#ff0000").unwrap());
//! assert_eq!(state.resolved().color, Rgba8::new(255, 0, 0, 255));
//! state.close(MarkupTag::Color);
//! assert_eq!(state.resolved().color, Rgba8::WHITE);
//! ```

mod color;
mod state;
mod tag;

pub use color::Rgba8;
pub use state::{
    FontWeight, HighlightState, HorizontalAlignment, ResolvedStyle, StyleDefaults, StyleState,
    SMALL_CAPS_SCALE,
};
pub use tag::{MarkupElement, MarkupTag};
