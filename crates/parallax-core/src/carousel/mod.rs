//! Scroll-offset driven carousel layout.
//!
//! The layout is a pure function of the current horizontal offset: callers
//! recompute it on every input or animation frame.

mod entries;
mod interpolate;
mod layout;

pub use entries::{pad_entries, CarouselEntry, SpacerSide};
pub use interpolate::interpolate;
pub use layout::{
    CarouselLayout, EntryStyle, ItemStyle, PosterStyle, CORNER_RADIUS_CURVE, OPACITY_CURVE,
    POSTER_BLUR_RADIUS, POSTER_OPACITY_CURVE, TRANSLATE_Y_CURVE,
};
