//! Smooth paging for the carousel.
//!
//! - `easing` - easing curves (cubic, quintic, exponential, ease-in-out)
//! - `animation` - the offset animator the event loop advances every frame
//!
//! ```ignore
//! let mut animator = OffsetAnimator::new(config.ui.scroll.clone());
//! animator.animate_to(layout.offset_for_entry(3));
//!
//! // every frame
//! let offset = animator.update();
//! layout.frame(offset, &entries, &mut styles);
//! ```

pub mod animation;
pub mod easing;

pub use animation::OffsetAnimator;
pub use easing::{EasingType, EasingTypeExt};
