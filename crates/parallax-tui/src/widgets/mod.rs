mod carousel;
mod popup;
mod status_bar;

pub use carousel::CarouselWidget;
pub use popup::PopupWidget;
pub use status_bar::StatusBarWidget;
