pub mod app;
pub mod canvas;
pub mod event;
pub mod images;
pub mod input;
pub mod keymap;
pub mod loader;
pub mod scroll;
pub mod theme;
pub mod themes;

pub mod widgets;

pub use app::App;
pub use loader::Loader;
pub use theme::Theme;
pub use themes::{available_themes, load_theme};
