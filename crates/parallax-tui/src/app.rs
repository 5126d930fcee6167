use std::sync::Arc;

use parallax_core::carousel::{EntryStyle, POSTER_BLUR_RADIUS};
use parallax_core::{pad_entries, AppConfig, CarouselEntry, CarouselLayout, ImageRecord};

use crate::canvas::PixelCanvas;
use crate::event::{ImageLoadResult, SearchResult};
use crate::images::ImageCache;
use crate::scroll::OffsetAnimator;
use crate::theme::Theme;

/// Braille spinner shown while the search is outstanding
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Width requested from the image CDN for every photo
pub const PHOTO_FETCH_WIDTH: u32 = 640;

/// Progress of the current load attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Failed(String),
}

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Normal,
    /// Help overlay
    Help,
}

/// Application state
pub struct App {
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    pub load_state: LoadState,
    /// Load attempt counter; results tagged with an older value are dropped
    pub generation: u64,
    /// Left spacer, photos, right spacer
    pub entries: Vec<CarouselEntry>,
    pub images: ImageCache,
    pub animator: OffsetAnimator,
    pub layout: CarouselLayout,
    /// Per-entry styles of the current frame
    pub styles: Vec<EntryStyle>,
    /// Pixel buffer reused across frames
    pub canvas: PixelCanvas,
    pub mode: Mode,
    pub should_quit: bool,
    pub status_message: Option<String>,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    pub spinner_frame: usize,
    /// Layout points covered by one terminal pixel
    pub points_per_pixel: f64,
    viewport_cols: u16,
}

impl App {
    pub fn new(config: Arc<AppConfig>, theme: Theme) -> Self {
        let points_per_pixel = if config.ui.points_per_pixel > 0.0 {
            config.ui.points_per_pixel
        } else {
            1.0
        };
        let animator = OffsetAnimator::new(config.ui.scroll.clone());
        let layout = CarouselLayout::for_container(0.0, config.ui.item_width_ratio);

        Self {
            config,
            theme,
            load_state: LoadState::Loading,
            generation: 0,
            entries: Vec::new(),
            images: ImageCache::new(),
            animator,
            layout,
            styles: Vec::new(),
            canvas: PixelCanvas::default(),
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            pending_key: None,
            spinner_frame: 0,
            points_per_pixel,
            viewport_cols: 0,
        }
    }

    /// Start a new load attempt and return its generation.
    ///
    /// Everything from the previous attempt is discarded.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.load_state = LoadState::Loading;
        self.entries.clear();
        self.styles.clear();
        self.images.clear();
        self.animator.reset();
        self.status_message = None;
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    /// Apply a finished search. Returns the records whose photos should be
    /// downloaded, or `None` when the result was stale or failed.
    pub fn apply_search_result(&mut self, result: SearchResult) -> Option<Vec<ImageRecord>> {
        if result.generation() != self.generation {
            tracing::debug!(
                "Dropping stale search result (generation {}, current {})",
                result.generation(),
                self.generation
            );
            return None;
        }

        match result {
            SearchResult::Success { records, .. } => {
                if records.is_empty() {
                    self.set_status(format!(
                        "No photos found for '{}'",
                        self.config.unsplash.query
                    ));
                }
                self.entries = pad_entries(records.clone());
                self.load_state = LoadState::Ready;
                self.animator.set_offset(0.0);
                Some(records)
            }
            SearchResult::Failure { error, .. } => {
                self.load_state = LoadState::Failed(error);
                None
            }
        }
    }

    pub fn apply_image_result(&mut self, result: ImageLoadResult) {
        if result.generation() != self.generation {
            return;
        }
        match result {
            ImageLoadResult::Success { id, pixels, .. } => self.images.set_loaded(id, pixels),
            ImageLoadResult::Failure { id, error, .. } => self.images.set_failed(id, error),
        }
    }

    /// Number of photos, spacers excluded
    pub fn item_count(&self) -> usize {
        self.entries.len().saturating_sub(2)
    }

    /// Gaussian sigma for poster blurring, in terminal pixels
    pub fn poster_blur_sigma(&self) -> f32 {
        (POSTER_BLUR_RADIUS / self.points_per_pixel) as f32
    }

    /// Resize the layout to a carousel `cols` cells wide, keeping the same
    /// photo centered
    pub fn set_viewport_width(&mut self, cols: u16) {
        if cols == self.viewport_cols {
            return;
        }
        let entry = self.target_entry_index();
        self.viewport_cols = cols;
        self.layout = CarouselLayout::for_container(
            cols as f64 * self.points_per_pixel,
            self.config.ui.item_width_ratio,
        );
        self.animator.set_offset(self.layout.offset_for_entry(entry));
    }

    /// Entry index (1-based among photos) closest to the center right now
    pub fn current_entry_index(&self) -> usize {
        self.layout.centered_entry(self.animator.offset(), self.item_count())
    }

    /// Entry index the carousel is settling on
    fn target_entry_index(&self) -> usize {
        self.layout.centered_entry(self.animator.target(), self.item_count())
    }

    pub fn current_record(&self) -> Option<&ImageRecord> {
        self.entries
            .get(self.current_entry_index())
            .and_then(CarouselEntry::record)
    }

    pub fn next(&mut self) {
        let entry = self.target_entry_index();
        if entry < self.item_count() {
            self.page_to(entry + 1);
        }
    }

    pub fn prev(&mut self) {
        let entry = self.target_entry_index();
        if entry > 1 {
            self.page_to(entry - 1);
        }
    }

    pub fn first(&mut self) {
        self.page_to(1);
    }

    pub fn last(&mut self) {
        let count = self.item_count();
        if count > 0 {
            self.page_to(count);
        }
    }

    fn page_to(&mut self, entry: usize) {
        if self.item_count() == 0 {
            return;
        }
        let target = self
            .layout
            .snap_offset(self.layout.offset_for_entry(entry), self.item_count());
        self.animator.animate_to(target);
    }

    /// Advance the offset animation and recompute every entry style
    pub fn update_frame(&mut self) -> f64 {
        let offset = self.animator.update();
        self.layout.frame(offset, &self.entries, &mut self.styles);
        offset
    }

    pub fn needs_fast_update(&self) -> bool {
        self.animator.is_animating()
    }

    pub fn tick_spinner(&mut self) {
        self.spinner_frame = (self.spinner_frame + 1) % SPINNER_FRAMES.len();
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Normal,
            Mode::Normal => Mode::Help,
        };
    }
}
