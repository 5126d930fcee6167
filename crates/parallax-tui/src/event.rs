use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent, KeyEventKind};
use parallax_core::ImageRecord;

use crate::images::PhotoPixels;

/// Event handler for terminal events
pub struct EventHandler {
    tick_rate: Duration,
    animation_tick: Duration,
}

/// Outcome of a search task, tagged with the load attempt that started it
#[derive(Debug)]
pub enum SearchResult {
    Success {
        generation: u64,
        records: Vec<ImageRecord>,
    },
    Failure {
        generation: u64,
        error: String,
    },
}

impl SearchResult {
    pub fn generation(&self) -> u64 {
        match self {
            SearchResult::Success { generation, .. } | SearchResult::Failure { generation, .. } => {
                *generation
            }
        }
    }
}

/// Outcome of a photo download + decode task
pub enum ImageLoadResult {
    Success {
        generation: u64,
        id: String,
        pixels: PhotoPixels,
    },
    Failure {
        generation: u64,
        id: String,
        error: String,
    },
}

impl ImageLoadResult {
    pub fn generation(&self) -> u64 {
        match self {
            ImageLoadResult::Success { generation, .. }
            | ImageLoadResult::Failure { generation, .. } => *generation,
        }
    }
}

impl EventHandler {
    pub fn with_animation_tick(tick_rate_ms: u64, animation_tick: Duration) -> Self {
        Self {
            tick_rate: Duration::from_millis(tick_rate_ms),
            animation_tick,
        }
    }

    /// Poll for the next event at the idle tick rate
    pub fn next(&self) -> Result<Option<AppEvent>> {
        self.poll(self.tick_rate)
    }

    /// Poll at the animation frame rate
    pub fn next_animation(&self) -> Result<Option<AppEvent>> {
        self.poll(self.animation_tick)
    }

    fn poll(&self, timeout: Duration) -> Result<Option<AppEvent>> {
        if event::poll(timeout)? {
            match event::read()? {
                // Only key presses; some terminals also report releases
                Event::Key(key) if key.kind == KeyEventKind::Press => Ok(Some(AppEvent::Key(key))),
                Event::Resize(w, h) => Ok(Some(AppEvent::Resize(w, h))),
                _ => Ok(None),
            }
        } else {
            Ok(Some(AppEvent::Tick))
        }
    }
}

/// Application events
#[derive(Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    Resize(u16, u16),
    Tick,
}
