//! Photo pixels and their per-record load state

mod pixels;

use std::collections::HashMap;

pub use pixels::PhotoPixels;

/// Load state of a single photo
pub enum ImageSlot {
    Loading,
    Ready(Box<PhotoPixels>),
    Failed(String),
}

/// Decoded photos keyed by record id
#[derive(Default)]
pub struct ImageCache {
    slots: HashMap<String, ImageSlot>,
}

impl ImageCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a photo as loading. Returns false if it is already tracked.
    pub fn start_loading(&mut self, id: &str) -> bool {
        if self.slots.contains_key(id) {
            return false;
        }
        self.slots.insert(id.to_string(), ImageSlot::Loading);
        true
    }

    pub fn set_loaded(&mut self, id: String, pixels: PhotoPixels) {
        self.slots.insert(id, ImageSlot::Ready(Box::new(pixels)));
    }

    pub fn set_failed(&mut self, id: String, error: String) {
        self.slots.insert(id, ImageSlot::Failed(error));
    }

    pub fn get(&self, id: &str) -> Option<&ImageSlot> {
        self.slots.get(id)
    }

    /// Pixels of a ready photo
    pub fn pixels_mut(&mut self, id: &str) -> Option<&mut PhotoPixels> {
        match self.slots.get_mut(id) {
            Some(ImageSlot::Ready(pixels)) => Some(pixels.as_mut()),
            _ => None,
        }
    }

    pub fn is_ready(&self, id: &str) -> bool {
        matches!(self.slots.get(id), Some(ImageSlot::Ready(_)))
    }

    pub fn ready_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, ImageSlot::Ready(_)))
            .count()
    }

    pub fn pending_count(&self) -> usize {
        self.slots
            .values()
            .filter(|slot| matches!(slot, ImageSlot::Loading))
            .count()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }
}
