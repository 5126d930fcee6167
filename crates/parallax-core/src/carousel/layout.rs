use std::ops::Range;

use super::entries::CarouselEntry;
use super::interpolate::interpolate;

/// Vertical lift of a card, in points
pub const TRANSLATE_Y_CURVE: [f64; 3] = [0.0, -50.0, -20.0];
pub const OPACITY_CURVE: [f64; 3] = [0.72, 1.0, 0.72];
pub const CORNER_RADIUS_CURVE: [f64; 3] = [8.0, 32.0, 8.0];
pub const POSTER_OPACITY_CURVE: [f64; 3] = [0.0, 1.0, 0.0];
/// Blur applied to every background poster, independent of the offset
pub const POSTER_BLUR_RADIUS: f64 = 12.0;

/// Visual properties of a foreground card
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ItemStyle {
    pub translate_y: f64,
    pub opacity: f64,
    pub corner_radius: f64,
}

/// Visual properties of a full-screen background poster
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PosterStyle {
    pub opacity: f64,
    pub blur_radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EntryStyle {
    /// Fixed-width empty space, no poster
    Spacer { width: f64 },
    Item { item: ItemStyle, poster: PosterStyle },
}

/// Maps a horizontal scroll offset to per-entry styles.
///
/// Entry `i` is centered when `offset == (i - 1) * item_width`, because entry 0
/// is the left spacer. All methods are pure: the same inputs always give the
/// same outputs, and nothing allocates except [`CarouselLayout::frame`]
/// growing its output buffer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarouselLayout {
    item_width: f64,
    container_width: f64,
}

impl CarouselLayout {
    pub fn new(item_width: f64, container_width: f64) -> Self {
        Self {
            item_width: item_width.max(0.0),
            container_width: container_width.max(0.0),
        }
    }

    /// Layout whose item width is `ratio` of the container width
    pub fn for_container(container_width: f64, ratio: f64) -> Self {
        let ratio = ratio.clamp(0.0, 1.0);
        Self::new(container_width * ratio, container_width)
    }

    pub fn item_width(&self) -> f64 {
        self.item_width
    }

    pub fn container_width(&self) -> f64 {
        self.container_width
    }

    /// Width of each edge spacer
    pub fn spacer_width(&self) -> f64 {
        (self.container_width - self.item_width) / 2.0
    }

    /// Breakpoints `[(i-2)W, (i-1)W, iW]` for entry `i`
    #[inline]
    pub fn input_range(&self, index: usize) -> [f64; 3] {
        let i = index as f64;
        let w = self.item_width;
        [(i - 2.0) * w, (i - 1.0) * w, i * w]
    }

    #[inline]
    pub fn item_style(&self, offset: f64, index: usize) -> ItemStyle {
        let range = self.input_range(index);
        ItemStyle {
            translate_y: interpolate(offset, &range, &TRANSLATE_Y_CURVE),
            opacity: interpolate(offset, &range, &OPACITY_CURVE),
            corner_radius: interpolate(offset, &range, &CORNER_RADIUS_CURVE),
        }
    }

    #[inline]
    pub fn poster_style(&self, offset: f64, index: usize) -> PosterStyle {
        let range = self.input_range(index);
        PosterStyle {
            opacity: interpolate(offset, &range, &POSTER_OPACITY_CURVE),
            blur_radius: POSTER_BLUR_RADIUS,
        }
    }

    pub fn entry_style(&self, offset: f64, index: usize, entry: &CarouselEntry) -> EntryStyle {
        match entry {
            CarouselEntry::Spacer(_) => EntryStyle::Spacer {
                width: self.spacer_width(),
            },
            CarouselEntry::Item(_) => EntryStyle::Item {
                item: self.item_style(offset, index),
                poster: self.poster_style(offset, index),
            },
        }
    }

    /// Styles for every entry at `offset`, written into `out`
    pub fn frame(&self, offset: f64, entries: &[CarouselEntry], out: &mut Vec<EntryStyle>) {
        out.clear();
        out.extend(
            entries
                .iter()
                .enumerate()
                .map(|(index, entry)| self.entry_style(offset, index, entry)),
        );
    }

    /// Width of entry `index` in a strip of `entry_count` entries
    pub fn entry_width(&self, index: usize, entry_count: usize) -> f64 {
        if index == 0 || index + 1 == entry_count {
            self.spacer_width()
        } else {
            self.item_width
        }
    }

    /// Left edge of entry `index` in viewport coordinates
    pub fn entry_x(&self, index: usize, offset: f64) -> f64 {
        if index == 0 {
            -offset
        } else {
            self.spacer_width() + (index as f64 - 1.0) * self.item_width - offset
        }
    }

    /// Entries that intersect the viewport at `offset`
    pub fn visible_entries(&self, offset: f64, entry_count: usize) -> Range<usize> {
        let mut start = entry_count;
        let mut end = 0;
        for index in 0..entry_count {
            let x = self.entry_x(index, offset);
            let width = self.entry_width(index, entry_count);
            if x + width > 0.0 && x < self.container_width {
                start = start.min(index);
                end = index + 1;
            }
        }
        if start >= end {
            0..0
        } else {
            start..end
        }
    }

    /// Offset at which entry `index` is centered
    pub fn offset_for_entry(&self, index: usize) -> f64 {
        (index as f64 - 1.0).max(0.0) * self.item_width
    }

    /// Largest offset, which centers the last of `item_count` photos
    pub fn max_offset(&self, item_count: usize) -> f64 {
        item_count.saturating_sub(1) as f64 * self.item_width
    }

    /// Nearest snap point (a multiple of the item width) within bounds
    pub fn snap_offset(&self, offset: f64, item_count: usize) -> f64 {
        if self.item_width <= 0.0 {
            return 0.0;
        }
        let snapped = (offset / self.item_width).round() * self.item_width;
        snapped.clamp(0.0, self.max_offset(item_count))
    }

    /// Index of the entry closest to the viewport center (1-based for photos)
    pub fn centered_entry(&self, offset: f64, item_count: usize) -> usize {
        if self.item_width <= 0.0 || item_count == 0 {
            return 1;
        }
        let page = (offset / self.item_width).round().max(0.0) as usize;
        page.min(item_count - 1) + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::carousel::pad_entries;
    use crate::photo::ImageRecord;

    const W: f64 = 280.0;

    fn layout() -> CarouselLayout {
        CarouselLayout::new(W, 400.0)
    }

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn entries(n: usize) -> Vec<CarouselEntry> {
        pad_entries(
            (0..n)
                .map(|i| ImageRecord {
                    id: i.to_string(),
                    full_url: String::new(),
                    raw_url: String::new(),
                    alt_description: None,
                })
                .collect(),
        )
    }

    #[test]
    fn test_input_range() {
        assert_eq!(layout().input_range(3), [W, 2.0 * W, 3.0 * W]);
        assert_eq!(layout().input_range(0), [-2.0 * W, -W, 0.0]);
    }

    #[test]
    fn test_peak_at_middle_breakpoint() {
        let layout = layout();
        for i in 1..6 {
            let offset = (i as f64 - 1.0) * W;
            let item = layout.item_style(offset, i);
            assert!(approx(item.opacity, 1.0));
            assert!(approx(item.translate_y, -50.0));
            assert!(approx(item.corner_radius, 32.0));
            assert!(approx(layout.poster_style(offset, i).opacity, 1.0));
        }
    }

    #[test]
    fn test_rest_at_outer_breakpoints() {
        let layout = layout();
        let i = 4;

        let before = layout.item_style((i as f64 - 2.0) * W, i);
        assert!(approx(before.opacity, 0.72));
        assert!(approx(before.translate_y, 0.0));
        assert!(approx(before.corner_radius, 8.0));
        assert!(approx(layout.poster_style((i as f64 - 2.0) * W, i).opacity, 0.0));

        let after = layout.item_style(i as f64 * W, i);
        assert!(approx(after.opacity, 0.72));
        assert!(approx(after.translate_y, -20.0));
        assert!(approx(after.corner_radius, 8.0));
        assert!(approx(layout.poster_style(i as f64 * W, i).opacity, 0.0));
    }

    #[test]
    fn test_clamped_outside_range() {
        let layout = layout();
        let i = 3;
        for offset in [-10_000.0, -1.0, 0.0, 0.5 * W] {
            let style = layout.item_style(offset, i);
            assert_eq!(style, layout.item_style((i as f64 - 2.0) * W, i), "offset {}", offset);
        }
        for offset in [3.0 * W, 3.5 * W, 1e7] {
            let style = layout.item_style(offset, i);
            assert_eq!(style, layout.item_style(i as f64 * W, i), "offset {}", offset);
        }
    }

    #[test]
    fn test_halfway_values() {
        let layout = layout();
        let style = layout.item_style(0.5 * W, 2);
        assert!(approx(style.opacity, 0.86));
        assert!(approx(style.translate_y, -25.0));
        assert!(approx(style.corner_radius, 20.0));
    }

    #[test]
    fn test_pure_and_repeatable() {
        let layout = layout();
        let a = layout.item_style(123.4, 2);
        let b = layout.item_style(123.4, 2);
        assert_eq!(a, b);
        assert_eq!(layout.poster_style(123.4, 2), layout.poster_style(123.4, 2));
    }

    #[test]
    fn test_poster_blur_constant() {
        let layout = layout();
        for offset in [0.0, 100.0, 5000.0] {
            assert_eq!(layout.poster_style(offset, 2).blur_radius, POSTER_BLUR_RADIUS);
        }
    }

    #[test]
    fn test_frame_spacers_have_no_poster() {
        let layout = layout();
        let entries = entries(3);
        let mut out = Vec::new();
        layout.frame(0.0, &entries, &mut out);

        assert_eq!(out.len(), 5);
        assert_eq!(out[0], EntryStyle::Spacer { width: 60.0 });
        assert_eq!(out[4], EntryStyle::Spacer { width: 60.0 });
        assert!(out[1..4]
            .iter()
            .all(|s| matches!(s, EntryStyle::Item { .. })));

        // Buffer is reused across frames
        layout.frame(W, &entries, &mut out);
        assert_eq!(out.len(), 5);
    }

    #[test]
    fn test_spacer_width() {
        let layout = CarouselLayout::for_container(400.0, 0.72);
        assert!(approx(layout.item_width(), 288.0));
        assert!(approx(layout.spacer_width(), 56.0));
    }

    #[test]
    fn test_centered_entry_geometry() {
        let layout = layout();
        for i in 1..4 {
            let offset = layout.offset_for_entry(i);
            let center = layout.entry_x(i, offset) + W / 2.0;
            assert!(approx(center, layout.container_width() / 2.0));
            assert_eq!(layout.centered_entry(offset, 3), i);
        }
    }

    #[test]
    fn test_snap_and_bounds() {
        let layout = layout();
        assert_eq!(layout.max_offset(8), 7.0 * W);
        assert_eq!(layout.max_offset(0), 0.0);
        assert_eq!(layout.snap_offset(0.4 * W, 8), 0.0);
        assert_eq!(layout.snap_offset(0.6 * W, 8), W);
        assert_eq!(layout.snap_offset(-50.0, 8), 0.0);
        assert_eq!(layout.snap_offset(100.0 * W, 8), 7.0 * W);
        assert_eq!(layout.centered_entry(100.0 * W, 8), 8);
    }

    #[test]
    fn test_visible_entries() {
        let layout = layout();
        // Offset 0: left spacer, first photo and a sliver of the second
        assert_eq!(layout.visible_entries(0.0, 7), 0..3);
        // Last photo centered: neighbor on the left and the right spacer
        let offset = layout.max_offset(5);
        assert_eq!(layout.visible_entries(offset, 7), 4..7);
        assert_eq!(layout.visible_entries(0.0, 0), 0..0);
    }
}
