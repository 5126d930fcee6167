use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use unicode_width::UnicodeWidthChar;

use parallax_core::carousel::EntryStyle;

use crate::app::App;
use crate::canvas::PixelRect;
use crate::images::ImageSlot;
use crate::theme::Theme;

/// Horizontal gap between a card and its slot edge, in points
const CARD_MARGIN: f64 = 10.0;
/// Card height relative to the item width
const CARD_ASPECT: f64 = 1.2;
/// Largest upward lift of a card, in points
const MAX_LIFT: f64 = 50.0;
const MIN_CARD_HEIGHT: u32 = 4;

/// Pixel geometry of one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CardGeometry {
    pub width: u32,
    pub height: u32,
    /// Top edge of an unlifted card
    pub base_y: i32,
}

impl CardGeometry {
    pub fn compute(item_width: f64, points_per_pixel: f64, canvas_height: u32) -> Self {
        let width = ((item_width - 2.0 * CARD_MARGIN).max(0.0) / points_per_pixel).round() as u32;
        let lift = (MAX_LIFT / points_per_pixel).ceil() as u32;
        let available = canvas_height.saturating_sub(2 * lift + 2);
        let wanted = (item_width * CARD_ASPECT / points_per_pixel).round() as u32;
        let height = wanted.min(available).max(MIN_CARD_HEIGHT);
        let base_y = (canvas_height as i32 - height as i32) / 2 + (lift as i32) / 2;

        Self {
            width: width.max(1),
            height,
            base_y,
        }
    }
}

pub struct CarouselWidget;

impl CarouselWidget {
    /// Advance the frame and draw posters, cards and the caption
    pub fn render(frame: &mut Frame, area: Rect, app: &mut App) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        app.set_viewport_width(area.width);
        let offset = app.update_frame();
        let show_caption = app.config.ui.show_caption;

        let App {
            canvas,
            images,
            styles,
            entries,
            layout,
            theme,
            points_per_pixel,
            ..
        } = app;
        let ppp = *points_per_pixel;

        canvas.resize_to(area);
        canvas.fill(Theme::rgb(theme.background));
        let (cw, ch) = (canvas.width(), canvas.height());

        // Background posters, stacked in entry order
        for (entry, style) in entries.iter().zip(styles.iter()) {
            let (EntryStyle::Item { poster, .. }, Some(record)) = (style, entry.record()) else {
                continue;
            };
            if poster.opacity <= 0.0 {
                continue;
            }
            if let Some(pixels) = images.pixels_mut(&record.id) {
                let full = PixelRect {
                    x: 0,
                    y: 0,
                    width: cw,
                    height: ch,
                };
                canvas.blend_image(pixels.poster(cw, ch), full, poster.opacity, 0.0);
            }
        }

        // Foreground cards
        let geometry = CardGeometry::compute(layout.item_width(), ppp, ch);
        for index in layout.visible_entries(offset, entries.len()) {
            let (Some(EntryStyle::Item { item, .. }), Some(record)) =
                (styles.get(index), entries[index].record())
            else {
                continue;
            };

            let rect = PixelRect {
                x: ((layout.entry_x(index, offset) + CARD_MARGIN) / ppp).round() as i32,
                y: geometry.base_y + (item.translate_y / ppp).round() as i32,
                width: geometry.width,
                height: geometry.height,
            };
            let radius = item.corner_radius / ppp;

            match images.get(&record.id) {
                Some(ImageSlot::Ready(_)) => {
                    if let Some(pixels) = images.pixels_mut(&record.id) {
                        let card = pixels.card(geometry.width, geometry.height);
                        canvas.blend_image(card, rect, item.opacity, radius);
                    }
                }
                Some(ImageSlot::Failed(_)) => {
                    let color = Theme::rgb(theme.error);
                    canvas.fill_rounded_rect(rect, color, item.opacity * 0.5, radius);
                }
                _ => {
                    canvas.fill_rounded_rect(rect, Theme::rgb(theme.surface), item.opacity, radius);
                }
            }
        }

        canvas.blit(area, frame.buffer_mut());

        if show_caption {
            Self::render_caption(frame, area, app);
        }
    }

    fn render_caption(frame: &mut Frame, area: Rect, app: &App) {
        let Some(record) = app.current_record() else {
            return;
        };
        let caption_area = Rect::new(area.x, area.y + area.height - 1, area.width, 1);
        let text = truncate_to_width(record.caption(), area.width.saturating_sub(4) as usize);

        let line = Line::from(Span::styled(
            format!(" {} ", text),
            Style::default()
                .fg(app.theme.foreground)
                .bg(app.theme.background)
                .add_modifier(Modifier::ITALIC),
        ));
        frame.render_widget(Paragraph::new(line).alignment(Alignment::Center), caption_area);
    }
}

/// Cut `s` to at most `max_width` display columns, marking the cut with '…'
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    let total: usize = s.chars().filter_map(|c| c.width()).sum();
    if total <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max_width - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_ascii() {
        assert_eq!(truncate_to_width("a cat", 10), "a cat");
        assert_eq!(truncate_to_width("a sleepy cat", 6), "a sle…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_truncate_wide_chars() {
        // Each CJK char is two columns wide
        assert_eq!(truncate_to_width("猫猫猫猫", 8), "猫猫猫猫");
        assert_eq!(truncate_to_width("猫猫猫猫", 5), "猫猫…");
    }

    #[test]
    fn test_card_geometry_fits_canvas() {
        // 100 cols at 4 points per pixel, 40 rows
        let item_width = 400.0 * 0.72;
        let geometry = CardGeometry::compute(item_width, 4.0, 80);
        assert_eq!(geometry.width, 67);
        assert!(geometry.height <= 80 - 2 * 13 - 2);
        assert!(geometry.base_y >= 13);
        assert!(geometry.base_y + geometry.height as i32 <= 80);
    }

    #[test]
    fn test_card_geometry_minimum_height() {
        let geometry = CardGeometry::compute(288.0, 4.0, 10);
        assert_eq!(geometry.height, MIN_CARD_HEIGHT);
    }
}
