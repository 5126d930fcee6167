//! RGB pixel canvas rendered to the terminal with upper half-blocks.
//!
//! One terminal cell holds two vertically stacked pixels: the glyph `▀`
//! takes the top pixel as foreground and the bottom pixel as background.

use image::RgbImage;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;

pub type Rgb = [u8; 3];

const UPPER_HALF_BLOCK: &str = "▀";

#[derive(Debug, Clone, Default)]
pub struct PixelCanvas {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

/// Destination rectangle on the canvas, may extend past its edges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelCanvas {
    /// Canvas covering `area`, two pixels per cell vertically
    pub fn for_area(area: Rect) -> Self {
        let mut canvas = Self::default();
        canvas.resize_to(area);
        canvas
    }

    pub fn resize_to(&mut self, area: Rect) {
        self.resize(area.width as u32, area.height as u32 * 2);
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.pixels = vec![[0, 0, 0]; (width * height) as usize];
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    pub fn fill(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    /// Composite `image` over the canvas at `alpha`. The image is expected to be
    /// already sized to `rect`; pixels outside the rounded corners are skipped.
    pub fn blend_image(&mut self, image: &RgbImage, rect: PixelRect, alpha: f64, radius: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        let (iw, ih) = image.dimensions();
        let width = rect.width.min(iw);
        let height = rect.height.min(ih);

        self.for_each_covered(rect.x, rect.y, width, height, radius, |dst, lx, ly| {
            let src = image.get_pixel(lx, ly).0;
            *dst = blend(*dst, src, alpha);
        });
    }

    /// Fill a rounded rectangle with a flat color at `alpha`
    pub fn fill_rounded_rect(&mut self, rect: PixelRect, color: Rgb, alpha: f64, radius: f64) {
        let alpha = alpha.clamp(0.0, 1.0);
        if alpha <= 0.0 {
            return;
        }
        self.for_each_covered(rect.x, rect.y, rect.width, rect.height, radius, |dst, _, _| {
            *dst = blend(*dst, color, alpha);
        });
    }

    fn for_each_covered(
        &mut self,
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        radius: f64,
        mut f: impl FnMut(&mut Rgb, u32, u32),
    ) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + width as i32).min(self.width as i32);
        let y1 = (y + height as i32).min(self.height as i32);

        for py in y0..y1 {
            let ly = (py - y) as u32;
            for px in x0..x1 {
                let lx = (px - x) as u32;
                if !inside_rounded(lx, ly, width, height, radius) {
                    continue;
                }
                let idx = (py as u32 * self.width + px as u32) as usize;
                f(&mut self.pixels[idx], lx, ly);
            }
        }
    }

    /// Write the canvas into `buf`, one cell per two pixel rows
    pub fn blit(&self, area: Rect, buf: &mut Buffer) {
        let rows = area.height.min((self.height / 2) as u16);
        let cols = area.width.min(self.width as u16);

        for row in 0..rows {
            for col in 0..cols {
                let top = self.pixels[(row as u32 * 2 * self.width + col as u32) as usize];
                let bottom = self.pixels[((row as u32 * 2 + 1) * self.width + col as u32) as usize];
                if let Some(cell) = buf.cell_mut((area.x + col, area.y + row)) {
                    cell.set_symbol(UPPER_HALF_BLOCK)
                        .set_fg(to_color(top))
                        .set_bg(to_color(bottom));
                }
            }
        }
    }
}

/// Linear blend of `src` over `dst`
pub fn blend(dst: Rgb, src: Rgb, alpha: f64) -> Rgb {
    let mix = |d: u8, s: u8| {
        (d as f64 + (s as f64 - d as f64) * alpha)
            .round()
            .clamp(0.0, 255.0) as u8
    };
    [mix(dst[0], src[0]), mix(dst[1], src[1]), mix(dst[2], src[2])]
}

/// Whether local pixel (`x`, `y`) lies inside a `width` x `height` box with
/// corners rounded by `radius`. Tested at pixel centers.
pub fn inside_rounded(x: u32, y: u32, width: u32, height: u32, radius: f64) -> bool {
    if x >= width || y >= height {
        return false;
    }
    let radius = radius.min(width as f64 / 2.0).min(height as f64 / 2.0);
    if radius <= 0.0 {
        return true;
    }

    let cx = x as f64 + 0.5;
    let cy = y as f64 + 0.5;
    let dx = if cx < radius {
        radius - cx
    } else if cx > width as f64 - radius {
        cx - (width as f64 - radius)
    } else {
        return true;
    };
    let dy = if cy < radius {
        radius - cy
    } else if cy > height as f64 - radius {
        cy - (height as f64 - radius)
    } else {
        return true;
    };
    dx * dx + dy * dy <= radius * radius
}

fn to_color([r, g, b]: Rgb) -> Color {
    Color::Rgb(r, g, b)
}
