use image::imageops::FilterType;
use image::{DynamicImage, RgbImage};

/// Longest edge kept from a downloaded photo
const SOURCE_MAX_EDGE: u32 = 800;
/// Longest edge of the pre-blurred poster source
const POSTER_MAX_EDGE: u32 = 160;

/// Decoded photo plus size-keyed render caches.
///
/// The blur is applied once at decode time to a small copy; posters are
/// produced by scaling that copy up, which keeps the per-frame cost to a
/// cached resize.
pub struct PhotoPixels {
    source: RgbImage,
    blurred: RgbImage,
    card: Option<RgbImage>,
    poster: Option<RgbImage>,
}

impl PhotoPixels {
    /// Build from a decoded image, blurring the poster copy with `blur_sigma`
    /// (in poster-source pixels)
    pub fn new(image: DynamicImage, blur_sigma: f32) -> Self {
        let image = if image.width().max(image.height()) > SOURCE_MAX_EDGE {
            image.resize(SOURCE_MAX_EDGE, SOURCE_MAX_EDGE, FilterType::Triangle)
        } else {
            image
        };

        let blurred = image
            .resize(POSTER_MAX_EDGE, POSTER_MAX_EDGE, FilterType::Triangle)
            .blur(blur_sigma.max(0.0))
            .to_rgb8();

        Self {
            source: image.to_rgb8(),
            blurred,
            card: None,
            poster: None,
        }
    }

    /// Decode raw bytes (JPEG, PNG, WebP, ...) into photo pixels
    pub fn decode(bytes: &[u8], blur_sigma: f32) -> Result<Self, String> {
        if bytes.is_empty() {
            return Err("Empty data".to_string());
        }
        let image = image::load_from_memory(bytes).map_err(|e| format!("Decode failed: {}", e))?;
        Ok(Self::new(image, blur_sigma))
    }

    pub fn source_dimensions(&self) -> (u32, u32) {
        self.source.dimensions()
    }

    /// Photo cropped to fill a `width` x `height` card
    pub fn card(&mut self, width: u32, height: u32) -> &RgbImage {
        fill_cached(&mut self.card, &self.source, width, height)
    }

    /// Blurred photo cropped to fill the whole canvas
    pub fn poster(&mut self, width: u32, height: u32) -> &RgbImage {
        fill_cached(&mut self.poster, &self.blurred, width, height)
    }
}

fn fill_cached<'a>(
    slot: &'a mut Option<RgbImage>,
    src: &RgbImage,
    width: u32,
    height: u32,
) -> &'a RgbImage {
    let (width, height) = (width.max(1), height.max(1));
    let stale = slot
        .as_ref()
        .map(|img| img.dimensions() != (width, height))
        .unwrap_or(true);

    if stale {
        *slot = Some(cover(src, width, height));
    }

    slot.get_or_insert_with(|| cover(src, width, height))
}

/// Scale to cover `width` x `height`, then center-crop
fn cover(src: &RgbImage, width: u32, height: u32) -> RgbImage {
    let (sw, sh) = src.dimensions();
    if sw == 0 || sh == 0 {
        return RgbImage::new(width, height);
    }

    let scale = (width as f64 / sw as f64).max(height as f64 / sh as f64);
    let scaled_w = ((sw as f64 * scale).ceil() as u32).max(width);
    let scaled_h = ((sh as f64 * scale).ceil() as u32).max(height);
    let scaled = image::imageops::resize(src, scaled_w, scaled_h, FilterType::Triangle);

    let x = (scaled_w - width) / 2;
    let y = (scaled_h - height) / 2;
    image::imageops::crop_imm(&scaled, x, y, width, height).to_image()
}
