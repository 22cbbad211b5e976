use std::fs;
use std::path::Path;

use ab_glyph::{point, Font, FontVec, PxScale, ScaleFont};
use image::{GrayImage, Luma};
use log::debug;

use crate::MosaicError;

/// Renders a single glyph as black ink on a white 8-bit canvas.
///
/// The table builder calibrates brightness through this trait and the composer draws the final
/// mosaic through it, so both always see the same glyph shapes.
pub trait GlyphRasterizer {
    fn rasterize(&self, symbol: char, width: u32, height: u32) -> GrayImage;
}

impl<R: GlyphRasterizer + ?Sized> GlyphRasterizer for &R {
    fn rasterize(&self, symbol: char, width: u32, height: u32) -> GrayImage {
        (**self).rasterize(symbol, width, height)
    }
}

/// Software rasterizer for TrueType/OpenType fonts at a fixed pixel size.
///
/// The size is an em size: at `20` one em spans 20 pixels, the way FreeType sizes fonts.
pub struct FontRasterizer {
    font: FontVec,
    scale: PxScale,
    ascent: f32,
    em_px: f32,
}

impl FontRasterizer {
    /// Reads a font file from disk.
    ///
    /// # Errors
    /// `FontUnavailable` if the file cannot be read, `InvalidFont` if it is not a font.
    pub fn open<P: AsRef<Path>>(path: P, size_px: u32) -> Result<Self, MosaicError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|err| MosaicError::FontUnavailable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
        debug!("loaded font {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(bytes, size_px)
    }

    pub fn from_bytes(bytes: Vec<u8>, size_px: u32) -> Result<Self, MosaicError> {
        let font = FontVec::try_from_vec(bytes)?;
        let em_px = size_px as f32;

        // PxScale measures ascent to descent, not the em square.
        let height = font.height_unscaled();
        let units_per_em = font.units_per_em().unwrap_or(height);
        let scale = PxScale::from(em_px * height / units_per_em);
        let ascent = font.ascent_unscaled() * scale.y / height;
        Ok(Self { font, scale, ascent, em_px })
    }

    /// Pixels per em.
    pub fn size_px(&self) -> f32 {
        self.em_px
    }

    pub fn h_advance(&self, symbol: char) -> f32 {
        let scaled = self.font.as_scaled(self.scale);
        scaled.h_advance(self.font.glyph_id(symbol))
    }
}

impl GlyphRasterizer for FontRasterizer {
    fn rasterize(&self, symbol: char, width: u32, height: u32) -> GrayImage {
        let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));

        // Symbols missing from the font fall back to glyph 0 (.notdef), same as a text renderer.
        let glyph = self
            .font
            .glyph_id(symbol)
            .with_scale_and_position(self.scale, point(0.0, self.ascent));
        let Some(outline) = self.font.outline_glyph(glyph) else {
            return canvas;
        };

        let bounds = outline.px_bounds();
        outline.draw(|x, y, coverage| {
            let px = x as i64 + bounds.min.x as i64;
            let py = y as i64 + bounds.min.y as i64;
            if px < 0 || py < 0 || px >= i64::from(width) || py >= i64::from(height) {
                return;
            }

            let ink = 255 - (coverage.clamp(0.0, 1.0) * 255.0).round() as u8;
            let pixel = canvas.get_pixel_mut(px as u32, py as u32);
            pixel.0[0] = pixel.0[0].min(ink);
        });

        canvas
    }
}
