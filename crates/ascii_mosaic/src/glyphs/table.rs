use std::fs;
use std::path::Path;

use log::debug;

use super::brightness::glyph_brightness;
use super::font::GlyphRasterizer;
use crate::MosaicError;

/// Code points measured by the table: NUL plus the printable ASCII range and DEL.
pub fn calibration_symbols() -> impl Iterator<Item = u8> {
    std::iter::once(0).chain(32..=127)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GlyphEntry {
    pub symbol: u8,
    /// Rendered brightness on the `0..=255` scale.
    pub brightness: f32,
}

impl GlyphEntry {
    pub fn new(symbol: u8, brightness: f32) -> Self {
        Self { symbol, brightness }
    }

    pub fn ch(&self) -> char {
        char::from(self.symbol)
    }
}

/// Glyphs sorted from darkest to brightest.
#[derive(Clone, Debug)]
pub struct GlyphTable {
    entries: Vec<GlyphEntry>,
}

impl GlyphTable {
    /// Renders every calibration symbol on a `font_size / 2 × font_size` canvas and ranks it.
    pub fn build<R: GlyphRasterizer>(rasterizer: &R, font_size: u32) -> Result<Self, MosaicError> {
        Self::build_with(rasterizer, font_size, |_, _| Ok(()))
    }

    /// Same as [`GlyphTable::build`], additionally saving each bitmap as `<code>.png` in `dir`.
    pub fn build_and_dump<R: GlyphRasterizer>(
        rasterizer: &R,
        font_size: u32,
        dir: &Path,
    ) -> Result<Self, MosaicError> {
        fs::create_dir_all(dir)?;
        Self::build_with(rasterizer, font_size, |symbol, bitmap| {
            bitmap.save(dir.join(format!("{symbol}.png")))?;
            Ok(())
        })
    }

    fn build_with<R, F>(
        rasterizer: &R,
        font_size: u32,
        mut inspect: F,
    ) -> Result<Self, MosaicError>
    where
        R: GlyphRasterizer,
        F: FnMut(u8, &image::GrayImage) -> Result<(), MosaicError>,
    {
        if font_size < 2 {
            return Err(MosaicError::InvalidFontSize(font_size));
        }

        let (width, height) = (font_size / 2, font_size);
        let mut entries = Vec::with_capacity(97);
        for symbol in calibration_symbols() {
            let bitmap = rasterizer.rasterize(char::from(symbol), width, height);
            inspect(symbol, &bitmap)?;
            entries.push(GlyphEntry::new(symbol, glyph_brightness(&bitmap)));
        }

        let table = Self::from_entries(entries);
        if let (Some(first), Some(last)) = (table.entries.first(), table.entries.last()) {
            debug!(
                "glyph table ready: {} entries, darkest {:?} ({:.1}), brightest {:?} ({:.1})",
                table.len(),
                first.ch(),
                first.brightness,
                last.ch(),
                last.brightness
            );
        }
        Ok(table)
    }

    /// Sorts `entries` by brightness, keeping the given order among equal values.
    pub fn from_entries(mut entries: Vec<GlyphEntry>) -> Self {
        entries.sort_by(|a, b| a.brightness.total_cmp(&b.brightness));
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[GlyphEntry] {
        &self.entries
    }

    /// First entry, in ascending order, at least as bright as `value`.
    ///
    /// Values brighter than every glyph resolve to the brightest glyph. Returns `None` only for an
    /// empty table.
    pub fn ceiling(&self, value: f32) -> Option<&GlyphEntry> {
        let index = self.entries.partition_point(|entry| entry.brightness < value);
        self.entries.get(index).or_else(|| self.entries.last())
    }
}
