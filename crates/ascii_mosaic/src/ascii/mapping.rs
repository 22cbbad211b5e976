use crate::glyphs::table::GlyphTable;
use crate::image_pipeline::loader::LumaFrame;

use super::grid::GlyphGrid;

/// Brightness compared against the glyph table for pixel `index`.
///
/// A glyph cell is twice as tall as it is wide, so each pixel is averaged with the one directly
/// below it. Pixels on the last row have nothing below and are used as is.
pub fn cell_brightness(pixels: &[u8], index: usize, width: usize) -> f32 {
    let here = f32::from(pixels[index]);
    match pixels.get(index + width) {
        Some(&below) => (here + f32::from(below)) / 2.0,
        None => here,
    }
}

pub struct GlyphMapper<'a> {
    table: &'a GlyphTable,
}

impl<'a> GlyphMapper<'a> {
    pub fn new(table: &'a GlyphTable) -> Self {
        Self { table }
    }

    /// Picks one glyph per pixel of `frame`.
    pub fn map_frame(&self, frame: &LumaFrame) -> GlyphGrid {
        let width = frame.width as usize;
        let symbols = (0..frame.pixels.len())
            .map(|index| self.match_value(cell_brightness(&frame.pixels, index, width)))
            .collect();

        GlyphGrid::new(frame.width, frame.height, symbols)
    }

    /// Ceiling match of `value`; an empty table yields blanks.
    pub fn match_value(&self, value: f32) -> u8 {
        self.table.ceiling(value).map_or(b' ', |entry| entry.symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::glyphs::table::GlyphEntry;

    fn two_glyph_table() -> GlyphTable {
        GlyphTable::from_entries(vec![GlyphEntry::new(b'A', 0.0), GlyphEntry::new(b'B', 255.0)])
    }

    #[test]
    fn pairs_with_row_below() {
        let pixels = [0, 0, 255, 255];
        assert_eq!(cell_brightness(&pixels, 0, 2), 127.5);
        assert_eq!(cell_brightness(&pixels, 1, 2), 127.5);
        assert_eq!(cell_brightness(&pixels, 2, 2), 255.0);
        assert_eq!(cell_brightness(&pixels, 3, 2), 255.0);
    }

    #[test]
    fn two_by_two_scenario() {
        let table = two_glyph_table();
        let frame = LumaFrame::from_pixels(2, 2, vec![0, 0, 255, 255]);
        let grid = GlyphMapper::new(&table).map_frame(&frame);
        assert_eq!(grid.symbols, b"BBBB".to_vec());
        assert_eq!(grid.to_text(), "BB\nBB\n");
    }

    #[test]
    fn black_pixels_pick_darkest_glyph() {
        let table = two_glyph_table();
        let frame = LumaFrame::from_pixels(3, 1, vec![0, 0, 0]);
        let grid = GlyphMapper::new(&table).map_frame(&frame);
        assert_eq!(grid.symbols, b"AAA".to_vec());
    }

    #[test]
    fn odd_height_falls_back_on_last_row() {
        let pixels = [10, 20, 30, 40, 50, 60];
        // Width 2, height 3: rows 0 and 1 pair, row 2 stands alone.
        assert_eq!(cell_brightness(&pixels, 0, 2), 20.0);
        assert_eq!(cell_brightness(&pixels, 3, 2), 50.0);
        assert_eq!(cell_brightness(&pixels, 4, 2), 50.0);
        assert_eq!(cell_brightness(&pixels, 5, 2), 60.0);
    }

    #[test]
    fn every_pixel_produces_a_match() {
        let table = GlyphTable::from_entries(vec![GlyphEntry::new(b'#', 100.0)]);
        for (width, height) in [(1, 1), (4, 1), (1, 5), (3, 4), (5, 3)] {
            let pixels = (0..width * height).map(|i| (i * 37 % 256) as u8).collect();
            let frame = LumaFrame::from_pixels(width, height, pixels);
            let grid = GlyphMapper::new(&table).map_frame(&frame);
            assert_eq!(grid.len(), (width * height) as usize);
        }
    }

    #[test]
    fn values_above_brightest_glyph_clamp() {
        let table = GlyphTable::from_entries(vec![
            GlyphEntry::new(b'#', 20.0),
            GlyphEntry::new(b'.', 180.0),
        ]);
        let frame = LumaFrame::from_pixels(2, 1, vec![250, 10]);
        let grid = GlyphMapper::new(&table).map_frame(&frame);
        assert_eq!(grid.symbols, b".#".to_vec());
    }

    #[test]
    fn inked_notdef_glyph_stays_distinct_from_blank_in_text() {
        // NUL renders as the font's .notdef box, which carries ink.
        let table = GlyphTable::from_entries(vec![
            GlyphEntry::new(0, 200.76),
            GlyphEntry::new(b' ', 255.0),
        ]);
        let frame = LumaFrame::from_pixels(2, 1, vec![200, 255]);
        let grid = GlyphMapper::new(&table).map_frame(&frame);

        assert_eq!(grid.symbols, vec![0, b' ']);
        let row = grid.rows().next().unwrap();
        let chars: Vec<char> = row.chars().collect();
        assert_eq!(chars, vec!['\0', ' ']);
        assert_ne!(chars[0], chars[1]);
    }

    #[test]
    fn empty_table_yields_blanks() {
        let table = GlyphTable::from_entries(Vec::new());
        assert_eq!(GlyphMapper::new(&table).match_value(42.0), b' ');
    }
}
