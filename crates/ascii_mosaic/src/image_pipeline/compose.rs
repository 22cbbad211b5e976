use std::collections::HashMap;

use image::{imageops, GrayImage, Luma};

use crate::ascii::grid::GlyphGrid;
use crate::glyphs::font::GlyphRasterizer;
use crate::MosaicError;

/// Pixel size of one glyph cell in the output image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub fn square(side: u32) -> Self {
        Self { width: side, height: side }
    }
}

pub struct MosaicComposer<R> {
    rasterizer: R,
    cell: CellSize,
}

impl<R: GlyphRasterizer> MosaicComposer<R> {
    pub fn new(rasterizer: R, cell: CellSize) -> Self {
        Self { rasterizer, cell }
    }

    pub fn cell(&self) -> CellSize {
        self.cell
    }

    /// # Errors
    /// `CanvasTooLarge` when either side of the canvas does not fit in a `u32`.
    pub fn canvas_dimensions(&self, grid: &GlyphGrid) -> Result<(u32, u32), MosaicError> {
        let too_large = || MosaicError::CanvasTooLarge {
            columns: grid.width,
            rows: grid.height,
            cell: (self.cell.width, self.cell.height),
        };
        let width = grid.width.checked_mul(self.cell.width).ok_or_else(too_large)?;
        let height = grid.height.checked_mul(self.cell.height).ok_or_else(too_large)?;
        Ok((width, height))
    }

    pub fn compose(&self, grid: &GlyphGrid) -> Result<GrayImage, MosaicError> {
        self.compose_with_progress(grid, |_| {})
    }

    /// Pastes one rendered glyph per grid cell onto a white canvas, calling `on_row` with the index
    /// of each finished row.
    pub fn compose_with_progress<F>(
        &self,
        grid: &GlyphGrid,
        mut on_row: F,
    ) -> Result<GrayImage, MosaicError>
    where
        F: FnMut(u32),
    {
        // Cell offsets below stay within these bounds.
        let (width, height) = self.canvas_dimensions(grid)?;
        let mut canvas = GrayImage::from_pixel(width, height, Luma([255]));

        // A mosaic only ever uses a handful of distinct glyphs.
        let mut rendered: HashMap<u8, GrayImage> = HashMap::new();

        for row in 0..grid.height {
            for column in 0..grid.width {
                let symbol = grid.symbol_at(column, row);
                let glyph = rendered.entry(symbol).or_insert_with(|| {
                    self.rasterizer.rasterize(char::from(symbol), self.cell.width, self.cell.height)
                });
                imageops::replace(
                    &mut canvas,
                    &*glyph,
                    i64::from(column * self.cell.width),
                    i64::from(row * self.cell.height),
                );
            }
            on_row(row);
        }

        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Fills the whole cell black for `#` and leaves everything else blank.
    struct BlockRasterizer;

    impl GlyphRasterizer for BlockRasterizer {
        fn rasterize(&self, symbol: char, width: u32, height: u32) -> GrayImage {
            let value = if symbol == '#' { 0 } else { 255 };
            GrayImage::from_pixel(width, height, Luma([value]))
        }
    }

    #[test]
    fn canvas_is_grid_times_cell() {
        let composer = MosaicComposer::new(BlockRasterizer, CellSize { width: 4, height: 6 });
        let grid = GlyphGrid::new(3, 2, b"      ".to_vec());
        let canvas = composer.compose(&grid).unwrap();
        assert_eq!(canvas.dimensions(), (12, 12));
        assert!(canvas.pixels().all(|p| p.0[0] == 255));
    }

    #[test]
    fn glyphs_land_in_their_cells() {
        let composer = MosaicComposer::new(BlockRasterizer, CellSize::square(3));
        let grid = GlyphGrid::new(2, 2, b"# .#".to_vec());
        let canvas = composer.compose(&grid).unwrap();

        assert_eq!(canvas.get_pixel(1, 1).0[0], 0);
        assert_eq!(canvas.get_pixel(4, 1).0[0], 255);
        assert_eq!(canvas.get_pixel(1, 4).0[0], 255);
        assert_eq!(canvas.get_pixel(5, 5).0[0], 0);
    }

    #[test]
    fn progress_reports_every_row() {
        let composer = MosaicComposer::new(BlockRasterizer, CellSize::square(2));
        let grid = GlyphGrid::new(1, 4, b"#.#.".to_vec());
        let mut rows = Vec::new();
        composer.compose_with_progress(&grid, |row| rows.push(row)).unwrap();
        assert_eq!(rows, vec![0, 1, 2, 3]);
    }

    #[test]
    fn oversized_canvas_is_an_error() {
        let composer = MosaicComposer::new(BlockRasterizer, CellSize::square(1 << 20));
        let grid = GlyphGrid::new(1 << 13, 1, vec![b' '; 1 << 13]);

        let err = composer.compose(&grid).unwrap_err();
        assert!(matches!(
            err,
            MosaicError::CanvasTooLarge { columns: 8192, rows: 1, cell: (1_048_576, 1_048_576) }
        ));
    }
}
