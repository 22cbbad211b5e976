mod ascii;
mod glyphs;
mod image_pipeline;

use std::path::{Path, PathBuf};

use image::GrayImage;
use log::info;

pub use ascii::{
    grid::GlyphGrid,
    mapping::{cell_brightness, GlyphMapper},
};
pub use glyphs::{
    brightness::{glyph_brightness, normalized_brightness},
    font::{FontRasterizer, GlyphRasterizer},
    table::{calibration_symbols, GlyphEntry, GlyphTable},
};
pub use image_pipeline::{
    compose::{CellSize, MosaicComposer},
    loader::LumaFrame,
};

/// Font used when none is configured.
pub const DEFAULT_FONT_PATH: &str = "./data/DejaVuSansMono.ttf";

/// Font size in pixels used when none is configured.
pub const DEFAULT_FONT_SIZE: u32 = 20;

#[derive(Debug, thiserror::Error)]
pub enum MosaicError {
    #[error("cannot open file {}", path.display())]
    SourceNotFound { path: PathBuf },
    #[error("failed to load image: {0}")]
    Image(#[from] image::ImageError),
    #[error("font {} is unavailable: {reason}", path.display())]
    FontUnavailable { path: PathBuf, reason: String },
    #[error("invalid font data: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
    #[error("font size must be at least 2 pixels, got {0}")]
    InvalidFontSize(u32),
    #[error("a {columns}x{rows} grid of {}x{} cells does not fit in one image", cell.0, cell.1)]
    CanvasTooLarge { columns: u32, rows: u32, cell: (u32, u32) },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone, Debug)]
pub struct MosaicOptions {
    pub font_path: PathBuf,
    /// Pixel size the font is rendered at, both for calibration and for the output image.
    pub font_size: u32,
    /// Output image cell size; defaults to a `font_size` square.
    pub cell: Option<CellSize>,
    /// Directory receiving the calibration bitmaps, if any.
    pub glyph_dump_dir: Option<PathBuf>,
}

impl Default for MosaicOptions {
    fn default() -> Self {
        Self {
            font_path: PathBuf::from(DEFAULT_FONT_PATH),
            font_size: DEFAULT_FONT_SIZE,
            cell: None,
            glyph_dump_dir: None,
        }
    }
}

impl MosaicOptions {
    pub fn cell_size(&self) -> CellSize {
        self.cell.unwrap_or_else(|| CellSize::square(self.font_size))
    }
}

/// A calibrated glyph table together with the rasterizer it was measured with.
pub struct AsciiMosaic<R> {
    table: GlyphTable,
    composer: MosaicComposer<R>,
}

impl AsciiMosaic<FontRasterizer> {
    /// Loads the configured font and calibrates the glyph table.
    pub fn from_options(options: &MosaicOptions) -> Result<Self, MosaicError> {
        let rasterizer = FontRasterizer::open(&options.font_path, options.font_size)?;
        Self::with_rasterizer(rasterizer, options)
    }
}

impl<R: GlyphRasterizer> AsciiMosaic<R> {
    pub fn with_rasterizer(rasterizer: R, options: &MosaicOptions) -> Result<Self, MosaicError> {
        let table = match &options.glyph_dump_dir {
            Some(dir) => GlyphTable::build_and_dump(&rasterizer, options.font_size, dir)?,
            None => GlyphTable::build(&rasterizer, options.font_size)?,
        };
        info!("calibrated {} glyphs at {}px", table.len(), options.font_size);

        let composer = MosaicComposer::new(rasterizer, options.cell_size());
        Ok(Self { table, composer })
    }

    pub fn table(&self) -> &GlyphTable {
        &self.table
    }

    pub fn cell_size(&self) -> CellSize {
        self.composer.cell()
    }

    pub fn map_frame(&self, frame: &LumaFrame) -> GlyphGrid {
        GlyphMapper::new(&self.table).map_frame(frame)
    }

    pub fn map_path<P: AsRef<Path>>(&self, path: P) -> Result<GlyphGrid, MosaicError> {
        let frame = LumaFrame::open(path)?;
        Ok(self.map_frame(&frame))
    }

    pub fn compose(&self, grid: &GlyphGrid) -> Result<GrayImage, MosaicError> {
        self.composer.compose(grid)
    }

    pub fn compose_with_progress<F: FnMut(u32)>(
        &self,
        grid: &GlyphGrid,
        on_row: F,
    ) -> Result<GrayImage, MosaicError> {
        self.composer.compose_with_progress(grid, on_row)
    }
}
