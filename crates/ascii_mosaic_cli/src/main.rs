mod output;

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use ascii_mosaic::{
    AsciiMosaic, CellSize, GlyphGrid, GlyphRasterizer, LumaFrame, MosaicError, MosaicOptions,
    DEFAULT_FONT_PATH, DEFAULT_FONT_SIZE,
};
use clap::error::ErrorKind;
use clap::Parser;
use image::ImageFormat;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, LevelFilter};

use crate::output::OutputTargets;

/// Exit status for an input image that does not exist.
const EXIT_SOURCE_NOT_FOUND: u8 = 255;
const EXIT_FAILURE: u8 = 1;

/// Largest accepted font size and cell side, in pixels.
const MAX_GLYPH_PX: i64 = 1024;

#[derive(Parser, Debug)]
#[command(author, version, about = "Convert an image to ASCII text and an ASCII mosaic image")]
struct Cli {
    /// Source image path
    #[arg(short, long)]
    input: PathBuf,
    /// Output directory (defaults to the current directory)
    #[arg(short, long)]
    output: Option<PathBuf>,
    #[command(flatten)]
    settings: RenderSettings,
    /// Log level: off, error, warn, info, debug, trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

#[derive(Parser, Debug, Clone)]
struct RenderSettings {
    /// Monospace TrueType/OpenType font used to measure and draw glyphs
    #[arg(long, default_value = DEFAULT_FONT_PATH)]
    font: PathBuf,
    /// Font size in pixels per em
    #[arg(
        long,
        default_value_t = DEFAULT_FONT_SIZE,
        value_parser = clap::value_parser!(u32).range(2..=MAX_GLYPH_PX),
    )]
    font_size: u32,
    /// Output image cell width in pixels (defaults to the font size)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_GLYPH_PX))]
    cell_width: Option<u32>,
    /// Output image cell height in pixels (defaults to the font size)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..=MAX_GLYPH_PX))]
    cell_height: Option<u32>,
    /// Save the calibration bitmap of every glyph into this directory
    #[arg(long)]
    glyph_dir: Option<PathBuf>,
    /// Only write the text file
    #[arg(long, default_value_t = false, conflicts_with = "image_only")]
    text_only: bool,
    /// Only write the mosaic image
    #[arg(long, default_value_t = false)]
    image_only: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_FAILURE),
            };
        },
    };

    env_logger::Builder::new().filter_level(cli.log_level).init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            exit_code(&err)
        },
    }
}

fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<MosaicError>() {
        Some(MosaicError::SourceNotFound { .. }) => ExitCode::from(EXIT_SOURCE_NOT_FOUND),
        _ => ExitCode::from(EXIT_FAILURE),
    }
}

fn run(cli: Cli) -> Result<()> {
    // The source is checked and decoded before any font work happens.
    let frame = LumaFrame::open(&cli.input)
        .with_context(|| format!("failed to load {:?}", cli.input))?;
    info!("asciification of {} in progress", cli.input.display());

    let targets = OutputTargets::resolve(&cli.input, cli.output.as_deref());
    let options = cli.settings.to_options();
    let mosaic = AsciiMosaic::from_options(&options)
        .with_context(|| format!("failed to calibrate glyphs with {:?}", options.font_path))?;

    let grid = mosaic.map_frame(&frame);

    if cli.settings.writes_text() {
        write_text(&grid, &targets)?;
        info!("ascii text file created: {}", targets.text.display());
    }

    if cli.settings.writes_image() {
        write_image(&mosaic, &grid, &targets)?;
        info!("ascii image created: {}", targets.image.display());
    }

    Ok(())
}

fn write_text(grid: &GlyphGrid, targets: &OutputTargets) -> Result<()> {
    let file = File::create(&targets.text)
        .with_context(|| format!("failed to create {:?}", targets.text))?;
    grid.write_text(BufWriter::new(file))
        .with_context(|| format!("failed to write {:?}", targets.text))?;
    Ok(())
}

fn write_image<R: GlyphRasterizer>(
    mosaic: &AsciiMosaic<R>,
    grid: &GlyphGrid,
    targets: &OutputTargets,
) -> Result<()> {
    let progress = ProgressBar::new(u64::from(grid.height));
    progress.set_style(
        ProgressStyle::with_template(
            "{spinner} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows",
        )?
        .progress_chars("=> "),
    );

    let canvas = mosaic.compose_with_progress(grid, |_| progress.inc(1));
    progress.finish_and_clear();
    let canvas = canvas.context("failed to compose the mosaic image")?;

    canvas
        .save_with_format(&targets.image, ImageFormat::Jpeg)
        .with_context(|| format!("failed to save {:?}", targets.image))?;
    Ok(())
}

impl RenderSettings {
    fn to_options(&self) -> MosaicOptions {
        let cell = match (self.cell_width, self.cell_height) {
            (None, None) => None,
            (width, height) => Some(CellSize {
                width: width.unwrap_or(self.font_size),
                height: height.unwrap_or(self.font_size),
            }),
        };

        MosaicOptions {
            font_path: self.font.clone(),
            font_size: self.font_size,
            cell,
            glyph_dump_dir: self.glyph_dir.clone(),
        }
    }

    fn writes_text(&self) -> bool {
        !self.image_only
    }

    fn writes_image(&self) -> bool {
        !self.text_only
    }
}
