use std::path::Path;

use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::MosaicError;

/// Grayscale source pixels, loaded once and shared by every output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LumaFrame {
    pub width: u32,
    pub height: u32,
    /// Row-major intensities, `0` black to `255` white.
    pub pixels: Vec<u8>,
}

impl LumaFrame {
    /// Decodes the image at `path`.
    ///
    /// # Errors
    /// `SourceNotFound` when nothing exists at `path`, `Image` when it cannot be decoded.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, MosaicError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(MosaicError::SourceNotFound { path: path.to_path_buf() });
        }

        let image = image::open(path)?;
        let (width, height) = image.dimensions();
        debug!("loaded source image {}x{} from {}", width, height, path.display());
        Ok(Self::from_image(&image))
    }

    pub fn from_image(image: &DynamicImage) -> Self {
        let gray = image.to_luma8();
        let (width, height) = gray.dimensions();
        Self { width, height, pixels: gray.into_raw() }
    }

    pub fn from_pixels(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        assert_eq!(width as usize * height as usize, pixels.len());
        Self { width, height, pixels }
    }
}
