use image::GrayImage;

/// Number of intensity bins in an 8-bit grayscale histogram.
pub const HISTOGRAM_BINS: usize = 256;

/// Upper bound of the comparison scale glyph and pixel brightness share.
pub const BRIGHTNESS_SCALE: f32 = 255.0;

pub fn histogram(image: &GrayImage) -> [u32; HISTOGRAM_BINS] {
    let mut bins = [0u32; HISTOGRAM_BINS];
    for pixel in image.pixels() {
        bins[usize::from(pixel.0[0])] += 1;
    }
    bins
}

/// Normalized brightness of a grayscale bitmap, in `[0, 1]`.
///
/// Every bin pulls the accumulator down from `256` by its share of pixels times its distance to
/// the top of the scale. A raw score of exactly `255` (a fully white bitmap) reports `1`.
pub fn normalized_brightness(image: &GrayImage) -> f32 {
    let bins = histogram(image);
    let pixels: u64 = bins.iter().map(|&count| u64::from(count)).sum();
    if pixels == 0 {
        return 0.0;
    }

    let scale = HISTOGRAM_BINS as f64;
    let mut raw = scale;
    for (index, &count) in bins.iter().enumerate() {
        let ratio = f64::from(count) / pixels as f64;
        raw += ratio * (index as f64 - scale);
    }

    if raw == 255.0 {
        1.0
    } else {
        (raw / scale) as f32
    }
}

/// Brightness on the `0..=255` scale used when comparing glyphs against pixels.
pub fn glyph_brightness(image: &GrayImage) -> f32 {
    normalized_brightness(image) * BRIGHTNESS_SCALE
}
