use crate::error::{BinarizeError, Result};
use crate::models::{Grid, Sample};
use crate::utils::block::half_ceil;

/// Expected threshold-grid shape for an image binarized at `level`
pub fn level_shape(width: usize, height: usize, level: usize) -> (usize, usize) {
    let mut shape = (width, height);
    for _ in 0..level {
        shape = (half_ceil(shape.0), half_ceil(shape.1));
    }
    shape
}

/// Stretch contrast around `threshold` and cut to black or white
///
/// `y' = gain * (luminance - threshold) + threshold`, clamped to [0, 255]
/// and truncated to a byte. Returns 255 when `y' > cutoff`, else 0.
#[inline]
pub fn binarize_sample(sample: Sample, threshold: f64, gain: f64, cutoff: u8) -> u8 {
    let stretched = gain * (sample.luminance() - threshold) + threshold;
    let level = stretched.clamp(0.0, 255.0) as u8;
    if level > cutoff { 255 } else { 0 }
}

/// Binarize `image` in place against a threshold map at pyramid `level`
///
/// Each full-resolution pixel (x, y) uses the threshold at
/// `(x >> level, y >> level)`. The map must have the shape of that level;
/// nothing is written when it does not.
pub fn apply_threshold(
    image: &mut Grid<Sample>,
    thresholds: &Grid<f64>,
    level: usize,
    gain: f64,
    cutoff: u8,
) -> Result<()> {
    let (width, height) = image.shape();
    let expected = level_shape(width, height, level);
    if thresholds.shape() != expected {
        return Err(BinarizeError::DimensionMismatch {
            expected,
            actual: thresholds.shape(),
        });
    }

    for y in 0..height {
        for x in 0..width {
            let t = thresholds.get(x >> level, y >> level);
            let value = binarize_sample(image.get(x, y), t, gain, cutoff);
            image.set(x, y, Sample::gray(value));
        }
    }

    Ok(())
}
