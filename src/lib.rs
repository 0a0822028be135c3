//! pyramid_binarize - Adaptive document binarization
//!
//! Converts color or grayscale images to black and white using a threshold
//! that varies across the page. The threshold comes from three reduction
//! pyramids of the image (darkest, brightest and mean sample of every 2x2
//! block): the coarsest level seeds it, and finer levels inherit a smoothed
//! copy unless local contrast shows a real edge, in which case the
//! threshold is recomputed from that spot alone.

#![warn(missing_docs)]
#![allow(clippy::missing_docs_in_private_items)]

/// Binarization parameters
pub mod config;
/// Error types
pub mod error;
/// Core data structures (Sample, Grid)
pub mod models;
/// Pyramids + threshold surface + binarizer for one image
pub mod pipeline;
/// Min/max/average reduction pyramids
pub mod pyramid;
/// Multi-resolution threshold surface
pub mod threshold;
/// Image file helpers for drivers and debugging
pub mod tools;
/// Utility functions (block addressing, pixel packing, binarization)
pub mod utils;

pub use config::BinarizeConfig;
pub use error::{BinarizeError, Result};
pub use models::{Grid, Sample};
pub use pipeline::Binarization;
pub use pyramid::{Layer, Pyramid, PyramidKind, PyramidSet};
pub use threshold::{Hypothesis, ThresholdSurface};

use utils::pixels::{gray_to_samples, rgb_to_samples, rgba_to_samples, samples_to_rgb};

/// Binarize a sample grid
///
/// # Returns
/// A new grid of the same shape where every sample is black or white
pub fn binarize(image: &Grid<Sample>, config: &BinarizeConfig) -> Result<Grid<Sample>> {
    pipeline::run(image, config)
}

/// Binarize a packed RGB image
///
/// # Arguments
/// * `rgb` - Raw RGB bytes (3 bytes per pixel)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `config` - Binarization parameters
///
/// # Returns
/// Packed RGB bytes with every pixel either (0, 0, 0) or (255, 255, 255)
pub fn binarize_rgb(rgb: &[u8], width: usize, height: usize, config: &BinarizeConfig) -> Result<Vec<u8>> {
    let samples = rgb_to_samples(rgb, width, height)?;
    Ok(samples_to_rgb(&pipeline::run(&samples, config)?))
}

/// Binarize a packed RGBA image (alpha is ignored)
///
/// The output is packed RGB.
pub fn binarize_rgba(rgba: &[u8], width: usize, height: usize, config: &BinarizeConfig) -> Result<Vec<u8>> {
    let samples = rgba_to_samples(rgba, width, height)?;
    Ok(samples_to_rgb(&pipeline::run(&samples, config)?))
}

/// Binarize a single-channel gray image
///
/// The output has one byte per pixel, either 0 or 255.
pub fn binarize_gray(gray: &[u8], width: usize, height: usize, config: &BinarizeConfig) -> Result<Vec<u8>> {
    let samples = gray_to_samples(gray, width, height)?;
    Ok(pipeline::run(&samples, config)?
        .into_vec()
        .into_iter()
        .map(|s| s.r)
        .collect())
}

/// Binarizer holding a reusable configuration
#[derive(Debug, Clone, Default)]
pub struct Binarizer {
    config: BinarizeConfig,
}

impl Binarizer {
    /// Create a binarizer with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a binarizer with the given settings
    pub fn with_config(config: BinarizeConfig) -> Self {
        Self { config }
    }

    /// Current settings
    pub fn config(&self) -> &BinarizeConfig {
        &self.config
    }

    /// Binarize a sample grid
    pub fn binarize(&self, image: &Grid<Sample>) -> Result<Grid<Sample>> {
        binarize(image, &self.config)
    }

    /// Binarize a packed RGB image
    pub fn binarize_rgb(&self, rgb: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
        binarize_rgb(rgb, width, height, &self.config)
    }

    /// Binarize a single-channel gray image
    pub fn binarize_gray(&self, gray: &[u8], width: usize, height: usize) -> Result<Vec<u8>> {
        binarize_gray(gray, width, height, &self.config)
    }

    /// Binarize, clamping the configured level to the deepest one available
    ///
    /// Small images have fewer pyramid levels than the default level asks
    /// for; this uses the coarsest level they do have instead of failing.
    pub fn binarize_clamped(&self, image: &Grid<Sample>) -> Result<Grid<Sample>> {
        let binarization = Binarization::from_config(image, &self.config)?;
        let level = self.config.level.min(binarization.depth() - 1);
        binarization.render(image, level, self.config.gain, self.config.cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binarize_too_small() {
        let image = vec![0u8; 3 * 3 * 3];
        let err = binarize_rgb(&image, 3, 3, &BinarizeConfig::default());
        assert!(matches!(
            err,
            Err(BinarizeError::InvalidDimensions {
                width: 3,
                height: 3
            })
        ));
    }

    #[test]
    fn test_binarize_rgb_output_is_binary() {
        let (width, height) = (64, 48);
        let mut rgb = Vec::with_capacity(width * height * 3);
        for y in 0..height {
            for x in 0..width {
                let v = if (x / 6 + y / 6) % 2 == 0 { 30 } else { 220 };
                rgb.extend_from_slice(&[v, v, (x * 4) as u8]);
            }
        }
        let out = binarize_rgb(&rgb, width, height, &BinarizeConfig::default()).unwrap();
        assert_eq!(out.len(), rgb.len());
        for px in out.chunks_exact(3) {
            assert!(px == [0, 0, 0] || px == [255, 255, 255]);
        }
    }

    #[test]
    fn test_default_level_needs_deep_pyramid() {
        // 16x16 has levels 0..=2, default asks for 3
        let image = Grid::filled(16, 16, Sample::gray(90));
        let binarizer = Binarizer::new();
        assert!(matches!(
            binarizer.binarize(&image),
            Err(BinarizeError::LevelOutOfRange { level: 3, depth: 3 })
        ));
        let out = binarizer.binarize_clamped(&image).unwrap();
        assert_eq!(out.shape(), (16, 16));
    }

    #[test]
    fn test_binarize_rgba_matches_rgb() {
        let (width, height) = (32, 32);
        let mut rgb = Vec::new();
        let mut rgba = Vec::new();
        for i in 0..width * height {
            let v = (i * 37 % 251) as u8;
            rgb.extend_from_slice(&[v, v / 2, 255 - v]);
            rgba.extend_from_slice(&[v, v / 2, 255 - v, 128]);
        }
        let config = BinarizeConfig::default().with_level(1);
        assert_eq!(
            binarize_rgb(&rgb, width, height, &config).unwrap(),
            binarize_rgba(&rgba, width, height, &config).unwrap()
        );
    }

    #[test]
    fn test_binarize_gray_matches_rgb() {
        let (width, height) = (24, 20);
        let gray: Vec<u8> = (0..width * height).map(|i| ((i * 53) % 256) as u8).collect();
        let rgb: Vec<u8> = gray.iter().flat_map(|&v| [v, v, v]).collect();
        let binarizer = Binarizer::with_config(BinarizeConfig::default().with_level(1));

        let out = binarizer.binarize_gray(&gray, width, height).unwrap();
        assert_eq!(out.len(), width * height);
        let expected: Vec<u8> = binarizer
            .binarize_rgb(&rgb, width, height)
            .unwrap()
            .chunks_exact(3)
            .map(|px| px[0])
            .collect();
        assert_eq!(out, expected);

        assert!(matches!(
            binarize_gray(&gray[1..], width, height, binarizer.config()),
            Err(BinarizeError::BufferSize { .. })
        ));
    }
}
