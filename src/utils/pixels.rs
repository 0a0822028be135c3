//! Conversion between packed byte buffers and sample grids
//!
//! Packed buffers are row-major, 3 bytes per pixel (RGB) or 4 bytes per
//! pixel (RGBA, alpha ignored). Lengths are checked against the stated
//! dimensions before anything is read.

use crate::error::{BinarizeError, Result};
use crate::models::{Grid, Sample};

fn unpack(bytes: &[u8], width: usize, height: usize, channels: usize) -> Result<Grid<Sample>> {
    let expected = width * height * channels;
    if bytes.len() != expected {
        return Err(BinarizeError::BufferSize {
            expected,
            actual: bytes.len(),
        });
    }

    let data: Vec<Sample> = bytes
        .chunks_exact(channels)
        .map(|px| Sample::new(px[0], px[1], px[2]))
        .collect();

    Grid::from_vec(width, height, data).ok_or(BinarizeError::BufferSize {
        expected,
        actual: bytes.len(),
    })
}

/// Convert a packed RGB buffer into a sample grid
pub fn rgb_to_samples(rgb: &[u8], width: usize, height: usize) -> Result<Grid<Sample>> {
    unpack(rgb, width, height, 3)
}

/// Convert a packed RGBA buffer into a sample grid (alpha is dropped)
pub fn rgba_to_samples(rgba: &[u8], width: usize, height: usize) -> Result<Grid<Sample>> {
    unpack(rgba, width, height, 4)
}

/// Convert a packed single-channel buffer into a gray sample grid
pub fn gray_to_samples(gray: &[u8], width: usize, height: usize) -> Result<Grid<Sample>> {
    let expected = width * height;
    if gray.len() != expected {
        return Err(BinarizeError::BufferSize {
            expected,
            actual: gray.len(),
        });
    }
    Ok(Grid::from_fn(width, height, |x, y| {
        Sample::gray(gray[y * width + x])
    }))
}

/// Pack a sample grid into an RGB buffer
pub fn samples_to_rgb(samples: &Grid<Sample>) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(samples.width() * samples.height() * 3);
    for &s in samples.as_slice() {
        rgb.extend_from_slice(&<[u8; 3]>::from(s));
    }
    rgb
}
