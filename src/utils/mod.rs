//! Utility functions for image processing
//!
//! This module provides helpers shared by the pyramid and threshold code:
//! - Block addressing (2x2 blocks with edge replication)
//! - Pixel packing (RGB/RGBA buffers to sample grids and back)
//! - Binarization (contrast stretch against a threshold map)

/// Contrast stretch and cutoff against a threshold map
pub mod binarization;
pub mod block;
pub mod pixels;
