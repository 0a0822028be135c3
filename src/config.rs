//! Binarization parameters
//!
//! All tuning values travel in one [`BinarizeConfig`] passed explicitly to
//! every run; nothing is stored in process-wide state.

use crate::error::{BinarizeError, Result};
use crate::threshold::Hypothesis;

/// Default minimum min/max spread treated as an edge
pub const DEFAULT_NOISE_THRESHOLD: f64 = 5.0;
/// Default contrast stretch factor
pub const DEFAULT_GAIN: f64 = 9.0;
/// Default output cutoff
pub const DEFAULT_CUTOFF: u8 = 240;
/// Default threshold level (1/8 resolution)
pub const DEFAULT_LEVEL: usize = 3;

/// Parameters for one binarization run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinarizeConfig {
    /// Minimum `|max - min|` luminance spread that overrides a blended threshold
    pub noise_threshold: f64,
    /// Rule for seeded and gated thresholds
    pub hypothesis: Hypothesis,
    /// Contrast stretch applied around the local threshold
    pub gain: f64,
    /// Stretched values above this become white
    pub cutoff: u8,
    /// Threshold-surface level to binarize with (0 = full resolution)
    pub level: usize,
}

impl Default for BinarizeConfig {
    fn default() -> Self {
        Self {
            noise_threshold: DEFAULT_NOISE_THRESHOLD,
            hypothesis: Hypothesis::LocalAverage,
            gain: DEFAULT_GAIN,
            cutoff: DEFAULT_CUTOFF,
            level: DEFAULT_LEVEL,
        }
    }
}

impl BinarizeConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the noise threshold
    pub fn with_noise_threshold(mut self, noise_threshold: f64) -> Self {
        self.noise_threshold = noise_threshold;
        self
    }

    /// Set the threshold hypothesis
    pub fn with_hypothesis(mut self, hypothesis: Hypothesis) -> Self {
        self.hypothesis = hypothesis;
        self
    }

    /// Set the contrast gain
    pub fn with_gain(mut self, gain: f64) -> Self {
        self.gain = gain;
        self
    }

    /// Set the output cutoff
    pub fn with_cutoff(mut self, cutoff: u8) -> Self {
        self.cutoff = cutoff;
        self
    }

    /// Set the threshold level
    pub fn with_level(mut self, level: usize) -> Self {
        self.level = level;
        self
    }

    /// Check values that do not depend on the image
    ///
    /// The level is checked later, once the pyramid depth is known.
    pub fn validate(&self) -> Result<()> {
        if !self.noise_threshold.is_finite() || self.noise_threshold <= 0.0 {
            return Err(BinarizeError::InvalidParameter(format!(
                "noise threshold must be a positive number, got {}",
                self.noise_threshold
            )));
        }
        if !self.gain.is_finite() {
            return Err(BinarizeError::InvalidParameter(format!(
                "gain must be finite, got {}",
                self.gain
            )));
        }
        Ok(())
    }
}
