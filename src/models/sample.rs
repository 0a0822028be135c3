/// Luminance weight applied to the green channel
pub const GREEN_WEIGHT: f64 = 4.5907;
/// Luminance weight applied to the blue channel
pub const BLUE_WEIGHT: f64 = 0.0601;

/// RGB sample with 8 bits per channel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sample {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Sample {
    /// Black sample
    pub const BLACK: Sample = Sample::gray(0);
    /// White sample
    pub const WHITE: Sample = Sample::gray(255);

    /// Create a new sample
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Create a sample with all three channels set to `value`
    pub const fn gray(value: u8) -> Self {
        Self {
            r: value,
            g: value,
            b: value,
        }
    }

    /// Weighted luminance: `r + 4.5907*g + 0.0601*b`
    ///
    /// This is not a perceptual luma. Threshold parameters (noise threshold,
    /// cutoff) are tuned against this exact weighting.
    #[inline]
    pub fn luminance(&self) -> f64 {
        self.r as f64 + GREEN_WEIGHT * self.g as f64 + BLUE_WEIGHT * self.b as f64
    }
}

impl From<[u8; 3]> for Sample {
    fn from(rgb: [u8; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl From<Sample> for [u8; 3] {
    fn from(sample: Sample) -> Self {
        [sample.r, sample.g, sample.b]
    }
}
