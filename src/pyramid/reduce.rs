//! 2x2 block reducers
//!
//! Each reducer collapses the samples of one block into a single sample.
//! Min/max select a whole sample by luminance; average works per channel.

use crate::error::{BinarizeError, Result};
use crate::models::Sample;

/// Sample with the lowest luminance (first one wins on ties)
pub fn min_luminance(samples: &[Sample]) -> Result<Sample> {
    let (first, rest) = samples.split_first().ok_or(BinarizeError::EmptyReduction)?;
    let mut best = *first;
    let mut best_lum = best.luminance();
    for s in rest {
        let lum = s.luminance();
        if lum < best_lum {
            best = *s;
            best_lum = lum;
        }
    }
    Ok(best)
}

/// Sample with the highest luminance (first one wins on ties)
pub fn max_luminance(samples: &[Sample]) -> Result<Sample> {
    let (first, rest) = samples.split_first().ok_or(BinarizeError::EmptyReduction)?;
    let mut best = *first;
    let mut best_lum = best.luminance();
    for s in rest {
        let lum = s.luminance();
        if lum > best_lum {
            best = *s;
            best_lum = lum;
        }
    }
    Ok(best)
}

/// Per-channel integer mean (truncating)
///
/// Averages r, g and b independently, which is not the same as averaging
/// luminances.
pub fn average(samples: &[Sample]) -> Result<Sample> {
    if samples.is_empty() {
        return Err(BinarizeError::EmptyReduction);
    }
    let (mut r, mut g, mut b) = (0u32, 0u32, 0u32);
    for s in samples {
        r += s.r as u32;
        g += s.g as u32;
        b += s.b as u32;
    }
    let n = samples.len() as u32;
    Ok(Sample::new((r / n) as u8, (g / n) as u8, (b / n) as u8))
}
