use crate::config::BinarizeConfig;
use crate::error::{BinarizeError, Result};
use crate::models::{Grid, Sample};
use crate::pyramid::PyramidSet;
use crate::threshold::{Hypothesis, ThresholdSurface};
use crate::utils::binarization::apply_threshold;
use log::debug;

/// Pyramids and threshold surface for one image
///
/// Building is the expensive part; once analyzed, any level can be applied
/// with any gain/cutoff without rebuilding.
#[derive(Debug, Clone)]
pub struct Binarization {
    width: usize,
    height: usize,
    pyramids: PyramidSet,
    surface: ThresholdSurface,
}

impl Binarization {
    /// Build the three pyramids and the threshold surface for `image`
    pub fn analyze(image: &Grid<Sample>, hypothesis: Hypothesis, noise_threshold: f64) -> Result<Self> {
        let pyramids = PyramidSet::build(image)?;
        debug!(
            "built pyramids for {}x{} image: {} levels {:?}",
            image.width(),
            image.height(),
            pyramids.depth(),
            pyramids.min().shapes()
        );

        let surface = ThresholdSurface::build(&pyramids, hypothesis, noise_threshold)?;
        debug!(
            "threshold surface ({}, noise {}): {} gated cells",
            hypothesis,
            noise_threshold,
            surface.stats().gated.iter().sum::<usize>()
        );

        Ok(Self {
            width: image.width(),
            height: image.height(),
            pyramids,
            surface,
        })
    }

    /// Analyze with the hypothesis and noise threshold from `config`
    pub fn from_config(image: &Grid<Sample>, config: &BinarizeConfig) -> Result<Self> {
        config.validate()?;
        Self::analyze(image, config.hypothesis, config.noise_threshold)
    }

    /// Number of threshold levels available
    pub fn depth(&self) -> usize {
        self.surface.levels()
    }

    /// The min/max/average pyramids
    pub fn pyramids(&self) -> &PyramidSet {
        &self.pyramids
    }

    /// The threshold surface
    pub fn surface(&self) -> &ThresholdSurface {
        &self.surface
    }

    /// Binarize `image` in place using threshold `level`
    ///
    /// `image` must be the image this run was analyzed from (same shape).
    /// Fails before touching any pixel when the level or shape is wrong.
    pub fn apply(&self, image: &mut Grid<Sample>, level: usize, gain: f64, cutoff: u8) -> Result<()> {
        if level >= self.depth() {
            return Err(BinarizeError::LevelOutOfRange {
                level,
                depth: self.depth(),
            });
        }
        if image.shape() != (self.width, self.height) {
            return Err(BinarizeError::DimensionMismatch {
                expected: (self.width, self.height),
                actual: image.shape(),
            });
        }
        if !gain.is_finite() {
            return Err(BinarizeError::InvalidParameter(format!(
                "gain must be finite, got {gain}"
            )));
        }

        debug!("binarizing at level {} (gain {}, cutoff {})", level, gain, cutoff);
        apply_threshold(image, self.surface.map(level)?, level, gain, cutoff)
    }

    /// Binarized copy of `image`; the input is left untouched
    pub fn render(&self, image: &Grid<Sample>, level: usize, gain: f64, cutoff: u8) -> Result<Grid<Sample>> {
        let mut output = image.clone();
        self.apply(&mut output, level, gain, cutoff)?;
        Ok(output)
    }
}

/// Run the full pipeline on `image` and return the binarized copy
pub fn run(image: &Grid<Sample>, config: &BinarizeConfig) -> Result<Grid<Sample>> {
    let binarization = Binarization::from_config(image, config)?;
    binarization.render(image, config.level, config.gain, config.cutoff)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(width: usize, height: usize) -> Grid<Sample> {
        Grid::from_fn(width, height, |x, y| Sample::gray(((x + y) * 3 % 256) as u8))
    }

    #[test]
    fn test_level_out_of_range_leaves_image() {
        let image = ramp(16, 16);
        let binarization = Binarization::analyze(&image, Hypothesis::LocalAverage, 5.0).unwrap();
        assert_eq!(binarization.depth(), 3);

        let mut target = image.clone();
        let err = binarization.apply(&mut target, 3, 9.0, 240);
        assert!(matches!(
            err,
            Err(BinarizeError::LevelOutOfRange { level: 3, depth: 3 })
        ));
        assert_eq!(target, image);
    }

    #[test]
    fn test_apply_rejects_other_shape() {
        let binarization = Binarization::analyze(&ramp(16, 16), Hypothesis::LocalAverage, 5.0).unwrap();
        let mut other = ramp(16, 12);
        assert!(matches!(
            binarization.apply(&mut other, 0, 1.0, 128),
            Err(BinarizeError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_render_every_level() {
        let image = ramp(40, 24);
        let binarization = Binarization::analyze(&image, Hypothesis::AverageMinMax, 5.0).unwrap();
        for level in 0..binarization.depth() {
            let out = binarization.render(&image, level, 9.0, 240).unwrap();
            assert_eq!(out.shape(), image.shape());
            assert!(out.as_slice().iter().all(|s| *s == Sample::BLACK || *s == Sample::WHITE));
        }
    }

    #[test]
    fn test_run_validates_config() {
        let config = BinarizeConfig::default().with_noise_threshold(0.0);
        assert!(matches!(
            run(&ramp(16, 16), &config),
            Err(BinarizeError::InvalidParameter(_))
        ));
    }
}
