//! Adaptive threshold surface
//!
//! One scalar map per pyramid level. The coarsest map is seeded directly
//! from the pyramids; every finer map is produced by [`refine`], so any
//! level can later be used as the operative threshold for binarization.

pub mod refine;

use crate::error::{BinarizeError, Result};
use crate::models::Grid;
use crate::pyramid::PyramidSet;
use log::debug;
use refine::{RefineStats, Refiner};
use std::fmt;
use std::str::FromStr;

/// Rule for computing a sharp local threshold at one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Hypothesis {
    /// Luminance of the average-pyramid sample
    #[default]
    LocalAverage,
    /// Midpoint between min- and max-pyramid luminances
    AverageMinMax,
}

impl Hypothesis {
    /// Evaluate the rule at `(x, y)` of pyramid level `level`
    #[inline]
    pub fn evaluate(self, pyramids: &PyramidSet, level: usize, x: usize, y: usize) -> f64 {
        match self {
            Hypothesis::LocalAverage => pyramids.average().layers()[level].luminance(x, y),
            Hypothesis::AverageMinMax => {
                let min = pyramids.min().layers()[level].luminance(x, y);
                let max = pyramids.max().layers()[level].luminance(x, y);
                (min + max) / 2.0
            }
        }
    }
}

impl fmt::Display for Hypothesis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hypothesis::LocalAverage => f.write_str("local-average"),
            Hypothesis::AverageMinMax => f.write_str("average-min-max"),
        }
    }
}

impl FromStr for Hypothesis {
    type Err = BinarizeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "local-average" | "average" => Ok(Hypothesis::LocalAverage),
            "average-min-max" | "min-max" | "midpoint" => Ok(Hypothesis::AverageMinMax),
            other => Err(BinarizeError::InvalidParameter(format!(
                "unknown hypothesis '{other}'"
            ))),
        }
    }
}

/// Threshold maps for every pyramid level
#[derive(Debug, Clone)]
pub struct ThresholdSurface {
    hypothesis: Hypothesis,
    noise_threshold: f64,
    maps: Vec<Grid<f64>>,
    stats: RefineStats,
}

impl ThresholdSurface {
    /// Seed the coarsest level and refine down to full resolution
    pub fn build(pyramids: &PyramidSet, hypothesis: Hypothesis, noise_threshold: f64) -> Result<Self> {
        if !noise_threshold.is_finite() || noise_threshold <= 0.0 {
            return Err(BinarizeError::InvalidParameter(format!(
                "noise threshold must be a positive number, got {noise_threshold}"
            )));
        }

        let mut maps: Vec<Grid<f64>> = pyramids
            .min()
            .layers()
            .iter()
            .map(|layer| Grid::filled(layer.width(), layer.height(), 0.0))
            .collect();

        let top = maps.len() - 1;
        maps[top] = seed(pyramids, hypothesis);

        let refiner = Refiner {
            pyramids,
            hypothesis,
            noise_threshold,
        };
        let stats = refiner.run(&mut maps);
        for level in (0..top).rev() {
            debug!(
                "threshold level {}: {} cells blended, {} gated",
                level, stats.blended[level], stats.gated[level]
            );
        }

        Ok(Self {
            hypothesis,
            noise_threshold,
            maps,
            stats,
        })
    }

    /// Rule used for seeding and gated cells
    pub fn hypothesis(&self) -> Hypothesis {
        self.hypothesis
    }

    /// Minimum min/max spread treated as a real edge
    pub fn noise_threshold(&self) -> f64 {
        self.noise_threshold
    }

    /// Number of levels
    pub fn levels(&self) -> usize {
        self.maps.len()
    }

    /// Threshold map for `level`
    pub fn map(&self, level: usize) -> Result<&Grid<f64>> {
        self.maps.get(level).ok_or(BinarizeError::LevelOutOfRange {
            level,
            depth: self.maps.len(),
        })
    }

    /// All maps, finest first
    pub fn maps(&self) -> &[Grid<f64>] {
        &self.maps
    }

    /// Blend/gate counters from construction
    pub fn stats(&self) -> &RefineStats {
        &self.stats
    }

    /// `(min, max)` threshold value over one level
    pub fn range(&self, level: usize) -> Result<(f64, f64)> {
        let map = self.map(level)?;
        Ok(map
            .as_slice()
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            }))
    }
}

/// Threshold values for the coarsest level, straight from the pyramids
pub fn seed(pyramids: &PyramidSet, hypothesis: Hypothesis) -> Grid<f64> {
    let level = pyramids.depth() - 1;
    let (width, height) = pyramids.min().coarsest().shape();
    Grid::from_fn(width, height, |x, y| hypothesis.evaluate(pyramids, level, x, y))
}
