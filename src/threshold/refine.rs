//! Coarse-to-fine refinement of threshold maps
//!
//! Maps are filled one level at a time from the coarsest down. For each
//! cell the four finer children first receive a smooth estimate
//! blended from the cell and its neighbors; children whose min/max spread
//! exceeds the noise threshold then get a value computed locally instead.

use super::Hypothesis;
use crate::models::Grid;
use crate::pyramid::PyramidSet;
use crate::utils::block::quad;

/// Weight of the cell itself in a one-axis blend
const MAIN_PART: f64 = 0.75;
/// Weight of the neighbor in a one-axis blend
const SIDE_PART: f64 = 0.25;

/// Per-level counters collected during refinement
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RefineStats {
    /// Cells written by blending, indexed by level
    pub blended: Vec<usize>,
    /// Cells overwritten by the contrast gate, indexed by level
    pub gated: Vec<usize>,
}

impl RefineStats {
    fn new(depth: usize) -> Self {
        Self {
            blended: vec![0; depth],
            gated: vec![0; depth],
        }
    }
}

/// Read-only inputs shared by every refinement step
pub(crate) struct Refiner<'a> {
    pub pyramids: &'a PyramidSet,
    pub hypothesis: Hypothesis,
    pub noise_threshold: f64,
}

impl Refiner<'_> {
    /// Refine the seeded coarsest map down to level 0
    ///
    /// Levels are processed one at a time, coarsest first. Every cell of a
    /// level is final before any of its values or neighbors are blended
    /// into the next finer level.
    pub fn run(&self, maps: &mut [Grid<f64>]) -> RefineStats {
        let mut stats = RefineStats::new(maps.len());
        let Some(top) = maps.len().checked_sub(1) else {
            return stats;
        };

        for level in (1..=top).rev() {
            let (width, height) = maps[level].shape();
            for y in 0..height {
                for x in 0..width {
                    self.refine_cell(maps, level, x, y, &mut stats);
                }
            }
        }
        stats
    }

    /// Write the children of `(x, y)` at `level - 1`, then gate each distinct one
    fn refine_cell(
        &self,
        maps: &mut [Grid<f64>],
        level: usize,
        x: usize,
        y: usize,
        stats: &mut RefineStats,
    ) {
        let estimates = blend_quadrants(&maps[level], x, y);

        let finer = &mut maps[level - 1];
        let (fw, fh) = finer.shape();
        let positions = quad(x, y, fw, fh);

        // Later estimates overwrite earlier ones where clamping collapses positions
        for (&(fx, fy), &value) in positions.iter().zip(estimates.iter()) {
            finer.set(fx, fy, value);
        }

        let mut children: Vec<(usize, usize)> = Vec::with_capacity(4);
        for pos in positions {
            if !children.contains(&pos) {
                children.push(pos);
            }
        }

        let fine_level = level - 1;
        stats.blended[fine_level] += children.len();
        for &(fx, fy) in &children {
            if self.pyramids.contrast(fine_level, fx, fy) > self.noise_threshold {
                finer.set(
                    fx,
                    fy,
                    self.hypothesis.evaluate(self.pyramids, fine_level, fx, fy),
                );
                stats.gated[fine_level] += 1;
            }
        }
    }
}

/// Smooth estimates for the 2x2 children of `(x, y)`
///
/// Order matches [`quad`]: top-left, top-right, bottom-left, bottom-right.
pub(crate) fn blend_quadrants(map: &Grid<f64>, x: usize, y: usize) -> [f64; 4] {
    let (width, height) = map.shape();
    let v = map.get(x, y);
    let blend = |neighbor: Option<f64>| match neighbor {
        Some(n) => MAIN_PART * v + SIDE_PART * n,
        None => v,
    };

    let left = blend(x.checked_sub(1).map(|nx| map.get(nx, y)));
    let right = blend((x + 1 < width).then(|| map.get(x + 1, y)));
    let top = blend(y.checked_sub(1).map(|ny| map.get(x, ny)));
    let bottom = blend((y + 1 < height).then(|| map.get(x, y + 1)));

    [
        (left + top) / 2.0,
        (right + top) / 2.0,
        (left + bottom) / 2.0,
        (right + bottom) / 2.0,
    ]
}
