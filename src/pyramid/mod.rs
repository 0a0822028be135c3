//! Reduction pyramids
//!
//! A pyramid is built by repeatedly collapsing 2x2 blocks of the previous
//! layer with one reducer (min, max or average). Layer 0 is a copy of the
//! source image; every following layer halves both dimensions, rounding up.
//! Construction stops before a layer would be narrower or shorter than
//! [`MIN_LAYER_SIZE`].

pub mod reduce;

use crate::error::{BinarizeError, MIN_LAYER_SIZE, Result};
use crate::models::{Grid, Sample};
use crate::utils::block::{half_ceil, quad};
use log::trace;
use std::fmt;

/// Which 2x2 reducer a pyramid uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PyramidKind {
    /// Darkest sample of each block
    Min,
    /// Brightest sample of each block
    Max,
    /// Per-channel mean of each block
    Average,
}

impl PyramidKind {
    /// Apply this kind's reducer to a block of samples
    pub fn reduce(self, samples: &[Sample]) -> Result<Sample> {
        match self {
            PyramidKind::Min => reduce::min_luminance(samples),
            PyramidKind::Max => reduce::max_luminance(samples),
            PyramidKind::Average => reduce::average(samples),
        }
    }

    /// Upper-case name, used for dump file names
    pub fn name(self) -> &'static str {
        match self {
            PyramidKind::Min => "MIN",
            PyramidKind::Max => "MAX",
            PyramidKind::Average => "AVERAGE",
        }
    }
}

impl fmt::Display for PyramidKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One resolution level of a pyramid
#[derive(Debug, Clone)]
pub struct Layer {
    index: usize,
    grid: Grid<Sample>,
}

impl Layer {
    /// Pyramid level (0 = full resolution)
    pub fn index(&self) -> usize {
        self.index
    }

    /// Layer width
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Layer height
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// `(width, height)`
    pub fn shape(&self) -> (usize, usize) {
        self.grid.shape()
    }

    /// Sample at (x, y)
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> Sample {
        self.grid.get(x, y)
    }

    /// Luminance of the sample at (x, y)
    #[inline]
    pub fn luminance(&self, x: usize, y: usize) -> f64 {
        self.grid.get(x, y).luminance()
    }

    /// Underlying sample grid
    pub fn grid(&self) -> &Grid<Sample> {
        &self.grid
    }

    /// Reduce this layer into the next coarser one
    ///
    /// Returns `Ok(None)` when the next layer would be smaller than
    /// [`MIN_LAYER_SIZE`] in either dimension.
    fn reduce(&self, kind: PyramidKind) -> Result<Option<Layer>> {
        let (width, height) = self.shape();
        let next_width = half_ceil(width);
        let next_height = half_ceil(height);
        if next_width < MIN_LAYER_SIZE || next_height < MIN_LAYER_SIZE {
            return Ok(None);
        }

        let mut grid = Grid::filled(next_width, next_height, Sample::BLACK);
        for y in 0..next_height {
            for x in 0..next_width {
                let block = quad(x, y, width, height).map(|(sx, sy)| self.grid.get(sx, sy));
                grid.set(x, y, kind.reduce(&block)?);
            }
        }

        Ok(Some(Layer {
            index: self.index + 1,
            grid,
        }))
    }
}

/// An ordered stack of layers built with one reducer
#[derive(Debug, Clone)]
pub struct Pyramid {
    kind: PyramidKind,
    layers: Vec<Layer>,
}

impl Pyramid {
    /// Build a pyramid from a full-resolution image
    ///
    /// Fails with [`BinarizeError::InvalidDimensions`] when the image is
    /// smaller than [`MIN_LAYER_SIZE`] in either dimension.
    pub fn build(image: &Grid<Sample>, kind: PyramidKind) -> Result<Self> {
        check_dimensions(image.width(), image.height())?;

        let mut layers = vec![Layer {
            index: 0,
            grid: image.clone(),
        }];
        while let Some(next) = layers[layers.len() - 1].reduce(kind)? {
            trace!(
                "{} pyramid: layer {} is {}x{}",
                kind,
                next.index,
                next.width(),
                next.height()
            );
            layers.push(next);
        }

        Ok(Self { kind, layers })
    }

    /// Reducer used by this pyramid
    pub fn kind(&self) -> PyramidKind {
        self.kind
    }

    /// Number of layers (always at least 1)
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Layer at `index`, if it exists
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// All layers, finest first
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// The coarsest layer
    pub fn coarsest(&self) -> &Layer {
        // `build` always pushes layer 0
        &self.layers[self.layers.len() - 1]
    }

    /// Shapes of all layers, finest first
    pub fn shapes(&self) -> Vec<(usize, usize)> {
        self.layers.iter().map(Layer::shape).collect()
    }
}

/// Reject images too small to form a pyramid layer
pub fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width < MIN_LAYER_SIZE || height < MIN_LAYER_SIZE {
        return Err(BinarizeError::InvalidDimensions { width, height });
    }
    Ok(())
}

/// The min, max and average pyramids of one image
///
/// All three always have the same kinds in the same slots and identical
/// layer shapes.
#[derive(Debug, Clone)]
pub struct PyramidSet {
    min: Pyramid,
    max: Pyramid,
    average: Pyramid,
}

impl PyramidSet {
    /// Build all three pyramids from the same image
    pub fn build(image: &Grid<Sample>) -> Result<Self> {
        Ok(Self {
            min: Pyramid::build(image, PyramidKind::Min)?,
            max: Pyramid::build(image, PyramidKind::Max)?,
            average: Pyramid::build(image, PyramidKind::Average)?,
        })
    }

    /// Assemble a set from separately built pyramids
    ///
    /// Fails with [`BinarizeError::InvalidParameter`] when a pyramid has the
    /// wrong kind, and with [`BinarizeError::DimensionMismatch`] when the
    /// layer shapes differ.
    pub fn from_pyramids(min: Pyramid, max: Pyramid, average: Pyramid) -> Result<Self> {
        for (pyramid, kind) in [
            (&min, PyramidKind::Min),
            (&max, PyramidKind::Max),
            (&average, PyramidKind::Average),
        ] {
            if pyramid.kind() != kind {
                return Err(BinarizeError::InvalidParameter(format!(
                    "expected a {} pyramid, got {}",
                    kind,
                    pyramid.kind()
                )));
            }
        }

        let shapes = min.shapes();
        for other in [&max, &average] {
            let other_shapes = other.shapes();
            if other_shapes != shapes {
                let mismatch = shapes
                    .iter()
                    .zip(&other_shapes)
                    .find(|(a, b)| a != b)
                    .map(|(&a, &b)| (a, b))
                    .unwrap_or((min.coarsest().shape(), other.coarsest().shape()));
                return Err(BinarizeError::DimensionMismatch {
                    expected: mismatch.0,
                    actual: mismatch.1,
                });
            }
        }

        Ok(Self { min, max, average })
    }

    /// Darkest-sample pyramid
    pub fn min(&self) -> &Pyramid {
        &self.min
    }

    /// Brightest-sample pyramid
    pub fn max(&self) -> &Pyramid {
        &self.max
    }

    /// Per-channel mean pyramid
    pub fn average(&self) -> &Pyramid {
        &self.average
    }

    /// Number of levels shared by the three pyramids
    pub fn depth(&self) -> usize {
        self.min.depth()
    }

    /// Luminance spread `|max - min|` at one cell
    #[inline]
    pub fn contrast(&self, level: usize, x: usize, y: usize) -> f64 {
        (self.max.layers[level].luminance(x, y) - self.min.layers[level].luminance(x, y)).abs()
    }

    /// Iterate the three pyramids
    pub fn iter(&self) -> impl Iterator<Item = &Pyramid> {
        [&self.min, &self.max, &self.average].into_iter()
    }
}
