/// Row-major 2D container
pub mod grid;
/// RGB sample and luminance
pub mod sample;

pub use grid::Grid;
pub use sample::Sample;
