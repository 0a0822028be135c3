/// Dense row-major 2D grid
///
/// Used both for image samples (`Grid<Sample>`) and for scalar threshold
/// maps (`Grid<f64>`). Coordinates are `(x, y)` with `x` along the width.
#[derive(Debug, Clone, PartialEq)]
pub struct Grid<T> {
    width: usize,
    height: usize,
    data: Vec<T>,
}

impl<T: Copy> Grid<T> {
    /// Create a grid with every cell set to `value`
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            data: vec![value; width * height],
        }
    }

    /// Wrap an existing row-major buffer
    ///
    /// Returns `None` when `data.len() != width * height`.
    pub fn from_vec(width: usize, height: usize, data: Vec<T>) -> Option<Self> {
        if data.len() != width * height {
            return None;
        }
        Some(Self {
            width,
            height,
            data,
        })
    }

    /// Build a grid by evaluating `f(x, y)` for every cell in row-major order
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut data = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Get grid width
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get grid height
    pub fn height(&self) -> usize {
        self.height
    }

    /// `(width, height)`
    pub fn shape(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Get the value at (x, y)
    ///
    /// Panics when out of bounds; callers index with clamped coordinates.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> T {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x]
    }

    /// Set the value at (x, y)
    #[inline]
    pub fn set(&mut self, x: usize, y: usize, value: T) {
        debug_assert!(x < self.width && y < self.height);
        self.data[y * self.width + x] = value;
    }

    /// Raw row-major storage
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Consume the grid and return its storage
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Iterate over `(x, y, value)` in row-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let width = self.width;
        self.data
            .iter()
            .enumerate()
            .map(move |(i, &v)| (i % width, i / width, v))
    }
}

impl<T: Copy + Default> Default for Grid<T> {
    fn default() -> Self {
        Self::filled(0, 0, T::default())
    }
}
