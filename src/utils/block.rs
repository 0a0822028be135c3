//! 2x2 block addressing with edge replication
//!
//! A cell `(x, y)` at one pyramid level covers the block starting at
//! `(2x, 2y)` one level finer. When the finer level has an odd width or
//! height, the last block is only one cell wide (or tall); the missing
//! column/row is replaced by repeating the first one instead of padding.

/// `2 * i + 1` if it is a valid index into `len`, otherwise `2 * i`
#[inline]
pub fn next_or_same(i: usize, len: usize) -> usize {
    let base = 2 * i;
    if base + 1 >= len { base } else { base + 1 }
}

/// The four finer-level positions under cell `(x, y)`
///
/// Order is top-left, top-right, bottom-left, bottom-right. On the last
/// column/row of an odd-sized level, right entries repeat the left ones
/// (and bottom entries repeat the top ones).
#[inline]
pub fn quad(x: usize, y: usize, width: usize, height: usize) -> [(usize, usize); 4] {
    let x0 = 2 * x;
    let y0 = 2 * y;
    let x1 = next_or_same(x, width);
    let y1 = next_or_same(y, height);
    [(x0, y0), (x1, y0), (x0, y1), (x1, y1)]
}

/// Halve a dimension, rounding up
#[inline]
pub fn half_ceil(len: usize) -> usize {
    len / 2 + len % 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_or_same() {
        assert_eq!(next_or_same(0, 4), 1);
        assert_eq!(next_or_same(1, 4), 3);
        // Odd length: the last block has no second column
        assert_eq!(next_or_same(2, 5), 4);
        assert_eq!(next_or_same(1, 5), 3);
    }

    #[test]
    fn test_quad_interior() {
        assert_eq!(quad(1, 1, 8, 8), [(2, 2), (3, 2), (2, 3), (3, 3)]);
    }

    #[test]
    fn test_quad_odd_edges() {
        // 5x7 level: column 4 and row 6 are single-cell blocks
        assert_eq!(quad(2, 3, 5, 7), [(4, 6), (4, 6), (4, 6), (4, 6)]);
        assert_eq!(quad(2, 0, 5, 7), [(4, 0), (4, 0), (4, 1), (4, 1)]);
        assert_eq!(quad(0, 3, 5, 7), [(0, 6), (1, 6), (0, 6), (1, 6)]);
    }

    #[test]
    fn test_half_ceil() {
        assert_eq!(half_ceil(8), 4);
        assert_eq!(half_ceil(9), 5);
        assert_eq!(half_ceil(1), 1);
        assert_eq!(half_ceil(0), 0);
    }
}
