//! The `width × height` grid of [`BitDomain`]s that the Propagator and
//! Search mutate.

use ndarray::Array2;
use std::ops::{Index, IndexMut};

use crate::bit_domain::BitDomain;
use crate::direction::Direction;

/// Row-major `width × height` array of domains, all of the same
/// width.
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Array2<BitDomain>,
}

impl Grid {
    /// A grid with every cell set to `BitDomain::full(num_tiles)`.
    pub fn full(width: usize, height: usize, num_tiles: usize) -> Self {
        let cells = Array2::from_shape_fn((height, width), |_| BitDomain::full(num_tiles));
        Self { cells }
    }

    pub fn width(&self) -> usize {
        self.cells.shape()[1]
    }

    pub fn height(&self) -> usize {
        self.cells.shape()[0]
    }

    /// Every in-bounds neighbor of `(x, y)`, paired with the direction
    /// from `(x, y)` to it.
    pub fn neighbors(&self, x: usize, y: usize) -> impl Iterator<Item = (Direction, usize, usize)> + '_ {
        let width = self.width() as isize;
        let height = self.height() as isize;
        crate::direction::ALL.into_iter().filter_map(move |dir| {
            let (dy, dx) = dir.delta();
            let nx = x as isize + dx;
            let ny = y as isize + dy;
            if nx >= 0 && nx < width && ny >= 0 && ny < height {
                Some((dir, nx as usize, ny as usize))
            } else {
                None
            }
        })
    }

    /// Whether every cell has cardinality 1.
    pub fn is_fully_decided(&self) -> bool {
        self.cells.iter().all(|domain| domain.count() == 1)
    }

    /// All `(x, y)` cells with cardinality `> 1`, sorted by ascending
    /// cardinality with row-major position breaking ties.
    pub fn undecided_by_entropy(&self) -> Vec<(usize, usize)> {
        let width = self.width();
        let mut candidates: Vec<(usize, usize, (usize, usize))> = Vec::new();
        for y in 0..self.height() {
            for x in 0..width {
                let count = self[(x, y)].count();
                if count > 1 {
                    candidates.push((count, y * width + x, (x, y)));
                }
            }
        }
        candidates.sort_by_key(|&(count, position, _)| (count, position));
        candidates.into_iter().map(|(_, _, cell)| cell).collect()
    }

    /// Decode every cell as its single remaining tile index, flattened
    /// row-major (`index = y * width + x`).
    ///
    /// Panics (programmer error) if any cell is not decided — callers
    /// must only invoke this once [`Grid::is_fully_decided`] holds.
    pub fn decode(&self) -> Vec<usize> {
        debug_assert!(self.is_fully_decided());
        let mut out = Vec::with_capacity(self.width() * self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(
                    self[(x, y)]
                        .first_set()
                        .expect("decode called on a non-decided grid"),
                );
            }
        }
        out
    }

    /// Materialize every cell's domain, flattened row-major.
    pub fn snapshot(&self) -> Vec<BitDomain> {
        let mut out = Vec::with_capacity(self.width() * self.height());
        for y in 0..self.height() {
            for x in 0..self.width() {
                out.push(self[(x, y)].clone());
            }
        }
        out
    }
}

impl Index<(usize, usize)> for Grid {
    type Output = BitDomain;

    fn index(&self, (x, y): (usize, usize)) -> &Self::Output {
        debug_assert!(x < self.width(), "x out of bounds for grid width");
        debug_assert!(y < self.height(), "y out of bounds for grid height");
        &self.cells[(y, x)]
    }
}

impl IndexMut<(usize, usize)> for Grid {
    fn index_mut(&mut self, (x, y): (usize, usize)) -> &mut Self::Output {
        debug_assert!(x < self.width(), "x out of bounds for grid width");
        debug_assert!(y < self.height(), "y out of bounds for grid height");
        &mut self.cells[(y, x)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_grid_is_all_full_domains() {
        let grid = Grid::full(3, 2, 4);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        for y in 0..2 {
            for x in 0..3 {
                assert!(grid[(x, y)].is_full());
            }
        }
    }

    #[test]
    fn neighbors_respects_bounds() {
        let grid = Grid::full(2, 2, 1);
        let corners: Vec<_> = grid.neighbors(0, 0).collect();
        assert_eq!(corners.len(), 2);
    }

    #[test]
    fn undecided_sorted_by_entropy_then_position() {
        let mut grid = Grid::full(2, 2, 4);
        grid[(1, 0)].set(2, false);
        grid[(1, 0)].set(3, false); // cardinality 2
        grid[(0, 1)].set(1, false);
        grid[(0, 1)].set(2, false);
        grid[(0, 1)].set(3, false); // cardinality 1, decided
        let undecided = grid.undecided_by_entropy();
        assert_eq!(undecided[0], (1, 0));
    }

    #[test]
    fn decode_reads_singletons() {
        let mut grid = Grid::full(2, 1, 2);
        grid[(0, 0)].set(1, false);
        grid[(1, 0)].set(0, false);
        assert_eq!(grid.decode(), vec![0, 1]);
    }
}
