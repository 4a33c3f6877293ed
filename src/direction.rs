//! The four orthogonal directions a grid cell can have a neighbor in.

use std::fmt::{self, Display, Formatter};

/// One of the four compass directions used for grid adjacency.
///
/// The axis convention is fixed here and held consistently everywhere
/// else in the crate: north is `dy = -1` (the image-row convention).
/// The commutativity check in [`crate::tile_table::compile`] makes the
/// particular choice of convention observationally invisible to
/// callers, as long as it is applied consistently — which it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// `dy = -1`.
    North,
    /// `dx = +1`.
    East,
    /// `dy = +1`.
    South,
    /// `dx = -1`.
    West,
}

/// All four directions, in the canonical order used throughout the
/// crate (north, east, south, west) — matches the tuple order of the
/// `(N, E, S, W)` input constraints in the engine façade.
pub const ALL: [Direction; 4] = [
    Direction::North,
    Direction::East,
    Direction::South,
    Direction::West,
];

impl Direction {
    /// The direction's index in `[0, 4)`, matching `ALL`.
    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }

    /// The opposite direction: `(d + 2) mod 4`.
    pub fn opposite(self) -> Direction {
        match self {
            Direction::North => Direction::South,
            Direction::East => Direction::West,
            Direction::South => Direction::North,
            Direction::West => Direction::East,
        }
    }

    /// The `(dy, dx)` offset to the neighbor in this direction, under
    /// the fixed `north: dy = -1` convention.
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::North => (-1, 0),
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
        }
    }

    /// Construct a `Direction` from its `ALL`-order index.
    pub fn from_index(index: usize) -> Direction {
        ALL[index]
    }
}

impl Display for Direction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let s = match self {
            Direction::North => "north",
            Direction::East => "east",
            Direction::South => "south",
            Direction::West => "west",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opposite_is_involution() {
        for d in ALL {
            assert_eq!(d.opposite().opposite(), d);
        }
    }

    #[test]
    fn opposite_matches_index_arithmetic() {
        for d in ALL {
            assert_eq!(d.opposite().index(), (d.index() + 2) % 4);
        }
    }

    #[test]
    fn deltas_are_axis_opposed() {
        for d in ALL {
            let (dy, dx) = d.delta();
            let (ody, odx) = d.opposite().delta();
            assert_eq!((dy, dx), (-ody, -odx));
        }
    }

    #[test]
    fn index_round_trips() {
        for d in ALL {
            assert_eq!(Direction::from_index(d.index()), d);
        }
    }
}
