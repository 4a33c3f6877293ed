//! Structured errors.
//!
//! Two families: [`CompileError`] for user errors rejected while
//! compiling the input constraints (surfaced to the caller on the
//! first pull of the event stream), and [`DomainError`] naming the
//! programmer-error invariants that [`crate::bit_domain::BitDomain`]
//! asserts against rather than recovers from.

use crate::direction::Direction;
use thiserror::Error;

/// A user error detected while compiling tile-id constraints into a
/// [`crate::tile_table::TileTable`]. Reported on the first pull of the
/// solve event stream; the solve produces no events in this case.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// Tile `referrer` lists `target` as a permitted neighbor on
    /// `direction`, but `target` is not a key of the input.
    #[error(
        "tile {referrer:?} references unknown tile {target:?} in direction {direction}"
    )]
    UnknownTile {
        /// The tile whose neighbor list names the unknown id.
        referrer: String,
        /// The unknown id.
        target: String,
        /// The side of `referrer` the reference was found on.
        direction: Direction,
    },

    /// Tile `a` lists `b` as a permitted neighbor on `direction_ab`,
    /// but `b`'s list on the opposite direction does not list `a`.
    #[error(
        "adjacency between {a:?} and {b:?} on direction {direction_ab} is not commutative"
    )]
    NonCommutative {
        /// The tile whose reference to `b` lacks a reciprocal.
        a: String,
        /// The tile `a` names without being named back.
        b: String,
        /// The side of `a` the one-way reference was found on.
        direction_ab: Direction,
    },
}

/// An internal invariant violation: a programmer error, not a
/// recoverable condition. [`crate::bit_domain::BitDomain`] asserts
/// against these rather than returning them as `Result`s — named here
/// so panic messages and tests can refer to a single vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Two domains of different widths were combined or compared.
    #[error("width mismatch: expected {expected}, found {found}")]
    WidthMismatch {
        /// The width of the domain the operation was called on.
        expected: usize,
        /// The width of the other operand.
        found: usize,
    },

    /// A bit index outside `[0, width)` was accessed.
    #[error("index {index} out of bounds for domain of width {width}")]
    IndexOutOfBounds {
        /// The out-of-range index.
        index: usize,
        /// The domain's width.
        width: usize,
    },
}
