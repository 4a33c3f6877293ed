//! The public façade: [`solve`] turns a set of string-keyed
//! constraints plus grid dimensions and a seed into a lazy stream of
//! [`SolveEvent`]s.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::CompileError;
use crate::search::{self, Search, SearchEvent};
use crate::tile_table::TileTable;

/// One adjacency constraint, keyed by opaque string tile ids. Neighbor
/// lists are given in `(north, east, south, west)` order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Constraint {
    /// This tile's opaque id.
    pub id: String,
    /// Ids permitted to sit immediately north of this tile.
    pub north: Vec<String>,
    /// Ids permitted to sit immediately east of this tile.
    pub east: Vec<String>,
    /// Ids permitted to sit immediately south of this tile.
    pub south: Vec<String>,
    /// Ids permitted to sit immediately west of this tile.
    pub west: Vec<String>,
}

impl Constraint {
    /// Construct a constraint from an id and its four neighbor lists.
    pub fn new(
        id: impl Into<String>,
        north: Vec<String>,
        east: Vec<String>,
        south: Vec<String>,
        west: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            north,
            east,
            south,
            west,
        }
    }

    fn into_internal(self) -> crate::tile_table::Constraint {
        crate::tile_table::Constraint::new(self.id, self.north, self.east, self.south, self.west)
    }
}

/// One step of progress through a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Progress {
    /// The grid immediately after the initial full-grid propagation,
    /// row-major: for each cell, the set of tile ids still possible.
    Snapshot(Vec<HashSet<String>>),
    /// Cell `(x, y)` was tentatively assigned `tile` (`Some`), or a
    /// previous assignment there was undone (`None`).
    Decision {
        /// The cell's column.
        x: usize,
        /// The cell's row.
        y: usize,
        /// The tile id placed there, or `None` if this is an undo.
        tile: Option<String>,
    },
}

/// The terminal result of a solve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Every cell's tile id, row-major (`index = y * width + x`).
    Solved(Vec<String>),
    /// The instance has no valid tiling.
    NoSolution,
}

/// One item produced by the stream [`solve`] returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveEvent {
    /// A search stepped forward; see [`Progress`].
    Progress(Progress),
    /// The constraints failed to compile; always the sole event, and
    /// always the first.
    Error(CompileError),
    /// Always the last event.
    Done(Outcome),
}

enum State {
    /// Not yet attempted to compile the constraints.
    Uncompiled {
        constraints: Vec<Constraint>,
        width: usize,
        height: usize,
        seed: u32,
    },
    /// Compiled and searching.
    Searching { table: TileTable, search: Search },
    Finished,
}

/// A lazy, pull-driven, single-threaded stream of [`SolveEvent`]s.
///
/// Nothing runs until [`Iterator::next`] is first called; dropping the
/// stream mid-solve abandons the search with no cleanup required (no
/// threads, no background task — every suspension point is a plain
/// `return` from `next`).
pub struct Solve {
    state: State,
}

impl Iterator for Solve {
    type Item = SolveEvent;

    fn next(&mut self) -> Option<Self::Item> {
        match std::mem::replace(&mut self.state, State::Finished) {
            State::Finished => None,
            State::Uncompiled {
                constraints,
                width,
                height,
                seed,
            } => {
                if width == 0 || height == 0 {
                    return Some(SolveEvent::Done(Outcome::Solved(Vec::new())));
                }

                let internal: Vec<_> = constraints.into_iter().map(Constraint::into_internal).collect();
                match TileTable::compile(&internal) {
                    Err(e) => Some(SolveEvent::Error(e)),
                    Ok(table) => {
                        let search = Search::new(table.clone(), width, height, seed);
                        self.state = State::Searching { table, search };
                        self.next()
                    }
                }
            }
            State::Searching { table, mut search } => {
                let event = search.next();
                match event {
                    None => None,
                    Some(SearchEvent::Progress(p)) => {
                        let mapped = map_progress(&table, p);
                        self.state = State::Searching { table, search };
                        Some(SolveEvent::Progress(mapped))
                    }
                    Some(SearchEvent::Done(outcome)) => Some(SolveEvent::Done(map_outcome(&table, outcome))),
                }
            }
        }
    }
}

fn map_progress(table: &TileTable, progress: search::Progress) -> Progress {
    match progress {
        search::Progress::Snapshot(cells) => Progress::Snapshot(
            cells
                .into_iter()
                .map(|domain| domain.iter_set().map(|i| table.id_of(i).to_string()).collect())
                .collect(),
        ),
        search::Progress::Decision { x, y, tile } => Progress::Decision {
            x,
            y,
            tile: tile.map(|i| table.id_of(i).to_string()),
        },
    }
}

fn map_outcome(table: &TileTable, outcome: search::Outcome) -> Outcome {
    match outcome {
        search::Outcome::Solved(indices) => {
            Outcome::Solved(indices.into_iter().map(|i| table.id_of(i).to_string()).collect())
        }
        search::Outcome::NoSolution => Outcome::NoSolution,
    }
}

/// Solve a `width × height` tiling instance under `constraints`,
/// deterministically for a given `seed`.
///
/// Compilation is deferred to the stream's first pull: construction
/// itself can never fail. A compile failure is delivered as the sole
/// [`SolveEvent::Error`] and the stream then ends. A zero `width` or
/// `height` short-circuits to a single `Done(Solved(vec![]))` event,
/// skipping compilation entirely (an empty grid has no adjacency to
/// validate).
#[instrument(skip(constraints))]
pub fn solve(constraints: Vec<Constraint>, width: usize, height: usize, seed: u32) -> Solve {
    Solve {
        state: State::Uncompiled {
            constraints,
            width,
            height,
            seed,
        },
    }
}
