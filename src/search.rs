//! Iterative backtracking search with lazy, pull-driven progress
//! reporting.
//!
//! The depth-first search (propagate, pick lowest-entropy cell,
//! shuffle its candidates, try each, recurse, undo on failure) is
//! realized as an explicit stack of [`Frame`]s instead of native
//! recursion: each call to [`Search::next`] performs one unit of work
//! and returns, so the whole search is drivable one
//! [`Iterator::next`] at a time and abandonable mid-search by simply
//! dropping the iterator — no native stack frame survives a dropped
//! `Search`.

use std::num::Wrapping;

use crate::bit_domain::BitDomain;
use crate::grid::Grid;
use crate::propagator;
use crate::support_cache::SupportCache;
use crate::tile_table::TileTable;

/// One materialized grid, every cell's domain, row-major.
pub(crate) type Snapshot = Vec<BitDomain>;

/// A single step of progress.
#[derive(Debug, Clone)]
pub(crate) enum Progress {
    /// The grid immediately after the initial full-grid propagation,
    /// before any trial placement.
    Snapshot(Snapshot),
    /// A cell was either tentatively placed (`Some(tile)`) or a prior
    /// placement at that cell was undone (`None`).
    Decision {
        x: usize,
        y: usize,
        tile: Option<usize>,
    },
}

/// The terminal result of a search.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    /// Every cell's tile index, row-major.
    Solved(Vec<usize>),
    NoSolution,
}

/// One item produced by [`Search`].
#[derive(Debug, Clone)]
pub(crate) enum SearchEvent {
    Progress(Progress),
    Done(Outcome),
}

/// One level of the backtracking stack: the cell under trial, its
/// shuffled candidate order, how far through that order we are, and
/// the grid as it stood before any candidate at this level was tried.
struct Frame {
    cell: (usize, usize),
    order: Vec<usize>,
    cursor: usize,
    pre_trial_snapshot: Grid,
    /// Set once the candidate at `cursor` has been placed and
    /// propagated successfully — search should descend rather than
    /// re-trying it.
    committed: bool,
}

/// Drives the backtracking search one step at a time.
pub(crate) struct Search {
    table: TileTable,
    cache: SupportCache,
    grid: Grid,
    seed: u32,
    stack: Vec<Frame>,
    initialized: bool,
    finished: bool,
}

impl Search {
    pub(crate) fn new(table: TileTable, width: usize, height: usize, seed: u32) -> Self {
        let num_tiles = table.num_tiles();
        Self {
            table,
            cache: SupportCache::new(),
            grid: Grid::full(width, height, num_tiles),
            seed,
            stack: Vec::new(),
            initialized: false,
            finished: false,
        }
    }

    fn push_frame(&mut self) {
        let depth = self.stack.len();
        let cell = self
            .grid
            .undecided_by_entropy()
            .first()
            .copied()
            .expect("push_frame called on a fully-decided grid");

        let mut order: Vec<usize> = self.grid[cell].iter_set().collect();
        let frame_seed = self.seed.wrapping_add(depth as u32);
        deterministic_shuffle(&mut order, frame_seed, cell.0, cell.1);

        self.stack.push(Frame {
            cell,
            order,
            cursor: 0,
            pre_trial_snapshot: self.grid.clone(),
            committed: false,
        });
    }

    /// Revert the current grid to `frame`'s pre-trial snapshot and
    /// advance `frame` past its just-rejected candidate, returning the
    /// reversion event.
    fn revert_top(&mut self) -> SearchEvent {
        let frame = self.stack.last_mut().expect("revert_top on empty stack");
        self.grid = frame.pre_trial_snapshot.clone();
        frame.committed = false;
        frame.cursor += 1;
        SearchEvent::Progress(Progress::Decision {
            x: frame.cell.0,
            y: frame.cell.1,
            tile: None,
        })
    }
}

impl Iterator for Search {
    type Item = SearchEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.initialized {
            self.initialized = true;
            return Some(match propagator::propagate_all(&mut self.grid, &self.table, &mut self.cache) {
                Err(_) => {
                    self.finished = true;
                    SearchEvent::Done(Outcome::NoSolution)
                }
                Ok(()) => SearchEvent::Progress(Progress::Snapshot(self.grid.snapshot())),
            });
        }

        loop {
            if self.grid.is_fully_decided() {
                self.finished = true;
                return Some(SearchEvent::Done(Outcome::Solved(self.grid.decode())));
            }

            let need_new_frame = match self.stack.last() {
                None => true,
                Some(frame) => frame.committed,
            };
            if need_new_frame {
                self.push_frame();
                continue;
            }

            let (cell, candidate, exhausted) = {
                let frame = self.stack.last().expect("frame present");
                if frame.cursor == frame.order.len() {
                    (frame.cell, None, true)
                } else {
                    (frame.cell, Some(frame.order[frame.cursor]), false)
                }
            };

            if exhausted {
                self.stack.pop();
                if self.stack.is_empty() {
                    self.finished = true;
                    return Some(SearchEvent::Done(Outcome::NoSolution));
                }
                return Some(self.revert_top());
            }

            let tile = candidate.expect("non-exhausted frame has a candidate");
            let frame = self.stack.last().expect("frame present");
            self.grid = frame.pre_trial_snapshot.clone();
            self.grid[cell] = BitDomain::from_indices(self.table.num_tiles(), [tile]);

            match propagator::propagate(&mut self.grid, &self.table, &mut self.cache, cell) {
                Ok(()) => {
                    let frame = self.stack.last_mut().expect("frame present");
                    frame.committed = true;
                    return Some(SearchEvent::Progress(Progress::Decision {
                        x: cell.0,
                        y: cell.1,
                        tile: Some(tile),
                    }));
                }
                Err(_) => {
                    let frame = self.stack.last_mut().expect("frame present");
                    self.grid = frame.pre_trial_snapshot.clone();
                    frame.cursor += 1;
                    return Some(SearchEvent::Progress(Progress::Decision {
                        x: cell.0,
                        y: cell.1,
                        tile: None,
                    }));
                }
            }
        }
    }
}

/// The bit-exact deterministic shuffle: a small xorshift-like LCG
/// seeded from `(seed, x, y)`, then a Fisher-Yates pass.
///
/// `seed`'s mixing into `h` uses explicit 32-bit wraparound (never
/// plain `i32` arithmetic, which panics on overflow in debug builds);
/// the per-step LCG update is carried out in 64 bits since
/// `h * 9301 + 49297` can exceed `i32::MAX` for `h` near 233280.
pub(crate) fn deterministic_shuffle(a: &mut [usize], seed: u32, x: usize, y: usize) {
    let mut h = Wrapping(seed as i32);
    h = ((h << 5) - h) + Wrapping(x as i32);
    h = ((h << 5) - h) + Wrapping(y as i32);

    let mut h = h.0 as i64;
    let n = a.len();
    for i in (1..n).rev() {
        h = (h.wrapping_mul(9301).wrapping_add(49297)).rem_euclid(233280);
        let j = h.rem_euclid((i + 1) as i64) as usize;
        a.swap(i, j);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tile_table::Constraint;

    fn checkerboard() -> TileTable {
        let constraints = vec![
            Constraint::new(
                "A",
                vec!["B".into()],
                vec!["B".into()],
                vec!["B".into()],
                vec!["B".into()],
            ),
            Constraint::new(
                "B",
                vec!["A".into()],
                vec!["A".into()],
                vec!["A".into()],
                vec!["A".into()],
            ),
        ];
        TileTable::compile(&constraints).unwrap()
    }

    fn single_tile() -> TileTable {
        let constraints = vec![Constraint::new(
            "X",
            vec!["X".into()],
            vec!["X".into()],
            vec!["X".into()],
            vec!["X".into()],
        )];
        TileTable::compile(&constraints).unwrap()
    }

    #[test]
    fn shuffle_is_deterministic_for_same_inputs() {
        let mut a = vec![0, 1, 2, 3, 4];
        let mut b = a.clone();
        deterministic_shuffle(&mut a, 7, 2, 3);
        deterministic_shuffle(&mut b, 7, 2, 3);
        assert_eq!(a, b);
    }

    #[test]
    fn shuffle_is_a_permutation() {
        let mut a: Vec<usize> = (0..6).collect();
        deterministic_shuffle(&mut a, 42, 0, 0);
        let mut sorted = a.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn single_tile_grid_solves_immediately() {
        let table = single_tile();
        let mut search = Search::new(table, 2, 2, 1);

        let first = search.next().unwrap();
        assert!(matches!(first, SearchEvent::Progress(Progress::Snapshot(_))));

        let mut outcome = None;
        for event in search.by_ref() {
            if let SearchEvent::Done(o) = event {
                outcome = Some(o);
                break;
            }
        }
        match outcome.unwrap() {
            Outcome::Solved(tiles) => assert_eq!(tiles, vec![0, 0, 0, 0]),
            Outcome::NoSolution => panic!("expected a solution"),
        }
    }

    #[test]
    fn checkerboard_two_by_two_solves() {
        let table = checkerboard();
        let search = Search::new(table, 2, 2, 0);
        let mut outcome = None;
        for event in search {
            if let SearchEvent::Done(o) = event {
                outcome = Some(o);
            }
        }
        match outcome.unwrap() {
            Outcome::Solved(tiles) => {
                assert_ne!(tiles[0], tiles[1]);
                assert_ne!(tiles[0], tiles[2]);
            }
            Outcome::NoSolution => panic!("checkerboard is solvable"),
        }
    }

    #[test]
    fn contradictory_instance_reports_no_solution_with_no_prior_events() {
        // Neither tile tolerates anything to its south, so the very
        // first full-grid propagation pass already empties the bottom
        // cell's domain no matter what the top cell turns out to be —
        // the no-solution sentinel is the first and only event.
        let constraints = vec![
            Constraint::new("A", vec![], vec![], vec![], vec![]),
            Constraint::new("B", vec![], vec![], vec![], vec![]),
        ];
        let table = TileTable::compile(&constraints).unwrap();
        let mut search = Search::new(table, 1, 2, 0);
        let first = search.next().unwrap();
        assert!(matches!(first, SearchEvent::Done(Outcome::NoSolution)));
        assert!(search.next().is_none());
    }

    #[test]
    fn dropping_mid_search_does_not_panic() {
        let table = checkerboard();
        let mut search = Search::new(table, 4, 4, 3);
        let _ = search.next();
        let _ = search.next();
        drop(search);
    }
}
