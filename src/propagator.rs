//! Arc-consistency worklist propagation, accelerated by [`SupportCache`].
//!
//! A `VecDeque`-of-cells worklist: whenever a cell's domain shrinks,
//! its neighbors are re-enqueued to re-check their own support against
//! the shrunk domain, until the grid reaches a fixed point or some
//! cell's domain is driven empty.

use std::collections::VecDeque;

use tracing::{debug, instrument, trace};

use crate::grid::Grid;
use crate::support_cache::SupportCache;
use crate::tile_table::TileTable;

/// A cell's domain was driven empty. Recoverable at the Search layer
/// (triggers backtracking); never exposed outside the crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unsatisfiable;

/// Re-establish arc consistency after cell `seed` was mutated.
///
/// Enqueues `seed`'s in-bounds neighbors, then repeatedly intersects
/// each dequeued cell's domain against the support implied by each of
/// *its* in-bounds neighbors, re-enqueuing the dequeued cell's own
/// neighbors whenever its domain actually shrank — including back
/// toward wherever the change came from; re-deriving an unchanged
/// domain from a revisited neighbor is a guaranteed no-op, so this
/// never loops beyond a fixed point.
#[instrument(level = "trace", skip(grid, table, cache))]
pub(crate) fn propagate(
    grid: &mut Grid,
    table: &TileTable,
    cache: &mut SupportCache,
    seed: (usize, usize),
) -> Result<(), Unsatisfiable> {
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();
    for (_, nx, ny) in grid.neighbors(seed.0, seed.1) {
        queue.push_back((nx, ny));
    }
    run(grid, table, cache, queue)
}

/// Propagate from every cell in row-major order — the initial
/// full-grid pass run once before search begins.
pub(crate) fn propagate_all(
    grid: &mut Grid,
    table: &TileTable,
    cache: &mut SupportCache,
) -> Result<(), Unsatisfiable> {
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            propagate(grid, table, cache, (x, y))?;
        }
    }
    Ok(())
}

fn run(
    grid: &mut Grid,
    table: &TileTable,
    cache: &mut SupportCache,
    mut queue: VecDeque<(usize, usize)>,
) -> Result<(), Unsatisfiable> {
    let mut revised = 0usize;

    while let Some((cx, cy)) = queue.pop_front() {
        let before = grid[(cx, cy)].clone();
        let mut after = before.clone();

        for (dir, nx, ny) in grid.neighbors(cx, cy) {
            let neighbor_domain = grid[(nx, ny)].clone();
            let support = cache.support(table, &neighbor_domain, dir.opposite());
            after.intersect_into(&support);
        }

        if after.is_empty() {
            trace!(cx, cy, "domain emptied during propagation");
            return Err(Unsatisfiable);
        }

        if after != before {
            revised += 1;
            trace!(
                cx,
                cy,
                before = before.count(),
                after = after.count(),
                "cell domain shrank"
            );
            grid[(cx, cy)] = after;
            for (_, nx, ny) in grid.neighbors(cx, cy) {
                queue.push_back((nx, ny));
            }
        }
    }

    debug!(revised, "propagation settled");
    Ok(())
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

    #[test]
    fn propagating_a_decided_cell_collapses_checkerboard_neighbors() {
        let table = checkerboard();
        let mut cache = SupportCache::new();
        let mut grid = Grid::full(2, 2, 2);

        let a = table.index_of("A").unwrap();
        grid[(0, 0)] = crate::bit_domain::BitDomain::from_indices(2, [a]);
        propagate(&mut grid, &table, &mut cache, (0, 0)).unwrap();

        let b = table.index_of("B").unwrap();
        assert_eq!(grid[(1, 0)].first_set(), Some(b));
        assert_eq!(grid[(0, 1)].first_set(), Some(b));
        assert_eq!(grid[(1, 1)].first_set(), Some(a));
    }

    #[test]
    fn propagate_all_settles_checkerboard_to_every_cell_undecided() {
        let table = checkerboard();
        let mut cache = SupportCache::new();
        let mut grid = Grid::full(2, 2, 2);
        propagate_all(&mut grid, &table, &mut cache).unwrap();
        for y in 0..2 {
            for x in 0..2 {
                assert_eq!(grid[(x, y)].count(), 2);
            }
        }
    }

    #[test]
    fn contradiction_is_reported() {
        // Two mutually exclusive tiles forced to touch with no shared
        // adjacency: A only allows B, B only allows nothing.
        let constraints = vec![
            Constraint::new(
                "A",
                vec!["B".into()],
                vec![],
                vec![],
                vec![],
            ),
            Constraint::new("B", vec![], vec![], vec!["A".into()], vec![]),
        ];
        let table = TileTable::compile(&constraints).unwrap();
        let mut cache = SupportCache::new();
        let mut grid = Grid::full(1, 2, 2);
        let a = table.index_of("A").unwrap();
        // Force the bottom cell (south of the top one) to B, which has
        // no west/east/south allowance and only a north allowance of
        // A — but the top cell gets forced to A too, which only
        // permits B to its own north, not south, so the pair
        // contradicts.
        grid[(0, 0)] = crate::bit_domain::BitDomain::from_indices(2, [a]);
        let result = propagate(&mut grid, &table, &mut cache, (0, 0));
        assert_eq!(result, Err(Unsatisfiable));
    }
}
