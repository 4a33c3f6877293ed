//! Content-addressed memo of `(cell-domain, direction) -> support`.
//!
//! A plain struct wrapping a standard collection, no trait
//! indirection: `support` is re-derived from a `TileTable` only on a
//! cache miss.

use std::collections::HashMap;

use crate::bit_domain::BitDomain;
use crate::direction::Direction;
use crate::tile_table::TileTable;

/// Observability counters. Not required for correctness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
    pub peak_size: usize,
}

/// Memoizes `support(cell_domain, direction) = ∪_{t ∈ cell_domain}
/// allow[t][direction]`.
///
/// The cache key clones the cell domain at insertion time, so later
/// mutation of the caller's live grid cell can never retroactively
/// corrupt an entry — this falls out for free from `BitDomain` being
/// an owned, non-aliasing value type.
///
/// No eviction: unbounded growth is acceptable for the instance sizes
/// this engine targets (see DESIGN.md's Open Question decisions). A
/// capped, deterministic (e.g. insertion-order LRU) variant would slot
/// in here without changing the public contract.
#[derive(Debug, Default)]
pub struct SupportCache {
    entries: HashMap<(BitDomain, Direction), BitDomain>,
    stats: CacheStats,
}

impl SupportCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// `support(cell_domain, direction)`, cached. `table` supplies
    /// `allow[tile][direction]` for each tile in `cell_domain`.
    pub fn support(
        &mut self,
        table: &TileTable,
        cell_domain: &BitDomain,
        direction: Direction,
    ) -> BitDomain {
        let key = (cell_domain.clone(), direction);
        if let Some(cached) = self.entries.get(&key) {
            self.stats.hits += 1;
            return cached.clone();
        }

        self.stats.misses += 1;
        let mut support = BitDomain::new(table.num_tiles());
        for tile in cell_domain.iter_set() {
            support.union_into(table.allow(tile, direction));
        }

        self.entries.insert(key, support.clone());
        self.stats.peak_size = self.stats.peak_size.max(self.entries.len());
        support
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}
