//! Compilation of string-keyed adjacency constraints into an
//! immutable, index-based [`TileTable`].

use std::collections::HashMap;

use crate::bit_domain::BitDomain;
use crate::direction::{self, Direction};
use crate::error::CompileError;

/// One input tile: its opaque id and, per direction (in `(N, E, S, W)`
/// order, matching [`direction::ALL`]), the ids of tiles permitted to
/// sit in that neighboring cell.
#[derive(Debug, Clone)]
pub struct Constraint {
    pub id: String,
    pub neighbors: [Vec<String>; 4],
}

impl Constraint {
    pub fn new(
        id: impl Into<String>,
        north: Vec<String>,
        east: Vec<String>,
        south: Vec<String>,
        west: Vec<String>,
    ) -> Self {
        Self {
            id: id.into(),
            neighbors: [north, east, south, west],
        }
    }
}

/// Immutable, post-compilation adjacency table. Tile ids are replaced
/// by dense indices `[0, N)`, assigned in input order.
#[derive(Debug, Clone)]
pub struct TileTable {
    /// `allow[t][d]` — tiles permitted in the neighbor on side `d` of
    /// tile `t`.
    allow: Vec<[BitDomain; 4]>,
    id_to_index: HashMap<String, usize>,
    index_to_id: Vec<String>,
}

impl TileTable {
    /// Compile string-keyed constraints into a [`TileTable`].
    ///
    /// Validates, in input order (first failure wins):
    /// 1. every referenced tile-id exists (else [`CompileError::UnknownTile`]);
    /// 2. every reference is commutative (else [`CompileError::NonCommutative`]).
    pub fn compile(constraints: &[Constraint]) -> Result<Self, CompileError> {
        let num_tiles = constraints.len();

        let mut id_to_index = HashMap::with_capacity(num_tiles);
        let mut index_to_id = Vec::with_capacity(num_tiles);
        for (index, constraint) in constraints.iter().enumerate() {
            let previous = id_to_index.insert(constraint.id.clone(), index);
            debug_assert!(previous.is_none(), "duplicate tile id {:?}", constraint.id);
            index_to_id.push(constraint.id.clone());
        }

        for constraint in constraints {
            for dir in direction::ALL {
                for target_id in &constraint.neighbors[dir.index()] {
                    let Some(&target_index) = id_to_index.get(target_id) else {
                        return Err(CompileError::UnknownTile {
                            referrer: constraint.id.clone(),
                            target: target_id.clone(),
                            direction: dir,
                        });
                    };

                    let target = &constraints[target_index];
                    let back_ref_present = target.neighbors[dir.opposite().index()]
                        .iter()
                        .any(|id| id == &constraint.id);
                    if !back_ref_present {
                        return Err(CompileError::NonCommutative {
                            a: constraint.id.clone(),
                            b: target_id.clone(),
                            direction_ab: dir,
                        });
                    }
                }
            }
        }

        let allow = constraints
            .iter()
            .map(|constraint| {
                std::array::from_fn(|d| {
                    let dir = Direction::from_index(d);
                    BitDomain::from_indices(
                        num_tiles,
                        constraint.neighbors[dir.index()]
                            .iter()
                            .map(|id| id_to_index[id]),
                    )
                })
            })
            .collect();

        Ok(Self {
            allow,
            id_to_index,
            index_to_id,
        })
    }

    /// Total number of tiles — the width of every [`BitDomain`] in the
    /// solve.
    pub fn num_tiles(&self) -> usize {
        self.index_to_id.len()
    }

    /// Tiles permitted in the neighbor on side `dir` of `tile`.
    pub fn allow(&self, tile: usize, dir: Direction) -> &BitDomain {
        &self.allow[tile][dir.index()]
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.id_to_index.get(id).copied()
    }

    pub fn id_of(&self, index: usize) -> &str {
        &self.index_to_id[index]
    }
}
