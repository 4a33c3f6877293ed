//! # `wfc-core`
//!
//! `wfc-core` is a library for procedurally generating 2D tilings by
//! Wave Function Collapse: packed-bitset constraint domains, an
//! arc-consistency propagator accelerated by a support cache, and a
//! deterministic backtracking search exposed as a lazy event stream.

// #![deny(warnings)]
#![deny(missing_docs)]
// #![deny(unused)]
// #![deny(dead_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

mod bit_domain;
mod direction;
mod engine;
mod error;
mod grid;
mod propagator;
mod search;
mod support_cache;
mod tile_table;

pub use bit_domain::BitDomain;
pub use direction::Direction;
pub use engine::{solve, Constraint, Outcome, Progress, Solve, SolveEvent};
pub use error::{CompileError, DomainError};
