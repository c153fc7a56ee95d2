#![warn(missing_docs)]

//! # `flagtour`
//!
//! A solver for flag-collecting tracks: rectangular grids of road and wall with one start, some flags,
//! and pairs of teleporters.
//! Parse a track with [`Grid::parse`], then hand it to a [`Solver`], which yields the [`Move`]s that
//! collect every flag in as few moves as it can find.
//! [`solve`] does both with the default configuration.
//!
//! ```
//! use flagtour::Move;
//!
//! let moves = flagtour::solve(&[vec!["S", "0", "F"]]).unwrap();
//! assert_eq!(moves, vec![Move::Right, Move::Right]);
//! ```
//!
//! # Internals
//! A high level overview is as follows:
//!
//! 1. The grid becomes a directed graph G. A vertex is a cell the car can rest on; an edge is a move.
//! A move onto a teleporter is an edge to the *other* endpoint, since the car never rests on the cell it drove onto.
//! This costs nothing extra and needs no move of its own.
//! 2. A breadth-first search from the start and from every flag gives shortest paths between every ordered pair of
//! these points of interest.
//! 3. Choosing the order of flags is then a shortest Hamiltonian path problem with a fixed origin and a free end.
//! Small instances are solved exactly by dynamic programming over subsets of flags; past
//! [`SolverConfig::exact_flag_limit`] flags a greedy nearest-flag tour is used instead, which is always valid but may
//! be longer than necessary.
//! 4. The paths of consecutive legs are concatenated into the final list of moves.
//!
//! Every choice is deterministic. Moves are tried in the order up, down, left, right, and equally good flags are
//! taken in order of row, then column, so the same track always yields the same moves.
//!
//! [`replay`] drives a list of moves over a grid the way a client would, which is how the tests check solutions.

pub use cell::{Cell, TeleporterId};
pub use grid::{validate, Grid, MalformedGrid, TeleporterPair, Validation};
pub use location::Point;
pub use replay::{replay, ReplayError, ReplayOutcome};
pub use shape::Move;
pub use solver::{solve, FailureReport, Solution, Solver, SolverConfig, SolverFailure};
pub use tour::{Strategy, EXACT_FLAG_LIMIT, MAX_EXACT_FLAG_LIMIT};

mod tests;
pub(crate) mod cell;
pub(crate) mod graph;
pub(crate) mod grid;
pub(crate) mod location;
pub(crate) mod replay;
pub(crate) mod shape;
pub(crate) mod solver;
pub(crate) mod tour;
#[cfg(feature = "wasm")]
mod wasm;
