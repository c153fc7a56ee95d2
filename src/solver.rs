use itertools::Itertools;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, debug_span};

use crate::graph::DistanceTable;
use crate::grid::{Grid, MalformedGrid};
use crate::location::Point;
use crate::shape::Move;
use crate::tour::{self, Strategy, Tour, EXACT_FLAG_LIMIT, MAX_EXACT_FLAG_LIMIT};

/// Reasons a [`Solver`] may fail. Solving is deterministic, so retrying the same grid fails the same way.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum SolverFailure {
    /// The grid breaks one of the track invariants.
    #[error("malformed grid: {0}")]
    MalformedGrid(#[from] MalformedGrid),
    /// No combination of moves and teleports collects the flag at this point.
    #[error("flag at {0} cannot be reached")]
    UnreachableFlag(Point),
}

/// A [`SolverFailure`] flattened for a response body.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FailureReport {
    /// `"malformed_grid"` or `"unreachable_flag"`.
    pub kind: &'static str,
    /// Human-readable detail.
    pub message: String,
}

impl SolverFailure {
    /// A stable, machine-readable name for this kind of failure.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MalformedGrid(_) => "malformed_grid",
            Self::UnreachableFlag(_) => "unreachable_flag",
        }
    }

    /// This failure as a `{ kind, message }` pair.
    pub fn report(&self) -> FailureReport {
        FailureReport { kind: self.kind(), message: self.to_string() }
    }
}

/// Tunables for a [`Solver`].
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Tracks with at most this many flags get an optimal tour; larger ones are planned greedily.
    /// Values above [`MAX_EXACT_FLAG_LIMIT`] behave as [`MAX_EXACT_FLAG_LIMIT`].
    pub exact_flag_limit: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self { exact_flag_limit: EXACT_FLAG_LIMIT }
    }
}

impl SolverConfig {
    /// A configuration switching to greedy planning past `limit` flags, clamped to [`MAX_EXACT_FLAG_LIMIT`].
    pub fn with_exact_flag_limit(limit: usize) -> Self {
        Self { exact_flag_limit: limit.min(MAX_EXACT_FLAG_LIMIT) }
    }
}

/// A complete run over a track.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Solution {
    /// Every move from the start, in order. Teleports happen implicitly and have no move of their own.
    pub moves: Vec<Move>,
    /// Flags in the order the tour targets them.
    pub tour: Vec<Point>,
    /// Whether [`Self::moves`] is known to be the shortest possible.
    pub strategy: Strategy,
}

impl Solution {
    /// The moves as the tokens `"up"`, `"down"`, `"left"` and `"right"`.
    pub fn tokens(&self) -> Vec<String> {
        self.moves.iter().map(Move::to_string).collect_vec()
    }
}

/// Plans flag-collecting runs over tracks.
///
/// A solver holds only its configuration, so one can be shared freely between threads.
/// Every call builds its own distance table and tour and discards them afterwards.
#[derive(Clone, Copy, Debug, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    /// A solver using `config`.
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    /// Parse `raw` and solve it. See [`Self::solve_grid`].
    pub fn solve<S: AsRef<str>>(&self, raw: &[Vec<S>]) -> Result<Solution, SolverFailure> {
        let grid = Grid::parse(raw)?;
        self.solve_grid(&grid)
    }

    /// Find moves that collect every flag on `grid`.
    ///
    /// With at most [`SolverConfig::exact_flag_limit`] flags the run is as short as possible.
    /// Otherwise it is planned greedily: always valid, but not necessarily shortest.
    pub fn solve_grid(&self, grid: &Grid) -> Result<Solution, SolverFailure> {
        let (rows, cols) = grid.dims();
        let _span = debug_span!("solve", rows, cols, flags = grid.flags.len(), teleporters = grid.teleporters.len()).entered();

        let table = DistanceTable::build(grid);
        let tour = tour::plan(&table, self.config.exact_flag_limit)?;
        debug!(strategy = %tour.strategy, length = tour.length, "planned tour");

        let moves = synthesize(&table, &tour);
        debug_assert_eq!(moves.len(), tour.length);

        Ok(Solution {
            moves,
            tour: tour.order.iter().map(|flag| table.point(flag + 1)).collect_vec(),
            strategy: tour.strategy,
        })
    }
}

/// Solve `raw` with the default configuration, returning only the moves.
pub fn solve<S: AsRef<str>>(raw: &[Vec<S>]) -> Result<Vec<Move>, SolverFailure> {
    Solver::default().solve(raw).map(|solution| solution.moves)
}

/// Concatenate the stored path of every leg of `tour`.
fn synthesize(table: &DistanceTable, tour: &Tour) -> Vec<Move> {
    let mut moves = Vec::with_capacity(tour.length);
    for (from, to) in tour.stops().tuple_windows() {
        // a planned tour only uses legs with a path
        moves.extend_from_slice(table.path(from, to).unwrap_or_default());
    }

    moves
}
