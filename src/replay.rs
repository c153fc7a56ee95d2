use std::collections::BTreeSet;

use thiserror::Error;

use crate::cell::Cell;
use crate::grid::Grid;
use crate::location::Point;
use crate::shape::Move;

/// Reasons a sequence of moves cannot be driven.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum ReplayError {
    /// Move `index` would drive off the edge of the grid.
    #[error("move {index} ({step}) from {from} leaves the grid")]
    OffGrid {
        /// Position of the move in the sequence.
        index: usize,
        /// The move itself.
        step: Move,
        /// Where the car stood.
        from: Point,
    },
    /// Move `index` would drive into a wall.
    #[error("move {index} ({step}) from {from} runs into a wall")]
    Blocked {
        /// Position of the move in the sequence.
        index: usize,
        /// The move itself.
        step: Move,
        /// Where the car stood.
        from: Point,
    },
}

/// Where a replay ended up.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ReplayOutcome {
    /// Where the car stopped.
    pub position: Point,
    /// Every cell the car rested on, starting with the start cell.
    pub trail: Vec<Point>,
    /// Flags in the order they were collected.
    pub collected: Vec<Point>,
    /// Flags never reached, ordered by row, then column.
    pub remaining: Vec<Point>,
}

impl ReplayOutcome {
    /// Whether every flag was collected.
    pub fn is_complete(&self) -> bool {
        self.remaining.is_empty()
    }
}

/// Drive `moves` from the start of `grid`, the way a client animates a solution.
///
/// Driving onto a teleporter lands the car on the other endpoint; reaching a flag collects it.
/// The first move that would leave the grid or hit a wall aborts the replay.
pub fn replay(grid: &Grid, moves: &[Move]) -> Result<ReplayOutcome, ReplayError> {
    let mut position = grid.start;
    let mut remaining: BTreeSet<Point> = grid.flags.iter().copied().collect();
    let mut collected = Vec::with_capacity(remaining.len());
    let mut trail = Vec::with_capacity(moves.len() + 1);
    trail.push(position);

    for (index, step) in moves.iter().copied().enumerate() {
        let target = step.attempt_from(position);
        match grid.cell(target) {
            None => return Err(ReplayError::OffGrid { index, step, from: position }),
            Some(Cell::Wall) => return Err(ReplayError::Blocked { index, step, from: position }),
            Some(_) => {}
        }

        position = grid.landing(target);
        if remaining.remove(&position) {
            collected.push(position);
        }
        trail.push(position);
    }

    Ok(ReplayOutcome { position, trail, collected, remaining: remaining.into_iter().collect() })
}
