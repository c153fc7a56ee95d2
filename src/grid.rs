use std::collections::HashMap;
use std::fmt::{Display, Formatter};

use itertools::Itertools;
use ndarray::Array2;
use serde::Serialize;
use strum::VariantArray;
use thiserror::Error;
use unordered_pair::UnorderedPair;

use crate::cell::Cell;
use crate::location::Point;
use crate::shape::Move;

/// Reasons a raw grid may be rejected.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum MalformedGrid {
    /// The grid has no rows, or its first row has no cells.
    #[error("grid must be non-empty")]
    Empty,
    /// Some row is longer or shorter than the first.
    #[error("all rows must have equal length (row {row} has {found} cells, expected {expected})")]
    Ragged {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        found: usize,
    },
    /// A cell holds nothing but whitespace.
    #[error("empty cell at {at}")]
    EmptyCell {
        /// Where the blank cell sits.
        at: Point,
    },
    /// A cell holds something outside the track vocabulary.
    #[error("invalid token '{token}' at {at}")]
    InvalidToken {
        /// The token as written, trimmed.
        token: String,
        /// Where it sits.
        at: Point,
    },
    /// There is not exactly one start.
    #[error("there must be exactly one start 'S' (found {0})")]
    StartCount(usize),
    /// There is nothing to collect.
    #[error("there must be at least one flag 'F'")]
    NoFlags,
    /// A teleporter label appears once, or more than twice.
    #[error("teleporter {label} must appear exactly twice (found {count})")]
    TeleporterCount {
        /// The teleporter label, `T` included.
        label: String,
        /// How many cells carry it.
        count: usize,
    },
}

/// Outcome of [`validate`], shaped for callers that report rather than branch.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Validation {
    /// Whether the grid parsed.
    pub valid: bool,
    /// `"OK"`, or why the grid was rejected.
    pub message: String,
}

/// Check a raw grid without keeping the parsed result.
pub fn validate<S: AsRef<str>>(raw: &[Vec<S>]) -> Validation {
    match Grid::parse(raw) {
        Ok(_) => Validation { valid: true, message: "OK".to_owned() },
        Err(reason) => Validation { valid: false, message: reason.to_string() },
    }
}

/// Two cells sharing a teleporter label. Stepping onto either endpoint lands the car on the other.
#[derive(Clone)]
pub struct TeleporterPair {
    /// The token both endpoints carry, e.g. `"T1"`.
    pub label: String,
    /// Both endpoints, in no particular order.
    pub endpoints: UnorderedPair<Point>,
}

/// A parsed track: typed cells plus the locations of everything the solver cares about.
///
/// Build one with [`Grid::parse`]. A successfully parsed grid always has exactly one start,
/// at least one flag, and every teleporter label on exactly two cells.
#[derive(Clone)]
pub struct Grid {
    pub(crate) cells: Array2<Cell>,
    pub(crate) start: Point,
    // row-major, hence sorted
    pub(crate) flags: Vec<Point>,
    pub(crate) teleporters: Vec<TeleporterPair>,
    partners: HashMap<Point, Point>,
}

impl Grid {
    /// Parse a grid of string tokens: `"0"` road, `"1"` wall, `"S"` start, `"F"` flag and `"T<id>"` teleporter.
    /// Whitespace around a token is ignored.
    ///
    /// Every invariant is checked here regardless of whether the caller validated the grid already.
    pub fn parse<S: AsRef<str>>(raw: &[Vec<S>]) -> Result<Self, MalformedGrid> {
        let cols = match raw.first() {
            Some(row) if !row.is_empty() => row.len(),
            _ => return Err(MalformedGrid::Empty),
        };

        if let Some((row, cells)) = raw.iter().find_position(|cells| cells.len() != cols) {
            return Err(MalformedGrid::Ragged { row, expected: cols, found: cells.len() });
        }

        let mut cells = Array2::from_elem((raw.len(), cols), Cell::Road);
        let mut starts = Vec::with_capacity(1);
        let mut flags = Vec::new();
        let mut labels: Vec<String> = Vec::new();
        let mut endpoints: Vec<Vec<Point>> = Vec::new();

        for (r, row) in raw.iter().enumerate() {
            for (c, token) in row.iter().enumerate() {
                let point = Point(r, c);
                let cell = match token.as_ref().trim() {
                    "" => return Err(MalformedGrid::EmptyCell { at: point }),
                    "0" => Cell::Road,
                    "1" => Cell::Wall,
                    "S" => {
                        starts.push(point);
                        Cell::Start
                    }
                    "F" => {
                        flags.push(point);
                        Cell::Flag
                    }
                    label if label.starts_with('T') => {
                        let id = match labels.iter().position(|known| known == label) {
                            Some(id) => id,
                            None => {
                                labels.push(label.to_owned());
                                endpoints.push(Vec::with_capacity(2));
                                labels.len() - 1
                            }
                        };
                        endpoints[id].push(point);
                        Cell::Teleporter { id }
                    }
                    other => return Err(MalformedGrid::InvalidToken { token: other.to_owned(), at: point }),
                };
                cells[point.as_index()] = cell;
            }
        }

        let start = match starts.as_slice() {
            [start] => *start,
            _ => return Err(MalformedGrid::StartCount(starts.len())),
        };

        if flags.is_empty() {
            return Err(MalformedGrid::NoFlags);
        }

        let mut teleporters = Vec::with_capacity(labels.len());
        let mut partners = HashMap::with_capacity(labels.len() * 2);
        for (label, points) in labels.into_iter().zip(endpoints) {
            let &[a, b] = points.as_slice() else {
                return Err(MalformedGrid::TeleporterCount { label, count: points.len() });
            };
            partners.insert(a, b);
            partners.insert(b, a);
            teleporters.push(TeleporterPair { label, endpoints: UnorderedPair(a, b) });
        }

        Ok(Self { cells, start, flags, teleporters, partners })
    }

    /// `(rows, columns)`.
    pub fn dims(&self) -> (usize, usize) {
        self.cells.dim()
    }

    /// The single start cell.
    pub fn start(&self) -> Point {
        self.start
    }

    /// Every flag, ordered by row, then column.
    pub fn flags(&self) -> &[Point] {
        &self.flags
    }

    /// Every teleporter pair, in order of first appearance.
    pub fn teleporters(&self) -> &[TeleporterPair] {
        &self.teleporters
    }

    /// The cell at `point`, or [`None`] if `point` lies outside the grid.
    pub fn cell(&self, point: Point) -> Option<Cell> {
        self.cells.get(point.as_index()).copied()
    }

    /// Cells one move away from `point` that are on the grid and not walls, in canonical move order.
    ///
    /// Teleporters are not followed; see [`Self::teleport_target`].
    pub fn neighbors(&self, point: Point) -> Vec<(Move, Point)> {
        Move::VARIANTS.iter()
            .map(|step| (*step, step.attempt_from(point)))
            .filter(|(_, neighbor)| self.cell(*neighbor).is_some_and(|cell| cell.is_passable()))
            .collect_vec()
    }

    /// The other endpoint if `point` is a teleporter, [`None`] otherwise.
    pub fn teleport_target(&self, point: Point) -> Option<Point> {
        self.partners.get(&point).copied()
    }

    /// Where the car ends up after driving onto `point`.
    pub(crate) fn landing(&self, point: Point) -> Point {
        self.teleport_target(point).unwrap_or(point)
    }

    /// Draw the grid with every road cell in `trail` marked `*`.
    pub fn render_trail(&self, trail: &[Point]) -> String {
        let mut board = self.cells.map(Cell::display);
        for point in trail {
            if self.cell(*point) == Some(Cell::Road) {
                board[point.as_index()] = '*';
            }
        }

        print(board)
    }
}

fn print(board: Array2<char>) -> String {
    let mut out = String::with_capacity(board.nrows() * (board.ncols() + 1));

    for row in board.rows() {
        for col in row {
            out.push(*col);
        }
        out.push('\n');
    }

    out
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", print(self.cells.map(Cell::display)))
    }
}
