use std::collections::{HashMap, VecDeque};
use std::iter::once;

use itertools::Itertools;
use ndarray::Array2;
use petgraph::graphmap::DiGraphMap;
use tracing::trace;

use crate::grid::Grid;
use crate::location::Point;
use crate::shape::Move;

/// Index of the start within a [`DistanceTable`]. Flag `k` sits at index `k + 1`.
pub(crate) const START: usize = 0;

/// Everywhere the car can stand, and where each move takes it.
///
/// There is one edge per move that does not leave the grid or hit a wall.
/// A move onto a teleporter endpoint is an edge straight to the other endpoint: the car never rests on the cell it drove onto.
/// Edges out of a node are inserted in canonical move order, and where two moves land on the same cell only the first is kept.
pub(crate) struct TrackGraph {
    graph: DiGraphMap<Point, Move>,
}

impl From<&Grid> for TrackGraph {
    fn from(grid: &Grid) -> Self {
        let (rows, cols) = grid.dims();
        let mut graph = DiGraphMap::with_capacity(rows * cols, rows * cols * 4);

        for (index, cell) in grid.cells.indexed_iter() {
            if !cell.is_passable() {
                continue;
            }

            let from = Point::from(index);
            graph.add_node(from);
            for (step, neighbor) in grid.neighbors(from) {
                let to = grid.landing(neighbor);
                if !graph.contains_edge(from, to) {
                    graph.add_edge(from, to, step);
                }
            }
        }

        Self { graph }
    }
}

impl TrackGraph {
    /// Breadth-first search from `source` over the whole track.
    pub(crate) fn reach_from(&self, source: Point) -> Reach {
        let mut distances = HashMap::with_capacity(self.graph.node_count());
        let mut parents = HashMap::with_capacity(self.graph.node_count());
        let mut queue = VecDeque::from([(source, 0)]);
        distances.insert(source, 0);

        while let Some((current, distance)) = queue.pop_front() {
            for (_, neighbor, step) in self.graph.edges(current) {
                if distances.contains_key(&neighbor) {
                    continue;
                }

                distances.insert(neighbor, distance + 1);
                parents.insert(neighbor, (current, *step));
                queue.push_back((neighbor, distance + 1));
            }
        }

        Reach { source, distances, parents }
    }
}

/// Shortest distances and paths from one source to everywhere reachable from it.
pub(crate) struct Reach {
    source: Point,
    distances: HashMap<Point, usize>,
    parents: HashMap<Point, (Point, Move)>,
}

impl Reach {
    pub(crate) fn distance(&self, target: Point) -> Option<usize> {
        self.distances.get(&target).copied()
    }

    /// The moves taking the car from the source to `target`, or [`None`] if `target` is unreachable.
    pub(crate) fn moves_to(&self, target: Point) -> Option<Vec<Move>> {
        let mut moves = Vec::with_capacity(self.distance(target)?);
        let mut current = target;
        while current != self.source {
            let (previous, step) = self.parents.get(&current)?;
            moves.push(*step);
            current = *previous;
        }

        moves.reverse();
        Some(moves)
    }
}

/// Shortest distances and paths between every ordered pair of points of interest: the start, then every flag.
///
/// Teleporters make the table asymmetric, so both directions of a pair are stored.
pub(crate) struct DistanceTable {
    points: Vec<Point>,
    distances: Array2<Option<usize>>,
    paths: HashMap<(usize, usize), Vec<Move>>,
}

impl DistanceTable {
    /// One search per point of interest, each reused for every target.
    pub(crate) fn build(grid: &Grid) -> Self {
        let graph = TrackGraph::from(grid);
        let points = once(grid.start).chain(grid.flags.iter().copied()).collect_vec();
        let mut distances = Array2::from_elem((points.len(), points.len()), None);
        let mut paths = HashMap::with_capacity(points.len() * points.len());

        for (from, source) in points.iter().enumerate() {
            let reach = graph.reach_from(*source);
            trace!(%source, reachable = reach.distances.len(), "searched from point of interest");

            for (to, target) in points.iter().enumerate() {
                if let Some(moves) = reach.moves_to(*target) {
                    distances[(from, to)] = Some(moves.len());
                    paths.insert((from, to), moves);
                }
            }
        }

        Self { points, distances, paths }
    }

    pub(crate) fn flag_count(&self) -> usize {
        self.points.len() - 1
    }

    pub(crate) fn point(&self, index: usize) -> Point {
        self.points[index]
    }

    /// [`None`] means `to` cannot be reached from `from`.
    pub(crate) fn distance(&self, from: usize, to: usize) -> Option<usize> {
        self.distances[(from, to)]
    }

    pub(crate) fn path(&self, from: usize, to: usize) -> Option<&[Move]> {
        self.paths.get(&(from, to)).map(Vec::as_slice)
    }
}
