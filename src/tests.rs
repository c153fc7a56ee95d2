#[cfg(test)]
mod tests {
    use std::iter::once;

    use itertools::Itertools;

    use crate::graph::{DistanceTable, TrackGraph, START};
    use crate::location::Point;
    use crate::replay::{replay, ReplayError};
    use crate::shape::Move::{self, Down, Left, Right, Up};
    use crate::solver::{Solver, SolverConfig, SolverFailure};
    use crate::tour::{Strategy, MAX_EXACT_FLAG_LIMIT};
    use crate::{solve, validate, Cell, Grid, MalformedGrid};

    fn track(rows: &[&str]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.split_whitespace().map(str::to_owned).collect())
            .collect()
    }

    fn parse(rows: &[&str]) -> Grid {
        Grid::parse(&track(rows)).unwrap()
    }

    /// Replays `moves` and asserts every flag was collected without hitting anything.
    fn assert_collects_all(grid: &Grid, moves: &[Move]) {
        let outcome = replay(grid, moves).unwrap();
        assert!(outcome.is_complete(), "flags left over: {:?}", outcome.remaining);

        let mut collected = outcome.collected.clone();
        collected.sort();
        assert_eq!(collected, grid.flags());
    }

    #[test]
    fn straight_road() {
        assert_eq!(solve(&[vec!["S", "0", "F"]]).unwrap(), vec![Right, Right]);
    }

    #[test]
    fn wall_in_the_way() {
        assert_eq!(solve(&[vec!["S", "1", "F"]]), Err(SolverFailure::UnreachableFlag(Point(0, 2))));
    }

    #[test]
    fn tokens_are_lowercase() {
        let solution = Solver::default().solve(&track(&["F 0 S", "0 0 0"])).unwrap();
        assert_eq!(solution.tokens(), vec!["left", "left"]);
        assert_eq!("down".parse::<Move>().unwrap(), Down);
    }

    #[test]
    fn display() {
        let grid = parse(&[
            "S 0 1 F",
            "0 0 1 T1",
            "1 T1 0 0",
        ]);

        assert_eq!(format!("{}", grid), "S.#F
..#T
#T..
");
    }

    #[test]
    fn route_around_walls() {
        let grid = parse(&[
            "S 0 1 F",
            "0 0 1 0",
            "1 0 0 0",
        ]);

        let solution = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(solution.moves, vec![Down, Right, Down, Right, Right, Up, Up]);

        let outcome = replay(&grid, &solution.moves).unwrap();
        assert_eq!(grid.render_trail(&outcome.trail), "S.#F
**#*
#***
");
    }

    #[test]
    fn sealed_flag() {
        let grid = track(&[
            "S 0 0 0 0",
            "0 1 1 1 0",
            "0 1 F 1 0",
            "0 1 1 1 0",
            "0 0 0 0 F",
        ]);

        let failure = solve(&grid).unwrap_err();
        assert_eq!(failure, SolverFailure::UnreachableFlag(Point(2, 2)));
        assert_eq!(failure.kind(), "unreachable_flag");
        assert_eq!(failure.report().message, "flag at (2, 2) cannot be reached");
    }

    #[test]
    fn teleporter_into_sealed_room() {
        let grid = parse(&[
            "S T1 0 0 0",
            "0 1 1 1 0",
            "0 1 T1 F 1",
            "0 1 1 1 0",
            "0 0 0 0 0",
        ]);

        let solution = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(solution.moves, vec![Right, Right]);
        assert_collects_all(&grid, &solution.moves);
    }

    #[test]
    fn teleporter_shortcut() {
        let with_teleporter = parse(&[
            "S T1 0 0 0",
            "1 1 1 1 0",
            "F T1 0 0 0",
        ]);
        let without_teleporter = parse(&[
            "S 0 0 0 0",
            "1 1 1 1 0",
            "F 0 0 0 0",
        ]);

        let short = Solver::default().solve_grid(&with_teleporter).unwrap();
        let long = Solver::default().solve_grid(&without_teleporter).unwrap();

        assert_eq!(short.moves, vec![Right, Left]);
        assert_eq!(long.moves, vec![Right, Right, Right, Right, Down, Down, Left, Left, Left, Left]);
        assert_collects_all(&with_teleporter, &short.moves);
        assert_collects_all(&without_teleporter, &long.moves);
    }

    #[test]
    fn teleporter_cell_is_never_a_resting_place() {
        // driving right from S lands on (2, 2), not (0, 1), so F needs a detour back through the pair
        let grid = parse(&[
            "S T1 F",
            "0 1 1",
            "0 0 T1",
        ]);

        let solution = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(solution.moves, vec![Right, Left, Right, Right]);

        let outcome = replay(&grid, &solution.moves).unwrap();
        assert_eq!(outcome.trail, vec![Point(0, 0), Point(2, 2), Point(2, 1), Point(0, 1), Point(0, 2)]);
        assert!(outcome.is_complete());
    }

    #[test]
    fn better_of_two_orders() {
        // the right-hand flag first would cost 3 + 5
        let grid = parse(&["F 0 S 0 0 F"]);

        let solution = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(solution.tour, vec![Point(0, 0), Point(0, 5)]);
        assert_eq!(solution.moves.len(), 7);
        assert_collects_all(&grid, &solution.moves);
    }

    #[test]
    fn two_flags_in_two_dimensions() {
        let grid = parse(&[
            "0 0 0 F",
            "0 1 1 0",
            "S 0 0 0",
            "0 1 1 1",
            "F 0 0 0",
        ]);

        // up to F(0, 3) costs 5, down to F(4, 0) costs 2, and the flags are 7 apart
        let solution = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(solution.tour, vec![Point(4, 0), Point(0, 3)]);
        assert_eq!(solution.moves.len(), 9);
        assert_collects_all(&grid, &solution.moves);
    }

    #[test]
    fn exact_beats_greedy() {
        let grid = parse(&["F 0 0 S 0 F 0 0 0 0 0 0 0 F"]);

        let exact = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(exact.strategy, Strategy::Exact);
        assert_eq!(exact.tour, vec![Point(0, 0), Point(0, 5), Point(0, 13)]);
        assert_eq!(exact.moves.len(), 16);
        assert_collects_all(&grid, &exact.moves);

        let greedy = Solver::new(SolverConfig::with_exact_flag_limit(0)).solve_grid(&grid).unwrap();
        assert_eq!(greedy.strategy, Strategy::Greedy);
        assert_eq!(greedy.tour, vec![Point(0, 5), Point(0, 0), Point(0, 13)]);
        assert_eq!(greedy.moves.len(), 20);
        assert_collects_all(&grid, &greedy.moves);
    }

    #[test]
    fn ties_break_by_coordinate() {
        // every order costs 1 + 2 + 2 + 2
        let grid = parse(&[
            "0 F 0",
            "F S F",
            "0 F 0",
        ]);

        // greedy takes the smallest of the nearest flags at every step
        let greedy = Solver::new(SolverConfig::with_exact_flag_limit(0)).solve_grid(&grid).unwrap();
        assert_eq!(greedy.tour, vec![Point(0, 1), Point(1, 0), Point(1, 2), Point(2, 1)]);
        assert_eq!(greedy.moves.len(), 7);

        // exact ends on the smallest flag, reached from the smallest possible predecessor
        let exact = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(exact.tour, vec![Point(2, 1), Point(1, 2), Point(1, 0), Point(0, 1)]);
        assert_eq!(exact.moves.len(), 7);
        assert_collects_all(&grid, &exact.moves);
    }

    #[test]
    fn many_flags_fall_back_to_greedy() {
        let grid = parse(&[
            "S F 0 F 0 F 0",
            "0 1 1 1 1 1 F",
            "F 0 F 0 F 0 0",
            "0 1 1 T1 1 1 F",
            "F 0 F 0 F 0 0",
            "T1 1 1 1 1 1 F",
            "F 0 F 0 F 0 F",
        ]);
        assert_eq!(grid.flags().len(), 16);

        let solution = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(solution.strategy, Strategy::Greedy);
        assert_eq!(solution.tour.len(), 16);
        assert_collects_all(&grid, &solution.moves);
    }

    #[test]
    fn exact_with_teleporters() {
        let grid = parse(&[
            "S 0 1 F 0 T2",
            "0 0 1 0 0 0",
            "T1 0 1 1 1 0",
            "1 1 1 F 0 0",
            "F 0 T1 0 1 F",
            "0 0 0 1 T2 0",
        ]);

        let solution = Solver::default().solve_grid(&grid).unwrap();
        assert_eq!(solution.strategy, Strategy::Exact);
        assert_collects_all(&grid, &solution.moves);

        // no order of the same legs does better
        let table = DistanceTable::build(&grid);
        let best = (1..=table.flag_count())
            .permutations(table.flag_count())
            .filter_map(|order| once(START).chain(order)
                .tuple_windows()
                .map(|(from, to)| table.distance(from, to))
                .sum::<Option<usize>>())
            .min()
            .unwrap();
        assert_eq!(solution.moves.len(), best);
    }

    #[test]
    fn deterministic() {
        let grid = track(&[
            "S 0 0 0",
            "0 0 0 0",
            "0 0 0 F",
            "F 0 0 0",
        ]);

        let first = solve(&grid).unwrap();
        for _ in 0..5 {
            assert_eq!(solve(&grid).unwrap(), first);
        }
    }

    #[test]
    fn canonical_direction_order() {
        // both down-then-right and right-then-down are shortest; down comes first
        let moves = solve(&track(&["S 0", "0 F"])).unwrap();
        assert_eq!(moves, vec![Down, Right]);

        // up before left
        let moves = solve(&track(&["F 0", "0 S"])).unwrap();
        assert_eq!(moves, vec![Up, Left]);
    }

    #[test]
    fn neighbors_skip_walls_and_edges() {
        let grid = parse(&[
            "S 1",
            "0 F",
        ]);

        assert_eq!(grid.neighbors(Point(0, 0)), vec![(Down, Point(1, 0))]);
        assert_eq!(grid.neighbors(Point(1, 1)), vec![(Left, Point(1, 0))]);
        assert_eq!(grid.cell(Point(0, 1)), Some(Cell::Wall));
        assert_eq!(grid.cell(Point(2, 0)), None);
    }

    #[test]
    fn teleport_targets() {
        let grid = parse(&["S T7 0 T7 F"]);

        assert_eq!(grid.teleport_target(Point(0, 1)), Some(Point(0, 3)));
        assert_eq!(grid.teleport_target(Point(0, 3)), Some(Point(0, 1)));
        assert_eq!(grid.teleport_target(Point(0, 2)), None);
        assert_eq!(grid.teleporters().len(), 1);
        assert_eq!(grid.teleporters()[0].label, "T7");
        assert_eq!(grid.cell(Point(0, 1)), Some(Cell::Teleporter { id: 0 }));
    }

    #[test]
    fn distance_table() {
        let grid = parse(&["F 0 S T1 1 T1 F"]);
        let table = DistanceTable::build(&grid);

        assert_eq!(table.flag_count(), 2);
        assert_eq!(table.distance(START, 1), Some(2));
        assert_eq!(table.path(START, 1), Some([Left, Left].as_slice()));
        // right onto T1 lands at (0, 5), then right again
        assert_eq!(table.distance(START, 2), Some(2));
        assert_eq!(table.path(START, 2), Some([Right, Right].as_slice()));
        assert_eq!(table.distance(2, 2), Some(0));
    }

    #[test]
    fn graph_search() {
        let grid = parse(&[
            "S 0 1",
            "1 0 F",
        ]);
        let reach = TrackGraph::from(&grid).reach_from(grid.start());

        assert_eq!(reach.distance(Point(1, 2)), Some(3));
        assert_eq!(reach.moves_to(Point(1, 2)), Some(vec![Right, Down, Right]));
        assert_eq!(reach.distance(Point(0, 2)), None);
        assert_eq!(reach.moves_to(Point(0, 0)), Some(vec![]));
    }

    #[test]
    fn malformed_grids() {
        let cases: Vec<(Vec<Vec<String>>, MalformedGrid)> = vec![
            (vec![], MalformedGrid::Empty),
            (vec![vec![]], MalformedGrid::Empty),
            (track(&["S 0", "F"]), MalformedGrid::Ragged { row: 1, expected: 2, found: 1 }),
            (track(&["S X F"]), MalformedGrid::InvalidToken { token: "X".to_owned(), at: Point(0, 1) }),
            (track(&["S 2 F"]), MalformedGrid::InvalidToken { token: "2".to_owned(), at: Point(0, 1) }),
            (track(&["0 0 F"]), MalformedGrid::StartCount(0)),
            (track(&["S S F"]), MalformedGrid::StartCount(2)),
            (track(&["S 0 0"]), MalformedGrid::NoFlags),
            (track(&["S T1 F"]), MalformedGrid::TeleporterCount { label: "T1".to_owned(), count: 1 }),
            (track(&["S T1 T1 T1 F"]), MalformedGrid::TeleporterCount { label: "T1".to_owned(), count: 3 }),
        ];

        for (raw, reason) in cases {
            assert_eq!(Grid::parse(&raw).err(), Some(reason.clone()));
            assert_eq!(solve(&raw), Err(SolverFailure::MalformedGrid(reason)));
        }

        let blank = vec![vec!["S".to_owned(), " ".to_owned(), "F".to_owned()]];
        assert_eq!(Grid::parse(&blank).err(), Some(MalformedGrid::EmptyCell { at: Point(0, 1) }));
    }

    #[test]
    fn validation_messages() {
        let ok = validate(&track(&["S 0 F"]));
        assert!(ok.valid);
        assert_eq!(ok.message, "OK");

        let bad = validate(&track(&["S T1 F"]));
        assert!(!bad.valid);
        assert_eq!(bad.message, "teleporter T1 must appear exactly twice (found 1)");

        let failure = solve(&track(&["S S F"])).unwrap_err();
        assert_eq!(failure.kind(), "malformed_grid");
        assert_eq!(failure.to_string(), "malformed grid: there must be exactly one start 'S' (found 2)");
    }

    #[test]
    fn tokens_tolerate_whitespace() {
        let raw = vec![vec![" S".to_owned(), "0 ".to_owned(), " F ".to_owned()]];
        assert_eq!(solve(&raw).unwrap(), vec![Right, Right]);
    }

    #[test]
    fn replay_errors() {
        let grid = parse(&["S 1 F"]);

        assert_eq!(
            replay(&grid, &[Up]),
            Err(ReplayError::OffGrid { index: 0, step: Up, from: Point(0, 0) })
        );
        assert_eq!(
            replay(&grid, &[Right]),
            Err(ReplayError::Blocked { index: 0, step: Right, from: Point(0, 0) })
        );

        let outcome = replay(&grid, &[]).unwrap();
        assert_eq!(outcome.position, Point(0, 0));
        assert_eq!(outcome.remaining, vec![Point(0, 2)]);
        assert!(!outcome.is_complete());
    }

    #[test]
    fn config_is_clamped() {
        assert_eq!(SolverConfig::with_exact_flag_limit(100).exact_flag_limit, MAX_EXACT_FLAG_LIMIT);
        assert_eq!(SolverConfig::with_exact_flag_limit(3).exact_flag_limit, 3);
    }
}
