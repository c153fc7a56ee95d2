use ndarray::Array2;
use serde::Serialize;
use strum::Display;

use crate::graph::{DistanceTable, START};
use crate::solver::SolverFailure;

/// Tracks with at most this many flags are planned exactly by default.
pub const EXACT_FLAG_LIMIT: usize = 12;

/// Exact planning is never attempted past this many flags, whatever the configuration says.
/// The subset table grows as `2^n * n`.
pub const MAX_EXACT_FLAG_LIMIT: usize = 16;

/// How a tour was chosen.
#[derive(Clone, Copy, Debug, Display, Eq, PartialEq, Serialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Dynamic programming over subsets of flags. The tour is the shortest possible.
    Exact,
    /// Nearest unvisited flag first. The tour is valid but may be longer than necessary.
    Greedy,
}

/// Visiting order over flags, by flag index (flag `k` is point `k + 1` of the [`DistanceTable`]).
pub(crate) struct Tour {
    pub(crate) order: Vec<usize>,
    pub(crate) length: usize,
    pub(crate) strategy: Strategy,
}

impl Tour {
    /// Table indices of every point visited, start first.
    pub(crate) fn stops(&self) -> impl Iterator<Item=usize> + '_ {
        std::iter::once(START).chain(self.order.iter().map(|flag| flag + 1))
    }
}

/// Order the flags of `table` to minimize total travel from the start, ending anywhere.
///
/// Exact when there are at most `exact_flag_limit` flags, greedy otherwise.
/// Among equally short options the flag that comes first by row, then column, is preferred.
pub(crate) fn plan(table: &DistanceTable, exact_flag_limit: usize) -> Result<Tour, SolverFailure> {
    let flags = table.flag_count();
    if let Some(flag) = (0..flags).find(|flag| table.distance(START, flag + 1).is_none()) {
        return Err(SolverFailure::UnreachableFlag(table.point(flag + 1)));
    }

    if flags <= exact_flag_limit.min(MAX_EXACT_FLAG_LIMIT) {
        held_karp(table)
    } else {
        nearest_neighbour(table)
    }
}

#[derive(Clone, Copy)]
struct Entry {
    cost: usize,
    // None when the tour starts here
    prev: Option<usize>,
}

fn held_karp(table: &DistanceTable) -> Result<Tour, SolverFailure> {
    let flags = table.flag_count();
    let full = (1usize << flags) - 1;

    // best[(visited, last)]
    let mut best: Array2<Option<Entry>> = Array2::from_elem((full + 1, flags), None);
    for flag in 0..flags {
        best[(1usize << flag, flag)] = table.distance(START, flag + 1).map(|cost| Entry { cost, prev: None });
    }

    // extending a tour only sets bits, so every subset is final before it is extended
    for mask in 1..=full {
        for last in (0..flags).filter(|last| mask & (1usize << last) != 0) {
            let Some(entry) = best[(mask, last)] else { continue };

            for next in (0..flags).filter(|next| mask & (1usize << next) == 0) {
                let Some(leg) = table.distance(last + 1, next + 1) else { continue };
                let cost = entry.cost + leg;
                let slot = &mut best[(mask | 1usize << next, next)];
                // strict, so the smallest predecessor keeps a tie
                if slot.map_or(true, |existing| cost < existing.cost) {
                    *slot = Some(Entry { cost, prev: Some(last) });
                }
            }
        }
    }

    let Some((length, end)) = (0..flags)
        .filter_map(|last| best[(full, last)].map(|entry| (entry.cost, last)))
        .min() else {
        return Err(SolverFailure::UnreachableFlag(table.point(stranded_flag(table) + 1)));
    };

    let mut order = Vec::with_capacity(flags);
    let (mut mask, mut last) = (full, end);
    loop {
        order.push(last);
        match best[(mask, last)].and_then(|entry| entry.prev) {
            Some(prev) => {
                mask ^= 1usize << last;
                last = prev;
            }
            None => break,
        }
    }
    order.reverse();

    Ok(Tour { order, length, strategy: Strategy::Exact })
}

fn nearest_neighbour(table: &DistanceTable) -> Result<Tour, SolverFailure> {
    // kept sorted, so the first of several equidistant flags is the smallest
    let mut remaining = (0..table.flag_count()).collect::<Vec<_>>();
    let mut order = Vec::with_capacity(remaining.len());
    let mut here = START;
    let mut length = 0;

    while !remaining.is_empty() {
        let Some((leg, position)) = remaining.iter()
            .enumerate()
            .filter_map(|(position, flag)| table.distance(here, flag + 1).map(|leg| (leg, position)))
            .min() else {
            return Err(SolverFailure::UnreachableFlag(table.point(remaining[0] + 1)));
        };

        let flag = remaining.remove(position);
        order.push(flag);
        length += leg;
        here = flag + 1;
    }

    Ok(Tour { order, length, strategy: Strategy::Greedy })
}

/// The first flag some other point of interest cannot reach.
fn stranded_flag(table: &DistanceTable) -> usize {
    let points = table.flag_count() + 1;
    (0..table.flag_count())
        .find(|flag| (0..points).any(|from| table.distance(from, flag + 1).is_none()))
        .unwrap_or(0)
}
