use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use flagtour::{replay, validate, FailureReport, Grid, Move, Solution, Solver, SolverConfig, EXACT_FLAG_LIMIT};
use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::tracks::Track;

mod tracks;

#[derive(Parser)]
#[command(name = "solver", version, about = "Plan flag-collecting runs over grid tracks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the tracks in a track file
    Tracks { file: PathBuf },
    /// Check every track in a track file
    Validate { file: PathBuf },
    /// Solve one track, or every track in parallel
    Solve {
        file: PathBuf,
        /// Only solve the track with this id
        #[arg(long)]
        track: Option<String>,
        /// Tracks with more flags than this are planned greedily
        #[arg(long, env = "FLAGTOUR_EXACT_FLAG_LIMIT", default_value_t = EXACT_FLAG_LIMIT)]
        exact_flag_limit: usize,
        /// Print one JSON document instead of a line per track
        #[arg(long)]
        json: bool,
        /// Draw each solved track with the cells its run passes over
        #[arg(long)]
        show: bool,
    },
    /// Drive a sequence of moves over a track and report what it collects
    Replay {
        file: PathBuf,
        /// Which track to drive on; optional when the file holds a single track
        #[arg(long)]
        track: Option<String>,
        #[arg(required = true)]
        moves: Vec<Move>,
    },
}

#[derive(Serialize)]
struct SolveOutput<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    solution: Option<&'a Solution>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<FailureReport>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    match Cli::parse().command {
        Command::Tracks { file } => list(&file),
        Command::Validate { file } => validate_all(&file),
        Command::Solve { file, track, exact_flag_limit, json, show } => {
            let tracks = tracks::select(tracks::load(&file)?, track.as_deref())?;
            solve_all(&tracks, SolverConfig::with_exact_flag_limit(exact_flag_limit), json, show)
        }
        Command::Replay { file, track, moves } => {
            let tracks = tracks::select(tracks::load(&file)?, track.as_deref())?;
            let [track] = tracks.as_slice() else {
                bail!("{} holds {} tracks; pick one with --track", file.display(), tracks.len());
            };
            drive(track, &moves)
        }
    }
}

fn list(file: &Path) -> anyhow::Result<()> {
    for track in tracks::load_validated(file)? {
        let cols = track.grid.first().map_or(0, Vec::len);
        println!("{}\t{}\t{}x{}", track.id, track.name(), track.grid.len(), cols);
    }

    Ok(())
}

fn validate_all(file: &Path) -> anyhow::Result<()> {
    let tracks = tracks::load(file)?;
    let mut invalid = 0;
    for track in &tracks {
        let validation = validate(&track.grid);
        if !validation.valid {
            invalid += 1;
        }
        println!("{}\t{}", track.id, validation.message);
    }

    if invalid > 0 {
        bail!("{invalid} of {} tracks are invalid", tracks.len());
    }

    Ok(())
}

fn solve_all(tracks: &[Track], config: SolverConfig, json: bool, show: bool) -> anyhow::Result<()> {
    let solver = Solver::new(config);
    let results = tracks.par_iter()
        .map(|track| solver.solve(&track.grid))
        .collect::<Vec<_>>();

    let mut outputs = Vec::with_capacity(tracks.len());
    let mut failed = 0;
    for (track, result) in tracks.iter().zip(&results) {
        match result {
            Ok(solution) => {
                info!(track = %track.id, moves = solution.moves.len(), strategy = %solution.strategy, "solved");
                if !json {
                    println!("{}\t{}", track.id, solution.tokens().join(" "));
                }
                if show {
                    let grid = Grid::parse(&track.grid).with_context(|| format!("track '{}'", track.id))?;
                    let outcome = replay(&grid, &solution.moves)?;
                    eprint!("{}", grid.render_trail(&outcome.trail));
                }
                outputs.push(SolveOutput { id: &track.id, solution: Some(solution), error: None });
            }
            Err(failure) => {
                failed += 1;
                warn!(track = %track.id, %failure, "could not solve");
                if !json {
                    println!("{}\terror: {}", track.id, failure);
                }
                outputs.push(SolveOutput { id: &track.id, solution: None, error: Some(failure.report()) });
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outputs)?);
    }

    if failed > 0 {
        bail!("{failed} of {} tracks could not be solved", tracks.len());
    }

    Ok(())
}

fn drive(track: &Track, moves: &[Move]) -> anyhow::Result<()> {
    let grid = Grid::parse(&track.grid).with_context(|| format!("track '{}'", track.id))?;
    let outcome = replay(&grid, moves)?;

    print!("{}", grid.render_trail(&outcome.trail));
    println!(
        "collected {} of {} flags, stopped at {}",
        outcome.collected.len(),
        grid.flags().len(),
        outcome.position,
    );

    if !outcome.is_complete() {
        bail!("flags left at {}", outcome.remaining.iter().map(ToString::to_string).collect::<Vec<_>>().join(", "));
    }

    Ok(())
}
