use js_sys::Array;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

use crate::grid::{validate, Grid};
use crate::solver::Solver;

fn grid_from_js(grid: Array) -> Result<Vec<Vec<String>>, JsError> {
    grid.iter()
        .map(|row| {
            let row = row.dyn_into::<Array>().map_err(|_| JsError::new("grid rows must be arrays"))?;
            row.iter()
                .map(|cell| cell.as_string().ok_or_else(|| JsError::new("grid cells must be strings")))
                .collect()
        })
        .collect()
}

/// Solve a track given as an array of rows of string tokens, returning an array of move tokens.
///
/// Throws if the grid is malformed or some flag cannot be reached.
#[wasm_bindgen(js_name = solveTrack)]
pub fn solve_track(grid: Array) -> Result<Array, JsError> {
    let grid = Grid::parse(&grid_from_js(grid)?)?;
    let solution = Solver::default().solve_grid(&grid)?;

    Ok(solution.moves.iter().map(|step| JsValue::from_str(step.as_ref())).collect())
}

/// Check a track given as an array of rows of string tokens, returning `"OK"` or why it was rejected.
#[wasm_bindgen(js_name = validateTrack)]
pub fn validate_track(grid: Array) -> Result<String, JsError> {
    Ok(validate(&grid_from_js(grid)?).message)
}
