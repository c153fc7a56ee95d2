use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantArray};

use crate::location::Point;

/// A unit move on a track.
///
/// Variants are declared in canonical order: up, down, left, right.
/// [`VARIANTS`](VariantArray::VARIANTS) follows that order, and so does every search over a track,
/// so that among equally short paths the one preferring earlier directions is always chosen.
///
/// Moves print and parse as the lowercase tokens `"up"`, `"down"`, `"left"` and `"right"`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[derive(VariantArray, Display, AsRefStr, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Move {
    /// Towards row 0.
    Up,
    /// Away from row 0.
    Down,
    /// Towards column 0.
    Left,
    /// Away from column 0.
    Right,
}

impl Move {
    /// Attempt the move from `point` and return the resultant [`Point`].
    ///
    /// No bounds checking happens here; moving off the top or left edge yields a point no grid contains.
    pub fn attempt_from(&self, point: Point) -> Point {
        match self {
            Self::Up => point.offset_by((-1, 0)),
            Self::Down => point.offset_by((1, 0)),
            Self::Left => point.offset_by((0, -1)),
            Self::Right => point.offset_by((0, 1)),
        }
    }
}
