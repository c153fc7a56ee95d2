use std::fmt::{Display, Formatter};

use ndarray::Ix;
use serde::{Deserialize, Serialize};

pub(crate) type Coord = usize;

/// A location `(row, column)` on a track. The top left corner is `Point(0, 0)`.
///
/// Points order by row, then by column.
/// The tour planner uses this ordering to break ties between equidistant flags.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Point(pub Coord, pub Coord);

impl Point {
    /// The row of this point, counted from the top.
    pub fn row(&self) -> Coord {
        self.0
    }

    /// The column of this point, counted from the left.
    pub fn col(&self) -> Coord {
        self.1
    }

    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.0, self.1)
    }

    // stepping off the top or left edge wraps to a huge coordinate, which every bounds check rejects
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}

impl From<(Ix, Ix)> for Point {
    fn from(value: (Ix, Ix)) -> Self {
        Self(value.0, value.1)
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.0, self.1)
    }
}
