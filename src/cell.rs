/// Index of a teleporter pair within its [`Grid`](crate::Grid), in order of first appearance.
pub type TeleporterId = usize;

/// One cell of a track.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum Cell {
    /// Open ground, token `"0"`.
    #[default]
    Road,
    /// Impassable, token `"1"`.
    Wall,
    /// Where the car begins, token `"S"`.
    Start,
    /// A flag to collect, token `"F"`.
    Flag,
    /// One endpoint of a teleporter pair, token `"T<id>"`.
    Teleporter {
        /// Which pair this endpoint belongs to.
        id: TeleporterId,
    },
}

impl Cell {
    /// Everything but a wall can be driven onto.
    pub fn is_passable(&self) -> bool {
        !matches!(self, Cell::Wall)
    }

    pub(crate) fn display(&self) -> char {
        match self {
            Cell::Road => '.',
            Cell::Wall => '#',
            Cell::Start => 'S',
            Cell::Flag => 'F',
            Cell::Teleporter { .. } => 'T',
        }
    }
}
