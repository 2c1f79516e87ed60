//! Player identity for the two-sided board.

/// One side of the board. `None` stands for "no player": a drawn outcome or
/// a cell owned by neither side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
    None,
}

impl Player {
    /// The other side. `None` has no opponent and maps to itself.
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
            Player::None => Player::None,
        }
    }
}
