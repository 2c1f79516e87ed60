//! Immutable game state: move legality, sowing, capture, special cells,
//! terminal detection, and the neural-network feature encoding.

use std::fmt;

use crate::heuristic;
use crate::player::Player;

/// Number of columns a player can move from.
pub const NUM_MOVES: usize = 9;
/// Total cells on the board, two rows of nine.
pub const NUM_CELLS: usize = 18;
/// Length of the feature vector produced by [`GameState::encode`].
pub const NUM_FEATURES: usize = 47;

/// Half of the 162 pebbles in play. A score strictly above this wins; both
/// sides reaching it exactly is a draw.
const WINNING_THRESHOLD: u32 = 81;

/// A snapshot of the game. Constructed once, never mutated; [`GameState::apply`]
/// returns a fresh state.
///
/// Cells 0..9 form Player Two's row, cells 9..18 Player One's row. Moves are
/// column indices 0..9 from the mover's own perspective: Player One's move
/// `m` plays cell `8 - m`, Player Two's plays cell `9 + m`. Sowing follows
/// the loop 8→…→0→9→…→17→8.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameState {
    current_player: Player,
    is_game_over: bool,
    winner: Option<Player>,
    score_one: u32,
    score_two: u32,
    special_one: Option<usize>,
    special_two: Option<usize>,
    cells: [u8; NUM_CELLS],
}

impl GameState {
    /// The starting position: nine pebbles everywhere, Player One to move.
    pub fn new() -> Self {
        Self::with_cells(Player::One, 0, 0, None, None, [9; NUM_CELLS])
    }

    /// Builds a state from a full cell array. Terminal status and winner are
    /// derived here and frozen.
    pub fn with_cells(
        current_player: Player,
        score_one: u32,
        score_two: u32,
        special_one: Option<usize>,
        special_two: Option<usize>,
        cells: [u8; NUM_CELLS],
    ) -> Self {
        let mut state = Self {
            current_player,
            is_game_over: false,
            winner: None,
            score_one,
            score_two,
            special_one,
            special_two,
            cells,
        };
        state.is_game_over = state.check_game_over();
        state.winner = state.check_winner();
        state
    }

    /// Builds a state from `(cell, count)` pairs; unlisted cells are empty.
    pub fn from_sparse(
        current_player: Player,
        non_zero_cells: &[(usize, u8)],
        score_one: u32,
        score_two: u32,
        special_one: Option<usize>,
        special_two: Option<usize>,
    ) -> Self {
        let mut cells = [0u8; NUM_CELLS];
        for &(cell, count) in non_zero_cells {
            cells[cell] = count;
        }
        Self::with_cells(
            current_player,
            score_one,
            score_two,
            special_one,
            special_two,
            cells,
        )
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    /// The winner, set iff the game is over. `Player::None` marks a draw.
    pub fn winner(&self) -> Option<Player> {
        self.winner
    }

    pub fn score_one(&self) -> u32 {
        self.score_one
    }

    pub fn score_two(&self) -> u32 {
        self.score_two
    }

    pub fn cells(&self) -> &[u8; NUM_CELLS] {
        &self.cells
    }

    pub fn special_one(&self) -> Option<usize> {
        self.special_one
    }

    pub fn special_two(&self) -> Option<usize> {
        self.special_two
    }

    /// The board cell the current player's move `mv` plays from.
    fn board_cell(&self, mv: usize) -> usize {
        match self.current_player {
            Player::One => 8 - mv,
            _ => 9 + mv,
        }
    }

    /// Inverse of the move-to-cell mapping: the column of `cell` from its
    /// owner's perspective.
    fn move_by_cell(cell: usize) -> usize {
        if cell < 9 {
            8 - cell
        } else {
            cell - 9
        }
    }

    /// Successor along the sowing loop: down Player Two's row, across to
    /// Player One's row, and back over the far end.
    fn next_cell(cell: usize) -> usize {
        match cell {
            0 => 9,
            1..=8 => cell - 1,
            17 => 8,
            _ => cell + 1,
        }
    }

    fn special_owner(&self, cell: usize) -> Player {
        if self.special_one == Some(cell) {
            Player::One
        } else if self.special_two == Some(cell) {
            Player::Two
        } else {
            Player::None
        }
    }

    /// Capture only fires in the row opposite the mover's hand cells.
    fn is_reachable(&self, cell: usize) -> bool {
        match self.current_player {
            Player::One => cell > 8,
            _ => cell < 9,
        }
    }

    pub fn is_move_allowed(&self, mv: usize) -> bool {
        self.cells[self.board_cell(mv)] != 0
    }

    fn check_game_over(&self) -> bool {
        if self.score_one > WINNING_THRESHOLD || self.score_two > WINNING_THRESHOLD {
            return true;
        }
        if self.score_one == WINNING_THRESHOLD && self.score_two == WINNING_THRESHOLD {
            return true;
        }
        (0..NUM_MOVES).all(|mv| !self.is_move_allowed(mv))
    }

    fn check_winner(&self) -> Option<Player> {
        if !self.is_game_over {
            return None;
        }
        if self.score_one > WINNING_THRESHOLD {
            return Some(Player::One);
        }
        if self.score_two > WINNING_THRESHOLD {
            return Some(Player::Two);
        }
        if self.score_one == WINNING_THRESHOLD && self.score_two == WINNING_THRESHOLD {
            return Some(Player::None);
        }
        if (0..NUM_MOVES).all(|mv| !self.is_move_allowed(mv)) {
            // The side to move is stuck and loses.
            return Some(self.current_player.opponent());
        }
        panic!("game over without a matching winner rule:\n{self}");
    }

    /// Applies `mv` for the current player and returns the resulting state.
    ///
    /// Panics if the move is not allowed.
    pub fn apply(&self, mv: usize) -> GameState {
        assert!(
            self.is_move_allowed(mv),
            "move {mv} is not allowed in state:\n{self}"
        );

        let cell = self.board_cell(mv);
        let mut cells = self.cells;
        let mut score_one = self.score_one;
        let mut score_two = self.score_two;
        let mut special_one = self.special_one;
        let mut special_two = self.special_two;

        let mut hand = u32::from(cells[cell]);
        cells[cell] = 0;

        // A one-pebble hand skips its own cell before sowing.
        let mut current = if hand == 1 { Self::next_cell(cell) } else { cell };

        while hand > 0 {
            hand -= 1;

            // A pebble landing on a special cell scores for its owner
            // instead of being deposited.
            match self.special_owner(current) {
                Player::One => score_one += 1,
                Player::Two => score_two += 1,
                Player::None => cells[current] += 1,
            }

            if hand == 0 && self.is_reachable(current) {
                // The mover captures an even count left in the far row.
                if cells[current] % 2 == 0 {
                    match self.current_player {
                        Player::One => score_one += u32::from(cells[current]),
                        Player::Two => score_two += u32::from(cells[current]),
                        Player::None => {}
                    }
                    cells[current] = 0;
                }

                // A final count of exactly three founds the mover's special
                // cell: the three pebbles are scored and the cell is marked.
                // Column 8 is barred, as is the column already holding the
                // opponent's special.
                if cells[current] == 3 {
                    let column = Self::move_by_cell(current);
                    let column_free = |other: Option<usize>| {
                        other.map_or(true, |cell| Self::move_by_cell(cell) != column)
                    };
                    if column != 8 {
                        match self.current_player {
                            Player::One if special_one.is_none() && column_free(special_two) => {
                                score_one += 3;
                                cells[current] = 0;
                                special_one = Some(current);
                            }
                            Player::Two if special_two.is_none() && column_free(special_one) => {
                                score_two += 3;
                                cells[current] = 0;
                                special_two = Some(current);
                            }
                            _ => {}
                        }
                    }
                }
            }

            current = Self::next_cell(current);
        }

        Self::with_cells(
            self.current_player.opponent(),
            score_one,
            score_two,
            special_one,
            special_two,
            cells,
        )
    }

    /// Encodes the state as 47 features, all from the current player's
    /// perspective:
    ///
    /// - 0..9: one-hot column of the mover's special cell (zero if unset)
    /// - 9..18: one-hot column of the opponent's special cell
    /// - 18..27: the mover's row counts, scaled by 81
    /// - 27..36: the opponent's row counts, scaled by 81
    /// - 36, 37: mover's and opponent's scores, scaled by 81
    /// - 38..47: per-move heuristic values from [`heuristic::estimate_move_values`]
    pub fn encode(&self) -> [f32; NUM_FEATURES] {
        let mut encoded = [0.0f32; NUM_FEATURES];

        let (own_special, other_special) = match self.current_player {
            Player::Two => (self.special_two, self.special_one),
            _ => (self.special_one, self.special_two),
        };
        if let Some(cell) = own_special {
            encoded[Self::move_by_cell(cell)] = 1.0;
        }
        if let Some(cell) = other_special {
            encoded[9 + Self::move_by_cell(cell)] = 1.0;
        }

        for i in 0..NUM_MOVES {
            let (own, other) = match self.current_player {
                Player::Two => (self.cells[9 + i], self.cells[8 - i]),
                _ => (self.cells[8 - i], self.cells[9 + i]),
            };
            encoded[18 + i] = f32::from(own) / 81.0;
            encoded[27 + i] = f32::from(other) / 81.0;
        }

        let (own_score, other_score) = match self.current_player {
            Player::Two => (self.score_two, self.score_one),
            _ => (self.score_one, self.score_two),
        };
        encoded[36] = own_score as f32 / 81.0;
        encoded[37] = other_score as f32 / 81.0;

        encoded[38..].copy_from_slice(&heuristic::estimate_move_values(self));

        encoded
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "-------------------------------")?;
        writeln!(f, "{}:{}", self.score_one, self.score_two)?;
        for start in [0, 9] {
            write!(f, "|")?;
            for cell in start..start + 9 {
                let marker = if self.special_owner(cell) != Player::None {
                    "*"
                } else {
                    ""
                };
                write!(f, "{:>4}|", format!("{}{}", self.cells[cell], marker))?;
            }
            writeln!(f)?;
        }
        writeln!(f, "Current Player: {:?}", self.current_player)?;
        writeln!(f, "Is GameOver: {}", self.is_game_over)?;
        match self.winner {
            Some(winner) => write!(f, "Winner: {winner:?}"),
            None => write!(f, "Winner: none"),
        }
    }
}
