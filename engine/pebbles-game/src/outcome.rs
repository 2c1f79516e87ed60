//! Win/tie bookkeeping for recorded game outcomes.

use crate::player::Player;

/// Tally of game outcomes: wins for each player plus ties.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Outcomes {
    wins_one: u32,
    wins_two: u32,
    ties: u32,
}

impl Outcomes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one outcome. `Player::None` counts as a tie.
    pub fn add_winner(&mut self, winner: Player) {
        match winner {
            Player::One => self.wins_one += 1,
            Player::Two => self.wins_two += 1,
            Player::None => self.ties += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.wins_one + self.wins_two + self.ties
    }

    /// Win rate in `[0, 1]` where a tie counts as half a win; for
    /// `Player::None` the tie rate. Zero while nothing is recorded.
    pub fn win_rate_for(&self, player: Player) -> f32 {
        let total = self.total();
        if total == 0 {
            return 0.0;
        }
        let total = total as f32;
        match player {
            Player::One => (self.wins_one as f32 + 0.5 * self.ties as f32) / total,
            Player::Two => (self.wins_two as f32 + 0.5 * self.ties as f32) / total,
            Player::None => self.ties as f32 / total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_tally_has_zero_rates() {
        let outcomes = Outcomes::new();
        assert_eq!(outcomes.total(), 0);
        assert_eq!(outcomes.win_rate_for(Player::One), 0.0);
        assert_eq!(outcomes.win_rate_for(Player::Two), 0.0);
        assert_eq!(outcomes.win_rate_for(Player::None), 0.0);
    }

    #[test]
    fn ties_count_as_half_a_win() {
        let mut outcomes = Outcomes::new();
        outcomes.add_winner(Player::One);
        outcomes.add_winner(Player::One);
        outcomes.add_winner(Player::Two);
        outcomes.add_winner(Player::None);

        assert_eq!(outcomes.total(), 4);
        assert!((outcomes.win_rate_for(Player::One) - 0.625).abs() < 1e-6);
        assert!((outcomes.win_rate_for(Player::Two) - 0.375).abs() < 1e-6);
        assert!((outcomes.win_rate_for(Player::None) - 0.25).abs() < 1e-6);
    }
}
