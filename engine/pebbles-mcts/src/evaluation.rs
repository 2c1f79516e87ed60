//! Value containers shared between the tree and its evaluators.

use std::ops::AddAssign;

use pebbles_game::{Player, NUM_MOVES};

/// Evaluator output for one state: a scalar value in `[-1, 1]` as seen by
/// the state's current player, and a prior probability per move.
///
/// Starts zeroed; only an evaluator writes into it.
#[derive(Debug, Clone, PartialEq)]
pub struct StateEvaluation {
    value: f32,
    policy: [f32; NUM_MOVES],
}

impl StateEvaluation {
    pub fn new() -> Self {
        Self {
            value: 0.0,
            policy: [0.0; NUM_MOVES],
        }
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set_value(&mut self, value: f32) {
        self.value = value;
    }

    pub fn policy(&self) -> &[f32; NUM_MOVES] {
        &self.policy
    }

    pub fn policy_mut(&mut self) -> &mut [f32; NUM_MOVES] {
        &mut self.policy
    }
}

impl Default for StateEvaluation {
    fn default() -> Self {
        Self::new()
    }
}

/// A running sum of observed values with the number of samples backing it.
/// The sum is always stored from Player One's perspective; [`Self::value_for`]
/// flips the sign for Player Two.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AverageValue {
    player_one_value: f32,
    support: u32,
}

impl AverageValue {
    pub fn new(player_one_value: f32, support: u32) -> Self {
        Self {
            player_one_value,
            support,
        }
    }

    /// A single-sample value as evaluated from `current_player`'s side.
    ///
    /// Panics for `Player::None`.
    pub fn from_evaluation(current_player: Player, evaluated_value: f32) -> Self {
        let player_one_value = match current_player {
            Player::One => evaluated_value,
            Player::Two => -evaluated_value,
            Player::None => panic!("cannot store an evaluation for Player::None"),
        };
        Self {
            player_one_value,
            support: 1,
        }
    }

    /// Folds a recorded game outcome into the sum: +1 for One, -1 for Two,
    /// 0 for a tie; support grows either way.
    pub fn add_winner(&mut self, winner: Player) {
        self.support += 1;
        match winner {
            Player::One => self.player_one_value += 1.0,
            Player::Two => self.player_one_value -= 1.0,
            Player::None => {}
        }
    }

    /// The mean value from `player`'s side, zero while no samples exist.
    ///
    /// Panics for `Player::None` once support is nonzero.
    pub fn value_for(&self, player: Player) -> f32 {
        if self.support == 0 {
            return 0.0;
        }
        match player {
            Player::One => self.player_one_value / self.support as f32,
            Player::Two => -self.player_one_value / self.support as f32,
            Player::None => panic!("Player::None has no value perspective"),
        }
    }

    pub fn support(&self) -> u32 {
        self.support
    }
}

impl AddAssign for AverageValue {
    fn add_assign(&mut self, other: AverageValue) {
        self.player_one_value += other.player_one_value;
        self.support += other.support;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_evaluation_starts_zeroed() {
        let evaluation = StateEvaluation::new();
        assert_eq!(evaluation.value(), 0.0);
        assert_eq!(evaluation.policy(), &[0.0; NUM_MOVES]);
    }

    #[test]
    fn empty_average_is_zero_for_both_players() {
        let average = AverageValue::default();
        assert_eq!(average.value_for(Player::One), 0.0);
        assert_eq!(average.value_for(Player::Two), 0.0);
    }

    #[test]
    fn opponent_sees_the_negated_value() {
        let average = AverageValue::new(1.0, 1);
        assert!((average.value_for(Player::One) - 1.0).abs() < 1e-6);
        assert!((average.value_for(Player::Two) + 1.0).abs() < 1e-6);

        let average = AverageValue::new(2.5, 5);
        assert!((average.value_for(Player::One) - 0.5).abs() < 1e-6);
        assert!((average.value_for(Player::Two) + 0.5).abs() < 1e-6);
    }

    #[test]
    fn winners_shift_the_average() {
        let mut average = AverageValue::new(2.0, 2);
        average.add_winner(Player::One);
        average.add_winner(Player::Two);
        average.add_winner(Player::None);

        assert_eq!(average, AverageValue::new(2.0, 5));
        assert!((average.value_for(Player::One) - 0.4).abs() < 1e-6);
        assert!((average.value_for(Player::Two) + 0.4).abs() < 1e-6);
    }

    #[test]
    fn opposite_outcomes_cancel() {
        let mut average = AverageValue::new(1.0, 1);
        average.add_winner(Player::Two);

        assert_eq!(average.value_for(Player::One), 0.0);
        assert_eq!(average.value_for(Player::Two), 0.0);
    }

    #[test]
    fn from_evaluation_round_trips_for_both_players() {
        let average = AverageValue::from_evaluation(Player::One, 0.8);
        assert!((average.value_for(Player::One) - 0.8).abs() < 1e-6);

        // An evaluation from Two's side is stored negated in One's frame.
        let average = AverageValue::from_evaluation(Player::Two, 0.6);
        assert!((average.value_for(Player::One) + 0.6).abs() < 1e-6);
        assert!((average.value_for(Player::Two) - 0.6).abs() < 1e-6);
    }

    #[test]
    fn add_assign_merges_sums_and_support() {
        let mut total = AverageValue::new(2.0, 4);
        total += AverageValue::new(1.0, 1);

        assert_eq!(total, AverageValue::new(3.0, 5));
        assert!((total.value_for(Player::One) - 0.6).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "Player::None")]
    fn evaluating_for_no_player_panics() {
        AverageValue::from_evaluation(Player::None, 0.5);
    }

    #[test]
    #[should_panic(expected = "Player::None")]
    fn no_player_has_no_value_once_supported() {
        let average = AverageValue::new(1.0, 1);
        average.value_for(Player::None);
    }
}
