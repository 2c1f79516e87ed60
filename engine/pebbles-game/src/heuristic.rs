//! Score-delta estimates for every move, appended to the feature encoding.

use crate::player::Player;
use crate::state::{GameState, NUM_MOVES};

/// Values each move as the normalized change in the mover's score advantage:
/// `(child_diff - parent_diff) / 81`, where both differences are
/// mover-minus-opponent. Disallowed moves are valued 0.
pub fn estimate_move_values(state: &GameState) -> [f32; NUM_MOVES] {
    let mut values = [0.0f32; NUM_MOVES];
    let mover = state.current_player();
    let parent_diff = score_diff(state, mover);

    for (mv, value) in values.iter_mut().enumerate() {
        if !state.is_move_allowed(mv) {
            continue;
        }
        let child = state.apply(mv);
        *value = (score_diff(&child, mover) - parent_diff) / 81.0;
    }

    values
}

fn score_diff(state: &GameState, perspective: Player) -> f32 {
    let one = state.score_one() as f32;
    let two = state.score_two() as f32;
    match perspective {
        Player::Two => two - one,
        _ => one - two,
    }
}
