//! Selection, expansion, and backpropagation.

use thiserror::Error;
use tracing::trace;

use pebbles_game::{GameState, Player};

use crate::config::SearchConfig;
use crate::evaluation::AverageValue;
use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::TreeNode;
use crate::puct::ExpansionStrategy;

/// Errors that abort a single expansion. The tree is left as it was before
/// the failing descent.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("evaluator error: {0}")]
    Evaluator(#[from] EvaluatorError),
}

/// Grows a search tree one expansion at a time.
pub struct Search<S, E> {
    strategy: S,
    evaluator: E,
    max_depth: u32,
}

impl<S: ExpansionStrategy, E: Evaluator> Search<S, E> {
    pub fn new(strategy: S, evaluator: E) -> Self {
        Self::with_config(strategy, evaluator, &SearchConfig::default())
    }

    pub fn with_config(strategy: S, evaluator: E, config: &SearchConfig) -> Self {
        Self {
            strategy,
            evaluator,
            max_depth: config.max_depth,
        }
    }

    /// One selection → expand-or-terminal → backpropagation pass.
    ///
    /// Descends from `root` along strategy picks until it reaches an
    /// uninitialized node (which is expanded, its children evaluated in one
    /// batch) or a finished game. The resulting `(winner, value)` pair is
    /// either the aggregated child value labeled with the expanded node's
    /// player, or the game outcome; it is applied unchanged to every node
    /// on the path as the recursion unwinds, since the perspective flip for
    /// Player Two lives inside [`AverageValue`].
    pub fn expand(&mut self, root: &mut TreeNode) -> Result<(), SearchError> {
        let (winner, value, depth) = self.descend(root, 0)?;
        trace!(depth, winner = ?winner, support = value.support(), "expansion complete");
        Ok(())
    }

    fn descend(
        &mut self,
        node: &mut TreeNode,
        depth: u32,
    ) -> Result<(Player, AverageValue, u32), SearchError> {
        if node.state().is_game_over() {
            let winner = node.state().winner().unwrap_or(Player::None);
            let mut outcome = AverageValue::default();
            outcome.add_winner(winner);
            node.update(winner, outcome);
            return Ok((winner, outcome, depth));
        }
        if depth >= self.max_depth {
            // Runaway descent: record nothing and unwind.
            return Ok((Player::None, AverageValue::default(), depth));
        }

        let (winner, value, depth) = match node.init_children(&self.evaluator)? {
            // Just expanded: the batch evaluation is the simulation result,
            // labeled with the perspective it was aggregated for.
            Some(children_value) => (node.state().current_player(), children_value, depth),
            None => {
                let index = self.strategy.pick_child(node);
                let child = node
                    .child_mut(index)
                    .expect("expansion strategy returned an empty child slot");
                self.descend(child, depth + 1)?
            }
        };

        node.update(winner, value);
        Ok((winner, value, depth))
    }
}

/// Runs a full search from `state` and returns the most-visited move.
///
/// Expands a fresh root `config.num_expansions` times, then takes the
/// argmax over the visit-based policy of [`TreeNode::encode`] (slots 1..10
/// map back to moves 0..9).
pub fn pick_move<S: ExpansionStrategy, E: Evaluator>(
    state: GameState,
    strategy: S,
    evaluator: E,
    config: &SearchConfig,
) -> Result<usize, SearchError> {
    let mut root = TreeNode::new(state);
    let mut search = Search::with_config(strategy, evaluator, config);
    for _ in 0..config.num_expansions {
        search.expand(&mut root)?;
    }

    let encoded = root.encode();
    let mut best_move = 0;
    let mut best_share = f32::NEG_INFINITY;
    for (mv, &share) in encoded[1..].iter().enumerate() {
        if share > best_share {
            best_share = share;
            best_move = mv;
        }
    }
    Ok(best_move)
}
