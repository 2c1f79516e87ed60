//! Batched node evaluation.

use thiserror::Error;

use pebbles_game::NUM_MOVES;

use crate::node::TreeNode;

/// Errors surfaced by node evaluators.
#[derive(Debug, Error)]
pub enum EvaluatorError {
    #[error("model error: {0}")]
    Model(String),

    #[error("inference failed: {0}")]
    Inference(String),
}

/// Fills in the [`crate::StateEvaluation`] of every node in a batch.
///
/// An empty batch is a no-op, and nodes whose game is already over are
/// skipped so their evaluation stays zeroed.
pub trait Evaluator {
    fn evaluate(&self, batch: &mut [&mut TreeNode]) -> Result<(), EvaluatorError>;
}

/// Closures evaluate too; handy for tests and ad-hoc oracles.
impl<F> Evaluator for F
where
    F: Fn(&mut [&mut TreeNode]) -> Result<(), EvaluatorError>,
{
    fn evaluate(&self, batch: &mut [&mut TreeNode]) -> Result<(), EvaluatorError> {
        self(batch)
    }
}

/// Baseline evaluator: neutral value and a uniform prior over all moves.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformEvaluator;

impl UniformEvaluator {
    pub fn new() -> Self {
        Self
    }
}

impl Evaluator for UniformEvaluator {
    fn evaluate(&self, batch: &mut [&mut TreeNode]) -> Result<(), EvaluatorError> {
        let uniform = 1.0 / NUM_MOVES as f32;
        for node in batch.iter_mut() {
            if node.state().is_game_over() {
                continue;
            }
            let evaluation = node.evaluation_mut();
            evaluation.set_value(0.0);
            evaluation.policy_mut().fill(uniform);
        }
        Ok(())
    }
}
