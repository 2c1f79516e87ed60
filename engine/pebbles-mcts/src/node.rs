//! One node of the search tree.

use pebbles_game::{GameState, Outcomes, Player, NUM_MOVES};

use crate::evaluation::{AverageValue, StateEvaluation};
use crate::evaluator::{Evaluator, EvaluatorError};

/// A search-tree node. Owns its game state, its evaluation, its visit
/// statistics, and (recursively) its children: one slot per move, empty
/// for illegal moves and while the node is unexpanded.
#[derive(Debug)]
pub struct TreeNode {
    state: GameState,
    evaluation: StateEvaluation,
    average_value: AverageValue,
    outcomes: Outcomes,
    children: Vec<Option<Box<TreeNode>>>,
    initialized: bool,
}

impl TreeNode {
    pub fn new(state: GameState) -> Self {
        let mut children = Vec::with_capacity(NUM_MOVES);
        children.resize_with(NUM_MOVES, || None);
        Self {
            state,
            evaluation: StateEvaluation::new(),
            average_value: AverageValue::default(),
            outcomes: Outcomes::new(),
            children,
            initialized: false,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn evaluation(&self) -> &StateEvaluation {
        &self.evaluation
    }

    pub fn evaluation_mut(&mut self) -> &mut StateEvaluation {
        &mut self.evaluation
    }

    pub fn average_value(&self) -> &AverageValue {
        &self.average_value
    }

    pub fn outcomes(&self) -> &Outcomes {
        &self.outcomes
    }

    pub fn children(&self) -> &[Option<Box<TreeNode>>] {
        &self.children
    }

    pub fn child_mut(&mut self, index: usize) -> Option<&mut TreeNode> {
        self.children[index].as_deref_mut()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// A node is a leaf until initialized, and forever once its state is
    /// terminal.
    pub fn is_leaf(&self) -> bool {
        !self.initialized || self.state.is_game_over()
    }

    /// Total results backpropagated through this node.
    pub fn visits(&self) -> u32 {
        self.outcomes.total()
    }

    /// Folds one backpropagated result into the node's statistics.
    pub fn update(&mut self, winner: Player, average_value: AverageValue) {
        self.outcomes.add_winner(winner);
        self.average_value += average_value;
    }

    /// Creates children for every legal move and evaluates them as one
    /// batch, seeding each child's [`AverageValue`] from its evaluation.
    ///
    /// Returns the children's summed value (in Player One's frame) on first
    /// initialization, `None` on repeat calls. The node only becomes
    /// initialized once the batch evaluation succeeds, so a failed
    /// expansion leaves it untouched.
    pub fn init_children<E: Evaluator>(
        &mut self,
        evaluator: &E,
    ) -> Result<Option<AverageValue>, EvaluatorError> {
        if self.initialized {
            return Ok(None);
        }

        let mut children: Vec<Option<Box<TreeNode>>> = (0..NUM_MOVES)
            .map(|mv| {
                self.state
                    .is_move_allowed(mv)
                    .then(|| Box::new(TreeNode::new(self.state.apply(mv))))
            })
            .collect();

        {
            let mut batch: Vec<&mut TreeNode> = children
                .iter_mut()
                .filter_map(|slot| slot.as_deref_mut())
                .collect();
            evaluator.evaluate(&mut batch)?;
        }

        let mut children_value = AverageValue::default();
        for child in children.iter_mut().flatten() {
            let value = child.evaluation.value();
            child.average_value = AverageValue::from_evaluation(child.state.current_player(), value);
            children_value += child.average_value;
        }

        self.children = children;
        self.initialized = true;
        Ok(Some(children_value))
    }

    /// Encodes the node as `[value, visit-normalized child policy…]`: the
    /// node's average value from its current player's side, then each
    /// move's share of the child visit counts (empty slots contribute 0).
    ///
    /// Panics on a leaf node and when no child has been visited yet.
    pub fn encode(&self) -> [f32; NUM_MOVES + 1] {
        assert!(!self.is_leaf(), "leaf node cannot be encoded");

        let mut outputs = [0.0f32; NUM_MOVES + 1];
        outputs[0] = self.average_value.value_for(self.state.current_player());

        let mut total_visits = 0.0f32;
        for (mv, child) in self.children.iter().enumerate() {
            if let Some(child) = child {
                outputs[mv + 1] = child.visits() as f32;
                total_visits += outputs[mv + 1];
            }
        }
        assert!(
            total_visits > 0.0,
            "no visits recorded below node:\n{}",
            self.state
        );

        for slot in &mut outputs[1..] {
            *slot /= total_visits;
        }
        outputs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluator::UniformEvaluator;

    fn no_op_evaluator() -> impl Evaluator {
        |_: &mut [&mut TreeNode]| -> Result<(), EvaluatorError> { Ok(()) }
    }

    #[test]
    fn fresh_node_is_an_uninitialized_leaf() {
        let node = TreeNode::new(GameState::new());

        assert!(!node.is_initialized());
        assert!(node.is_leaf());
        assert_eq!(node.visits(), 0);
        assert_eq!(node.children().len(), NUM_MOVES);
        assert!(node.children().iter().all(|child| child.is_none()));
        assert_eq!(node.state().current_player(), Player::One);
    }

    #[test]
    fn update_folds_outcomes_and_values() {
        let mut node = TreeNode::new(GameState::new());

        node.update(Player::One, AverageValue::new(0.5, 1));
        assert_eq!(node.visits(), 1);
        assert!((node.average_value().value_for(Player::One) - 0.5).abs() < 1e-6);

        node.update(Player::Two, AverageValue::new(-1.0, 1));
        assert_eq!(node.visits(), 2);
        assert!((node.average_value().value_for(Player::One) + 0.25).abs() < 1e-6);

        let mut expected = Outcomes::new();
        expected.add_winner(Player::One);
        expected.add_winner(Player::Two);
        assert_eq!(node.outcomes(), &expected);
    }

    #[test]
    fn init_children_evaluates_the_batch_and_sums_their_values() {
        let mut node = TreeNode::new(GameState::new());

        // Hand every child a distinct value: 0.5, 0.6, …, 1.3.
        let evaluator = |batch: &mut [&mut TreeNode]| -> Result<(), EvaluatorError> {
            assert_eq!(batch.len(), NUM_MOVES);
            for (i, child) in batch.iter_mut().enumerate() {
                child.evaluation_mut().set_value(0.5 + 0.1 * i as f32);
            }
            Ok(())
        };

        let children_value = node.init_children(&evaluator).unwrap().unwrap();

        assert!(node.is_initialized());
        assert!(!node.is_leaf());
        for child in node.children() {
            let child = child.as_ref().expect("all opening moves are legal");
            assert_eq!(child.state().current_player(), Player::Two);
        }

        // Children evaluate from Two's side, so their values enter One's
        // frame negated: -(0.5 + 0.6 + … + 1.3) / 9 = -0.9.
        assert!((children_value.value_for(Player::One) + 0.9).abs() < 1e-5);
        assert_eq!(children_value.support(), NUM_MOVES as u32);

        // Re-initialization is a no-op.
        assert!(node.init_children(&evaluator).unwrap().is_none());
    }

    #[test]
    fn init_children_leaves_illegal_slots_empty() {
        let state = GameState::from_sparse(Player::One, &[(8, 2), (3, 1)], 0, 0, None, None);
        let mut node = TreeNode::new(state);

        node.init_children(&UniformEvaluator::new()).unwrap();

        // Only cells 8 and 3 hold pebbles: moves 0 and 5 for One.
        for (mv, child) in node.children().iter().enumerate() {
            assert_eq!(child.is_some(), mv == 0 || mv == 5, "move {mv}");
        }
    }

    #[test]
    fn failed_evaluation_leaves_the_node_uninitialized() {
        let mut node = TreeNode::new(GameState::new());
        let failing = |_: &mut [&mut TreeNode]| -> Result<(), EvaluatorError> {
            Err(EvaluatorError::Inference("batch rejected".to_string()))
        };

        assert!(node.init_children(&failing).is_err());
        assert!(!node.is_initialized());
        assert!(node.is_leaf());
        assert!(node.children().iter().all(|child| child.is_none()));
    }

    #[test]
    fn encode_normalizes_child_visits() {
        let mut node = TreeNode::new(GameState::new());
        node.init_children(&no_op_evaluator()).unwrap();
        node.update(Player::One, AverageValue::new(0.9, 1));

        node.child_mut(0).unwrap().update(Player::One, AverageValue::default());
        node.child_mut(0).unwrap().update(Player::One, AverageValue::default());
        node.child_mut(1).unwrap().update(Player::Two, AverageValue::default());
        node.child_mut(2).unwrap().update(Player::One, AverageValue::default());

        let encoded = node.encode();
        assert!((encoded[0] - 0.9).abs() < 1e-6);
        assert!((encoded[1] - 0.5).abs() < 1e-6);
        assert!((encoded[2] - 0.25).abs() < 1e-6);
        assert!((encoded[3] - 0.25).abs() < 1e-6);
        for &p in &encoded[4..] {
            assert_eq!(p, 0.0);
        }
    }

    #[test]
    #[should_panic(expected = "leaf node cannot be encoded")]
    fn encoding_a_leaf_panics() {
        TreeNode::new(GameState::new()).encode();
    }

    #[test]
    #[should_panic(expected = "no visits")]
    fn encoding_without_visits_panics() {
        let mut node = TreeNode::new(GameState::new());
        node.init_children(&no_op_evaluator()).unwrap();
        node.encode();
    }
}
