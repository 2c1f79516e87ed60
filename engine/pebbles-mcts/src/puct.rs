//! Child selection via the predictive upper confidence bound.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use rand_distr::{Distribution, Gamma};

use pebbles_game::NUM_MOVES;

use crate::config::SearchConfig;
use crate::node::TreeNode;

/// Picks which child of an initialized node the search descends into.
pub trait ExpansionStrategy {
    fn pick_child(&mut self, node: &TreeNode) -> usize;
}

/// PUCT selection with fresh Dirichlet(1, …, 1) noise on every call.
///
/// Each legal child is scored as `Q + c * P' * sqrt(1 + N_parent) /
/// (1 + N_child)` where `Q` is the child's average value from the parent's
/// side and `P'` the noise-adjusted prior; the first-encountered maximum
/// wins.
#[derive(Debug)]
pub struct Puct {
    exploration_weight: f32,
    noise_weight: f32,
    rng: ChaCha20Rng,
    gamma: Gamma<f64>,
}

impl Puct {
    pub fn new(config: &SearchConfig) -> Self {
        Self::with_rng(config, ChaCha20Rng::from_entropy())
    }

    /// Deterministic variant for reproducible searches.
    pub fn with_seed(config: &SearchConfig, seed: u64) -> Self {
        Self::with_rng(config, ChaCha20Rng::seed_from_u64(seed))
    }

    fn with_rng(config: &SearchConfig, rng: ChaCha20Rng) -> Self {
        Self {
            exploration_weight: config.exploration_weight,
            noise_weight: config.noise_weight,
            rng,
            gamma: Gamma::new(1.0, 1.0).expect("gamma parameters are fixed"),
        }
    }

    /// A symmetric Dirichlet(1, …, 1) sample: i.i.d. Gamma(1, 1) draws
    /// normalized by their sum. The zero-sum guard never fires in practice.
    fn sample_dirichlet(&mut self) -> [f64; NUM_MOVES] {
        let mut sample = [0.0f64; NUM_MOVES];
        let mut sum = 0.0;
        for slot in &mut sample {
            *slot = self.gamma.sample(&mut self.rng);
            sum += *slot;
        }
        if sum > 0.0 {
            for slot in &mut sample {
                *slot /= sum;
            }
        }
        sample
    }
}

impl ExpansionStrategy for Puct {
    fn pick_child(&mut self, node: &TreeNode) -> usize {
        assert!(
            node.is_initialized(),
            "cannot select a child of an uninitialized node"
        );
        assert!(!node.is_leaf(), "cannot select a child of a leaf node");

        let noises = self.sample_dirichlet();
        let parent_visits_sqrt = f64::from(1 + node.visits()).sqrt();
        let policy = node.evaluation().policy();
        let parent_player = node.state().current_player();

        let mut best_score = f32::NEG_INFINITY;
        let mut best_index = None;

        for (i, child) in node.children().iter().enumerate() {
            let Some(child) = child else { continue };

            let prior = policy[i];
            let adjusted_prior =
                prior * (1.0 - self.noise_weight) + self.noise_weight * noises[i] as f32;
            let exploration =
                (f64::from(adjusted_prior) * parent_visits_sqrt / f64::from(1 + child.visits()))
                    as f32;
            let exploitation = child.average_value().value_for(parent_player);
            let score = exploitation + self.exploration_weight * exploration;

            if score > best_score {
                best_score = score;
                best_index = Some(i);
            }
        }

        best_index.expect("initialized non-leaf node must have a legal child")
    }
}
