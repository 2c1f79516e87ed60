//! PUCT-guided Monte Carlo tree search for the nine-pebbles engine.
//!
//! One expansion walks the tree from the root, picking children with
//! [`Puct`] until it reaches an uninitialized node. That node's children
//! are created for every legal move and evaluated in a single batch by an
//! [`Evaluator`]; their aggregated value is backpropagated along the path.
//! If the walk runs into a finished game instead, the game's outcome is
//! backpropagated. Values are stored from Player One's perspective inside
//! [`AverageValue`], so the same update is applied unchanged at every level
//! of the path.
//!
//! Evaluators come in two flavors: [`UniformEvaluator`] as a baseline and,
//! behind the `onnx` feature, a neural oracle running batched ONNX
//! inference ([`onnx::NeuralOracle`]).

pub mod config;
pub mod evaluation;
pub mod evaluator;
pub mod node;
pub mod puct;
pub mod search;

#[cfg(feature = "onnx")]
pub mod onnx;

pub use config::SearchConfig;
pub use evaluation::{AverageValue, StateEvaluation};
pub use evaluator::{Evaluator, EvaluatorError, UniformEvaluator};
pub use node::TreeNode;
pub use puct::{ExpansionStrategy, Puct};
pub use search::{pick_move, Search, SearchError};

#[cfg(feature = "onnx")]
pub use onnx::NeuralOracle;
