//! Neural oracle backed by ONNX Runtime.
//!
//! Model contract: one input tensor `input_1` of shape `[batch, 47]`
//! holding the feature layout of [`pebbles_game::GameState::encode`], and
//! two outputs: `value_output` of shape `[batch, 1]` with values in
//! `[-1, 1]`, and `policy_output` of shape `[batch, 9]` with one
//! probability row per position.
//!
//! Inference is pinned to one inter-op and one intra-op thread: throughput
//! comes from batching the freshly expanded children, not from model-level
//! parallelism.

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use ort::{session::Session, value::Value};
use tracing::{debug, info};

use pebbles_game::{NUM_FEATURES, NUM_MOVES};

use crate::evaluator::{Evaluator, EvaluatorError};
use crate::node::TreeNode;

const INPUT_NAME: &str = "input_1";
const VALUE_OUTPUT_NAME: &str = "value_output";
const POLICY_OUTPUT_NAME: &str = "policy_output";

/// Batched value/policy evaluator running a learned ONNX model.
///
/// The session sits behind a mutex because `Session::run` needs `&mut self`
/// while [`Evaluator`] takes `&self`.
pub struct NeuralOracle {
    session: Mutex<Session>,
    /// Positions evaluated so far, for periodic diagnostics.
    inference_count: AtomicU64,
}

impl std::fmt::Debug for NeuralOracle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NeuralOracle")
            .field(
                "inference_count",
                &self.inference_count.load(Ordering::Relaxed),
            )
            .finish_non_exhaustive()
    }
}

impl NeuralOracle {
    /// Loads a model from a `.onnx` file.
    pub fn load<P: AsRef<Path>>(model_path: P) -> Result<Self, EvaluatorError> {
        let session = Session::builder()
            .map_err(|e| EvaluatorError::Model(format!("failed to create session builder: {e}")))?
            .with_inter_threads(1)
            .map_err(|e| EvaluatorError::Model(format!("failed to pin inter-op threads: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| EvaluatorError::Model(format!("failed to pin intra-op threads: {e}")))?
            .commit_from_file(model_path.as_ref())
            .map_err(|e| EvaluatorError::Model(format!("failed to load model: {e}")))?;

        info!(path = %model_path.as_ref().display(), "loaded ONNX model");
        Ok(Self::from_session(session))
    }

    /// Loads a model from raw ONNX bytes, e.g. embedded in the binary.
    pub fn load_from_memory(model_data: &[u8]) -> Result<Self, EvaluatorError> {
        let session = Session::builder()
            .map_err(|e| EvaluatorError::Model(format!("failed to create session builder: {e}")))?
            .with_inter_threads(1)
            .map_err(|e| EvaluatorError::Model(format!("failed to pin inter-op threads: {e}")))?
            .with_intra_threads(1)
            .map_err(|e| EvaluatorError::Model(format!("failed to pin intra-op threads: {e}")))?
            .commit_from_memory(model_data)
            .map_err(|e| EvaluatorError::Model(format!("failed to load model from memory: {e}")))?;

        Ok(Self::from_session(session))
    }

    fn from_session(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
            inference_count: AtomicU64::new(0),
        }
    }
}

impl Evaluator for NeuralOracle {
    fn evaluate(&self, batch: &mut [&mut TreeNode]) -> Result<(), EvaluatorError> {
        if batch.is_empty() {
            return Ok(());
        }

        // Finished games keep their zeroed evaluation; only live states go
        // through the model.
        let live: Vec<usize> = (0..batch.len())
            .filter(|&i| !batch[i].state().is_game_over())
            .collect();
        if live.is_empty() {
            return Ok(());
        }

        let mut flat = Vec::with_capacity(live.len() * NUM_FEATURES);
        for &i in &live {
            flat.extend_from_slice(&batch[i].state().encode());
        }

        let input_array = ndarray::Array2::from_shape_vec((live.len(), NUM_FEATURES), flat)
            .map_err(|e| EvaluatorError::Inference(format!("failed to shape input batch: {e}")))?;
        let input_value = Value::from_array(input_array)
            .map_err(|e| EvaluatorError::Model(format!("failed to create input tensor: {e}")))?;

        let (values, policies) = {
            let mut session = self
                .session
                .lock()
                .map_err(|e| EvaluatorError::Inference(format!("failed to lock session: {e}")))?;
            let outputs = session
                .run(ort::inputs![INPUT_NAME => input_value])
                .map_err(|e| EvaluatorError::Inference(format!("inference failed: {e}")))?;

            let value_output = outputs.get(VALUE_OUTPUT_NAME).ok_or_else(|| {
                EvaluatorError::Model(format!("missing {VALUE_OUTPUT_NAME} output"))
            })?;
            let (_shape, value_data) = value_output.try_extract_tensor::<f32>().map_err(|e| {
                EvaluatorError::Model(format!("failed to extract value tensor: {e}"))
            })?;
            let values: Vec<f32> = value_data.to_vec();

            let policy_output = outputs.get(POLICY_OUTPUT_NAME).ok_or_else(|| {
                EvaluatorError::Model(format!("missing {POLICY_OUTPUT_NAME} output"))
            })?;
            let (_shape, policy_data) = policy_output.try_extract_tensor::<f32>().map_err(|e| {
                EvaluatorError::Model(format!("failed to extract policy tensor: {e}"))
            })?;
            let policies: Vec<f32> = policy_data.to_vec();

            (values, policies)
        };

        // A model returning the wrong output shape is an inference failure,
        // not a caller bug; surface it instead of indexing out of bounds.
        if values.len() != live.len() {
            return Err(EvaluatorError::Inference(format!(
                "expected {} values from {VALUE_OUTPUT_NAME}, got {}",
                live.len(),
                values.len()
            )));
        }
        if policies.len() != live.len() * NUM_MOVES {
            return Err(EvaluatorError::Inference(format!(
                "expected {} floats from {POLICY_OUTPUT_NAME}, got {}",
                live.len() * NUM_MOVES,
                policies.len()
            )));
        }

        for (row, &i) in live.iter().enumerate() {
            let evaluation = batch[i].evaluation_mut();
            evaluation.set_value(values[row]);
            evaluation
                .policy_mut()
                .copy_from_slice(&policies[row * NUM_MOVES..(row + 1) * NUM_MOVES]);
        }

        let count = self
            .inference_count
            .fetch_add(live.len() as u64, Ordering::Relaxed)
            + live.len() as u64;
        if count % 10_000 == 0 {
            debug!(positions = count, "neural oracle inference stats");
        }

        Ok(())
    }
}
