//! CLIP ONNX model session management and inference.
//!
//! Loads a CLIP dual encoder exported to ONNX format and runs the joint
//! image/text forward pass that produces per-prompt similarity logits.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use ndarray::Array4;
use ort::session::Session;
use ort::value::Value;

use crate::error::ItemError;

/// Output tensor holding one similarity logit per text prompt.
const LOGITS_OUTPUT: &str = "logits_per_image";

/// Wraps an ONNX Runtime session for the CLIP dual encoder.
///
/// Uses a `Mutex` because `Session::run` requires `&mut self`. No state is
/// mutated by inference; calls are independent.
pub struct ClipSession {
    session: Mutex<Session>,
}

/// Tokenized prompts padded to a fixed sequence length.
///
/// Both vectors are flat `[batch * seq_len]` row-major buffers.
pub struct TextBatch {
    pub input_ids: Vec<i64>,
    pub attention_mask: Vec<i64>,
    pub batch: usize,
    pub seq_len: usize,
}

impl ClipSession {
    /// Load a CLIP dual encoder from an ONNX file.
    pub fn load(model_path: &Path) -> Result<Self, ItemError> {
        let session = Session::builder()
            .map_err(|e| ItemError::Model {
                message: format!("Failed to create ONNX session builder: {e}"),
            })?
            .commit_from_file(model_path)
            .map_err(|e| ItemError::Model {
                message: format!("Failed to load ONNX model from {model_path:?}: {e}"),
            })?;

        tracing::debug!(
            "Loaded CLIP model from {:?} (inputs: {:?}, outputs: {:?})",
            model_path,
            session
                .inputs()
                .iter()
                .map(|i| i.name())
                .collect::<Vec<_>>(),
            session
                .outputs()
                .iter()
                .map(|o| o.name())
                .collect::<Vec<_>>()
        );

        Ok(Self {
            session: Mutex::new(session),
        })
    }

    /// Run the joint forward pass: one image against every prompt at once.
    ///
    /// Batching all prompts into a single call is required so the logits are
    /// comparable under one softmax. Returns the raw logits row for the
    /// image, one value per prompt in input order.
    pub fn logits_per_image(
        &self,
        pixel_values: &Array4<f32>,
        text: &TextBatch,
        path: &Path,
    ) -> Result<Vec<f32>, ItemError> {
        let inference = |message: String| ItemError::Inference {
            path: path.to_path_buf(),
            message,
        };

        // Convert ndarray to (shape, flat_data) for ort.
        let image_shape: Vec<i64> = pixel_values.shape().iter().map(|&d| d as i64).collect();
        let image_data: Vec<f32> = pixel_values.iter().copied().collect();
        let pixel_input = Value::from_array((image_shape, image_data))
            .map_err(|e| inference(format!("Failed to create pixel_values tensor: {e}")))?;

        let text_shape = vec![text.batch as i64, text.seq_len as i64];
        let ids_input = Value::from_array((text_shape.clone(), text.input_ids.clone()))
            .map_err(|e| inference(format!("Failed to create input_ids tensor: {e}")))?;
        let mask_input = Value::from_array((text_shape, text.attention_mask.clone()))
            .map_err(|e| inference(format!("Failed to create attention_mask tensor: {e}")))?;

        let inputs = ort::inputs![
            "input_ids" => ids_input,
            "pixel_values" => pixel_input,
            "attention_mask" => mask_input
        ];

        let mut session = self
            .session
            .lock()
            .map_err(|e| inference(format!("Session lock poisoned: {e}")))?;

        let outputs = session
            .run(inputs)
            .map_err(|e| inference(format!("ONNX inference failed: {e}")))?;

        // Prefer logits_per_image by name; fall back to the first output for
        // exports that rename it.
        let logits_value = outputs
            .iter()
            .find(|(name, _)| *name == LOGITS_OUTPUT)
            .map(|(_, v)| v)
            .or_else(|| outputs.values().next())
            .ok_or_else(|| inference("Model produced no outputs".to_string()))?;

        let (shape, data) = logits_value
            .try_extract_tensor::<f32>()
            .map_err(|e| inference(format!("Failed to extract logits tensor: {e}")))?;

        // logits_per_image is [1, N] — take the single row.
        let row = match shape.len() {
            1 => data.to_vec(),
            2 => data[..shape[1] as usize].to_vec(),
            _ => {
                return Err(inference(format!(
                    "Unexpected logits_per_image shape: {shape:?}"
                )));
            }
        };

        if row.len() != text.batch {
            return Err(inference(format!(
                "Expected {} logits, model returned {}",
                text.batch,
                row.len()
            )));
        }

        Ok(row)
    }
}

/// Pad or truncate one encoding's token ids to `seq_len`.
///
/// Returns `(input_ids, attention_mask)` with zeros past the real tokens.
pub fn pad_to(ids: &[u32], seq_len: usize) -> (Vec<i64>, Vec<i64>) {
    let mut input_ids = vec![0i64; seq_len];
    let mut attention_mask = vec![0i64; seq_len];
    for (j, &id) in ids.iter().take(seq_len).enumerate() {
        input_ids[j] = id as i64;
        attention_mask[j] = 1;
    }
    (input_ids, attention_mask)
}

/// Expected model file path for a named model under the model directory.
pub fn model_path(model_dir: &Path, model: &str) -> PathBuf {
    model_dir.join(model).join("model.onnx")
}

/// Expected tokenizer file path for a named model under the model directory.
pub fn tokenizer_path(model_dir: &Path, model: &str) -> PathBuf {
    model_dir.join(model).join("tokenizer.json")
}
