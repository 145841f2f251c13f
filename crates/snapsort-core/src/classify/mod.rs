//! Zero-shot image classification against a category table.
//!
//! This module wraps a CLIP dual encoder running locally via ONNX Runtime.
//! One call scores a single image against every category prompt in a single
//! batched forward pass, applies a softmax over the resulting logits, and
//! returns the best-scoring category with its softmax value as confidence.
//!
//! # Usage
//!
//! ```rust,ignore
//! use snapsort_core::classify::{Classifier, ClipClassifier};
//! use snapsort_core::{CategoryTable, Config};
//!
//! let config = Config::load()?;
//! let classifier = ClipClassifier::load(&config.model, &config.model_dir())?;
//! let table = CategoryTable::builtin();
//! let result = classifier.classify(&image, &table, path)?;
//! println!("{} ({:.2}%)", result.category_id, result.confidence * 100.0);
//! ```

pub(crate) mod clip;
pub(crate) mod preprocess;

use std::path::Path;

use image::DynamicImage;

use crate::category::CategoryTable;
use crate::config::ModelConfig;
use crate::error::ItemError;
use crate::math::{argmax_first, softmax};

use self::clip::{ClipSession, TextBatch};
use self::preprocess::preprocess;

/// Best-category decision for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    /// Id of the winning category (an entry of the table that was scored).
    pub category_id: String,

    /// Softmax value of the winning category, in [0, 1]. Measures relative
    /// preference within the fixed category set, not calibrated probability.
    pub confidence: f32,
}

/// The classification seam: one image in, one best-category decision out.
///
/// The pipeline depends on this trait rather than the CLIP implementation so
/// tests can inject deterministic stubs.
pub trait Classifier: Send + Sync {
    /// Score `image` against every prompt in `table` and return the winner.
    ///
    /// `path` is carried for error context only.
    fn classify(
        &self,
        image: &DynamicImage,
        table: &CategoryTable,
        path: &Path,
    ) -> Result<Classification, ItemError>;
}

/// Production classifier backed by a local CLIP ONNX model.
pub struct ClipClassifier {
    session: ClipSession,
    tokenizer: tokenizers::Tokenizer,
    image_size: u32,
    max_prompt_tokens: usize,
}

impl ClipClassifier {
    /// Load the CLIP model and tokenizer from the model directory.
    ///
    /// Expects `model.onnx` and `tokenizer.json` under
    /// `{model_dir}/{config.model}/`.
    pub fn load(config: &ModelConfig, model_dir: &Path) -> Result<Self, ItemError> {
        let model_path = clip::model_path(model_dir, &config.model);
        let tokenizer_path = clip::tokenizer_path(model_dir, &config.model);

        if !model_path.exists() {
            return Err(ItemError::Model {
                message: format!(
                    "Model not found at {model_path:?}. \
                     Place a CLIP ONNX export there and retry."
                ),
            });
        }
        if !tokenizer_path.exists() {
            return Err(ItemError::Model {
                message: format!("Tokenizer not found at {tokenizer_path:?}"),
            });
        }

        tracing::info!("Loading CLIP model from {:?}", model_path);
        let session = ClipSession::load(&model_path)?;
        let tokenizer =
            tokenizers::Tokenizer::from_file(&tokenizer_path).map_err(|e| ItemError::Model {
                message: format!("Failed to load tokenizer: {e}"),
            })?;
        tracing::info!("CLIP model loaded successfully");

        Ok(Self {
            session,
            tokenizer,
            image_size: config.image_size,
            max_prompt_tokens: config.max_prompt_tokens,
        })
    }

    /// Get the image input size for this model.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Check whether the model files exist on disk.
    pub fn model_exists(config: &ModelConfig, model_dir: &Path) -> bool {
        clip::model_path(model_dir, &config.model).exists()
            && clip::tokenizer_path(model_dir, &config.model).exists()
    }

    /// Tokenize every prompt in table order into one padded batch.
    fn tokenize_prompts(
        &self,
        prompts: &[String],
        path: &Path,
    ) -> Result<TextBatch, ItemError> {
        let encodings = self
            .tokenizer
            .encode_batch(prompts.to_vec(), true)
            .map_err(|e| ItemError::Inference {
                path: path.to_path_buf(),
                message: format!("Tokenization failed: {e}"),
            })?;

        let seq_len = self.max_prompt_tokens;
        let batch = encodings.len();
        let mut input_ids = Vec::with_capacity(batch * seq_len);
        let mut attention_mask = Vec::with_capacity(batch * seq_len);
        for encoding in &encodings {
            let (ids, mask) = clip::pad_to(encoding.get_ids(), seq_len);
            input_ids.extend(ids);
            attention_mask.extend(mask);
        }

        Ok(TextBatch {
            input_ids,
            attention_mask,
            batch,
            seq_len,
        })
    }
}

impl Classifier for ClipClassifier {
    fn classify(
        &self,
        image: &DynamicImage,
        table: &CategoryTable,
        path: &Path,
    ) -> Result<Classification, ItemError> {
        let pixel_values = preprocess(image, self.image_size);
        let text = self.tokenize_prompts(&table.prompt_list(), path)?;
        let logits = self.session.logits_per_image(&pixel_values, &text, path)?;
        let probs = softmax(&logits);
        select_best(table, &probs).ok_or_else(|| ItemError::Inference {
            path: path.to_path_buf(),
            message: "Model returned no scores".to_string(),
        })
    }
}

/// Map a softmax distribution back to the winning table entry.
///
/// `probs[i]` must correspond to `table.entries()[i]`; on exact ties the
/// earlier entry wins, which makes table order semantically significant.
pub fn select_best(table: &CategoryTable, probs: &[f32]) -> Option<Classification> {
    let idx = argmax_first(probs)?;
    let entry = table.entries().get(idx)?;
    Some(Classification {
        category_id: entry.id.clone(),
        confidence: probs[idx],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category::{CategoryEntry, CategoryTable};

    fn two_categories() -> CategoryTable {
        CategoryTable::new(vec![
            CategoryEntry::new("طعام", "a photo of food"),
            CategoryEntry::new("حيوانات", "a photo of an animal"),
        ])
        .unwrap()
    }

    #[test]
    fn test_select_best_picks_highest() {
        let table = two_categories();
        let result = select_best(&table, &[0.3, 0.7]).unwrap();
        assert_eq!(result.category_id, "حيوانات");
        assert!((result.confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_select_best_tie_prefers_earlier_entry() {
        let table = two_categories();
        let result = select_best(&table, &[0.5, 0.5]).unwrap();
        assert_eq!(result.category_id, "طعام");
    }

    #[test]
    fn test_select_best_uniform_over_builtin_table() {
        // All eight scores exactly equal: the first configured category wins.
        let table = CategoryTable::builtin();
        let probs = vec![0.125f32; 8];
        let result = select_best(&table, &probs).unwrap();
        assert_eq!(result.category_id, "أشخاص");
    }

    #[test]
    fn test_select_best_empty_scores() {
        let table = two_categories();
        assert!(select_best(&table, &[]).is_none());
    }
}
