//! BERT token-classification model for PERSON/ORG spans.
//!
//! Expects a Hugging Face token-classification checkpoint: `config.json` with
//! an `id2label` map, `tokenizer.json`, and `model.safetensors` holding
//! `bert.*` encoder weights plus a `classifier` linear head
//! (`dslim/bert-base-NER` by default).

use crate::error::{Result, ResumeExtractorError};
use crate::processing::entities::{bio_spans, Entity, EntityRecognizer};
use candle_core::{DType, Device, Tensor, D};
use candle_nn::{linear, Linear, Module, VarBuilder};
use candle_transformers::models::bert::{BertModel, Config as BertConfig};
use log::{debug, info, warn};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::{Tokenizer, TruncationParams};

pub const DEFAULT_NER_REPO: &str = "dslim/bert-base-NER";

/// Local model directory or Hugging Face repo id
pub const NER_MODEL_ENV: &str = "RESUME_EXTRACTOR_NER_MODEL";

const CONFIG_FILE: &str = "config.json";
const TOKENIZER_FILE: &str = "tokenizer.json";
const WEIGHTS_FILE: &str = "model.safetensors";

/// Fields of `config.json` the classification head needs
#[derive(Debug, Deserialize)]
struct HeadConfig {
    hidden_size: usize,
    max_position_embeddings: usize,
    id2label: HashMap<String, String>,
}

pub struct BertEntityRecognizer {
    model: BertModel,
    classifier: Linear,
    tokenizer: Tokenizer,
    labels: Vec<String>,
    device: Device,
}

impl BertEntityRecognizer {
    /// Model from `RESUME_EXTRACTOR_NER_MODEL`, or the default repo
    pub fn from_env() -> Result<Self> {
        let source = std::env::var(NER_MODEL_ENV).unwrap_or_else(|_| DEFAULT_NER_REPO.to_string());
        let local = PathBuf::from(&source);
        if local.is_dir() {
            Self::load(&local)
        } else {
            Self::from_hub(&source)
        }
    }

    /// Download (or reuse the cached copy of) a checkpoint from the hub
    pub fn from_hub(repo_id: &str) -> Result<Self> {
        info!("Fetching entity model {}", repo_id);
        let api = hf_hub::api::sync::Api::new().map_err(loading_error)?;
        let repo = api.model(repo_id.to_string());

        let config_path = repo.get(CONFIG_FILE).map_err(loading_error)?;
        repo.get(TOKENIZER_FILE).map_err(loading_error)?;
        repo.get(WEIGHTS_FILE).map_err(loading_error)?;

        // Files of one revision share a snapshot directory
        let snapshot = config_path
            .parent()
            .ok_or_else(|| ResumeExtractorError::ModelLoading(format!("No snapshot directory for {}", repo_id)))?;
        Self::load(snapshot)
    }

    pub fn load(model_dir: &Path) -> Result<Self> {
        info!("Loading entity model from {}", model_dir.display());
        let device = best_device();

        let config_text = std::fs::read_to_string(model_dir.join(CONFIG_FILE))?;
        let bert_config: BertConfig = serde_json::from_str(&config_text)?;
        let head: HeadConfig = serde_json::from_str(&config_text)?;
        let labels = ordered_labels(&head.id2label)?;

        let mut tokenizer = Tokenizer::from_file(model_dir.join(TOKENIZER_FILE)).map_err(loading_error)?;
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: head.max_position_embeddings,
                ..Default::default()
            }))
            .map_err(loading_error)?;
        tokenizer.with_padding(None);

        let tensors = candle_core::safetensors::load(model_dir.join(WEIGHTS_FILE), &device)?;
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);

        let model = BertModel::load(vb.pp("bert"), &bert_config)?;
        let classifier = linear(head.hidden_size, labels.len(), vb.pp("classifier"))?;

        debug!("Entity model labels: {:?}", labels);
        Ok(Self {
            model,
            classifier,
            tokenizer,
            labels,
            device,
        })
    }

    fn tag(&self, text: &str) -> Result<Vec<Entity>> {
        let encoding = self.tokenizer.encode(text, true).map_err(model_error)?;

        let input_ids = Tensor::new(encoding.get_ids(), &self.device)?.unsqueeze(0)?;
        let token_type_ids = input_ids.zeros_like()?;
        let attention_mask = Tensor::new(encoding.get_attention_mask(), &self.device)?.unsqueeze(0)?;

        let hidden = self.model.forward(&input_ids, &token_type_ids, Some(&attention_mask))?;
        let logits = self.classifier.forward(&hidden)?;
        let predictions: Vec<u32> = logits.squeeze(0)?.argmax(D::Minus1)?.to_vec1()?;

        let tags: Vec<&str> = predictions
            .iter()
            .map(|&id| self.labels.get(id as usize).map_or("O", String::as_str))
            .collect();
        Ok(bio_spans(text, encoding.get_offsets(), &tags))
    }
}

impl EntityRecognizer for BertEntityRecognizer {
    fn entities(&self, text: &str) -> Vec<Entity> {
        match self.tag(text) {
            Ok(entities) => entities,
            Err(e) => {
                warn!("Entity model failed on {} characters of text: {}", text.len(), e);
                Vec::new()
            }
        }
    }
}

/// GPU when a backend is compiled in and available, CPU otherwise
fn best_device() -> Device {
    #[cfg(feature = "cuda")]
    {
        if let Ok(device) = Device::new_cuda(0) {
            info!("Entity model on CUDA");
            return device;
        }
    }

    #[cfg(feature = "metal")]
    {
        if let Ok(device) = Device::new_metal(0) {
            info!("Entity model on Metal");
            return device;
        }
    }

    Device::Cpu
}

/// `id2label` keyed by stringified ids, as a dense id-indexed list
fn ordered_labels(id2label: &HashMap<String, String>) -> Result<Vec<String>> {
    let mut labels = vec![None; id2label.len()];
    for (id, label) in id2label {
        let slot = id
            .parse::<usize>()
            .ok()
            .and_then(|idx| labels.get_mut(idx))
            .ok_or_else(|| ResumeExtractorError::ModelLoading(format!("Label id '{}' out of range", id)))?;
        *slot = Some(label.clone());
    }
    labels
        .into_iter()
        .collect::<Option<Vec<_>>>()
        .filter(|labels| !labels.is_empty())
        .ok_or_else(|| ResumeExtractorError::ModelLoading("Model config has no usable id2label map".to_string()))
}

fn loading_error(err: impl std::fmt::Display) -> ResumeExtractorError {
    ResumeExtractorError::ModelLoading(err.to_string())
}

fn model_error(err: impl std::fmt::Display) -> ResumeExtractorError {
    ResumeExtractorError::ModelError(err.to_string())
}
