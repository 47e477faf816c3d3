use std::path::PathBuf;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::domain::TextEmbedder;
use crate::error::{AskError, Result};

/// Embedding models selectable by name in the configuration.
pub const SUPPORTED_MODELS: &[&str] = &[
    "all-minilm-l6-v2",
    "bge-small-en-v1.5",
    "bge-base-en-v1.5",
    "nomic-embed-text-v1.5",
];

/// Maps a configuration name onto a fastembed model.
pub fn model_from_name(name: &str) -> Option<EmbeddingModel> {
    match name.to_ascii_lowercase().as_str() {
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Some(EmbeddingModel::BGEBaseENV15),
        "nomic-embed-text-v1.5" => Some(EmbeddingModel::NomicEmbedTextV15),
        _ => None,
    }
}

/// A struct responsible for generating text embeddings using a pre-initialized model.
pub struct EmbeddingGenerator {
    model: TextEmbedding,
}

impl EmbeddingGenerator {
    /// Creates a new EmbeddingGenerator, initializing the specified embedding model.
    ///
    /// This may block while the model files are downloaded on first use.
    ///
    /// # Arguments
    ///
    /// * `model_name` - The embedding model to use (e.g., EmbeddingModel::AllMiniLML6V2).
    /// * `cache_dir` - The cache directory for the model files (None for fastembed's default).
    pub fn new(model_name: EmbeddingModel, cache_dir: Option<PathBuf>) -> Result<Self> {
        let mut opts = InitOptions::new(model_name);
        if let Some(dir) = cache_dir {
            opts = opts.with_cache_dir(dir);
        }
        let model = TextEmbedding::try_new(opts).map_err(|e| AskError::Embedding(e.to_string()))?;
        Ok(EmbeddingGenerator { model })
    }

    /// Like [`EmbeddingGenerator::new`], but takes the model by configuration name.
    pub fn from_name(name: &str, cache_dir: Option<PathBuf>) -> Result<Self> {
        let model = model_from_name(name).ok_or_else(|| {
            AskError::Embedding(format!(
                "unknown embedding model '{}', expected one of {:?}",
                name, SUPPORTED_MODELS
            ))
        })?;
        Self::new(model, cache_dir)
    }
}

impl TextEmbedder for EmbeddingGenerator {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.model
            .embed(texts.to_vec(), None)
            .map_err(|e| AskError::Embedding(e.to_string()))
    }
}
