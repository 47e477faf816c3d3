use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::info;

use super::answerer::Answerer;
use super::indexer::{IndexReport, Indexer, UnreadablePolicy};
use super::retriever::Retriever;
use crate::domain::{LanguageModel, TextEmbedder, VectorRepository};
use crate::error::Result;
use crate::infrastructure::file_system::{extract_documents, VaultScanner};
use crate::infrastructure::InMemoryCollection;

/// Settings that shape one session, independent of where they were loaded from.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    pub vault_path: PathBuf,
    pub extensions: Vec<String>,
    pub on_unreadable: UnreadablePolicy,
    pub top_k: usize,
    pub max_context_chars: usize,
    pub collection_name: Option<String>,
}

impl SessionOptions {
    pub fn new(vault_path: impl Into<PathBuf>) -> Self {
        Self {
            vault_path: vault_path.into(),
            extensions: vec!["md".to_string()],
            on_unreadable: UnreadablePolicy::Skip,
            top_k: 2,
            max_context_chars: 12_000,
            collection_name: None,
        }
    }
}

impl From<&crate::config::AskConfig> for SessionOptions {
    fn from(config: &crate::config::AskConfig) -> Self {
        Self {
            vault_path: config.vault.path.clone(),
            extensions: config.vault.extensions.clone(),
            on_unreadable: config.vault.on_unreadable,
            top_k: config.retrieval.top_k,
            max_context_chars: config.retrieval.max_context_chars,
            collection_name: config.retrieval.collection_name.clone(),
        }
    }
}

/// A question-answering session over one snapshot of a vault.
///
/// Opening a session scans, extracts and indexes the whole vault into a fresh
/// collection; a value of this type is therefore always ready to answer.
/// There is no re-index: open a new session to pick up changes.
pub struct QaSession {
    vault_path: PathBuf,
    collection: Arc<dyn VectorRepository>,
    retriever: Retriever,
    answerer: Answerer,
    report: IndexReport,
}

impl QaSession {
    pub async fn open(
        options: SessionOptions,
        embedder: Arc<dyn TextEmbedder>,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self> {
        let collection = InMemoryCollection::new(options.collection_name.clone(), embedder)?;
        Self::open_with_collection(options, Arc::new(collection), model).await
    }

    /// Opens a session that indexes into the given (empty) collection.
    pub async fn open_with_collection(
        options: SessionOptions,
        collection: Arc<dyn VectorRepository>,
        model: Arc<dyn LanguageModel>,
    ) -> Result<Self> {
        info!("Opening session for vault {}", options.vault_path.display());

        let scanner = VaultScanner::new(&options.vault_path, &options.extensions)?;
        let report = Indexer::new(collection.as_ref(), options.on_unreadable)
            .build(extract_documents(scanner))
            .await?;

        Ok(Self {
            vault_path: options.vault_path,
            retriever: Retriever::new(collection.clone(), options.top_k),
            answerer: Answerer::new(model, options.max_context_chars),
            collection,
            report,
        })
    }

    /// Retrieves the most relevant notes and asks the model to answer from them.
    pub async fn ask(&self, question: &str) -> Result<String> {
        info!("Question: {}", question);
        let documents = self.retriever.query(question).await?;
        self.answerer.answer(question, &documents).await
    }

    /// The documents that `ask` would place in the prompt for this question.
    pub async fn related_documents(&self, question: &str) -> Result<Vec<String>> {
        self.retriever.query(question).await
    }

    pub fn vault_path(&self) -> &Path {
        &self.vault_path
    }

    pub fn collection(&self) -> &Arc<dyn VectorRepository> {
        &self.collection
    }

    pub fn index_report(&self) -> IndexReport {
        self.report
    }
}
