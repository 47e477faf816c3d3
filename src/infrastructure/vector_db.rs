use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::{Document, DocumentMetadata, QueryHit, TextEmbedder, VectorRepository};
use crate::error::{AskError, Result};

struct StoredDocument {
    text: String,
    metadata: DocumentMetadata,
    vector: Vec<f32>,
}

/// An ephemeral, process-local collection searched by brute-force cosine similarity.
///
/// Text is embedded on upsert and on query with the injected embedder. Entries
/// are keyed by document id; upserting an existing id replaces the entry.
pub struct InMemoryCollection {
    name: String,
    embedder: Arc<dyn TextEmbedder>,
    documents: RwLock<HashMap<String, StoredDocument>>,
}

impl InMemoryCollection {
    /// Creates an empty collection.
    ///
    /// # Arguments
    ///
    /// * `name` - The collection name. A random one is generated when `None`.
    /// * `embedder` - Used to embed documents and queries.
    pub fn new(name: Option<String>, embedder: Arc<dyn TextEmbedder>) -> Result<Self> {
        let name = name.unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        if name.trim().is_empty() {
            return Err(AskError::Store("Collection name cannot be empty".into()));
        }
        log::debug!("Created collection '{}'", name);
        Ok(Self {
            name,
            embedder,
            documents: RwLock::new(HashMap::new()),
        })
    }

    /// Identifiers of all stored documents, sorted.
    pub async fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.documents.read().await.keys().cloned().collect();
        ids.sort();
        ids
    }

    fn embed_one(&self, text: &str) -> Result<Vec<f32>> {
        self.embedder
            .embed(&[text])?
            .pop()
            .ok_or_else(|| AskError::Embedding(format!("no embedding returned for '{}'", preview(text))))
    }
}

#[async_trait]
impl VectorRepository for InMemoryCollection {
    fn name(&self) -> &str {
        &self.name
    }

    async fn upsert(&self, document: Document) -> Result<()> {
        let vector = self.embed_one(&document.text)?;
        let mut documents = self.documents.write().await;
        if let Some(existing) = documents.values().next() {
            if existing.vector.len() != vector.len() {
                return Err(AskError::Store(format!(
                    "Vector dimension ({}) does not match collection dimension ({})",
                    vector.len(),
                    existing.vector.len()
                )));
            }
        }
        let replaced = documents
            .insert(
                document.id,
                StoredDocument {
                    text: document.text,
                    metadata: document.metadata,
                    vector,
                },
            )
            .is_some();
        if replaced {
            log::debug!("Replaced existing entry in collection '{}'", self.name);
        }
        Ok(())
    }

    async fn query(&self, text: &str, k: usize) -> Result<Vec<QueryHit>> {
        if k == 0 || self.documents.read().await.is_empty() {
            return Ok(Vec::new());
        }
        let query_vector = self.embed_one(text)?;
        let documents = self.documents.read().await;

        let mut hits: Vec<QueryHit> = documents
            .iter()
            .map(|(id, doc)| QueryHit {
                id: id.clone(),
                text: doc.text.clone(),
                metadata: doc.metadata.clone(),
                score: cosine_similarity(&query_vector, &doc.vector),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);

        log::debug!(
            "Query '{}' against '{}' returned {} hits",
            preview(text),
            self.name,
            hits.len()
        );
        Ok(hits)
    }

    async fn len(&self) -> usize {
        self.documents.read().await.len()
    }
}

/// Cosine similarity in `[-1.0, 1.0]`; `0.0` for empty, mismatched or zero vectors.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }
    let denom = norm_a.sqrt() * norm_b.sqrt();
    if denom < f32::EPSILON {
        0.0
    } else {
        dot / denom
    }
}

fn preview(text: &str) -> String {
    text.chars().take(40).collect()
}
