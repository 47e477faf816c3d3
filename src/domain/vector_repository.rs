use async_trait::async_trait;

use crate::domain::note::{Document, DocumentMetadata};
use crate::error::Result;

/// A single ranked match returned by a collection query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryHit {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
    pub score: f32, // cosine similarity, higher is closer
}

#[async_trait]
pub trait VectorRepository: Send + Sync {
    /// Name of the collection this repository writes to.
    fn name(&self) -> &str;

    /// Inserts the document, replacing any existing entry with the same id.
    async fn upsert(&self, document: Document) -> Result<()>;

    /// Returns at most `k` documents ranked by similarity to `text`, most similar first.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<QueryHit>>;

    async fn len(&self) -> usize;

    async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
