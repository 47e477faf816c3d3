use std::sync::Arc;

use log::info;

use crate::domain::{QueryHit, VectorRepository};
use crate::error::Result;

/// Finds the notes most similar to a question.
pub struct Retriever {
    collection: Arc<dyn VectorRepository>,
    top_k: usize,
}

impl Retriever {
    pub fn new(collection: Arc<dyn VectorRepository>, top_k: usize) -> Self {
        Self { collection, top_k }
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    /// Returns the stored text of at most `top_k` documents, most similar first.
    pub async fn query(&self, text: &str) -> Result<Vec<String>> {
        Ok(self.query_hits(text).await?.into_iter().map(|hit| hit.text).collect())
    }

    /// Like [`Retriever::query`], but keeps ids, scores and source metadata.
    pub async fn query_hits(&self, text: &str) -> Result<Vec<QueryHit>> {
        let hits = self.collection.query(text, self.top_k).await?;
        info!("Retrieved {} related documents (top_k = {})", hits.len(), self.top_k);
        for hit in &hits {
            log::debug!("  {:.4} {}", hit.score, hit.metadata.source);
        }
        Ok(hits)
    }
}
