use crate::error::Result;

/// Turns text into fixed-length vectors for similarity search.
pub trait TextEmbedder: Send + Sync {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;
}
