use async_trait::async_trait;

use crate::error::ModelError;

/// A text completion service: one prompt in, one response out.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, ModelError>;
}
