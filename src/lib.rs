pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;

/// Re-export the items main.rs and the integration tests reach for
pub use application::{QaSession, SessionOptions, UnreadablePolicy};
pub use config::{load_config, AskConfig};
pub use domain::{Document, LanguageModel, TextEmbedder, VectorRepository};
pub use error::{AskError, ModelError};
pub use infrastructure::{ChatCompletionClient, EmbeddingGenerator, InMemoryCollection};
