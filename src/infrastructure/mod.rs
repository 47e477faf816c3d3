pub mod embedding;
pub mod file_system;
pub mod llm_client;
pub mod markdown;
pub mod vector_db;

// Re-export key types for easier access from the application layer
pub use embedding::EmbeddingGenerator;
pub use file_system::{extract_documents, read_note, VaultScanner};
pub use llm_client::ChatCompletionClient;
pub use markdown::parse_markdown_to_text;
pub use vector_db::InMemoryCollection;

// Re-export EmbeddingModel directly from the dependency
pub use fastembed::EmbeddingModel;
