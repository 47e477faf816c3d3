pub mod embedder;
pub mod language_model;
pub mod note;
pub mod vector_repository;

pub use embedder::TextEmbedder;
pub use language_model::LanguageModel;
pub use note::{content_hash, Document, DocumentMetadata, Note};
pub use vector_repository::{QueryHit, VectorRepository};
