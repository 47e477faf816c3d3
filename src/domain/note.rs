use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A raw note as read from the vault. Identity is the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub path: PathBuf,
    pub content: String,
}

// Metadata stored alongside each document in the collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub source: String,
    pub hash: String,
}

/// The plain-text, embeddable form of a note.
///
/// `id` is the content hash of `text`, so identical text always maps to the
/// same identifier regardless of which note it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub text: String,
    pub metadata: DocumentMetadata,
}

impl Document {
    pub fn new(source: impl Into<String>, text: impl Into<String>) -> Self {
        let text = text.into();
        let hash = content_hash(&text);
        Self {
            id: hash.clone(),
            text,
            metadata: DocumentMetadata {
                source: source.into(),
                hash,
            },
        }
    }
}

/// Lowercase hex SHA-256 of the text.
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}
