#![allow(dead_code)]

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::path::Path;

use vault_ask::error::Result;
use vault_ask::TextEmbedder;

const DIMENSIONS: usize = 256;

/// Deterministic bag-of-words embedder so tests never download a model.
pub struct BagOfWordsEmbedder;

impl TextEmbedder for BagOfWordsEmbedder {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| bag_of_words(text)).collect())
    }
}

fn bag_of_words(text: &str) -> Vec<f32> {
    let mut vector = vec![0.0; DIMENSIONS];
    for token in text
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
    {
        let mut hasher = DefaultHasher::new();
        token.hash(&mut hasher);
        vector[(hasher.finish() as usize) % DIMENSIONS] += 1.0;
    }
    vector
}

/// Writes `(relative path, contents)` pairs under `root`, creating directories as needed.
pub fn write_vault(root: &Path, notes: &[(&str, &str)]) {
    for (relative, contents) in notes {
        let path = root.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, contents).unwrap();
    }
}
