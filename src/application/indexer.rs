use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};

use crate::domain::{Document, VectorRepository};
use crate::error::Result;

/// How the indexer treats notes (or directories) that cannot be read.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnreadablePolicy {
    /// Log a warning and carry on with the rest of the vault.
    #[default]
    Skip,
    /// Stop the build at the first unreadable entry.
    Abort,
}

/// Outcome of one index build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IndexReport {
    /// Documents upserted, duplicates included.
    pub indexed: usize,
    /// Entries skipped because they could not be read or had no text.
    pub skipped: usize,
    /// Distinct documents held by the collection afterwards.
    pub unique: usize,
}

/// Populates a collection from a stream of extracted documents in one sequential pass.
pub struct Indexer<'a> {
    collection: &'a dyn VectorRepository,
    policy: UnreadablePolicy,
}

impl<'a> Indexer<'a> {
    pub fn new(collection: &'a dyn VectorRepository, policy: UnreadablePolicy) -> Self {
        Self { collection, policy }
    }

    /// Upserts every document, keyed by its content hash.
    ///
    /// Read and traversal errors follow the configured [`UnreadablePolicy`].
    /// Embedding and store errors always end the build.
    pub async fn build<I>(&self, documents: I) -> Result<IndexReport>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        info!("Building collection '{}'...", self.collection.name());
        let mut report = IndexReport::default();

        for item in documents {
            let document = match item {
                Ok(document) => document,
                Err(e) if e.is_unreadable() && self.policy == UnreadablePolicy::Skip => {
                    warn!("Skipping unreadable entry: {}", e);
                    report.skipped += 1;
                    continue;
                }
                Err(e) => {
                    error!("Aborting index build: {}", e);
                    return Err(e);
                }
            };

            if document.text.trim().is_empty() {
                debug!("Skipping {}: no text after extraction", document.metadata.source);
                report.skipped += 1;
                continue;
            }

            debug!("Upserting {} as {}", document.metadata.source, document.id);
            self.collection.upsert(document).await?;
            report.indexed += 1;
        }

        report.unique = self.collection.len().await;
        info!(
            "Collection '{}' ready: {} documents indexed ({} unique), {} skipped",
            self.collection.name(),
            report.indexed,
            report.unique,
            report.skipped
        );
        Ok(report)
    }
}
