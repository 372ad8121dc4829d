// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Merge-vs-insert coordination for new memory text.
//!
//! New text is embedded (through the cache) and compared against the
//! owner's nearest existing record. Below the merge threshold the
//! existing record is overwritten in place (newest text wins); otherwise
//! a new record is inserted. Embedding failure degrades to a plain
//! insert so user input is never silently dropped.

use std::sync::Arc;

use engram_config::model::MemoryConfig;
use engram_core::error::EngramError;
use engram_core::traits::{EmbeddingAdapter, MemoryBackend};
use engram_core::types::{MemoryCategory, MemoryKind, MemoryRecord, OwnerId, UpsertOutcome};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::cache::EmbeddingCache;

/// Decides merge-vs-insert and issues read/write calls to the store.
pub struct MemoryCoordinator {
    backend: Arc<dyn MemoryBackend>,
    embedder: Arc<dyn EmbeddingAdapter>,
    cache: Arc<EmbeddingCache>,
    config: MemoryConfig,
}

impl MemoryCoordinator {
    /// Creates a new coordinator.
    pub fn new(
        backend: Arc<dyn MemoryBackend>,
        embedder: Arc<dyn EmbeddingAdapter>,
        cache: Arc<EmbeddingCache>,
        config: MemoryConfig,
    ) -> Self {
        Self {
            backend,
            embedder,
            cache,
            config,
        }
    }

    /// Store `text` for `owner`, merging into the nearest existing record
    /// when its distance is below the merge threshold.
    pub async fn upsert_memory(
        &self,
        owner: &OwnerId,
        text: &str,
        kind: MemoryKind,
    ) -> Result<UpsertOutcome, EngramError> {
        self.upsert_with_category(owner, text, kind, None).await
    }

    /// Store `text` with an optional category.
    ///
    /// A merge is a full overwrite of the matched record: the newest text
    /// and embedding replace the old ones while the record's identity
    /// slot (and creation time) survive. There is no field-level merging.
    pub async fn upsert_with_category(
        &self,
        owner: &OwnerId,
        text: &str,
        kind: MemoryKind,
        category: Option<MemoryCategory>,
    ) -> Result<UpsertOutcome, EngramError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(EngramError::Validation(
                "memory text must not be empty".into(),
            ));
        }

        let embedding = match self.cache.get_or_embed(self.embedder.as_ref(), text).await {
            Ok(vector) => Some(vector),
            Err(e) => {
                // Degrade, never drop user input: insert the raw text
                // without a vector. It stays reachable via the fuzzy
                // fallback path.
                warn!(
                    owner_id = %owner,
                    error = %e,
                    "embedding unavailable, inserting memory without vector"
                );
                None
            }
        };

        let outcome = match embedding {
            Some(vector) => {
                let nearest = self
                    .backend
                    .find_nearest(owner, &vector, 1, None, None)
                    .await?;

                match nearest.first() {
                    Some(candidate)
                        if candidate.distance < self.config.merge_distance_threshold =>
                    {
                        let now = chrono::Utc::now().to_rfc3339();
                        self.backend
                            .overwrite(&candidate.record.id, text, &vector, &now)
                            .await?;
                        metrics::counter!("engram_memory_merges_total").increment(1);
                        debug!(
                            owner_id = %owner,
                            record_id = %candidate.record.id,
                            distance = candidate.distance,
                            "merged memory into existing record"
                        );
                        UpsertOutcome {
                            merged: true,
                            final_text: text.to_string(),
                        }
                    }
                    _ => {
                        self.insert_new(owner, text, (*vector).clone(), kind, category)
                            .await?
                    }
                }
            }
            None => {
                self.insert_new(owner, text, Vec::new(), kind, category)
                    .await?
            }
        };

        // Keep the denormalized prompt blob in sync with the record set.
        self.refresh_combined_blob(owner).await?;

        Ok(outcome)
    }

    async fn insert_new(
        &self,
        owner: &OwnerId,
        text: &str,
        embedding: Vec<f32>,
        kind: MemoryKind,
        category: Option<MemoryCategory>,
    ) -> Result<UpsertOutcome, EngramError> {
        let now = chrono::Utc::now().to_rfc3339();
        let record = MemoryRecord {
            id: Uuid::new_v4().to_string(),
            owner_id: owner.clone(),
            text: text.to_string(),
            embedding,
            kind,
            category,
            confidence: kind.default_confidence(),
            created_at: now.clone(),
            updated_at: now,
        };
        self.backend.insert(&record).await?;
        metrics::counter!("engram_memory_inserts_total").increment(1);
        debug!(owner_id = %owner, record_id = %record.id, kind = kind.as_str(), "inserted new memory");
        Ok(UpsertOutcome {
            merged: false,
            final_text: text.to_string(),
        })
    }

    /// Rebuild the owner's combined-memory blob from the canonical
    /// record set (newline-joined texts, insertion order).
    async fn refresh_combined_blob(&self, owner: &OwnerId) -> Result<(), EngramError> {
        let records = self.backend.get_all(owner, None, None).await?;
        let blob = records
            .iter()
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        self.backend.set_combined_blob(owner, &blob).await
    }
}
