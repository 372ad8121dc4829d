// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory implementation of the persistent store contract.
//!
//! Distance is `1 - cosine(a, b)`, so lower = more similar and the
//! merge (0.5) and relevance (0.6) threshold constants behave exactly
//! as they would against a real vector store.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use engram_core::error::EngramError;
use engram_core::traits::MemoryBackend;
use engram_core::types::{MemoryCategory, MemoryKind, MemoryRecord, NearestMatch, OwnerId};
use engram_memory::cosine_similarity;

/// In-memory memory store for tests.
#[derive(Default)]
pub struct InMemoryBackend {
    records: Mutex<Vec<MemoryRecord>>,
    blobs: Mutex<HashMap<OwnerId, String>>,
    fail_writes: bool,
}

impl InMemoryBackend {
    /// Create an empty backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a backend whose write operations fail with
    /// [`EngramError::Store`].
    pub fn failing_writes() -> Self {
        Self {
            fail_writes: true,
            ..Self::default()
        }
    }

    /// Snapshot of one owner's records, insertion order.
    pub async fn records(&self, owner: &OwnerId) -> Vec<MemoryRecord> {
        self.records
            .lock()
            .await
            .iter()
            .filter(|r| &r.owner_id == owner)
            .cloned()
            .collect()
    }

    /// Total record count across all owners.
    pub async fn total_records(&self) -> usize {
        self.records.lock().await.len()
    }

    fn write_guard(&self) -> Result<(), EngramError> {
        if self.fail_writes {
            return Err(EngramError::Store {
                source: Box::new(std::io::Error::other("mock store configured to fail")),
            });
        }
        Ok(())
    }
}

fn matches_filters(
    record: &MemoryRecord,
    kind: Option<MemoryKind>,
    category: Option<MemoryCategory>,
) -> bool {
    if let Some(k) = kind
        && record.kind != k
    {
        return false;
    }
    if let Some(c) = category
        && record.category != Some(c)
    {
        return false;
    }
    true
}

#[async_trait]
impl MemoryBackend for InMemoryBackend {
    async fn find_nearest(
        &self,
        owner: &OwnerId,
        query: &[f32],
        k: usize,
        kind: Option<MemoryKind>,
        category: Option<MemoryCategory>,
    ) -> Result<Vec<NearestMatch>, EngramError> {
        let records = self.records.lock().await;
        let mut matches: Vec<NearestMatch> = records
            .iter()
            .filter(|r| &r.owner_id == owner && !r.embedding.is_empty())
            .filter(|r| matches_filters(r, kind, category))
            .map(|r| NearestMatch {
                record: r.clone(),
                distance: f64::from(1.0 - cosine_similarity(query, &r.embedding)),
            })
            .collect();
        matches.sort_by(|a, b| {
            a.distance
                .partial_cmp(&b.distance)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        matches.truncate(k);
        Ok(matches)
    }

    async fn insert(&self, record: &MemoryRecord) -> Result<(), EngramError> {
        self.write_guard()?;
        self.records.lock().await.push(record.clone());
        Ok(())
    }

    async fn overwrite(
        &self,
        id: &str,
        text: &str,
        embedding: &[f32],
        updated_at: &str,
    ) -> Result<(), EngramError> {
        self.write_guard()?;
        let mut records = self.records.lock().await;
        let record = records.iter_mut().find(|r| r.id == id).ok_or_else(|| {
            EngramError::Store {
                source: Box::new(std::io::Error::other(format!("no record with id {id}"))),
            }
        })?;
        record.text = text.to_string();
        record.embedding = embedding.to_vec();
        record.updated_at = updated_at.to_string();
        Ok(())
    }

    async fn get_all(
        &self,
        owner: &OwnerId,
        kind: Option<MemoryKind>,
        category: Option<MemoryCategory>,
    ) -> Result<Vec<MemoryRecord>, EngramError> {
        Ok(self
            .records
            .lock()
            .await
            .iter()
            .filter(|r| &r.owner_id == owner)
            .filter(|r| matches_filters(r, kind, category))
            .cloned()
            .collect())
    }

    async fn set_combined_blob(&self, owner: &OwnerId, blob: &str) -> Result<(), EngramError> {
        self.write_guard()?;
        self.blobs
            .lock()
            .await
            .insert(owner.clone(), blob.to_string());
        Ok(())
    }

    async fn combined_blob(&self, owner: &OwnerId) -> Result<Option<String>, EngramError> {
        Ok(self.blobs.lock().await.get(owner).cloned())
    }
}
