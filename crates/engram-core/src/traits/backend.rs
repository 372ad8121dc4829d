// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistent record store contract.
//!
//! The store itself is an external collaborator; Engram only depends on
//! this narrow read/write/query-by-similarity surface.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::types::{MemoryCategory, MemoryKind, MemoryRecord, NearestMatch, OwnerId};

/// Read/write contract for the persistent memory store.
///
/// Distance semantics must be consistent across calls: lower = more
/// similar. The coordinator's merge threshold (0.5) and the retriever's
/// relevance threshold (0.6) are meaningless otherwise.
#[async_trait]
pub trait MemoryBackend: Send + Sync {
    /// Returns the `k` nearest records for `owner` by vector distance,
    /// closest first, optionally filtered by kind and category.
    async fn find_nearest(
        &self,
        owner: &OwnerId,
        query: &[f32],
        k: usize,
        kind: Option<MemoryKind>,
        category: Option<MemoryCategory>,
    ) -> Result<Vec<NearestMatch>, EngramError>;

    /// Inserts a new record.
    async fn insert(&self, record: &MemoryRecord) -> Result<(), EngramError>;

    /// Overwrites an existing record's text and embedding in place,
    /// preserving its identity slot. This is the merge operation.
    async fn overwrite(
        &self,
        id: &str,
        text: &str,
        embedding: &[f32],
        updated_at: &str,
    ) -> Result<(), EngramError>;

    /// Returns all of an owner's records, optionally filtered by kind
    /// and category.
    async fn get_all(
        &self,
        owner: &OwnerId,
        kind: Option<MemoryKind>,
        category: Option<MemoryCategory>,
    ) -> Result<Vec<MemoryRecord>, EngramError>;

    /// Replaces the owner's denormalized combined-memory blob.
    async fn set_combined_blob(&self, owner: &OwnerId, blob: &str) -> Result<(), EngramError>;

    /// Returns the owner's combined-memory blob, if any.
    async fn combined_blob(&self, owner: &OwnerId) -> Result<Option<String>, EngramError>;
}
