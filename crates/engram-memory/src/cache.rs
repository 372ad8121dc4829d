// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide embedding cache keyed by normalized text.
//!
//! Avoids redundant calls to the embedding provider: identical text (after
//! normalization) reuses the previously computed vector. The cache is
//! never evicted automatically; `clear` exists for operators and `len`
//! exposes growth. Bounding it (LRU) is future work.

use std::sync::Arc;

use dashmap::DashMap;
use engram_core::error::EngramError;
use engram_core::traits::EmbeddingAdapter;
use engram_text::normalize;
use tracing::debug;

/// Shared, read-mostly map of normalized text to embedding vectors.
///
/// Concurrent misses for the same key may each call the provider; both
/// store the same value, so last-write-wins is harmless here.
#[derive(Default)]
pub struct EmbeddingCache {
    entries: DashMap<String, Arc<Vec<f32>>>,
}

impl EmbeddingCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    /// Returns the cached vector for `text`, or calls the provider once
    /// and stores the result.
    ///
    /// Provider failure propagates as [`EngramError::Embedding`]; callers
    /// decide whether to abort or degrade to text-only matching.
    pub async fn get_or_embed(
        &self,
        embedder: &dyn EmbeddingAdapter,
        text: &str,
    ) -> Result<Arc<Vec<f32>>, EngramError> {
        let key = normalize(text);

        if let Some(hit) = self.entries.get(&key) {
            debug!(key_len = key.len(), "embedding cache hit");
            return Ok(Arc::clone(&hit));
        }

        let vector = Arc::new(embedder.embed(text).await?);
        self.entries.insert(key, Arc::clone(&vector));
        metrics::counter!("engram_embedding_cache_misses_total").increment(1);
        Ok(vector)
    }

    /// Returns the cached vector for `text` without calling the provider.
    pub fn get(&self, text: &str) -> Option<Arc<Vec<f32>>> {
        self.entries.get(&normalize(text)).map(|v| Arc::clone(&v))
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Number of cached entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
