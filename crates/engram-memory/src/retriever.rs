// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Memory retrieval: score, filter, and rank candidates for a query.
//!
//! The primary path embeds the query and asks the store for nearest
//! neighbors, keeping only those under the relevance distance threshold.
//! When the embedding provider is down, retrieval degrades to fuzzy
//! string matching over the owner's plain-text records.

use std::sync::Arc;

use engram_config::model::MemoryConfig;
use engram_core::error::EngramError;
use engram_core::traits::{EmbeddingAdapter, MemoryBackend};
use engram_core::types::{MemoryCategory, MemoryKind, OwnerId};
use engram_text::{fuzzy_score, term_overlap_ratio};
use tracing::{debug, warn};

use crate::cache::EmbeddingCache;

/// Cap on fallback results: top-3 by fuzzy score, never more than the
/// caller's limit.
const FALLBACK_TOP_N: usize = 3;

/// Fetches, scores, filters, and ranks candidate memories for a query.
pub struct MemoryRetriever {
    backend: Arc<dyn MemoryBackend>,
    embedder: Arc<dyn EmbeddingAdapter>,
    cache: Arc<EmbeddingCache>,
    config: MemoryConfig,
}

impl MemoryRetriever {
    /// Creates a new retriever.
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

    /// Returns up to `limit` memory texts for `owner`, most relevant
    /// first. Fresh query each call; the result is finite and owned.
    pub async fn retrieve(
        &self,
        owner: &OwnerId,
        query: &str,
        limit: usize,
        kind: Option<MemoryKind>,
        category: Option<MemoryCategory>,
    ) -> Result<Vec<String>, EngramError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(EngramError::Validation("query must not be empty".into()));
        }
        if limit == 0 {
            return Ok(Vec::new());
        }

        match self.cache.get_or_embed(self.embedder.as_ref(), query).await {
            Ok(vector) => {
                let matches = self
                    .backend
                    .find_nearest(owner, &vector, limit, kind, category)
                    .await?;

                let mut relevant: Vec<(f64, String)> = matches
                    .into_iter()
                    .filter(|m| m.distance < self.config.relevance_distance_threshold)
                    .map(|m| (m.distance, m.record.text))
                    .collect();
                relevant.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));

                debug!(
                    owner_id = %owner,
                    kept = relevant.len(),
                    "vector retrieval complete"
                );
                metrics::counter!("engram_memory_retrievals_total", "path" => "vector")
                    .increment(1);

                Ok(relevant.into_iter().map(|(_, text)| text).collect())
            }
            Err(e) => {
                warn!(
                    owner_id = %owner,
                    error = %e,
                    "embedding unavailable, falling back to fuzzy text matching"
                );
                metrics::counter!("engram_memory_retrievals_total", "path" => "fuzzy")
                    .increment(1);
                self.fuzzy_fallback(owner, query, limit, kind, category).await
            }
        }
    }

    /// Text-only retrieval over the owner's records.
    ///
    /// Keeps candidates where at least `min_term_overlap` of the query
    /// terms appear, ranks by fuzzy score, and returns at most
    /// min(limit, 3) items.
    async fn fuzzy_fallback(
        &self,
        owner: &OwnerId,
        query: &str,
        limit: usize,
        kind: Option<MemoryKind>,
        category: Option<MemoryCategory>,
    ) -> Result<Vec<String>, EngramError> {
        let records = self.backend.get_all(owner, kind, category).await?;
        let threshold = self.config.fuzzy_token_threshold;

        let mut scored: Vec<(f64, String)> = records
            .into_iter()
            .filter_map(|record| {
                let overlap = term_overlap_ratio(query, &record.text, threshold);
                if overlap < self.config.min_term_overlap {
                    return None;
                }
                let score = fuzzy_score(query, &record.text, threshold).score;
                Some((score, record.text))
            })
            .collect();

        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(limit.min(FALLBACK_TOP_N));

        Ok(scored.into_iter().map(|(_, text)| text).collect())
    }
}
