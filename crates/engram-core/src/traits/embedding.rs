// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Embedding adapter trait for vector embedding generation.

use async_trait::async_trait;

use crate::error::EngramError;

/// Adapter for generating vector embeddings from text.
///
/// Implementations must be deterministic enough that identical text
/// yields vectors the embedding cache can safely reuse. Failure returns
/// an error, never a partial vector. A hung upstream call must surface
/// as [`EngramError::Timeout`] rather than blocking indefinitely.
#[async_trait]
pub trait EmbeddingAdapter: Send + Sync {
    /// Generates an embedding for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngramError>;
}
