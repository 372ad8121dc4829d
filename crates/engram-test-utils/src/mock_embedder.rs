// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock embedding adapter for deterministic testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use engram_core::error::EngramError;
use engram_core::traits::EmbeddingAdapter;

/// Dimension of vectors produced for texts without a programmed vector.
const DEFAULT_DIM: usize = 8;

/// A mock embedding provider.
///
/// Texts registered via [`set_vector`](MockEmbedder::set_vector) return
/// their programmed vector; any other text gets a deterministic
/// hash-derived vector, so identical text always embeds identically.
pub struct MockEmbedder {
    vectors: Mutex<HashMap<String, Vec<f32>>>,
    calls: AtomicUsize,
    failing: bool,
}

impl MockEmbedder {
    /// Create a mock embedder that succeeds on every call.
    pub fn new() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            failing: false,
        }
    }

    /// Create a mock embedder whose every call fails with
    /// [`EngramError::Embedding`].
    pub fn failing() -> Self {
        Self {
            vectors: Mutex::new(HashMap::new()),
            calls: AtomicUsize::new(0),
            failing: true,
        }
    }

    /// Program the vector returned for an exact text.
    pub fn set_vector(&self, text: &str, vector: Vec<f32>) {
        self.vectors
            .lock()
            .expect("mock embedder lock poisoned")
            .insert(text.to_string(), vector);
    }

    /// Number of embed calls made so far (failures included).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn default_vector(text: &str) -> Vec<f32> {
        // Cheap deterministic pseudo-embedding: accumulate byte values
        // into fixed buckets and normalize to unit length.
        let mut v = vec![0.0f32; DEFAULT_DIM];
        for (i, b) in text.bytes().enumerate() {
            v[i % DEFAULT_DIM] += f32::from(b) / 255.0;
        }
        let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for x in &mut v {
                *x /= norm;
            }
        }
        v
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmbeddingAdapter for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, EngramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(EngramError::Embedding {
                message: "mock embedder configured to fail".into(),
                source: None,
            });
        }
        let programmed = self
            .vectors
            .lock()
            .expect("mock embedder lock poisoned")
            .get(text)
            .cloned();
        Ok(programmed.unwrap_or_else(|| Self::default_vector(text)))
    }
}
