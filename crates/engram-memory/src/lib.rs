// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Semantic memory engine for Engram.
//!
//! Decides merge-vs-insert for new memory text, retrieves the most
//! relevant remembered facts for a query, and reuses embeddings through
//! a process-wide cache.
//!
//! ## Architecture
//!
//! - **EmbeddingCache**: normalized-text -> vector cache, fetch-or-compute
//! - **MemoryCoordinator**: merge-vs-insert decision against the store
//! - **MemoryRetriever**: vector retrieval with a fuzzy text fallback
//! - **similarity**: cosine similarity with zero-norm guards

pub mod cache;
pub mod coordinator;
pub mod retriever;
pub mod similarity;

pub use cache::EmbeddingCache;
pub use coordinator::MemoryCoordinator;
pub use retriever::MemoryRetriever;
pub use similarity::cosine_similarity;
