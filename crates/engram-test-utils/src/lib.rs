// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for Engram integration tests.
//!
//! Provides mock adapters for fast, deterministic, CI-runnable tests
//! without external services.
//!
//! # Components
//!
//! - [`MockEmbedder`] - Programmable embedding adapter with failure mode
//! - [`MockCompletion`] - Mock LLM provider with pre-configured responses
//! - [`InMemoryBackend`] - In-memory persistent store with cosine distance

pub mod mock_backend;
pub mod mock_completion;
pub mod mock_embedder;

pub use mock_backend::InMemoryBackend;
pub use mock_completion::MockCompletion;
pub use mock_embedder::MockEmbedder;
