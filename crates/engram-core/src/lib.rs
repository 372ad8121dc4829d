// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core contracts for the Engram semantic memory subsystem.
//!
//! Defines the error taxonomy, shared domain types, and the adapter traits
//! through which Engram consumes its external collaborators: the embedding
//! provider, the completion provider, and the persistent record store.
//! Everything else in the workspace builds on this crate.

pub mod error;
pub mod traits;
pub mod types;

pub use error::EngramError;
pub use traits::{CompletionAdapter, EmbeddingAdapter, MemoryBackend};
