// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Engram: a semantic memory subsystem for conversational agents.
//!
//! Decides whether new user-supplied text merges into an existing
//! remembered fact or becomes a new one, retrieves the most relevant
//! facts for a query (with a text-only fallback when embeddings are
//! unavailable), maintains a bounded rolling conversation window with a
//! pinned system turn, and runs a background summarization pipeline
//! that extracts discrete facts back into memory.
//!
//! Embedding, completion, and persistence are injected behind the
//! adapter traits in [`engram_core::traits`]; [`EngramService`] wires
//! everything together.

pub mod service;

pub use engram_config::model::EngramConfig;
pub use engram_core::error::EngramError;
pub use engram_core::types::{
    ChatMessage, MemoryCategory, MemoryKind, MemoryRecord, OwnerId, UpsertOutcome,
};
pub use service::EngramService;
