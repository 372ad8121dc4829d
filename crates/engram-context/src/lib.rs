// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversation context management for Engram.
//!
//! - **Window**: bounded rolling conversation history with a pinned,
//!   in-place-rewritten system turn
//! - **State**: explicit process-wide per-owner state (windows, summary
//!   checkpoints, pipeline guards, embedding cache)
//! - **Summarizer**: two-tier (direct vs. hierarchical) conversation
//!   summarization
//! - **Pipeline**: fire-and-forget fact extraction feeding the memory
//!   coordinator

pub mod pipeline;
pub mod state;
pub mod summarizer;
pub mod window;

pub use pipeline::{ExtractionPipeline, parse_fact_list};
pub use state::{ContextState, SummaryCheckpoint};
pub use summarizer::Summarizer;
pub use window::ConversationWindow;
