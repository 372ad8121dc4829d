// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Completion adapter trait for LLM provider integrations.

use async_trait::async_trait;

use crate::error::EngramError;
use crate::types::ChatMessage;

/// Adapter for LLM completion calls.
///
/// The summarization and extraction pipeline is the only consumer;
/// it needs single-shot completions, not streaming.
#[async_trait]
pub trait CompletionAdapter: Send + Sync {
    /// Sends an ordered message list and returns the completion text.
    async fn complete(
        &self,
        messages: &[ChatMessage],
        max_tokens: u32,
    ) -> Result<String, EngramError>;
}
