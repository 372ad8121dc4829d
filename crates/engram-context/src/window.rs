// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bounded rolling conversation window with a pinned system turn.
//!
//! `messages[0]` is always the system message. It is rewritten in place
//! each turn from the base prompt, the owner's combined memory blob, and
//! an optional custom suffix; it is never duplicated and never evicted.

use engram_core::types::ChatMessage;

/// A single owner's live conversation window.
#[derive(Debug, Clone)]
pub struct ConversationWindow {
    messages: Vec<ChatMessage>,
    /// Maximum window length including the pinned system turn.
    context_length: usize,
    /// User-supplied suffix appended to the system prompt, if any.
    prompt_suffix: Option<String>,
}

impl ConversationWindow {
    /// Create a window holding only the pinned system turn.
    ///
    /// `context_length` is clamped to at least 1 so the pinned system
    /// turn always fits, whatever the caller passes.
    pub fn new(base_prompt: &str, context_length: usize) -> Self {
        Self {
            messages: vec![ChatMessage::system(base_prompt)],
            context_length: context_length.max(1),
            prompt_suffix: None,
        }
    }

    /// Rewrite the pinned system turn from its parts.
    ///
    /// Called before each turn so the system message always reflects the
    /// current combined memory blob and custom suffix.
    pub fn rewrite_system(&mut self, base_prompt: &str, memory_blob: Option<&str>) {
        let mut content = base_prompt.to_string();
        if let Some(blob) = memory_blob
            && !blob.is_empty()
        {
            content.push_str("\n\nWhat you remember about the user:\n");
            content.push_str(blob);
        }
        if let Some(suffix) = &self.prompt_suffix {
            content.push_str("\n\n");
            content.push_str(suffix);
        }
        self.messages[0] = ChatMessage::system(content);
    }

    /// Set or clear the custom prompt suffix. Length validation is the
    /// caller's responsibility; an empty string clears.
    pub fn set_prompt_suffix(&mut self, suffix: &str) {
        let trimmed = suffix.trim();
        self.prompt_suffix = if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        };
    }

    pub fn prompt_suffix(&self) -> Option<&str> {
        self.prompt_suffix.as_deref()
    }

    /// Append a turn, evicting the oldest non-system entries on overflow.
    ///
    /// The pinned system turn and the most recent `context_length - 1`
    /// entries survive, in original order.
    pub fn append_turn(&mut self, message: ChatMessage) {
        self.messages.push(message);
        if self.messages.len() > self.context_length {
            let excess = self.messages.len() - self.context_length;
            self.messages.drain(1..1 + excess);
        }
    }

    /// Clear the window back to just the pinned system turn. The custom
    /// prompt suffix survives a reset.
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Owned copy of the window for the background pipeline to work on.
    pub fn snapshot(&self) -> Vec<ChatMessage> {
        self.messages.clone()
    }

    /// Number of entries excluding the pinned system turn.
    pub fn turn_count(&self) -> usize {
        self.messages.len() - 1
    }
}
