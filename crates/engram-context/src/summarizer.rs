// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Two-tier conversation summarization.
//!
//! Windows with at most `chunk_size` non-system entries are summarized
//! in a single completion call. Larger windows are split into fixed-size
//! chunks, each summarized separately (re-prefixed with the window's
//! system message for context), then combined with one final call: for
//! `N` entries that is exactly `ceil(N / chunk_size) + 1` calls.

use std::sync::Arc;

use tracing::debug;

use engram_config::model::PipelineConfig;
use engram_core::error::EngramError;
use engram_core::traits::CompletionAdapter;
use engram_core::types::ChatMessage;

/// Instruction set for every summarization call.
///
/// Biases the summary toward the material fact extraction feeds on, and
/// carries the name disambiguation so the assistant's own name is never
/// reported as the user's.
const SUMMARY_PROMPT: &str = r#"You are a conversation summarizer. Summarize the conversation below in a few short paragraphs.

CAPTURE:
- Facts the user states explicitly about themselves (names, places, dates, possessions)
- Preferences the user implies through sentiment, enthusiasm, or repeated engagement
- Multi-step projects or plans the user is working on, and their current status

IMPORTANT: the assistant in this conversation is named {agent_name}. "{agent_name}" is never the user's name; attribute facts to the user only when the user stated them."#;

/// Summarizes conversation window snapshots.
pub struct Summarizer {
    completion: Arc<dyn CompletionAdapter>,
    agent_name: String,
    chunk_size: usize,
    max_tokens: u32,
}

impl Summarizer {
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        agent_name: impl Into<String>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            completion,
            agent_name: agent_name.into(),
            chunk_size: config.chunk_size.max(1),
            max_tokens: config.summary_max_tokens,
        }
    }

    /// Summarize a window snapshot. Empty windows yield an empty summary
    /// without any completion call.
    pub async fn summarize(&self, snapshot: &[ChatMessage]) -> Result<String, EngramError> {
        let system_context = snapshot
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.clone())
            .unwrap_or_default();
        let entries: Vec<&ChatMessage> =
            snapshot.iter().filter(|m| m.role != "system").collect();

        if entries.is_empty() {
            return Ok(String::new());
        }

        if entries.len() <= self.chunk_size {
            debug!(entries = entries.len(), "direct summarization");
            return self
                .summarize_text(&render_conversation(&system_context, &entries))
                .await;
        }

        // Hierarchical path: summarize fixed-size chunks, then combine.
        let chunk_count = entries.len().div_ceil(self.chunk_size);
        debug!(
            entries = entries.len(),
            chunks = chunk_count,
            "hierarchical summarization"
        );

        let mut partials = Vec::with_capacity(chunk_count);
        for chunk in entries.chunks(self.chunk_size) {
            let partial = self
                .summarize_text(&render_conversation(&system_context, chunk))
                .await?;
            partials.push(partial);
        }

        let combined_input = format!(
            "These are consecutive partial summaries of one conversation. \
             Combine them into a single summary, preserving every fact, \
             preference, and project:\n\n{}",
            partials.join("\n\n")
        );
        let messages = [
            ChatMessage::system(self.prompt()),
            ChatMessage::user(combined_input),
        ];
        self.completion.complete(&messages, self.max_tokens).await
    }

    async fn summarize_text(&self, conversation: &str) -> Result<String, EngramError> {
        let messages = [
            ChatMessage::system(self.prompt()),
            ChatMessage::user(format!("Summarize this conversation:\n\n{conversation}")),
        ];
        self.completion.complete(&messages, self.max_tokens).await
    }

    fn prompt(&self) -> String {
        SUMMARY_PROMPT.replace("{agent_name}", &self.agent_name)
    }
}

fn render_conversation(system_context: &str, entries: &[&ChatMessage]) -> String {
    let mut lines = Vec::with_capacity(entries.len() + 1);
    if !system_context.is_empty() {
        lines.push(format!("system: {system_context}"));
    }
    for message in entries {
        lines.push(format!("{}: {}", message.role, message.content));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use engram_test_utils::MockCompletion;

    fn snapshot(turns: usize) -> Vec<ChatMessage> {
        let mut messages = vec![ChatMessage::system("base prompt")];
        for i in 1..=turns {
            let role = if i % 2 == 1 { "user" } else { "assistant" };
            messages.push(ChatMessage::new(role, format!("turn {i}")));
        }
        messages
    }

    fn summarizer(completion: Arc<MockCompletion>) -> Summarizer {
        Summarizer::new(completion, "Engram", &PipelineConfig::default())
    }

    #[tokio::test]
    async fn small_window_is_one_call() {
        let completion = Arc::new(MockCompletion::with_responses(vec!["summary".into()]));
        let s = summarizer(completion.clone());

        let result = s.summarize(&snapshot(4)).await.unwrap();
        assert_eq!(result, "summary");
        assert_eq!(completion.call_count(), 1);
    }

    #[tokio::test]
    async fn boundary_window_of_chunk_size_is_still_direct() {
        let completion = Arc::new(MockCompletion::new());
        let s = summarizer(completion.clone());

        s.summarize(&snapshot(10)).await.unwrap();
        assert_eq!(completion.call_count(), 1);
    }

    #[tokio::test]
    async fn large_window_makes_ceil_n_over_chunk_plus_one_calls() {
        // 25 entries, chunk size 10: 3 chunk calls + 1 combining call.
        let completion = Arc::new(MockCompletion::with_responses(vec![
            "part one".into(),
            "part two".into(),
            "part three".into(),
            "combined".into(),
        ]));
        let s = summarizer(completion.clone());

        let result = s.summarize(&snapshot(25)).await.unwrap();
        assert_eq!(result, "combined");
        assert_eq!(completion.call_count(), 4);
    }

    #[tokio::test]
    async fn eleven_entries_take_three_calls() {
        let completion = Arc::new(MockCompletion::new());
        let s = summarizer(completion.clone());

        s.summarize(&snapshot(11)).await.unwrap();
        assert_eq!(completion.call_count(), 3);
    }

    #[tokio::test]
    async fn empty_window_skips_the_provider() {
        let completion = Arc::new(MockCompletion::new());
        let s = summarizer(completion.clone());

        let result = s.summarize(&snapshot(0)).await.unwrap();
        assert!(result.is_empty());
        assert_eq!(completion.call_count(), 0);
    }

    #[tokio::test]
    async fn failure_propagates() {
        let completion = Arc::new(MockCompletion::failing());
        let s = summarizer(completion.clone());

        let err = s.summarize(&snapshot(4)).await.unwrap_err();
        assert!(matches!(err, EngramError::Completion { .. }));
    }

    #[test]
    fn prompt_names_the_assistant() {
        let completion = Arc::new(MockCompletion::new());
        let s = Summarizer::new(completion, "Luna", &PipelineConfig::default());
        let prompt = s.prompt();
        assert!(prompt.contains("named Luna"));
        assert!(!prompt.contains("{agent_name}"));
    }
}
