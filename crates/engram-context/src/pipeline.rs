// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background summarization and fact-extraction pipeline.
//!
//! Runs on a snapshot of the conversation window taken at trigger time:
//! summarize, extract discrete facts from the summary, upsert each fact
//! as an intuited memory. Fire-and-forget; failures are logged and never
//! reach the foreground turn.

use std::sync::Arc;

use tracing::{debug, warn};

use engram_config::model::PipelineConfig;
use engram_core::error::EngramError;
use engram_core::traits::CompletionAdapter;
use engram_core::types::{ChatMessage, MemoryKind, OwnerId};
use engram_memory::coordinator::MemoryCoordinator;

use crate::state::ContextState;
use crate::summarizer::Summarizer;

/// Instruction set for the fact-extraction call.
const EXTRACTION_PROMPT: &str = r#"Extract discrete facts about the user from the conversation summary below. Output as a JSON array of strings.

Each fact must be:
- A standalone statement (e.g., "The user's dog is named Max")
- About the user, not the assistant
- Specific enough to be useful in future conversations

If there are no memorable facts, return an empty array: []

Output the JSON array only, no explanation."#;

/// The summarization + extraction pipeline for one process.
pub struct ExtractionPipeline {
    summarizer: Summarizer,
    completion: Arc<dyn CompletionAdapter>,
    coordinator: Arc<MemoryCoordinator>,
    state: Arc<ContextState>,
    extraction_max_tokens: u32,
}

impl ExtractionPipeline {
    pub fn new(
        completion: Arc<dyn CompletionAdapter>,
        coordinator: Arc<MemoryCoordinator>,
        state: Arc<ContextState>,
        agent_name: impl Into<String>,
        config: &PipelineConfig,
    ) -> Self {
        Self {
            summarizer: Summarizer::new(completion.clone(), agent_name, config),
            completion,
            coordinator,
            state,
            extraction_max_tokens: config.extraction_max_tokens,
        }
    }

    /// Dispatch a background run for `owner` over `snapshot`.
    ///
    /// At most one run per owner is in flight; a duplicate trigger is
    /// discarded. The spawned task logs its own failures, and the slot
    /// is released on every exit path, including an unwind.
    pub fn spawn(self: &Arc<Self>, owner: OwnerId, snapshot: Vec<ChatMessage>) {
        if !self.state.try_begin_pipeline(&owner) {
            debug!(owner = %owner, "pipeline already in flight, trigger discarded");
            metrics::counter!("engram_pipeline_discarded_total").increment(1);
            return;
        }

        let pipeline = Arc::clone(self);
        tokio::spawn(async move {
            let _slot = PipelineSlot {
                state: Arc::clone(&pipeline.state),
                owner: owner.clone(),
            };
            match pipeline.run(&owner, &snapshot).await {
                Ok(stored) => {
                    debug!(owner = %owner, stored, "pipeline run complete");
                }
                Err(e) => {
                    warn!(owner = %owner, error = %e, "pipeline run failed");
                    metrics::counter!("engram_pipeline_failures_total").increment(1);
                }
            }
        });
    }

    /// Run the pipeline synchronously. Returns the number of facts stored.
    pub async fn run(
        &self,
        owner: &OwnerId,
        snapshot: &[ChatMessage],
    ) -> Result<usize, EngramError> {
        let summary = self.summarizer.summarize(snapshot).await?;
        if summary.trim().is_empty() {
            return Ok(0);
        }

        let messages = [
            ChatMessage::system(EXTRACTION_PROMPT),
            ChatMessage::user(summary),
        ];
        let response = self
            .completion
            .complete(&messages, self.extraction_max_tokens)
            .await?;

        let facts = parse_fact_list(&response);
        if facts.is_empty() {
            // Nothing memorable is a normal outcome.
            return Ok(0);
        }

        let mut stored = 0;
        for fact in &facts {
            match self
                .coordinator
                .upsert_memory(owner, fact, MemoryKind::Intuited)
                .await
            {
                Ok(_) => stored += 1,
                Err(e) => {
                    warn!(owner = %owner, error = %e, fact, "failed to store extracted fact");
                }
            }
        }

        metrics::counter!("engram_facts_extracted_total").increment(stored as u64);
        Ok(stored)
    }
}

/// Releases an owner's in-flight slot when the background task exits,
/// whether by completion, error, or unwind.
struct PipelineSlot {
    state: Arc<ContextState>,
    owner: OwnerId,
}

impl Drop for PipelineSlot {
    fn drop(&mut self) {
        self.state.end_pipeline(&self.owner);
    }
}

/// Parse the extraction response into fact strings.
///
/// Handles markdown code fences and text around the array. Malformed
/// responses, including ones with no well-ordered `[...]` pair at all,
/// yield an empty list rather than an error.
pub fn parse_fact_list(response: &str) -> Vec<String> {
    let trimmed = response.trim();
    let json_str = match (trimmed.find('['), trimmed.rfind(']')) {
        (Some(start), Some(end)) if start < end => &trimmed[start..=end],
        _ => trimmed,
    };

    match serde_json::from_str::<Vec<String>>(json_str) {
        Ok(facts) => facts
            .into_iter()
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .collect(),
        Err(e) => {
            warn!(error = %e, "failed to parse extraction response");
            debug!(raw = response, "unparseable extraction response");
            Vec::new()
        }
    }
}
