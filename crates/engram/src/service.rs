// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The user-facing service wiring all Engram components together.

use std::sync::Arc;

use tracing::{info, warn};

use engram_config::model::EngramConfig;
use engram_context::{ContextState, ExtractionPipeline};
use engram_core::error::EngramError;
use engram_core::traits::{CompletionAdapter, EmbeddingAdapter, MemoryBackend};
use engram_core::types::{ChatMessage, MemoryCategory, MemoryKind, OwnerId, UpsertOutcome};
use engram_memory::cache::EmbeddingCache;
use engram_memory::coordinator::MemoryCoordinator;
use engram_memory::retriever::MemoryRetriever;

/// One Engram instance: memory storage, retrieval, conversation windows,
/// and the background extraction pipeline, sharing a single embedding
/// cache and configuration.
///
/// Adapters are injected; the service owns no I/O of its own.
pub struct EngramService {
    config: EngramConfig,
    backend: Arc<dyn MemoryBackend>,
    coordinator: Arc<MemoryCoordinator>,
    retriever: MemoryRetriever,
    state: Arc<ContextState>,
    pipeline: Arc<ExtractionPipeline>,
}

impl EngramService {
    pub fn new(
        config: EngramConfig,
        backend: Arc<dyn MemoryBackend>,
        embedder: Arc<dyn EmbeddingAdapter>,
        completion: Arc<dyn CompletionAdapter>,
    ) -> Self {
        let cache = Arc::new(EmbeddingCache::new());
        let coordinator = Arc::new(MemoryCoordinator::new(
            backend.clone(),
            embedder.clone(),
            cache.clone(),
            config.memory.clone(),
        ));
        let retriever = MemoryRetriever::new(
            backend.clone(),
            embedder,
            cache.clone(),
            config.memory.clone(),
        );
        let state = Arc::new(ContextState::new(
            cache,
            config.agent.system_prompt.clone(),
            config.context.clone(),
            config.pipeline.clone(),
        ));
        let pipeline = Arc::new(ExtractionPipeline::new(
            completion,
            coordinator.clone(),
            state.clone(),
            config.agent.name.clone(),
            &config.pipeline,
        ));

        info!(agent = config.agent.name.as_str(), "engram service ready");

        Self {
            config,
            backend,
            coordinator,
            retriever,
            state,
            pipeline,
        }
    }

    /// Store an explicit memory for `owner` (confidence 1.0), merging
    /// into a semantically equivalent existing record when one is close
    /// enough.
    pub async fn remember(
        &self,
        owner: &OwnerId,
        text: &str,
    ) -> Result<UpsertOutcome, EngramError> {
        self.coordinator
            .upsert_memory(owner, text, MemoryKind::Explicit)
            .await
    }

    /// Store an explicit memory with a topical category.
    pub async fn remember_in_category(
        &self,
        owner: &OwnerId,
        text: &str,
        category: MemoryCategory,
    ) -> Result<UpsertOutcome, EngramError> {
        self.coordinator
            .upsert_with_category(owner, text, MemoryKind::Explicit, Some(category))
            .await
    }

    /// Retrieve up to `limit` relevant memory texts, most relevant first.
    /// `limit` of `None` uses the configured default.
    pub async fn recall(
        &self,
        owner: &OwnerId,
        query: &str,
        limit: Option<usize>,
        category: Option<MemoryCategory>,
    ) -> Result<Vec<String>, EngramError> {
        let limit = limit.unwrap_or(self.config.memory.max_retrieval_results);
        self.retriever
            .retrieve(owner, query, limit, None, category)
            .await
    }

    /// Set the owner's custom prompt suffix. Empty text resets to the
    /// default prompt; over-long text is rejected.
    pub async fn set_custom_prompt(&self, owner: &OwnerId, text: &str) -> Result<(), EngramError> {
        let max = self.config.context.max_custom_prompt_chars;
        if text.chars().count() > max {
            return Err(EngramError::Validation(format!(
                "custom prompt exceeds {max} characters"
            )));
        }
        let window = self.state.window(owner);
        window.lock().await.set_prompt_suffix(text);
        Ok(())
    }

    /// Record one conversation turn and return the current window.
    ///
    /// Rewrites the pinned system turn from the base prompt, the owner's
    /// combined memory blob, and any custom suffix, then appends the
    /// turn. When the summarization trigger fires, the pipeline is
    /// dispatched in the background over a snapshot taken here; the
    /// returned window is never blocked on it.
    pub async fn record_turn(
        &self,
        owner: &OwnerId,
        message: ChatMessage,
    ) -> Result<Vec<ChatMessage>, EngramError> {
        // Combined blob failure degrades to a memoryless prompt rather
        // than failing the turn.
        let blob = match self.backend.combined_blob(owner).await {
            Ok(blob) => blob,
            Err(e) => {
                warn!(owner = %owner, error = %e, "combined memory blob unavailable");
                None
            }
        };

        let window = self.state.window(owner);
        let mut guard = window.lock().await;
        guard.rewrite_system(self.state.base_prompt(), blob.as_deref());
        guard.append_turn(message);
        let snapshot = guard.snapshot();
        drop(guard);

        self.state.record_message(owner);
        if self.state.take_trigger(owner) {
            self.pipeline.spawn(owner.clone(), snapshot.clone());
        }

        Ok(snapshot)
    }

    /// Clear the owner's window back to the pinned system turn and reset
    /// their summarization checkpoint. Stored memories are untouched.
    pub async fn reset_conversation(&self, owner: &OwnerId) {
        self.state.reset_owner(owner).await;
    }

    /// Shared conversation state, mainly for inspection in tests and
    /// operational tooling.
    pub fn state(&self) -> &Arc<ContextState> {
        &self.state
    }

    pub fn config(&self) -> &EngramConfig {
        &self.config
    }
}
