// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Process-wide conversation state, explicitly constructed and injected.
//!
//! Holds the per-owner conversation windows, summary checkpoints, and
//! pipeline in-flight guards, plus the shared embedding cache. There are
//! no ambient statics: everything mutable lives here and is passed by
//! `Arc` to whoever needs it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::debug;

use engram_config::model::{ContextConfig, PipelineConfig};
use engram_core::types::OwnerId;
use engram_memory::cache::EmbeddingCache;

use crate::window::ConversationWindow;

/// Per-owner summarization bookkeeping. In-memory only; losing it on
/// restart delays fact extraction but never corrupts it.
#[derive(Debug, Clone)]
pub struct SummaryCheckpoint {
    /// Messages recorded since the pipeline last fired.
    pub messages_since_last_summary: u32,
    /// When the pipeline last fired (or when the owner first appeared).
    pub last_summary_at: DateTime<Utc>,
}

impl SummaryCheckpoint {
    fn fresh(now: DateTime<Utc>) -> Self {
        Self {
            messages_since_last_summary: 0,
            last_summary_at: now,
        }
    }
}

/// Shared mutable state for all owners.
pub struct ContextState {
    cache: Arc<EmbeddingCache>,
    windows: DashMap<OwnerId, Arc<Mutex<ConversationWindow>>>,
    checkpoints: DashMap<OwnerId, SummaryCheckpoint>,
    in_flight: DashMap<OwnerId, Arc<AtomicBool>>,
    base_prompt: String,
    context: ContextConfig,
    pipeline: PipelineConfig,
}

impl ContextState {
    pub fn new(
        cache: Arc<EmbeddingCache>,
        base_prompt: impl Into<String>,
        context: ContextConfig,
        pipeline: PipelineConfig,
    ) -> Self {
        Self {
            cache,
            windows: DashMap::new(),
            checkpoints: DashMap::new(),
            in_flight: DashMap::new(),
            base_prompt: base_prompt.into(),
            context,
            pipeline,
        }
    }

    pub fn cache(&self) -> &Arc<EmbeddingCache> {
        &self.cache
    }

    pub fn base_prompt(&self) -> &str {
        &self.base_prompt
    }

    pub fn context_config(&self) -> &ContextConfig {
        &self.context
    }

    /// The owner's live window, created on first access.
    ///
    /// Callers lock the returned mutex for the duration of a turn, which
    /// serializes all mutation within one owner's timeline.
    pub fn window(&self, owner: &OwnerId) -> Arc<Mutex<ConversationWindow>> {
        self.windows
            .entry(owner.clone())
            .or_insert_with(|| {
                Arc::new(Mutex::new(ConversationWindow::new(
                    &self.base_prompt,
                    self.context.context_length,
                )))
            })
            .clone()
    }

    /// Bump the owner's message counter.
    pub fn record_message(&self, owner: &OwnerId) {
        let mut entry = self
            .checkpoints
            .entry(owner.clone())
            .or_insert_with(|| SummaryCheckpoint::fresh(Utc::now()));
        entry.messages_since_last_summary += 1;
    }

    /// Check the summarization triggers and, if one fired, reset the
    /// checkpoint to `(0, now)` before returning.
    ///
    /// The reset happens here, synchronously, so a burst of turns cannot
    /// re-trigger while the background run is still being dispatched.
    pub fn take_trigger(&self, owner: &OwnerId) -> bool {
        self.take_trigger_at(owner, Utc::now())
    }

    fn take_trigger_at(&self, owner: &OwnerId, now: DateTime<Utc>) -> bool {
        let mut entry = self
            .checkpoints
            .entry(owner.clone())
            .or_insert_with(|| SummaryCheckpoint::fresh(now));

        let count_due = entry.messages_since_last_summary >= self.pipeline.message_trigger_count;
        // An unrepresentable idle limit means the idle trigger never fires.
        let idle_limit = i64::try_from(self.pipeline.idle_trigger_hours)
            .ok()
            .and_then(Duration::try_hours)
            .unwrap_or(Duration::MAX);
        let idle_due = now - entry.last_summary_at > idle_limit;

        if count_due || idle_due {
            debug!(
                owner = %owner,
                count = entry.messages_since_last_summary,
                count_due,
                idle_due,
                "summarization trigger fired"
            );
            *entry = SummaryCheckpoint::fresh(now);
            true
        } else {
            false
        }
    }

    /// Current checkpoint snapshot, if the owner has one.
    pub fn checkpoint(&self, owner: &OwnerId) -> Option<SummaryCheckpoint> {
        self.checkpoints.get(owner).map(|c| c.value().clone())
    }

    /// Claim the owner's pipeline slot. Returns false when a run is
    /// already in flight; the caller must discard the trigger.
    pub fn try_begin_pipeline(&self, owner: &OwnerId) -> bool {
        let flag = self
            .in_flight
            .entry(owner.clone())
            .or_insert_with(|| Arc::new(AtomicBool::new(false)))
            .clone();
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the owner's pipeline slot.
    pub fn end_pipeline(&self, owner: &OwnerId) {
        if let Some(flag) = self.in_flight.get(owner) {
            flag.store(false, Ordering::Release);
        }
    }

    /// Clear one owner's window back to the pinned system turn and reset
    /// their checkpoint.
    pub async fn reset_owner(&self, owner: &OwnerId) {
        let window = self.window(owner);
        window.lock().await.reset();
        self.checkpoints
            .insert(owner.clone(), SummaryCheckpoint::fresh(Utc::now()));
    }

    /// Drop all per-owner state and empty the embedding cache.
    pub fn clear(&self) {
        self.windows.clear();
        self.checkpoints.clear();
        self.in_flight.clear();
        self.cache.clear();
    }
}
