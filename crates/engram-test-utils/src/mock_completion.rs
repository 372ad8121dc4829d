// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock LLM completion adapter for deterministic testing.
//!
//! Responses are popped from a FIFO queue. When the queue is empty,
//! a default "mock response" text is returned.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use engram_core::error::EngramError;
use engram_core::traits::CompletionAdapter;
use engram_core::types::ChatMessage;

/// A mock completion provider with pre-configured responses.
pub struct MockCompletion {
    responses: Arc<Mutex<VecDeque<String>>>,
    calls: AtomicUsize,
    failing: bool,
}

impl MockCompletion {
    /// Create a new mock provider with an empty response queue.
    pub fn new() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
            failing: false,
        }
    }

    /// Create a mock provider pre-loaded with the given responses.
    pub fn with_responses(responses: Vec<String>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::from(responses))),
            calls: AtomicUsize::new(0),
            failing: false,
        }
    }

    /// Create a mock provider whose every call fails with
    /// [`EngramError::Completion`].
    pub fn failing() -> Self {
        Self {
            responses: Arc::new(Mutex::new(VecDeque::new())),
            calls: AtomicUsize::new(0),
            failing: true,
        }
    }

    /// Add a response to the end of the queue.
    pub async fn add_response(&self, text: String) {
        self.responses.lock().await.push_back(text);
    }

    /// Number of complete calls made so far (failures included).
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionAdapter for MockCompletion {
    async fn complete(
        &self,
        _messages: &[ChatMessage],
        _max_tokens: u32,
    ) -> Result<String, EngramError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(EngramError::Completion {
                message: "mock completion configured to fail".into(),
                source: None,
            });
        }
        Ok(self
            .responses
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| "mock response".to_string()))
    }
}
