// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adapter trait definitions for Engram's external collaborators.
//!
//! All adapters use `#[async_trait]` for dynamic dispatch compatibility;
//! the subsystem holds them as `Arc<dyn ...>`.

pub mod backend;
pub mod completion;
pub mod embedding;

pub use backend::MemoryBackend;
pub use completion::CompletionAdapter;
pub use embedding::EmbeddingAdapter;
