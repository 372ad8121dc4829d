// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the Engram workspace.

use serde::{Deserialize, Serialize};

/// Identifies the owner of a memory set and conversation window.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(pub String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OwnerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role string: "system", "user", or "assistant".
    pub role: String,
    /// Text content of the turn.
    pub content: String,
}

impl ChatMessage {
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new("user", content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new("assistant", content)
    }
}

/// A single remembered fact owned by one owner.
///
/// Identity is the `id` slot: a merge overwrites `text` and `embedding`
/// in place while the slot (and its `created_at`) survives.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    /// Unique identifier for this record.
    pub id: String,
    /// Owner whose memory set this record belongs to.
    pub owner_id: OwnerId,
    /// The fact as a standalone statement.
    pub text: String,
    /// Embedding vector for semantic search. Empty when the embedding
    /// provider was unavailable at write time (degraded insert).
    #[serde(skip)]
    pub embedding: Vec<f32>,
    /// How this memory was created.
    pub kind: MemoryKind,
    /// Optional topical category.
    pub category: Option<MemoryCategory>,
    /// Confidence score in [0, 1]. Explicit 1.0 > intuited 0.8.
    /// Metadata only; never used for ranking or decay.
    pub confidence: f64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-update timestamp.
    pub updated_at: String,
}

/// How a memory was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryKind {
    /// User explicitly asked to remember this.
    Explicit,
    /// Inferred by the summarization/extraction pipeline.
    Intuited,
}

impl MemoryKind {
    /// Convert to string for storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryKind::Explicit => "explicit",
            MemoryKind::Intuited => "intuited",
        }
    }

    /// Parse from a storage string.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "explicit" => MemoryKind::Explicit,
            _ => MemoryKind::Intuited,
        }
    }

    /// Default confidence assigned to records of this kind.
    pub fn default_confidence(&self) -> f64 {
        match self {
            MemoryKind::Explicit => 1.0,
            MemoryKind::Intuited => 0.8,
        }
    }
}

/// Topical category of a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MemoryCategory {
    Personal,
    Professional,
    Preferences,
    Hobbies,
    Contact,
    Other,
}

impl MemoryCategory {
    /// Convert to string for storage and user-facing filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            MemoryCategory::Personal => "personal",
            MemoryCategory::Professional => "professional",
            MemoryCategory::Preferences => "preferences",
            MemoryCategory::Hobbies => "hobbies",
            MemoryCategory::Contact => "contact",
            MemoryCategory::Other => "other",
        }
    }

    /// Parse from a storage or user-supplied string. Unknown strings
    /// map to `Other` rather than failing.
    pub fn from_str_value(s: &str) -> Self {
        match s {
            "personal" => MemoryCategory::Personal,
            "professional" => MemoryCategory::Professional,
            "preferences" => MemoryCategory::Preferences,
            "hobbies" => MemoryCategory::Hobbies,
            "contact" => MemoryCategory::Contact,
            _ => MemoryCategory::Other,
        }
    }
}

/// A nearest-neighbor match reported by the persistent store.
///
/// `distance` semantics are fixed across the backend contract: lower is
/// more similar. The merge (0.5) and relevance (0.6) thresholds depend
/// on this being consistent across calls.
#[derive(Debug, Clone)]
pub struct NearestMatch {
    pub record: MemoryRecord,
    pub distance: f64,
}

/// Result of a merge-vs-insert decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// True when an existing record was overwritten instead of a new
    /// record being created.
    pub merged: bool,
    /// The text now stored (always the newest phrasing).
    pub final_text: String,
}
