// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Engram memory subsystem.

use thiserror::Error;

/// The primary error type used across all Engram adapter traits and core operations.
///
/// Provider and store failures are caught at the coordinator/retriever
/// boundary and either degrade to a fallback algorithm or surface as a
/// generic user-visible failure. Raw provider detail belongs in logs, not
/// in messages shown to end users.
#[derive(Debug, Error)]
pub enum EngramError {
    /// Configuration errors (invalid TOML, missing required fields, out-of-range values).
    #[error("configuration error: {0}")]
    Config(String),

    /// The embedding provider failed or returned no vector.
    #[error("embedding unavailable: {message}")]
    Embedding {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The completion provider failed.
    #[error("completion unavailable: {message}")]
    Completion {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The persistent record store failed (connection, query, serialization).
    #[error("store unavailable: {source}")]
    Store {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Caller-supplied input was rejected (empty query, prompt too long).
    #[error("validation error: {0}")]
    Validation(String),

    /// An external call exceeded its deadline. Adapters map hangs to this
    /// rather than blocking indefinitely.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl EngramError {
    /// Build an embedding error from any source error.
    pub fn embedding(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        EngramError::Embedding {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Build a completion error from any source error.
    pub fn completion(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        EngramError::Completion {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        let e = EngramError::Validation("query must not be empty".into());
        assert_eq!(e.to_string(), "validation error: query must not be empty");

        let e = EngramError::Embedding {
            message: "provider returned 503".into(),
            source: None,
        };
        assert_eq!(e.to_string(), "embedding unavailable: provider returned 503");

        let e = EngramError::Timeout {
            duration: std::time::Duration::from_secs(30),
        };
        assert!(e.to_string().contains("timed out"));
    }

    #[test]
    fn embedding_helper_wraps_source() {
        let io = std::io::Error::other("connection reset");
        let e = EngramError::embedding("embed call failed", io);
        match e {
            EngramError::Embedding { message, source } => {
                assert_eq!(message, "embed call failed");
                assert!(source.is_some());
            }
            other => panic!("expected Embedding, got {other:?}"),
        }
    }
}
