// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Engram memory subsystem.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup, providing actionable error messages.

use serde::{Deserialize, Serialize};

/// Top-level Engram configuration.
///
/// Loaded from TOML files following the XDG hierarchy, with environment
/// variable overrides. All sections are optional and default to sensible
/// values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct EngramConfig {
    /// Agent identity and base prompt settings.
    #[serde(default)]
    pub agent: AgentConfig,

    /// Merge/retrieval thresholds and fuzzy-match settings.
    #[serde(default)]
    pub memory: MemoryConfig,

    /// Conversation window settings.
    #[serde(default)]
    pub context: ContextConfig,

    /// Summarization and extraction pipeline settings.
    #[serde(default)]
    pub pipeline: PipelineConfig,
}

/// Agent identity and behavior configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct AgentConfig {
    /// Display name of the agent. Also used by the summarization prompt
    /// to keep the assistant's name from being mistaken for the user's.
    #[serde(default = "default_agent_name")]
    pub name: String,

    /// Base system prompt prepended to every conversation window.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Logging level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            name: default_agent_name(),
            system_prompt: default_system_prompt(),
            log_level: default_log_level(),
        }
    }
}

fn default_agent_name() -> String {
    "Engram".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant with long-term memory of the user.".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Memory coordinator and retriever configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MemoryConfig {
    /// Nearest-neighbor distance below which a new memory merges into
    /// the existing record instead of inserting (lower = more similar).
    #[serde(default = "default_merge_distance_threshold")]
    pub merge_distance_threshold: f64,

    /// Distance below which a retrieval candidate counts as relevant.
    #[serde(default = "default_relevance_distance_threshold")]
    pub relevance_distance_threshold: f64,

    /// Default number of candidates fetched per retrieval.
    #[serde(default = "default_max_retrieval_results")]
    pub max_retrieval_results: usize,

    /// Per-token-pair similarity threshold for the fuzzy fallback path.
    #[serde(default = "default_fuzzy_token_threshold")]
    pub fuzzy_token_threshold: f64,

    /// Minimum fraction of query terms that must appear in a candidate
    /// for the fuzzy fallback to keep it.
    #[serde(default = "default_min_term_overlap")]
    pub min_term_overlap: f64,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            merge_distance_threshold: default_merge_distance_threshold(),
            relevance_distance_threshold: default_relevance_distance_threshold(),
            max_retrieval_results: default_max_retrieval_results(),
            fuzzy_token_threshold: default_fuzzy_token_threshold(),
            min_term_overlap: default_min_term_overlap(),
        }
    }
}

fn default_merge_distance_threshold() -> f64 {
    0.5
}

fn default_relevance_distance_threshold() -> f64 {
    0.6
}

fn default_max_retrieval_results() -> usize {
    5
}

fn default_fuzzy_token_threshold() -> f64 {
    0.85
}

fn default_min_term_overlap() -> f64 {
    0.25
}

/// Conversation window configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ContextConfig {
    /// Maximum number of messages kept in the live window, including
    /// the pinned system turn.
    #[serde(default = "default_context_length")]
    pub context_length: usize,

    /// Maximum length of a user-supplied custom prompt suffix.
    #[serde(default = "default_max_custom_prompt_chars")]
    pub max_custom_prompt_chars: usize,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            context_length: default_context_length(),
            max_custom_prompt_chars: default_max_custom_prompt_chars(),
        }
    }
}

fn default_context_length() -> usize {
    20
}

fn default_max_custom_prompt_chars() -> usize {
    500
}

/// Summarization and extraction pipeline configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct PipelineConfig {
    /// Messages since the last summary that trip the pipeline.
    #[serde(default = "default_message_trigger_count")]
    pub message_trigger_count: u32,

    /// Hours of inactivity that trip the pipeline.
    #[serde(default = "default_idle_trigger_hours")]
    pub idle_trigger_hours: u64,

    /// Window entries per chunk in hierarchical summarization.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Max tokens for each summarization completion call.
    #[serde(default = "default_summary_max_tokens")]
    pub summary_max_tokens: u32,

    /// Max tokens for the fact-extraction completion call.
    #[serde(default = "default_extraction_max_tokens")]
    pub extraction_max_tokens: u32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            message_trigger_count: default_message_trigger_count(),
            idle_trigger_hours: default_idle_trigger_hours(),
            chunk_size: default_chunk_size(),
            summary_max_tokens: default_summary_max_tokens(),
            extraction_max_tokens: default_extraction_max_tokens(),
        }
    }
}

fn default_message_trigger_count() -> u32 {
    3
}

fn default_idle_trigger_hours() -> u64 {
    8
}

fn default_chunk_size() -> usize {
    10
}

fn default_summary_max_tokens() -> u32 {
    512
}

fn default_extraction_max_tokens() -> u32 {
    512
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_constants() {
        let config = EngramConfig::default();
        assert_eq!(config.memory.merge_distance_threshold, 0.5);
        assert_eq!(config.memory.relevance_distance_threshold, 0.6);
        assert_eq!(config.memory.fuzzy_token_threshold, 0.85);
        assert_eq!(config.memory.min_term_overlap, 0.25);
        assert_eq!(config.context.context_length, 20);
        assert_eq!(config.context.max_custom_prompt_chars, 500);
        assert_eq!(config.pipeline.message_trigger_count, 3);
        assert_eq!(config.pipeline.idle_trigger_hours, 8);
        assert_eq!(config.pipeline.chunk_size, 10);
    }

    #[test]
    fn agent_defaults() {
        let agent = AgentConfig::default();
        assert_eq!(agent.name, "Engram");
        assert_eq!(agent.log_level, "info");
        assert!(!agent.system_prompt.is_empty());
    }
}
