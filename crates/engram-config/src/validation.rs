// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as threshold ranges and minimum window sizes.

use crate::model::EngramConfig;

/// A single configuration validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ConfigError {
    pub message: String,
}

impl ConfigError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)`
/// with all collected validation errors (does not fail fast).
pub fn validate_config(config: &EngramConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    for (name, value) in [
        (
            "memory.merge_distance_threshold",
            config.memory.merge_distance_threshold,
        ),
        (
            "memory.relevance_distance_threshold",
            config.memory.relevance_distance_threshold,
        ),
        (
            "memory.fuzzy_token_threshold",
            config.memory.fuzzy_token_threshold,
        ),
    ] {
        if !(value > 0.0 && value <= 1.0) {
            errors.push(ConfigError::new(format!(
                "{name} must be in (0.0, 1.0], got {value}"
            )));
        }
    }

    if !(0.0..=1.0).contains(&config.memory.min_term_overlap) {
        errors.push(ConfigError::new(format!(
            "memory.min_term_overlap must be in [0.0, 1.0], got {}",
            config.memory.min_term_overlap
        )));
    }

    if config.memory.max_retrieval_results == 0 {
        errors.push(ConfigError::new(
            "memory.max_retrieval_results must be at least 1",
        ));
    }

    // Window needs room for the pinned system turn plus at least one entry.
    if config.context.context_length < 2 {
        errors.push(ConfigError::new(format!(
            "context.context_length must be at least 2, got {}",
            config.context.context_length
        )));
    }

    if config.pipeline.message_trigger_count == 0 {
        errors.push(ConfigError::new(
            "pipeline.message_trigger_count must be at least 1",
        ));
    }

    if config.pipeline.chunk_size == 0 {
        errors.push(ConfigError::new("pipeline.chunk_size must be at least 1"));
    }

    if config.agent.system_prompt.trim().is_empty() {
        errors.push(ConfigError::new("agent.system_prompt must not be empty"));
    }

    let level = config.agent.log_level.as_str();
    if !["trace", "debug", "info", "warn", "error"].contains(&level) {
        errors.push(ConfigError::new(format!(
            "agent.log_level must be one of trace/debug/info/warn/error, got `{level}`"
        )));
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        let config = EngramConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn out_of_range_threshold_rejected() {
        let mut config = EngramConfig::default();
        config.memory.merge_distance_threshold = 1.5;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("merge_distance_threshold")));
    }

    #[test]
    fn zero_threshold_rejected() {
        let mut config = EngramConfig::default();
        config.memory.relevance_distance_threshold = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn tiny_window_rejected() {
        let mut config = EngramConfig::default();
        config.context.context_length = 1;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.iter().any(|e| e.message.contains("context_length")));
    }

    #[test]
    fn bad_log_level_rejected() {
        let mut config = EngramConfig::default();
        config.agent.log_level = "verbose".into();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn errors_are_collected_not_fail_fast() {
        let mut config = EngramConfig::default();
        config.memory.merge_distance_threshold = 0.0;
        config.pipeline.chunk_size = 0;
        config.context.context_length = 0;
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.len() >= 3);
    }
}
