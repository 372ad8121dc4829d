// SPDX-FileCopyrightText: 2026 Engram Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Engram memory subsystem.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use engram_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("Agent name: {}", config.agent.name);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::EngramConfig;
pub use validation::{validate_config, ConfigError};

/// Errors produced by the high-level load entry points.
#[derive(Debug, thiserror::Error)]
pub enum ConfigLoadError {
    /// TOML parsing or merging failed.
    #[error("failed to load configuration: {0}")]
    Figment(#[from] Box<figment::Error>),

    /// The configuration deserialized but failed semantic validation.
    #[error("invalid configuration: {}", format_errors(.0))]
    Invalid(Vec<ConfigError>),
}

fn format_errors(errors: &[ConfigError]) -> String {
    errors
        .iter()
        .map(|e| e.message.clone())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Load configuration from the XDG hierarchy and validate it.
pub fn load_and_validate() -> Result<EngramConfig, ConfigLoadError> {
    let config = loader::load_config().map_err(Box::new)?;
    validation::validate_config(&config).map_err(ConfigLoadError::Invalid)?;
    Ok(config)
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<EngramConfig, ConfigLoadError> {
    let config = loader::load_config_from_str(toml_content).map_err(Box::new)?;
    validation::validate_config(&config).map_err(ConfigLoadError::Invalid)?;
    Ok(config)
}
