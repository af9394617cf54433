//! Error types
//!
//! Everything that can fail does so before a session starts. Once a
//! [`SimConfig`](crate::config::SimConfig) exists the simulation core is infallible.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading or validating a game configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A field is missing, malformed, or outside its allowed range.
    #[error("invalid configuration: {field}: {reason}")]
    InvalidConfiguration { field: String, reason: String },
    /// A color string could not be resolved to an RGB triple.
    #[error("invalid color specification: {spec:?}")]
    InvalidColorSpec { spec: String },
    /// The configuration file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    pub fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn color(spec: impl Into<String>) -> Self {
        Self::InvalidColorSpec { spec: spec.into() }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        // serde reports missing fields and type mismatches through the same error
        Self::invalid("<document>", err.to_string())
    }
}

/// Errors raised while loading a scripted input trace.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed input script: {0}")]
    Malformed(#[from] serde_json::Error),
}
