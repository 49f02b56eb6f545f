//! Error types for Mikoko Guardian
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Main error type for Mikoko Guardian operations
///
/// The first three variants are the domain errors reported back to the
/// conversation as structured "no result" signals. The remaining variants
/// cover configuration, provider, and agent-loop failures.
#[derive(Error, Debug)]
pub enum MikokoError {
    /// A species or site name did not match any catalog entry
    #[error("Not found: {0}")]
    NotFound(String),

    /// A tool argument was out of range or unrecognized
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The hosted model failed while answering a delegated question
    #[error("Upstream failure: {0}")]
    UpstreamFailure(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Provider-related errors (API calls, malformed responses, etc.)
    #[error("Provider error: {0}")]
    Provider(String),

    /// Tool execution errors
    #[error("Tool execution error: {0}")]
    Tool(String),

    /// Agent exceeded maximum iteration limit
    #[error("Agent exceeded maximum iterations: limit={limit}, {message}")]
    MaxIterationsExceeded {
        /// The configured iteration limit
        limit: usize,
        /// Additional context about the failure
        message: String,
    },

    /// Agent turn ran longer than the configured timeout
    #[error("Agent timed out after {0} seconds")]
    Timeout(u64),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl MikokoError {
    /// Short machine-readable kind used in tool error payloads
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::error::MikokoError;
    ///
    /// let err = MikokoError::NotFound("Atlantis".to_string());
    /// assert_eq!(err.kind(), "not_found");
    /// ```
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InvalidInput(_) => "invalid_input",
            Self::UpstreamFailure(_) => "upstream_failure",
            Self::Config(_) => "config",
            Self::Provider(_) => "provider",
            Self::Tool(_) => "tool",
            Self::MaxIterationsExceeded { .. } => "max_iterations_exceeded",
            Self::Timeout(_) => "timeout",
            Self::Io(_) => "io",
            Self::Serialization(_) => "serialization",
            Self::Yaml(_) => "yaml",
            Self::Http(_) => "http",
        }
    }

    /// Human-readable message without the variant prefix
    ///
    /// Domain variants return their payload as-is; other variants fall back
    /// to the full display string.
    pub fn message(&self) -> String {
        match self {
            Self::NotFound(msg) | Self::InvalidInput(msg) | Self::UpstreamFailure(msg) => {
                msg.clone()
            }
            other => other.to_string(),
        }
    }
}

/// Result type alias for Mikoko Guardian operations
///
/// This is a convenience alias that uses `anyhow::Error` as the error type,
/// allowing for rich error context and easy error propagation.
pub type Result<T> = anyhow::Result<T>;
