//! Provider module for Mikoko Guardian
//!
//! This module contains the model back end abstraction and the Ollama
//! implementation.

pub mod base;
pub mod ollama;

pub use base::{
    validate_message_sequence, CompletionResponse, FunctionCall, Message, Provider, TokenUsage,
    ToolCall,
};
pub use ollama::OllamaProvider;

use crate::config::{GenerationConfig, ProviderConfig};
use crate::error::{MikokoError, Result};
use std::sync::Arc;

/// Create a provider instance based on configuration
///
/// The provider is shared between the agent loop and the general-question
/// tool, so it is returned behind an `Arc`.
///
/// # Arguments
///
/// * `config` - Provider configuration
/// * `generation` - Sampling options applied to every request
///
/// # Errors
///
/// Returns error if provider type is invalid or initialization fails
pub fn create_provider(
    config: &ProviderConfig,
    generation: &GenerationConfig,
) -> Result<Arc<dyn Provider>> {
    match config.provider_type.as_str() {
        "ollama" => Ok(Arc::new(OllamaProvider::new(
            config.ollama.clone(),
            *generation,
        )?)),
        other => Err(MikokoError::Provider(format!("Unknown provider type: {}", other)).into()),
    }
}
