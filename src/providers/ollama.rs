//! Ollama provider implementation for Mikoko Guardian
//!
//! This module implements the Provider trait for Ollama, connecting to a local
//! or remote Ollama server to generate completions with tool calling support.

use crate::config::{GenerationConfig, OllamaConfig};
use crate::error::{MikokoError, Result};
use crate::providers::{CompletionResponse, FunctionCall, Message, Provider, TokenUsage, ToolCall};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Ollama API provider
///
/// Sends non-streaming `/api/chat` requests with the configured sampling
/// options and maps tool calls back into provider-neutral messages.
///
/// # Examples
///
/// ```no_run
/// use mikoko::config::{GenerationConfig, OllamaConfig};
/// use mikoko::providers::{OllamaProvider, Provider, Message};
///
/// # async fn example() -> mikoko::error::Result<()> {
/// let provider = OllamaProvider::new(OllamaConfig::default(), GenerationConfig::default())?;
/// let messages = vec![Message::user("Habari! Which mangroves grow at Vanga?")];
/// let completion = provider.complete(&messages, &[]).await?;
/// let message = completion.message;
/// # Ok(())
/// # }
/// ```
pub struct OllamaProvider {
    client: Client,
    config: OllamaConfig,
    generation: GenerationConfig,
}

/// Request structure for Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    messages: Vec<OllamaMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<OllamaTool>,
    stream: bool,
    options: OllamaOptions,
}

/// Sampling options understood by Ollama
#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Message structure for Ollama API
#[derive(Debug, Serialize, Deserialize)]
struct OllamaMessage {
    role: String,
    #[serde(default)]
    content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<OllamaToolCall>>,
}

/// Tool definition for Ollama API
#[derive(Debug, Serialize)]
struct OllamaTool {
    r#type: String,
    function: OllamaFunction,
}

/// Function definition for Ollama tools
#[derive(Debug, Serialize)]
struct OllamaFunction {
    name: String,
    description: String,
    parameters: serde_json::Value,
}

/// Tool call in Ollama format
#[derive(Debug, Serialize, Deserialize)]
struct OllamaToolCall {
    #[serde(default)]
    id: String,
    #[serde(default = "default_tool_type")]
    r#type: String,
    function: OllamaFunctionCall,
}

/// Function call details in Ollama format
#[derive(Debug, Serialize, Deserialize)]
struct OllamaFunctionCall {
    name: String,
    #[serde(default)]
    arguments: serde_json::Value,
}

fn default_tool_type() -> String {
    "function".to_string()
}

/// Response structure from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    message: OllamaMessage,
    #[serde(default)]
    done: bool,
    #[serde(default)]
    prompt_eval_count: usize,
    #[serde(default)]
    eval_count: usize,
}

impl OllamaProvider {
    /// Create a new Ollama provider instance
    ///
    /// # Arguments
    ///
    /// * `config` - Ollama host, model and request timeout
    /// * `generation` - Sampling options sent with every request
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::config::{GenerationConfig, OllamaConfig};
    /// use mikoko::providers::OllamaProvider;
    ///
    /// let provider = OllamaProvider::new(OllamaConfig::default(), GenerationConfig::default());
    /// assert!(provider.is_ok());
    /// ```
    pub fn new(config: OllamaConfig, generation: GenerationConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("mikoko/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| MikokoError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Ollama provider: host={}, model={}",
            config.host,
            config.model
        );

        Ok(Self {
            client,
            config,
            generation,
        })
    }

    fn chat_url(&self) -> String {
        format!("{}/api/chat", self.config.host.trim_end_matches('/'))
    }

    /// Convert conversation messages to Ollama format
    fn convert_messages(&self, messages: &[Message]) -> Vec<OllamaMessage> {
        let validated_messages = crate::providers::validate_message_sequence(messages);
        validated_messages
            .iter()
            .filter_map(|m| {
                // Skip messages without content (unless they have tool calls)
                if m.content.is_none() && m.tool_calls.is_none() {
                    return None;
                }

                let tool_calls = m.tool_calls.as_ref().map(|calls| {
                    calls
                        .iter()
                        .map(|tc| OllamaToolCall {
                            id: tc.id.clone(),
                            r#type: "function".to_string(),
                            function: OllamaFunctionCall {
                                name: tc.function.name.clone(),
                                arguments: serde_json::from_str(&tc.function.arguments)
                                    .unwrap_or(serde_json::Value::Object(serde_json::Map::new())),
                            },
                        })
                        .collect()
                });

                Some(OllamaMessage {
                    role: m.role.clone(),
                    content: m.content.clone().unwrap_or_default(),
                    tool_calls,
                })
            })
            .collect()
    }

    /// Convert tool schemas to Ollama format
    fn convert_tools(&self, tools: &[serde_json::Value]) -> Vec<OllamaTool> {
        tools
            .iter()
            .filter_map(|t| {
                let obj = t.as_object()?;
                let name = obj.get("name")?.as_str()?.to_string();
                let description = obj.get("description")?.as_str()?.to_string();
                let parameters = obj.get("parameters")?.clone();

                Some(OllamaTool {
                    r#type: "function".to_string(),
                    function: OllamaFunction {
                        name,
                        description,
                        parameters,
                    },
                })
            })
            .collect()
    }

    /// Convert Ollama response message back to a conversation message
    fn convert_response_message(&self, ollama_msg: OllamaMessage) -> Message {
        match ollama_msg.tool_calls {
            Some(tool_calls) if !tool_calls.is_empty() => {
                let stamp = std::time::SystemTime::now()
                    .duration_since(std::time::UNIX_EPOCH)
                    .unwrap_or_default()
                    .as_millis();
                let converted_calls: Vec<ToolCall> = tool_calls
                    .into_iter()
                    .enumerate()
                    .map(|(idx, tc)| ToolCall {
                        // Ollama usually omits ids
                        id: if tc.id.is_empty() {
                            format!("call_{}_{}", stamp, idx)
                        } else {
                            tc.id
                        },
                        function: FunctionCall {
                            name: tc.function.name,
                            arguments: serde_json::to_string(&tc.function.arguments)
                                .unwrap_or_else(|_| "{}".to_string()),
                        },
                    })
                    .collect();

                Message::assistant_with_tools(converted_calls)
            }
            _ => Message::assistant(ollama_msg.content),
        }
    }
}

#[async_trait]
impl Provider for OllamaProvider {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<CompletionResponse> {
        let ollama_request = OllamaRequest {
            model: self.config.model.clone(),
            messages: self.convert_messages(messages),
            tools: self.convert_tools(tools),
            stream: false,
            options: OllamaOptions {
                temperature: self.generation.temperature,
                num_predict: self.generation.max_output_tokens,
            },
        };

        tracing::debug!(
            "Sending Ollama request: {} messages, {} tools",
            ollama_request.messages.len(),
            ollama_request.tools.len()
        );

        let response = self
            .client
            .post(self.chat_url())
            .json(&ollama_request)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Ollama request failed: {}", e);
                MikokoError::Provider(format!("Ollama request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Ollama returned error {}: {}", status, error_text);
            return Err(MikokoError::Provider(format!(
                "Ollama returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let ollama_response: OllamaResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Ollama response: {}", e);
            MikokoError::Provider(format!("Failed to parse Ollama response: {}", e))
        })?;

        tracing::debug!(
            "Ollama response: done={}, prompt_tokens={}, completion_tokens={}",
            ollama_response.done,
            ollama_response.prompt_eval_count,
            ollama_response.eval_count
        );

        let message = self.convert_response_message(ollama_response.message);

        let response = if ollama_response.prompt_eval_count > 0 || ollama_response.eval_count > 0 {
            let usage = TokenUsage::new(
                ollama_response.prompt_eval_count,
                ollama_response.eval_count,
            );
            CompletionResponse::with_usage(message, usage)
        } else {
            CompletionResponse::new(message)
        };

        Ok(response)
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}
