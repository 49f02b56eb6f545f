//! Base provider trait and common types for Mikoko Guardian
//!
//! This module defines the Provider trait that the hosted model back end
//! implements, along with the message, tool call and usage types exchanged
//! with it.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Message structure for conversation
///
/// Represents a message in the conversation with the AI provider.
/// Messages can be from the user, assistant, system, or tool results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system, tool)
    pub role: String,
    /// Content of the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Optional tool calls in the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Optional tool call ID (for tool result messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::providers::Message;
    ///
    /// let msg = Message::user("Which mangroves grow at Gazi Bay?");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// Creates a new tool result message
    ///
    /// # Arguments
    ///
    /// * `tool_call_id` - The ID of the tool call this result corresponds to
    /// * `content` - The tool execution result content
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::providers::Message;
    ///
    /// let msg = Message::tool_result("call_123", r#"{"status":"success"}"#);
    /// assert_eq!(msg.role, "tool");
    /// assert_eq!(msg.tool_call_id, Some("call_123".to_string()));
    /// ```
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".to_string(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(tool_call_id.into()),
        }
    }

    /// Creates an assistant message with tool calls
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::providers::{Message, ToolCall, FunctionCall};
    ///
    /// let tool_call = ToolCall {
    ///     id: "call_123".to_string(),
    ///     function: FunctionCall {
    ///         name: "identify_mangrove_species".to_string(),
    ///         arguments: r#"{"species_name":"Mkoko"}"#.to_string(),
    ///     },
    /// };
    /// let msg = Message::assistant_with_tools(vec![tool_call]);
    /// assert!(msg.tool_calls.is_some());
    /// ```
    pub fn assistant_with_tools(tool_calls: Vec<ToolCall>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: None,
            tool_calls: Some(tool_calls),
            tool_call_id: None,
        }
    }
}

/// Function call information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function/tool to call
    pub name: String,
    /// Arguments for the function (as JSON string)
    pub arguments: String,
}

/// Tool call structure
///
/// Represents a request from the AI to execute a tool with specific arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Function call details
    pub function: FunctionCall,
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

/// Completion response with message and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message from the AI
    pub message: Message,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(message: Message, usage: TokenUsage) -> Self {
        Self {
            message,
            usage: Some(usage),
        }
    }
}

/// Provider trait for the hosted model back end
///
/// The agent loop and the general-question tool only see this trait, so
/// tests substitute stub implementations.
///
/// # Examples
///
/// ```no_run
/// use mikoko::providers::{Provider, Message, CompletionResponse};
/// use mikoko::error::Result;
/// use async_trait::async_trait;
///
/// struct EchoProvider;
///
/// #[async_trait]
/// impl Provider for EchoProvider {
///     async fn complete(
///         &self,
///         messages: &[Message],
///         _tools: &[serde_json::Value],
///     ) -> Result<CompletionResponse> {
///         let last = messages.last().and_then(|m| m.content.clone()).unwrap_or_default();
///         Ok(CompletionResponse::new(Message::assistant(last)))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation with the given messages and available tools
    ///
    /// # Arguments
    ///
    /// * `messages` - Conversation history
    /// * `tools` - Available tools for the assistant to use (as JSON schemas)
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or response is invalid
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<CompletionResponse>;

    /// Get the name of the currently active model
    ///
    /// # Default Implementation
    ///
    /// The default implementation returns an error.
    fn get_current_model(&self) -> Result<String> {
        Err(crate::error::MikokoError::Provider(
            "Current model information is not available from this provider".to_string(),
        )
        .into())
    }
}

/// Drops tool messages that do not answer a tool call in the history
///
/// Providers reject tool results whose `tool_call_id` has no matching
/// assistant tool call, which can happen after conversation pruning.
pub fn validate_message_sequence(messages: &[Message]) -> Vec<Message> {
    use std::collections::HashSet;

    let valid_tool_ids: HashSet<&str> = messages
        .iter()
        .filter(|m| m.role == "assistant")
        .filter_map(|m| m.tool_calls.as_ref())
        .flatten()
        .map(|tc| tc.id.as_str())
        .collect();

    messages
        .iter()
        .filter(|message| {
            if message.role != "tool" {
                return true;
            }
            match &message.tool_call_id {
                Some(id) if valid_tool_ids.contains(id.as_str()) => true,
                Some(id) => {
                    tracing::warn!("Dropping orphan tool message with tool_call_id: {}", id);
                    false
                }
                None => {
                    tracing::warn!("Dropping tool message without tool_call_id");
                    false
                }
            }
        })
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn call(id: &str) -> ToolCall {
        ToolCall {
            id: id.to_string(),
            function: FunctionCall {
                name: "get_site_information".to_string(),
                arguments: r#"{"location":"Vanga"}"#.to_string(),
            },
        }
    }

    #[test]
    fn test_message_constructors() {
        assert_eq!(Message::user("a").role, "user");
        assert_eq!(Message::assistant("b").role, "assistant");
        assert_eq!(Message::system("c").role, "system");
        let tool = Message::tool_result("id", "d");
        assert_eq!(tool.role, "tool");
        assert_eq!(tool.content, Some("d".to_string()));
    }

    #[test]
    fn test_assistant_with_tools_has_no_content() {
        let msg = Message::assistant_with_tools(vec![call("call_1")]);
        assert!(msg.content.is_none());
        assert_eq!(msg.tool_calls.unwrap().len(), 1);
    }

    #[test]
    fn test_message_serialization_skips_none() {
        let json = serde_json::to_value(Message::user("hi")).unwrap();
        assert!(json.get("tool_calls").is_none());
        assert!(json.get("tool_call_id").is_none());
    }

    #[test]
    fn test_completion_response_usage() {
        let plain = CompletionResponse::new(Message::assistant("x"));
        assert!(plain.usage.is_none());
        let with = CompletionResponse::with_usage(Message::assistant("x"), TokenUsage::new(3, 4));
        assert_eq!(with.usage.unwrap().total_tokens, 7);
    }

    #[test]
    fn test_validate_keeps_paired_tool_result() {
        let messages = vec![
            Message::user("Tell me about Vanga"),
            Message::assistant_with_tools(vec![call("call_1")]),
            Message::tool_result("call_1", "{}"),
        ];
        assert_eq!(validate_message_sequence(&messages).len(), 3);
    }

    #[test]
    fn test_validate_drops_orphan_and_unlabelled_tool_results() {
        let mut unlabelled = Message::tool_result("x", "{}");
        unlabelled.tool_call_id = None;
        let messages = vec![
            Message::user("hi"),
            Message::tool_result("missing", "{}"),
            unlabelled,
        ];
        let validated = validate_message_sequence(&messages);
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].role, "user");
    }

    struct NoModelProvider;

    #[async_trait]
    impl Provider for NoModelProvider {
        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[serde_json::Value],
        ) -> Result<CompletionResponse> {
            Ok(CompletionResponse::new(Message::assistant("ok")))
        }
    }

    #[test]
    fn test_default_current_model_is_error() {
        assert!(NoModelProvider.get_current_model().is_err());
    }
}
