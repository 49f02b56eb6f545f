//! Test utilities for Mikoko Guardian
//!
//! Stub providers that stand in for the hosted model, plus configuration
//! and assertion helpers.

use crate::config::Config;
use crate::error::{MikokoError, Result};
use crate::providers::{CompletionResponse, FunctionCall, Message, Provider, ToolCall};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

/// Provider that replays a fixed script of replies and records requests
///
/// Each `complete` call pops the next scripted message. Once the script is
/// exhausted every call fails with a provider error.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    /// Replay the given replies in order
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Single plain-text reply
    pub fn text(reply: &str) -> Self {
        Self::new(vec![Message::assistant(reply)])
    }

    /// Message histories received so far, one entry per call
    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[serde_json::Value],
    ) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(CompletionResponse::new(reply)),
            None => Err(MikokoError::Provider("script exhausted".to_string()).into()),
        }
    }

    fn get_current_model(&self) -> Result<String> {
        Ok("scripted".to_string())
    }
}

/// Provider whose every call fails
pub struct FailingProvider;

#[async_trait]
impl Provider for FailingProvider {
    async fn complete(
        &self,
        _messages: &[Message],
        _tools: &[serde_json::Value],
    ) -> Result<CompletionResponse> {
        Err(MikokoError::Provider("connection refused".to_string()).into())
    }
}

/// Build an assistant message requesting one tool call
pub fn tool_call_message(id: &str, name: &str, arguments: serde_json::Value) -> Message {
    Message::assistant_with_tools(vec![ToolCall {
        id: id.to_string(),
        function: FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }])
}

/// Assert that an error contains the expected message
///
/// # Panics
///
/// Panics if the result is Ok or if the error doesn't contain the expected message
pub fn assert_error_contains<T>(result: std::result::Result<T, MikokoError>, expected: &str) {
    match result {
        Ok(_) => panic!("Expected error containing '{}' but got Ok", expected),
        Err(e) => {
            let error_msg = e.to_string();
            assert!(
                error_msg.contains(expected),
                "Error message '{}' does not contain '{}'",
                error_msg,
                expected
            );
        }
    }
}

/// Create a test configuration with tight agent limits
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.agent.max_turns = 5;
    config.agent.timeout_seconds = 10;
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_provider_replays_then_fails() {
        let provider = ScriptedProvider::text("Karibu");
        let first = provider.complete(&[Message::user("hi")], &[]).await.unwrap();
        assert_eq!(first.message.content.as_deref(), Some("Karibu"));
        assert!(provider.complete(&[], &[]).await.is_err());
        assert_eq!(provider.requests().len(), 2);
    }

    #[test]
    fn test_tool_call_message() {
        let msg = tool_call_message("c1", "plan_restoration", serde_json::json!({"location": "Vanga"}));
        let calls = msg.tool_calls.unwrap();
        assert_eq!(calls[0].function.name, "plan_restoration");
        assert_eq!(calls[0].function.arguments, r#"{"location":"Vanga"}"#);
    }

    #[test]
    fn test_assert_error_contains_success() {
        let result: std::result::Result<(), MikokoError> =
            Err(MikokoError::NotFound("Site 'Atlantis'".to_string()));
        assert_error_contains(result, "Atlantis");
    }

    #[test]
    #[should_panic(expected = "Expected error containing")]
    fn test_assert_error_contains_ok() {
        let result: std::result::Result<(), MikokoError> = Ok(());
        assert_error_contains(result, "error");
    }

    #[test]
    fn test_test_config_is_valid() {
        assert!(test_config().validate().is_ok());
    }
}
