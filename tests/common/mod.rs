use async_trait::async_trait;
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;

use mikoko::error::{MikokoError, Result};
use mikoko::providers::{CompletionResponse, FunctionCall, Message, Provider, ToolCall};

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}

/// Config pointing the Ollama provider at `host`
#[allow(dead_code)]
pub fn ollama_config_yaml(host: &str) -> String {
    format!(
        "provider:\n  type: ollama\n  ollama:\n    host: {}\n    model: test-model\n    request_timeout_seconds: 5\n",
        host
    )
}

/// Provider replaying scripted replies and recording every request
#[allow(dead_code)]
pub struct StubProvider {
    replies: Mutex<VecDeque<Message>>,
    requests: Mutex<Vec<Vec<Message>>>,
}

#[allow(dead_code)]
impl StubProvider {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for StubProvider {
    async fn complete(
        &self,
        messages: &[Message],
        _tools: &[serde_json::Value],
    ) -> Result<CompletionResponse> {
        self.requests.lock().unwrap().push(messages.to_vec());
        match self.replies.lock().unwrap().pop_front() {
            Some(reply) => Ok(CompletionResponse::new(reply)),
            None => Err(MikokoError::Provider("no scripted reply left".to_string()).into()),
        }
    }
}

/// Provider that is always unreachable
#[allow(dead_code)]
pub struct DownProvider;

#[async_trait]
impl Provider for DownProvider {
    async fn complete(
        &self,
        _messages: &[Message],
        _tools: &[serde_json::Value],
    ) -> Result<CompletionResponse> {
        Err(MikokoError::Provider("model endpoint unreachable".to_string()).into())
    }
}

#[allow(dead_code)]
pub fn tool_call(id: &str, name: &str, arguments: serde_json::Value) -> Message {
    Message::assistant_with_tools(vec![ToolCall {
        id: id.to_string(),
        function: FunctionCall {
            name: name.to_string(),
            arguments: arguments.to_string(),
        },
    }])
}

/// Parse the JSON content of the first tool message in a request
#[allow(dead_code)]
pub fn first_tool_payload(request: &[Message]) -> serde_json::Value {
    let content = request
        .iter()
        .find(|m| m.role == "tool")
        .and_then(|m| m.content.clone())
        .expect("request has no tool message");
    serde_json::from_str(&content).expect("tool output is not JSON")
}
