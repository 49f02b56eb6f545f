//! General question tool
//!
//! Delegates open-ended mangrove questions to the hosted model with an
//! expert framing prompt. The answer is returned verbatim; there is no
//! retry and no local fallback.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::DomainResult;
use crate::error::{MikokoError, Result};
use crate::prompts::build_expert_prompt;
use crate::providers::{Message, Provider};
use crate::tools::{parse_params, ToolExecutor, ToolResult};

/// Tool name exposed to the model
pub const TOOL_NAME: &str = "answer_general_question";

#[derive(Debug, Deserialize)]
struct QuestionParams {
    question: String,
}

/// Question and the model's answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneralAnswer {
    pub question: String,
    pub answer: String,
}

/// Answers free-text questions about mangroves, forests and carbon credits
pub struct GeneralQuestionTool {
    provider: Arc<dyn Provider>,
}

impl GeneralQuestionTool {
    /// Create the tool over a shared provider
    pub fn new(provider: Arc<dyn Provider>) -> Self {
        Self { provider }
    }

    /// Ask the model a single question
    ///
    /// The call carries no tools and no conversation history.
    ///
    /// # Errors
    ///
    /// - `MikokoError::InvalidInput` for a blank question
    /// - `MikokoError::UpstreamFailure` if the model call fails or returns
    ///   no text
    pub async fn answer(&self, question: &str) -> DomainResult<GeneralAnswer> {
        let question = question.trim();
        if question.is_empty() {
            return Err(MikokoError::InvalidInput(
                "Question must not be empty".to_string(),
            ));
        }

        let messages = [Message::user(build_expert_prompt(question))];
        let completion = self.provider.complete(&messages, &[]).await.map_err(|e| {
            tracing::warn!("General question delegation failed: {}", e);
            MikokoError::UpstreamFailure(format!("Unable to answer general question: {}", e))
        })?;

        match completion.message.content {
            Some(answer) if !answer.trim().is_empty() => Ok(GeneralAnswer {
                question: question.to_string(),
                answer,
            }),
            _ => Err(MikokoError::UpstreamFailure(
                "Unable to answer general question: the model returned no text".to_string(),
            )),
        }
    }
}

#[async_trait]
impl ToolExecutor for GeneralQuestionTool {
    fn tool_definition(&self) -> serde_json::Value {
        serde_json::json!({
            "name": TOOL_NAME,
            "description": "Answer a general question about mangroves, forests, carbon credits or environmental conservation on the Kenyan coast.",
            "parameters": {
                "type": "object",
                "properties": {
                    "question": {
                        "type": "string",
                        "description": "The question to answer"
                    }
                },
                "required": ["question"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: QuestionParams = match parse_params(args) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };

        ToolResult::from_domain(self.answer(&params.question).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{FailingProvider, ScriptedProvider};

    #[tokio::test]
    async fn test_answer_is_returned_verbatim() {
        let provider = Arc::new(ScriptedProvider::text("  Mangroves trap sediment.\n"));
        let tool = GeneralQuestionTool::new(provider.clone());

        let result = tool
            .execute(serde_json::json!({"question": "Why protect mangroves?"}))
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(json["report"]["answer"], "  Mangroves trap sediment.\n");
        assert_eq!(json["report"]["question"], "Why protect mangroves?");

        let sent = provider.requests();
        assert_eq!(sent.len(), 1);
        assert!(sent[0][0]
            .content
            .as_deref()
            .unwrap()
            .contains("mangrove conservation expert"));
    }

    #[tokio::test]
    async fn test_provider_failure_is_upstream_failure() {
        let tool = GeneralQuestionTool::new(Arc::new(FailingProvider));
        let result = tool
            .execute(serde_json::json!({"question": "What is blue carbon?"}))
            .await
            .unwrap();
        assert!(!result.success);
        assert_eq!(result.error_kind.as_deref(), Some("upstream_failure"));
    }

    #[tokio::test]
    async fn test_blank_question_is_invalid_input() {
        let provider = Arc::new(ScriptedProvider::text("unused"));
        let tool = GeneralQuestionTool::new(provider.clone());
        let err = tool.answer("   ").await.unwrap_err();
        assert!(matches!(err, MikokoError::InvalidInput(_)));
        assert!(provider.requests().is_empty());
    }
}
