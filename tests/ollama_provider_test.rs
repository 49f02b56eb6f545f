use serde_json::json;
use std::sync::Arc;

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use mikoko::config::{AgentConfig, GenerationConfig, OllamaConfig};
use mikoko::domain::Catalog;
use mikoko::providers::{Message, OllamaProvider, Provider};
use mikoko::tools::ToolRegistryBuilder;
use mikoko::Agent;

fn provider_for(server: &MockServer) -> OllamaProvider {
    let config = OllamaConfig {
        host: format!("{}/", server.uri()),
        model: "test-model".to_string(),
        request_timeout_seconds: 5,
    };
    OllamaProvider::new(config, GenerationConfig::default()).unwrap()
}

/// Plain text reply with token counts maps to content and usage
#[tokio::test]
async fn test_text_completion_with_usage() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "stream": false,
            "options": { "temperature": 0.2, "num_predict": 250 }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "test-model",
            "message": { "role": "assistant", "content": "Mangroves protect the coast." },
            "done": true,
            "prompt_eval_count": 42,
            "eval_count": 7
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let completion = provider
        .complete(&[Message::user("Why do mangroves matter?")], &[])
        .await
        .unwrap();

    assert_eq!(
        completion.message.content.as_deref(),
        Some("Mangroves protect the coast.")
    );
    let usage = completion.usage.unwrap();
    assert_eq!(usage.prompt_tokens, 42);
    assert_eq!(usage.completion_tokens, 7);
}

/// Tool calls come back with generated ids and JSON-string arguments
#[tokio::test]
async fn test_tool_call_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "tools": [{
                "type": "function",
                "function": { "name": "identify_mangrove_species" }
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "function": {
                        "name": "identify_mangrove_species",
                        "arguments": { "species_name": "Mkoko" }
                    }
                }]
            },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let tools = vec![json!({
        "name": "identify_mangrove_species",
        "description": "Identify a mangrove species",
        "parameters": {
            "type": "object",
            "properties": { "species_name": { "type": "string" } },
            "required": ["species_name"]
        }
    })];

    let completion = provider
        .complete(&[Message::user("What is Mkoko?")], &tools)
        .await
        .unwrap();

    let calls = completion.message.tool_calls.unwrap();
    assert_eq!(calls.len(), 1);
    assert!(calls[0].id.starts_with("call_"));
    assert_eq!(calls[0].function.name, "identify_mangrove_species");
    let args: serde_json::Value = serde_json::from_str(&calls[0].function.arguments).unwrap();
    assert_eq!(args["species_name"], "Mkoko");
    assert!(completion.usage.is_none());
}

/// Non-success statuses become provider errors carrying the status
#[tokio::test]
async fn test_error_status_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_string("model not loaded"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider
        .complete(&[Message::user("Habari")], &[])
        .await
        .unwrap_err();

    let text = err.to_string();
    assert!(text.contains("500"));
    assert!(text.contains("model not loaded"));
}

/// Malformed bodies are reported rather than panicking
#[tokio::test]
async fn test_unparseable_body_is_provider_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = provider_for(&server);
    let err = provider.complete(&[], &[]).await.unwrap_err();
    assert!(err.to_string().contains("Failed to parse Ollama response"));
}

/// Full agent turn over HTTP: tool call, tool result, final answer
#[tokio::test]
async fn test_agent_turn_over_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": {
                "role": "assistant",
                "content": "",
                "tool_calls": [{
                    "function": {
                        "name": "get_site_information",
                        "arguments": { "location": "Gazi Bay" }
                    }
                }]
            },
            "done": true
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "messages": [{ "role": "system" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": { "role": "assistant", "content": "Gazi Bay is in Kwale County." },
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let provider: Arc<dyn Provider> = Arc::new(provider_for(&server));
    let tools = ToolRegistryBuilder::new(Arc::new(Catalog::kenya_coast()))
        .with_provider(Arc::clone(&provider))
        .build();
    let mut agent = Agent::new(provider, tools, AgentConfig::default()).unwrap();

    let answer = agent.execute("Tell me about Gazi Bay").await.unwrap();
    assert_eq!(answer, "Gazi Bay is in Kwale County.");
    assert!(agent
        .conversation()
        .messages()
        .iter()
        .any(|m| m.role == "tool"));
}
