//! Integration tests for the agent loop driving the mangrove tools
//!
//! A stub provider plays the model: it asks for tool calls and then answers
//! with text, while the real tools run against the seed catalog.

use std::sync::Arc;

use mikoko::config::AgentConfig;
use mikoko::domain::Catalog;
use mikoko::providers::Message;
use mikoko::tools::{ToolExecutor, ToolRegistryBuilder};
use mikoko::{Agent, MikokoError};

mod common;
use common::{first_tool_payload, tool_call, DownProvider, StubProvider};

fn agent_with(provider: Arc<StubProvider>) -> Agent {
    let tools = ToolRegistryBuilder::new(Arc::new(Catalog::kenya_coast()))
        .with_provider(provider.clone())
        .build();
    Agent::new(provider, tools, AgentConfig::default()).unwrap()
}

#[tokio::test]
async fn test_agent_returns_carbon_tool_json_to_model() {
    let provider = Arc::new(StubProvider::new(vec![
        tool_call(
            "call_carbon",
            "calculate_carbon_storage",
            serde_json::json!({"area": 10, "forest_age": "mature"}),
        ),
        Message::assistant("Ten hectares of mature mangroves hold about 3,920 tonnes of carbon."),
    ]));
    let mut agent = agent_with(provider.clone());

    let answer = agent
        .execute("How much carbon is in 10 ha of mature forest?")
        .await
        .unwrap();
    assert_eq!(
        answer,
        "Ten hectares of mature mangroves hold about 3,920 tonnes of carbon."
    );

    let requests = provider.requests();
    assert_eq!(requests.len(), 2);
    let payload = first_tool_payload(&requests[1]);
    assert_eq!(payload["status"], "success");
    assert_eq!(payload["report"]["total_carbon_tons"], 3920.0);
}

#[tokio::test]
async fn test_not_found_is_a_tool_result_not_an_agent_error() {
    let provider = Arc::new(StubProvider::new(vec![
        tool_call(
            "call_site",
            "get_site_information",
            serde_json::json!({"location": "Atlantis"}),
        ),
        Message::assistant("I have no records for Atlantis."),
    ]));
    let mut agent = agent_with(provider.clone());

    let answer = agent.execute("Tell me about Atlantis").await.unwrap();
    assert_eq!(answer, "I have no records for Atlantis.");

    let payload = first_tool_payload(&provider.requests()[1]);
    assert_eq!(payload["status"], "error");
    assert_eq!(payload["error_kind"], "not_found");
    assert!(payload.get("report").is_none());
}

#[tokio::test]
async fn test_several_tool_calls_in_one_turn() {
    let provider = Arc::new(StubProvider::new(vec![
        tool_call(
            "call_site",
            "get_site_information",
            serde_json::json!({"location": "Vanga"}),
        ),
        tool_call(
            "call_plan",
            "plan_restoration",
            serde_json::json!({"location": "Vanga", "area_hectares": 4}),
        ),
        Message::assistant("Here is a plan for Vanga."),
    ]));
    let mut agent = agent_with(provider.clone());

    agent.execute("Plan 4 ha at Vanga").await.unwrap();

    let last_request = provider.requests().pop().unwrap();
    let tool_messages: Vec<_> = last_request.iter().filter(|m| m.role == "tool").collect();
    assert_eq!(tool_messages.len(), 2);
    assert_eq!(tool_messages[1].tool_call_id.as_deref(), Some("call_plan"));
}

#[tokio::test]
async fn test_general_question_tool_answers_verbatim() {
    let provider = Arc::new(StubProvider::new(vec![
        tool_call(
            "call_q",
            "answer_general_question",
            serde_json::json!({"question": "What is blue carbon?"}),
        ),
        Message::assistant("Blue carbon is carbon stored in coastal ecosystems."),
        Message::assistant("Mangroves store blue carbon in their soils."),
    ]));
    let mut agent = agent_with(provider.clone());

    let answer = agent.execute("What is blue carbon?").await.unwrap();
    assert_eq!(answer, "Mangroves store blue carbon in their soils.");

    // Second call is the general-question delegation, third is the agent
    let requests = provider.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[1].len(), 1);
    let payload = first_tool_payload(&requests[2]);
    assert_eq!(
        payload["report"]["answer"],
        "Blue carbon is carbon stored in coastal ecosystems."
    );
}

#[tokio::test]
async fn test_general_question_maps_provider_failure() {
    let tools = ToolRegistryBuilder::new(Arc::new(Catalog::kenya_coast()))
        .with_provider(Arc::new(DownProvider))
        .build();
    let tool = tools.get("answer_general_question").unwrap();

    let result = tool
        .execute(serde_json::json!({"question": "Why are mangroves important?"}))
        .await
        .unwrap();
    assert!(!result.success);
    assert_eq!(result.error_kind.as_deref(), Some("upstream_failure"));
}

#[tokio::test]
async fn test_agent_surfaces_provider_failure_once() {
    let tools = ToolRegistryBuilder::new(Arc::new(Catalog::kenya_coast())).build();
    let mut agent = Agent::new(Arc::new(DownProvider), tools, AgentConfig::default()).unwrap();

    let err = agent.execute("Habari").await.unwrap_err();
    assert!(matches!(
        err.downcast_ref::<MikokoError>(),
        Some(MikokoError::Provider(_))
    ));
    assert_eq!(agent.conversation().len(), 1);
}
