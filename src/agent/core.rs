//! Agent core implementation with the tool-calling loop
//!
//! This module implements the conversational loop that:
//! - Sends the conversation and tool definitions to the provider
//! - Executes tool calls requested by the provider
//! - Enforces iteration limits and a per-turn timeout
//! - Keeps conversation memory across user turns

use crate::config::AgentConfig;
use crate::error::{MikokoError, Result};
use crate::prompts;
use crate::providers::{Provider, ToolCall};
use crate::tools::{ToolRegistry, ToolResult};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use super::Conversation;

/// The Mikoko Guardian conversational agent
///
/// The agent owns one conversation for its lifetime. Each call to
/// [`Agent::execute`] is one user turn; a turn that fails leaves the
/// conversation exactly as it was before the turn started.
///
/// # Examples
///
/// ```no_run
/// use mikoko::agent::Agent;
/// use mikoko::config::Config;
/// use mikoko::domain::Catalog;
/// use mikoko::providers::create_provider;
/// use mikoko::tools::ToolRegistryBuilder;
/// use std::sync::Arc;
///
/// # async fn example() -> mikoko::error::Result<()> {
/// let config = Config::default();
/// let provider = create_provider(&config.provider, &config.generation)?;
/// let tools = ToolRegistryBuilder::new(Arc::new(Catalog::kenya_coast()))
///     .with_provider(Arc::clone(&provider))
///     .build();
///
/// let mut agent = Agent::new(provider, tools, config.agent)?;
/// let answer = agent.execute("How much carbon do 10 ha of mature mangroves store?").await?;
/// println!("{}", answer);
/// # Ok(())
/// # }
/// ```
pub struct Agent {
    provider: Arc<dyn Provider>,
    conversation: Conversation,
    tools: ToolRegistry,
    config: AgentConfig,
    system_prompt: String,
}

impl Agent {
    /// Creates a new agent with the Mikoko Guardian system prompt
    ///
    /// # Errors
    ///
    /// Returns `MikokoError::Config` if `max_turns` is zero
    pub fn new(
        provider: Arc<dyn Provider>,
        tools: ToolRegistry,
        config: AgentConfig,
    ) -> Result<Self> {
        Self::with_system_prompt(provider, tools, config, prompts::build_system_prompt())
    }

    /// Creates a new agent with a custom system prompt
    ///
    /// # Errors
    ///
    /// Returns `MikokoError::Config` if `max_turns` is zero
    pub fn with_system_prompt(
        provider: Arc<dyn Provider>,
        tools: ToolRegistry,
        config: AgentConfig,
        system_prompt: impl Into<String>,
    ) -> Result<Self> {
        if config.max_turns == 0 {
            return Err(
                MikokoError::Config("max_turns must be greater than 0".to_string()).into(),
            );
        }

        let system_prompt = system_prompt.into();
        let mut conversation = Conversation::from_config(&config.conversation);
        conversation.add_system_message(system_prompt.clone());

        debug!("Created agent with {} tools", tools.len());

        Ok(Self {
            provider,
            conversation,
            tools,
            config,
            system_prompt,
        })
    }

    /// Runs one user turn and returns the assistant's final text
    ///
    /// # Errors
    ///
    /// - `MikokoError::MaxIterationsExceeded` if the model keeps calling tools
    ///   past `max_turns`
    /// - `MikokoError::Timeout` if the turn exceeds `timeout_seconds`
    /// - `MikokoError::Provider` if a provider call fails or returns neither
    ///   text nor tool calls
    pub async fn execute(&mut self, user_prompt: impl Into<String>) -> Result<String> {
        let start_time = Instant::now();
        let timeout_seconds = self.config.timeout_seconds;
        let snapshot = self.conversation.clone();

        info!("Starting agent turn");

        let outcome = tokio::time::timeout(
            Duration::from_secs(timeout_seconds),
            self.run_turn(user_prompt.into()),
        )
        .await;

        let result = match outcome {
            Ok(result) => result,
            Err(_) => {
                warn!("Agent turn timed out after {} seconds", timeout_seconds);
                Err(MikokoError::Timeout(timeout_seconds).into())
            }
        };

        match &result {
            Ok(_) => info!(
                "Agent turn completed in {:.1} seconds",
                start_time.elapsed().as_secs_f64()
            ),
            Err(e) => {
                warn!("Agent turn failed, restoring conversation: {}", e);
                self.conversation = snapshot;
            }
        }

        result
    }

    async fn run_turn(&mut self, user_prompt: String) -> Result<String> {
        self.conversation.add_user_message(user_prompt);
        let tool_definitions = self.tools.all_definitions();

        for iteration in 1..=self.config.max_turns {
            debug!(
                "Iteration {}/{}, tokens: {}/{}",
                iteration,
                self.config.max_turns,
                self.conversation.token_count(),
                self.conversation.max_tokens()
            );

            let completion = self
                .provider
                .complete(self.conversation.messages(), &tool_definitions)
                .await?;
            if let Some(usage) = &completion.usage {
                self.conversation.update_from_provider_usage(usage);
            }

            let message = completion.message;

            if let Some(tool_calls) = message.tool_calls.filter(|calls| !calls.is_empty()) {
                debug!("Executing {} tool calls", tool_calls.len());
                self.conversation.add_assistant_tool_calls(tool_calls.clone());

                for tool_call in &tool_calls {
                    let result = self.execute_tool_call(tool_call).await;
                    self.conversation
                        .add_tool_result(&tool_call.id, result.to_message());
                }
                continue;
            }

            return match message.content {
                Some(content) => {
                    self.conversation.add_assistant_message(content.clone());
                    Ok(content)
                }
                None => {
                    warn!("Provider returned neither content nor tool calls");
                    Err(MikokoError::Provider(
                        "Provider returned invalid response (no content or tool calls)"
                            .to_string(),
                    )
                    .into())
                }
            };
        }

        warn!("Maximum iterations ({}) exceeded", self.config.max_turns);
        Err(MikokoError::MaxIterationsExceeded {
            limit: self.config.max_turns,
            message: format!(
                "Agent exceeded maximum iteration limit of {}",
                self.config.max_turns
            ),
        }
        .into())
    }

    /// Executes a single tool call
    ///
    /// Every failure, including an unknown tool name or unparseable
    /// arguments, becomes a failed `ToolResult` for the model to read.
    async fn execute_tool_call(&self, tool_call: &ToolCall) -> ToolResult {
        let tool_name = &tool_call.function.name;
        debug!("Executing tool: {}", tool_name);

        let Some(tool_executor) = self.tools.get(tool_name) else {
            warn!("Model requested unknown tool: {}", tool_name);
            return ToolResult::failure(&MikokoError::InvalidInput(format!(
                "Unknown tool '{}'. Available tools: {}",
                tool_name,
                self.tools.names().join(", ")
            )));
        };

        let args: serde_json::Value = match serde_json::from_str(&tool_call.function.arguments) {
            Ok(args) => args,
            Err(e) => {
                return ToolResult::failure(&MikokoError::InvalidInput(format!(
                    "Failed to parse tool arguments for '{}': {}",
                    tool_name, e
                )))
            }
        };

        let result = match tool_executor.execute(args).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool '{}' execution failed: {}", tool_name, e);
                ToolResult::failure(&MikokoError::Tool(format!(
                    "Tool '{}' execution failed: {}",
                    tool_name, e
                )))
            }
        };

        let max_output_size = self.config.tools.max_output_size;
        let original_len = result.output.len();
        let result = result.truncate_if_needed(max_output_size);
        if result.truncated {
            debug!(
                "Tool output truncated from {} to {} bytes",
                original_len, max_output_size
            );
        }

        result
    }

    /// Forgets the conversation, keeping only the system prompt
    pub fn reset(&mut self) {
        self.conversation.clear();
        self.conversation
            .add_system_message(self.system_prompt.clone());
        info!("Conversation cleared");
    }

    /// Returns a reference to the conversation
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Returns the provider shared with the tools
    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Returns the number of registered tools
    pub fn num_tools(&self) -> usize {
        self.tools.len()
    }

    /// Registered tool names in sorted order
    pub fn tool_names(&self) -> Vec<String> {
        self.tools.names()
    }
}
