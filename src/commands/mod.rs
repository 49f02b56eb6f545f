/*!
Command handlers for the CLI

- `chat`: interactive chat with the agent
- `run`: send one prompt to the agent
- `ask`: ask the model a general question without the agent loop
- `lookup`: direct species, site, carbon and plan commands
- `show_config`: print the resolved configuration
*/

use crate::agent::Agent;
use crate::config::Config;
use crate::domain::Catalog;
use crate::error::Result;
use crate::providers::{create_provider, Provider};
use crate::tools::{ToolRegistry, ToolRegistryBuilder};
use std::sync::Arc;

pub mod lookup;
pub mod special_commands;

/// Build the full tool registry over the seed catalog
pub fn build_tools(config: &Config, provider: Arc<dyn Provider>) -> ToolRegistry {
    ToolRegistryBuilder::new(Arc::new(Catalog::kenya_coast()))
        .with_pricing(config.carbon.pricing())
        .with_provider(provider)
        .build()
}

/// Create the provider and an agent wired to all five tools
///
/// # Errors
///
/// Returns an error if the provider cannot be created or the agent
/// configuration is invalid
pub fn build_agent(config: &Config) -> Result<Agent> {
    let provider = create_provider(&config.provider, &config.generation)?;
    let tools = build_tools(config, Arc::clone(&provider));
    Agent::new(provider, tools, config.agent.clone())
}

// Chat command handler
pub mod chat {
    //! Interactive chat mode handler.
    //!
    //! Creates an `Agent` and runs a readline-based loop that submits user
    //! input to it. Special commands are handled locally.

    use super::*;
    use crate::agent::Conversation;
    use crate::commands::special_commands::{parse_special_command, print_help, SpecialCommand};
    use colored::Colorize;
    use rustyline::error::ReadlineError;
    use rustyline::DefaultEditor;

    /// Start interactive chat mode
    ///
    /// Agent errors are printed and the session continues; the conversation
    /// is left as it was before the failed turn.
    pub async fn run_chat(config: Config) -> Result<()> {
        tracing::info!("Starting interactive chat mode");

        let mut agent = build_agent(&config)?;
        let model = agent
            .provider()
            .get_current_model()
            .unwrap_or_else(|_| config.provider.ollama.model.clone());

        let mut rl = DefaultEditor::new()?;
        print_welcome_banner(&model);

        loop {
            let prompt = format!("{} ", "mikoko>".green().bold());
            match rl.readline(&prompt) {
                Ok(line) => {
                    let trimmed = line.trim();
                    if trimmed.is_empty() {
                        continue;
                    }

                    match parse_special_command(trimmed) {
                        Ok(SpecialCommand::Help) => {
                            print_help();
                            continue;
                        }
                        Ok(SpecialCommand::ShowStatus) => {
                            print_status_display(&agent, &model);
                            continue;
                        }
                        Ok(SpecialCommand::Tools) => {
                            for name in agent.tool_names() {
                                println!("  {}", name.cyan());
                            }
                            println!();
                            continue;
                        }
                        Ok(SpecialCommand::Clear) => {
                            agent.reset();
                            println!("Conversation cleared\n");
                            continue;
                        }
                        Ok(SpecialCommand::Exit) => break,
                        Ok(SpecialCommand::None) => {}
                        Err(e) => {
                            eprintln!("{}\n", e.to_string().yellow());
                            continue;
                        }
                    }

                    rl.add_history_entry(trimmed)?;

                    match agent.execute(trimmed).await {
                        Ok(response) => {
                            println!("\n{}\n", response);
                        }
                        Err(e) => {
                            eprintln!("{} {}\n", "Error:".red().bold(), e);
                        }
                    }
                }
                Err(ReadlineError::Interrupted) => {
                    println!("Interrupted");
                    break;
                }
                Err(ReadlineError::Eof) => {
                    println!("EOF");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        println!("Kwaheri! Goodbye.");
        Ok(())
    }

    fn print_welcome_banner(model: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║         Mikoko Guardian - Mangrove Conservation Chat         ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!("Model: {}", model.cyan());
        println!("Ask about mangrove species, coastal sites, blue carbon or restoration.");
        println!("Type '/help' for available commands, 'exit' to quit\n");
    }

    fn print_status_display(agent: &Agent, model: &str) {
        println!("\n╔══════════════════════════════════════════════════════════════╗");
        println!("║                 Mikoko Guardian Session Status               ║");
        println!("╚══════════════════════════════════════════════════════════════╝\n");
        println!(
            "{}",
            format_status(&model.cyan().to_string(), agent.num_tools(), agent.conversation())
        );
    }

    /// Status lines shown by `/status`
    pub(crate) fn format_status(
        model: &str,
        num_tools: usize,
        conversation: &Conversation,
    ) -> String {
        let mut out = String::new();
        out.push_str(&format!("Model:             {}\n", model));
        out.push_str(&format!("Available Tools:   {}\n", num_tools));
        out.push_str(&format!(
            "Conversation Size: {} messages\n",
            conversation.len()
        ));
        out.push_str(&format!(
            "Context Tokens:    {}/{} ({} remaining)\n",
            conversation.token_count(),
            conversation.max_tokens(),
            conversation.remaining_tokens()
        ));
        match conversation.provider_token_usage() {
            Some(usage) => out.push_str(&format!(
                "Model Usage:       {} prompt + {} completion = {} tokens\n",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            )),
            None => out.push_str("Model Usage:       not reported\n"),
        }
        out
    }
}

// Run command handler
pub mod run {
    //! One-shot prompt execution.

    use super::*;

    /// Send a single prompt to the agent and return the final answer
    ///
    /// # Errors
    ///
    /// Returns an error if the prompt is blank or the agent turn fails
    pub async fn run_prompt(config: Config, prompt: &str) -> Result<String> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(crate::error::MikokoError::InvalidInput(
                "Prompt must not be empty".to_string(),
            )
            .into());
        }

        tracing::info!("Running one-shot prompt");
        let mut agent = build_agent(&config)?;
        agent.execute(prompt).await
    }
}

// Ask command handler
pub mod ask {
    //! Direct general question, bypassing the agent loop.

    use super::*;
    use crate::tools::GeneralQuestionTool;

    /// Ask the configured model one question
    ///
    /// # Errors
    ///
    /// Returns `MikokoError::InvalidInput` for a blank question and
    /// `MikokoError::UpstreamFailure` if the model cannot answer
    pub async fn ask_question(config: &Config, question: &str) -> Result<String> {
        let provider = create_provider(&config.provider, &config.generation)?;
        let answer = GeneralQuestionTool::new(provider).answer(question).await?;
        Ok(answer.answer)
    }
}

/// Render the resolved configuration as YAML
///
/// # Errors
///
/// Returns `MikokoError::Yaml` if serialization fails
pub fn show_config(config: &Config) -> Result<String> {
    let yaml = serde_yaml::to_string(config).map_err(crate::error::MikokoError::Yaml)?;
    Ok(yaml)
}
