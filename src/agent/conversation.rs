//! Conversation memory with token tracking and pruning
//!
//! The agent keeps one `Conversation` for the lifetime of a chat session.
//! Token usage is estimated locally (characters / 4) and, when the estimate
//! crosses `prune_threshold * max_tokens`, older turns are folded into a
//! short summary so the context stays within the model's window.

use std::collections::BTreeMap;

use crate::config::ConversationConfig;
use crate::providers::{Message, TokenUsage, ToolCall};

const SUMMARY_HEADER: &str = "Summary of earlier conversation:";

/// Conversation history with a token budget
///
/// # Pruning Strategy
///
/// When the estimated token count exceeds `prune_threshold * max_tokens`:
/// 1. System messages are kept
/// 2. The last `min_retain_turns` user turns are kept, with every assistant,
///    tool call and tool result message that follows them
/// 3. Everything older is folded into a single summary system message,
///    which replaces any summary left by an earlier prune
///
/// Pruning always cuts at a user message, so a tool result is never
/// separated from the assistant message that requested it.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
    token_count: usize,
    max_tokens: usize,
    min_retain_turns: usize,
    prune_threshold: f64,
    provider_token_usage: Option<TokenUsage>,
    pruned: PrunedHistory,
}

/// Running totals for every message pruned so far
#[derive(Debug, Clone, Default)]
struct PrunedHistory {
    user_messages: usize,
    assistant_messages: usize,
    tool_calls: BTreeMap<String, usize>,
    first_question: Option<String>,
}

impl PrunedHistory {
    fn absorb(&mut self, messages: &[Message]) {
        for message in messages {
            match message.role.as_str() {
                "user" => {
                    self.user_messages += 1;
                    if self.first_question.is_none() {
                        self.first_question = message.content.clone();
                    }
                }
                "assistant" => self.assistant_messages += 1,
                _ => {}
            }
            for call in message.tool_calls.iter().flatten() {
                *self.tool_calls.entry(call.function.name.clone()).or_default() += 1;
            }
        }
    }

    fn summary(&self) -> String {
        let mut summary = format!("{}\n\n", SUMMARY_HEADER);
        summary.push_str(&format!("- {} user messages\n", self.user_messages));
        summary.push_str(&format!(
            "- {} assistant responses\n",
            self.assistant_messages
        ));
        if !self.tool_calls.is_empty() {
            let total: usize = self.tool_calls.values().sum();
            let names = self
                .tool_calls
                .iter()
                .map(|(name, count)| format!("{} x{}", name, count))
                .collect::<Vec<_>>()
                .join(", ");
            summary.push_str(&format!("- {} tool calls executed ({})\n", total, names));
        }

        if let Some(question) = &self.first_question {
            summary.push_str(&format!(
                "\nFirst question: {}\n",
                truncate_string(question, 100)
            ));
        }

        summary
    }
}

fn is_summary(message: &Message) -> bool {
    message.role == "system"
        && message
            .content
            .as_deref()
            .is_some_and(|c| c.starts_with(SUMMARY_HEADER))
}

impl Conversation {
    /// Creates a new conversation with specified limits
    ///
    /// # Arguments
    ///
    /// * `max_tokens` - Maximum token count before pruning
    /// * `min_retain_turns` - Minimum user turns to keep during pruning
    /// * `prune_threshold` - Fraction of max_tokens that triggers pruning (0.0-1.0)
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::agent::Conversation;
    ///
    /// let conversation = Conversation::new(8000, 5, 0.8);
    /// assert_eq!(conversation.token_count(), 0);
    /// ```
    pub fn new(max_tokens: usize, min_retain_turns: usize, prune_threshold: f64) -> Self {
        Self {
            messages: Vec::new(),
            token_count: 0,
            max_tokens,
            min_retain_turns: min_retain_turns.max(1),
            prune_threshold: prune_threshold.clamp(0.0, 1.0),
            provider_token_usage: None,
            pruned: PrunedHistory::default(),
        }
    }

    /// Creates a conversation from the agent's conversation settings
    pub fn from_config(config: &ConversationConfig) -> Self {
        Self::new(
            config.max_tokens,
            config.min_retain_turns,
            config.prune_threshold as f64,
        )
    }

    /// Appends any message, then prunes if the budget is exceeded
    pub fn add_message(&mut self, message: Message) {
        self.token_count += estimate_message_tokens(&message);
        self.messages.push(message);
        self.prune_if_needed();
    }

    /// Adds a user message to the conversation
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::agent::Conversation;
    ///
    /// let mut conversation = Conversation::new(8000, 5, 0.8);
    /// conversation.add_user_message("Which species grow at Mida Creek?");
    /// assert_eq!(conversation.messages().len(), 1);
    /// ```
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::user(content));
    }

    /// Adds an assistant text reply
    pub fn add_assistant_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::assistant(content));
    }

    /// Adds an assistant message that requests tool calls
    pub fn add_assistant_tool_calls(&mut self, tool_calls: Vec<ToolCall>) {
        self.add_message(Message::assistant_with_tools(tool_calls));
    }

    /// Adds a tool result message answering `tool_call_id`
    pub fn add_tool_result(&mut self, tool_call_id: impl Into<String>, content: impl Into<String>) {
        self.add_message(Message::tool_result(tool_call_id, content));
    }

    /// Adds a system message to the conversation
    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.add_message(Message::system(content));
    }

    fn prune_if_needed(&mut self) {
        let threshold = (self.max_tokens as f64 * self.prune_threshold) as usize;
        if self.token_count <= threshold {
            return;
        }

        // Index of the oldest user message we must retain
        let keep_from_index = self
            .messages
            .iter()
            .enumerate()
            .rev()
            .filter(|(_, m)| m.role == "user")
            .nth(self.min_retain_turns - 1)
            .map(|(idx, _)| idx);

        let keep_from_index = match keep_from_index {
            Some(idx) if idx > 0 => idx,
            // Not enough turns to drop anything
            _ => return,
        };

        let mut system_messages = Vec::new();
        let mut to_prune = Vec::new();
        let mut to_keep = Vec::new();

        for (idx, message) in self.messages.drain(..).enumerate() {
            if is_summary(&message) {
                // Rebuilt below from the running totals
                continue;
            } else if message.role == "system" {
                system_messages.push(message);
            } else if idx < keep_from_index {
                to_prune.push(message);
            } else {
                to_keep.push(message);
            }
        }

        if !to_prune.is_empty() {
            tracing::debug!("Pruning {} conversation messages", to_prune.len());
            self.pruned.absorb(&to_prune);
        }
        if self.pruned.user_messages > 0 || self.pruned.assistant_messages > 0 {
            system_messages.push(Message::system(self.pruned.summary()));
        }

        self.messages = system_messages;
        self.messages.extend(to_keep);
        self.token_count = self.messages.iter().map(estimate_message_tokens).sum();
    }

    /// Returns all messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Returns the current estimated token count
    pub fn token_count(&self) -> usize {
        self.token_count
    }

    /// Returns the number of tokens remaining before hitting the maximum
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::agent::Conversation;
    ///
    /// let conversation = Conversation::new(8000, 5, 0.8);
    /// assert_eq!(conversation.remaining_tokens(), 8000);
    /// ```
    pub fn remaining_tokens(&self) -> usize {
        self.max_tokens.saturating_sub(self.token_count)
    }

    /// Returns the maximum token limit
    pub fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Returns the number of messages in the conversation
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the conversation has no messages
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Clears all messages and usage counters
    pub fn clear(&mut self) {
        self.messages.clear();
        self.token_count = 0;
        self.provider_token_usage = None;
        self.pruned = PrunedHistory::default();
    }

    /// Accumulates provider-reported token usage
    pub fn update_from_provider_usage(&mut self, usage: &TokenUsage) {
        self.provider_token_usage = Some(match self.provider_token_usage {
            Some(existing) => TokenUsage::new(
                existing.prompt_tokens + usage.prompt_tokens,
                existing.completion_tokens + usage.completion_tokens,
            ),
            None => *usage,
        });
    }

    /// Provider-reported usage accumulated so far, if any
    pub fn provider_token_usage(&self) -> Option<TokenUsage> {
        self.provider_token_usage
    }
}

/// Estimates token count for a string (characters / 4, rounded up)
fn estimate_tokens(text: &str) -> usize {
    (text.chars().count() + 3) / 4
}

fn estimate_message_tokens(message: &Message) -> usize {
    let content = message.content.as_deref().map(estimate_tokens).unwrap_or(0);
    let calls: usize = message
        .tool_calls
        .iter()
        .flatten()
        .map(|call| estimate_tokens(&call.function.name) + estimate_tokens(&call.function.arguments))
        .sum();
    content + calls
}

/// Truncates a string to `max_len` characters, adding an ellipsis
fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let mut truncated = s.chars().take(max_len.saturating_sub(3)).collect::<String>();
        truncated.push_str("...");
        truncated
    }
}
