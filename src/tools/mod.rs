//! Tools module for Mikoko Guardian
//!
//! This module contains the tool result envelope, the tool executor trait,
//! the tool registry, and the five mangrove tools exposed to the model.

pub mod carbon;
pub mod general_question;
pub mod registry_builder;
pub mod restoration;
pub mod site;
pub mod species;

pub use carbon::CarbonStorageTool;
pub use general_question::GeneralQuestionTool;
pub use registry_builder::ToolRegistryBuilder;
pub use restoration::RestorationPlanTool;
pub use site::SiteInformationTool;
pub use species::SpeciesIdentificationTool;

use crate::domain::DomainResult;
use crate::error::{MikokoError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Bytes taken by the truncated envelope around its excerpt
const TRUNCATED_ENVELOPE_OVERHEAD: usize = 50;

/// Tool result structure
///
/// `output` always holds the JSON envelope the model sees, for failures as
/// well as successes.
#[derive(Debug, Clone)]
pub struct ToolResult {
    /// Whether the tool execution succeeded
    pub success: bool,
    /// Output from the tool
    pub output: String,
    /// Error message if execution failed
    pub error: Option<String>,
    /// Machine-readable error kind (`not_found`, `invalid_input`, ...)
    pub error_kind: Option<String>,
    /// Whether the output was truncated
    pub truncated: bool,
}

impl ToolResult {
    /// Create a successful tool result
    ///
    /// # Arguments
    ///
    /// * `output` - Tool output
    pub fn success(output: String) -> Self {
        Self {
            success: true,
            output,
            error: None,
            error_kind: None,
            truncated: false,
        }
    }

    /// Create a successful result wrapping a serializable report
    ///
    /// Produces `{"status": "success", "report": ...}`.
    ///
    /// # Errors
    ///
    /// Returns error if the report cannot be serialized
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::tools::ToolResult;
    ///
    /// let result = ToolResult::report(&serde_json::json!({"answer": 42})).unwrap();
    /// assert!(result.success);
    /// assert!(result.output.contains("\"status\":\"success\""));
    /// ```
    pub fn report<T: Serialize>(report: &T) -> Result<Self> {
        let payload = serde_json::json!({
            "status": "success",
            "report": report,
        });
        Ok(Self::success(serde_json::to_string(&payload)?))
    }

    /// Create a failed result from a domain error
    ///
    /// Produces `{"status": "error", "error_kind": ..., "error_message": ...}`
    /// so the model can explain the problem to the user.
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::error::MikokoError;
    /// use mikoko::tools::ToolResult;
    ///
    /// let result = ToolResult::failure(&MikokoError::NotFound("no such site".into()));
    /// assert!(!result.success);
    /// assert_eq!(result.error_kind.as_deref(), Some("not_found"));
    /// ```
    pub fn failure(err: &MikokoError) -> Self {
        let message = err.message();
        let payload = serde_json::json!({
            "status": "error",
            "error_kind": err.kind(),
            "error_message": message,
        });
        Self {
            success: false,
            output: payload.to_string(),
            error: Some(message),
            error_kind: Some(err.kind().to_string()),
            truncated: false,
        }
    }

    /// Wrap a domain outcome in the matching envelope
    ///
    /// # Errors
    ///
    /// Returns error only if a successful report cannot be serialized
    pub fn from_domain<T: Serialize>(outcome: DomainResult<T>) -> Result<Self> {
        match outcome {
            Ok(report) => Self::report(&report),
            Err(err) => {
                tracing::debug!(kind = err.kind(), "Tool returned domain error: {}", err);
                Ok(Self::failure(&err))
            }
        }
    }

    /// Truncate output if it exceeds the maximum size
    ///
    /// An oversized envelope is replaced by
    /// `{"status": ..., "truncated": true, "excerpt": "..."}`, where the
    /// excerpt is the start of the original output cut at a UTF-8 character
    /// boundary. The replacement is still valid JSON and fits in `max_size`
    /// whenever `max_size` leaves room for the envelope itself.
    pub fn truncate_if_needed(mut self, max_size: usize) -> Self {
        if self.output.len() <= max_size {
            return self;
        }

        let status = if self.success { "success" } else { "error" };
        let mut cut = max_size
            .saturating_sub(TRUNCATED_ENVELOPE_OVERHEAD)
            .min(self.output.len());
        let envelope = loop {
            while !self.output.is_char_boundary(cut) {
                cut -= 1;
            }
            let envelope = serde_json::json!({
                "status": status,
                "truncated": true,
                "excerpt": &self.output[..cut],
            })
            .to_string();
            if envelope.len() <= max_size || cut == 0 {
                break envelope;
            }
            // Escaping grew the excerpt; shrink by the overshoot and retry
            cut -= (envelope.len() - max_size).min(cut);
        };

        self.output = envelope;
        self.truncated = true;
        self
    }

    /// Convert to a message string for the conversation
    pub fn to_message(&self) -> String {
        self.output.clone()
    }
}

/// Parse tool arguments, reporting malformed input as a tool failure
///
/// Returns `Err(ToolResult)` carrying an `invalid_input` envelope so the
/// caller can hand it straight back to the model.
pub(crate) fn parse_params<T: DeserializeOwned>(
    args: serde_json::Value,
) -> std::result::Result<T, ToolResult> {
    serde_json::from_value(args).map_err(|e| {
        ToolResult::failure(&MikokoError::InvalidInput(format!(
            "Invalid parameters: {}",
            e
        )))
    })
}

/// Tool executor trait for implementing tool execution logic
///
/// Each tool must implement this trait to provide execution logic
/// that can be called by the agent.
///
/// # Examples
///
/// ```no_run
/// use mikoko::tools::{ToolExecutor, ToolResult};
/// use mikoko::error::Result;
/// use async_trait::async_trait;
/// use serde_json::Value;
///
/// struct TideTool;
///
/// #[async_trait]
/// impl ToolExecutor for TideTool {
///     fn tool_definition(&self) -> Value {
///         serde_json::json!({
///             "name": "next_spring_tide",
///             "description": "Returns the next spring tide date",
///             "parameters": {
///                 "type": "object",
///                 "properties": {}
///             }
///         })
///     }
///
///     async fn execute(&self, _args: Value) -> Result<ToolResult> {
///         ToolResult::report(&"2026-11-05")
///     }
/// }
/// ```
#[async_trait]
pub trait ToolExecutor: Send + Sync {
    /// Returns the tool definition as a JSON value
    ///
    /// The definition follows the OpenAI function calling format:
    /// ```json
    /// {
    ///   "name": "tool_name",
    ///   "description": "Tool description",
    ///   "parameters": {
    ///     "type": "object",
    ///     "properties": {
    ///       "param1": {"type": "string", "description": "..."}
    ///     },
    ///     "required": ["param1"]
    ///   }
    /// }
    /// ```
    fn tool_definition(&self) -> serde_json::Value;

    /// Executes the tool with the given arguments
    ///
    /// Domain failures come back as failed `ToolResult`s; `Err` is reserved
    /// for failures the conversation cannot report.
    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult>;
}

/// Tool registry for managing available tools
///
/// The registry maintains a collection of tools that can be executed
/// by the agent during conversation.
pub struct ToolRegistry {
    tools: HashMap<String, Arc<dyn ToolExecutor>>,
}

impl ToolRegistry {
    /// Create a new empty tool registry
    pub fn new() -> Self {
        Self {
            tools: HashMap::new(),
        }
    }

    /// Register a tool executor in the registry
    ///
    /// Registering a name twice replaces the earlier executor.
    pub fn register(&mut self, name: impl Into<String>, executor: Arc<dyn ToolExecutor>) {
        self.tools.insert(name.into(), executor);
    }

    /// Get a tool executor by name
    pub fn get(&self, name: &str) -> Option<Arc<dyn ToolExecutor>> {
        self.tools.get(name).cloned()
    }

    /// Get all tool definitions as JSON values, ordered by tool name
    pub fn all_definitions(&self) -> Vec<serde_json::Value> {
        let mut names: Vec<&String> = self.tools.keys().collect();
        names.sort();
        names
            .into_iter()
            .filter_map(|name| self.tools.get(name))
            .map(|executor| executor.tool_definition())
            .collect()
    }

    /// Registered tool names in sorted order
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tools.keys().cloned().collect();
        names.sort();
        names
    }

    /// Get the number of registered tools
    pub fn len(&self) -> usize {
        self.tools.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_envelope() {
        let result = ToolResult::report(&serde_json::json!({"location": "Vanga"})).unwrap();
        let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["report"]["location"], "Vanga");
        assert!(result.success);
    }

    #[test]
    fn test_failure_envelope() {
        let result = ToolResult::failure(&MikokoError::InvalidInput("area must be positive".into()));
        let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["error_kind"], "invalid_input");
        assert_eq!(json["error_message"], "area must be positive");
        assert!(!result.success);
        assert_eq!(result.to_message(), result.output);
    }

    #[test]
    fn test_from_domain_maps_both_arms() {
        let ok: DomainResult<u32> = Ok(7);
        assert!(ToolResult::from_domain(ok).unwrap().success);

        let err: DomainResult<u32> = Err(MikokoError::NotFound("Atlantis".into()));
        let result = ToolResult::from_domain(err).unwrap();
        assert_eq!(result.error_kind.as_deref(), Some("not_found"));
    }

    #[test]
    fn test_parse_params_reports_invalid_input() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Params {
            location: String,
        }
        let result = parse_params::<Params>(serde_json::json!({"place": "Lamu"})).unwrap_err();
        assert_eq!(result.error_kind.as_deref(), Some("invalid_input"));
        assert!(result.error.unwrap().contains("location"));
    }

    #[test]
    fn test_small_output_is_not_truncated() {
        let result = ToolResult::report(&"Mkoko").unwrap().truncate_if_needed(1000);
        assert!(!result.truncated);
        assert_eq!(result.to_message(), r#"{"report":"Mkoko","status":"success"}"#);
    }

    #[test]
    fn test_truncated_output_stays_valid_json() {
        let long_report = serde_json::json!({"note": "\"quoted\" mangrove text ".repeat(40)});
        let result = ToolResult::report(&long_report)
            .unwrap()
            .truncate_if_needed(200);

        assert!(result.truncated);
        assert!(result.output.len() <= 200);
        let json: serde_json::Value = serde_json::from_str(&result.to_message()).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["truncated"], true);
        assert!(json["excerpt"].as_str().unwrap().starts_with("{\"report\""));
    }

    #[test]
    fn test_truncated_failure_keeps_error_status() {
        let err = MikokoError::NotFound("x".repeat(500));
        let result = ToolResult::failure(&err).truncate_if_needed(120);
        let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        assert_eq!(json["status"], "error");
        assert!(result.output.len() <= 120);
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        // "ā" is two bytes
        let result = ToolResult::success("ā".repeat(100)).truncate_if_needed(61);
        assert!(result.truncated);
        let json: serde_json::Value = serde_json::from_str(&result.output).unwrap();
        let excerpt = json["excerpt"].as_str().unwrap();
        assert!(!excerpt.is_empty());
        assert!(excerpt.chars().all(|c| c == 'ā'));
    }

    struct MockToolExecutor {
        name: String,
    }

    #[async_trait]
    impl ToolExecutor for MockToolExecutor {
        fn tool_definition(&self) -> serde_json::Value {
            serde_json::json!({
                "name": self.name,
                "description": "Mock tool",
                "parameters": {"type": "object"}
            })
        }

        async fn execute(&self, _args: serde_json::Value) -> crate::error::Result<ToolResult> {
            Ok(ToolResult::success("mock output".to_string()))
        }
    }

    fn mock(name: &str) -> Arc<dyn ToolExecutor> {
        Arc::new(MockToolExecutor {
            name: name.to_string(),
        })
    }

    #[test]
    fn test_tool_registry_register_and_get() {
        let mut registry = ToolRegistry::new();
        assert!(registry.is_empty());
        registry.register("test", mock("test"));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("test").is_some());
        assert!(registry.get("nonexistent").is_none());
    }

    #[test]
    fn test_all_definitions_sorted_by_name() {
        let mut registry = ToolRegistry::default();
        registry.register("zeta", mock("zeta"));
        registry.register("alpha", mock("alpha"));

        let all = registry.all_definitions();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0]["name"], "alpha");
        assert_eq!(registry.names(), vec!["alpha", "zeta"]);
    }
}
