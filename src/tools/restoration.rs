//! Restoration planning tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{plan_restoration, Catalog};
use crate::error::Result;
use crate::tools::{parse_params, ToolExecutor, ToolResult};

/// Tool name exposed to the model
pub const TOOL_NAME: &str = "plan_restoration";

#[derive(Debug, Deserialize)]
struct RestorationParams {
    location: String,
    #[serde(default)]
    area_hectares: Option<f64>,
}

/// Builds a restoration plan for a known site
pub struct RestorationPlanTool {
    catalog: Arc<Catalog>,
}

impl RestorationPlanTool {
    /// Create the tool over a shared catalog
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolExecutor for RestorationPlanTool {
    fn tool_definition(&self) -> serde_json::Value {
        serde_json::json!({
            "name": TOOL_NAME,
            "description": "Create a mangrove restoration plan for a site on the Kenyan coast: species to plant, seedlings, timeline, cost in KES and USD, and next steps.",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "Site name or county to restore"
                    },
                    "area_hectares": {
                        "type": "number",
                        "description": "Area to restore in hectares; defaults to 1"
                    }
                },
                "required": ["location"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: RestorationParams = match parse_params(args) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };

        ToolResult::from_domain(plan_restoration(
            &self.catalog,
            &params.location,
            params.area_hectares,
        ))
    }
}
