//! Carbon storage calculation tool

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::{estimate_carbon_storage, CarbonPricing, ForestMaturity};
use crate::error::Result;
use crate::tools::{parse_params, ToolExecutor, ToolResult};

/// Tool name exposed to the model
pub const TOOL_NAME: &str = "calculate_carbon_storage";

#[derive(Debug, Deserialize)]
struct CarbonParams {
    area: f64,
    #[serde(default)]
    forest_age: Option<String>,
}

/// Estimates stored carbon, CO2 equivalent and credit value for an area
pub struct CarbonStorageTool {
    pricing: CarbonPricing,
}

impl CarbonStorageTool {
    /// Create the tool with the configured credit price
    pub fn new(pricing: CarbonPricing) -> Self {
        Self { pricing }
    }
}

impl Default for CarbonStorageTool {
    fn default() -> Self {
        Self::new(CarbonPricing::default())
    }
}

#[async_trait]
impl ToolExecutor for CarbonStorageTool {
    fn tool_definition(&self) -> serde_json::Value {
        serde_json::json!({
            "name": TOOL_NAME,
            "description": "Estimate the carbon stored by a mangrove forest, its CO2 equivalent and potential carbon credit value in USD.",
            "parameters": {
                "type": "object",
                "properties": {
                    "area": {
                        "type": "number",
                        "description": "Forest area in hectares (must be positive)"
                    },
                    "forest_age": {
                        "type": "string",
                        "enum": ["young", "middle-aged", "mature"],
                        "description": "Maturity of the stand; defaults to mature"
                    }
                },
                "required": ["area"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: CarbonParams = match parse_params(args) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };

        let estimate = params
            .forest_age
            .as_deref()
            .map(str::parse::<ForestMaturity>)
            .unwrap_or(Ok(ForestMaturity::default()))
            .and_then(|maturity| estimate_carbon_storage(params.area, maturity, self.pricing));

        ToolResult::from_domain(estimate)
    }
}
