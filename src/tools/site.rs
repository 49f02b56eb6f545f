//! Site information tool

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::Catalog;
use crate::error::Result;
use crate::tools::{parse_params, ToolExecutor, ToolResult};

/// Tool name exposed to the model
pub const TOOL_NAME: &str = "get_site_information";

#[derive(Debug, Deserialize)]
struct SiteParams {
    location: String,
}

/// Reports area, dominant species and threats for a known mangrove site
pub struct SiteInformationTool {
    catalog: Arc<Catalog>,
}

impl SiteInformationTool {
    /// Create the tool over a shared catalog
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolExecutor for SiteInformationTool {
    fn tool_definition(&self) -> serde_json::Value {
        serde_json::json!({
            "name": TOOL_NAME,
            "description": "Get information about a mangrove site on the Kenyan coast (Mida Creek, Gazi Bay, Lamu Archipelago, Vanga, Mombasa) or a coastal county: area, dominant species and threats.",
            "parameters": {
                "type": "object",
                "properties": {
                    "location": {
                        "type": "string",
                        "description": "Site name or county, e.g. 'Gazi Bay' or 'Kilifi'"
                    }
                },
                "required": ["location"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: SiteParams = match parse_params(args) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };

        let report = self
            .catalog
            .find_site(&params.location)
            .map(|site| self.catalog.site_report(site));
        ToolResult::from_domain(report)
    }
}
