//! Species identification tool
//!
//! Resolves a Swahili or scientific name against the catalog and returns
//! the full species record.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;

use crate::domain::Catalog;
use crate::error::Result;
use crate::tools::{parse_params, ToolExecutor, ToolResult};

/// Tool name exposed to the model
pub const TOOL_NAME: &str = "identify_mangrove_species";

#[derive(Debug, Deserialize)]
struct SpeciesParams {
    species_name: String,
}

/// Looks up a mangrove species by local or scientific name
pub struct SpeciesIdentificationTool {
    catalog: Arc<Catalog>,
}

impl SpeciesIdentificationTool {
    /// Create the tool over a shared catalog
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl ToolExecutor for SpeciesIdentificationTool {
    fn tool_definition(&self) -> serde_json::Value {
        serde_json::json!({
            "name": TOOL_NAME,
            "description": "Identify a Kenyan coastal mangrove species from its Swahili name (e.g. Mkoko, Mchu) or scientific name, returning characteristics, traditional uses and conservation status.",
            "parameters": {
                "type": "object",
                "properties": {
                    "species_name": {
                        "type": "string",
                        "description": "Swahili or scientific name of the mangrove species"
                    }
                },
                "required": ["species_name"]
            }
        })
    }

    async fn execute(&self, args: serde_json::Value) -> Result<ToolResult> {
        let params: SpeciesParams = match parse_params(args) {
            Ok(p) => p,
            Err(result) => return Ok(result),
        };

        ToolResult::from_domain(self.catalog.find_species(&params.species_name))
    }
}
