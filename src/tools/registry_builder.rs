//! Tool registry builder
//!
//! Wires the shared catalog, carbon pricing and model provider into the
//! five mangrove tools. The general-question tool is registered only when
//! a provider is supplied, so purely local callers can build a registry
//! without a model back end.

use std::sync::Arc;

use crate::domain::{CarbonPricing, Catalog};
use crate::providers::Provider;
use crate::tools::{
    carbon, general_question, restoration, site, species, CarbonStorageTool, GeneralQuestionTool,
    RestorationPlanTool, SiteInformationTool, SpeciesIdentificationTool, ToolExecutor,
    ToolRegistry,
};

/// Builder for the Mikoko Guardian tool registry
///
/// # Examples
///
/// ```
/// use mikoko::domain::Catalog;
/// use mikoko::tools::ToolRegistryBuilder;
/// use std::sync::Arc;
///
/// let registry = ToolRegistryBuilder::new(Arc::new(Catalog::kenya_coast())).build();
/// assert_eq!(registry.len(), 4);
/// assert!(registry.get("plan_restoration").is_some());
/// ```
pub struct ToolRegistryBuilder {
    catalog: Arc<Catalog>,
    pricing: CarbonPricing,
    provider: Option<Arc<dyn Provider>>,
}

impl ToolRegistryBuilder {
    /// Create a builder over a shared catalog
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            pricing: CarbonPricing::default(),
            provider: None,
        }
    }

    /// Set the carbon credit pricing
    ///
    /// # Returns
    ///
    /// Returns self for method chaining
    pub fn with_pricing(mut self, pricing: CarbonPricing) -> Self {
        self.pricing = pricing;
        self
    }

    /// Set the provider used for general questions
    ///
    /// # Returns
    ///
    /// Returns self for method chaining
    pub fn with_provider(mut self, provider: Arc<dyn Provider>) -> Self {
        self.provider = Some(provider);
        self
    }

    /// Build the registry
    pub fn build(&self) -> ToolRegistry {
        let mut registry = ToolRegistry::new();

        let species_tool: Arc<dyn ToolExecutor> =
            Arc::new(SpeciesIdentificationTool::new(Arc::clone(&self.catalog)));
        registry.register(species::TOOL_NAME, species_tool);

        let site_tool: Arc<dyn ToolExecutor> =
            Arc::new(SiteInformationTool::new(Arc::clone(&self.catalog)));
        registry.register(site::TOOL_NAME, site_tool);

        let carbon_tool: Arc<dyn ToolExecutor> = Arc::new(CarbonStorageTool::new(self.pricing));
        registry.register(carbon::TOOL_NAME, carbon_tool);

        let restoration_tool: Arc<dyn ToolExecutor> =
            Arc::new(RestorationPlanTool::new(Arc::clone(&self.catalog)));
        registry.register(restoration::TOOL_NAME, restoration_tool);

        if let Some(provider) = &self.provider {
            let question_tool: Arc<dyn ToolExecutor> =
                Arc::new(GeneralQuestionTool::new(Arc::clone(provider)));
            registry.register(general_question::TOOL_NAME, question_tool);
        }

        tracing::debug!("Built tool registry with {} tools", registry.len());
        registry
    }
}
