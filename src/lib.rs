//! Mikoko Guardian - mangrove conservation assistant library
//!
//! This library provides a conversational agent for mangrove conservation
//! on the Kenyan coast: species identification, site information, carbon
//! storage estimates, restoration planning and general questions answered
//! by a hosted model.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `domain`: Species and site tables, carbon calculator, restoration planner
//! - `tools`: The five agent tools and the tool registry
//! - `agent`: Conversation management and the tool-calling loop
//! - `providers`: Model back end abstraction and the Ollama implementation
//! - `prompts`: Agent instruction and expert framing prompts
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`, `commands`: Command-line interface and handlers
//!
//! # Example
//!
//! ```
//! use mikoko::domain::{estimate_carbon_storage, CarbonPricing, Catalog, ForestMaturity};
//!
//! let catalog = Catalog::kenya_coast();
//! let species = catalog.find_species("Mkoko").unwrap();
//! assert_eq!(species.scientific_name, "Rhizophora mucronata");
//!
//! let estimate =
//!     estimate_carbon_storage(10.0, ForestMaturity::Mature, CarbonPricing::default()).unwrap();
//! assert_eq!(estimate.total_carbon_tons, 3920.0);
//! ```

pub mod agent;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod error;
pub mod prompts;
pub mod providers;
pub mod tools;

// Re-export commonly used types
pub use agent::Agent;
pub use config::Config;
pub use domain::Catalog;
pub use error::{MikokoError, Result};

#[cfg(test)]
pub mod test_utils;
