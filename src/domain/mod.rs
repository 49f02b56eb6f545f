//! Domain module for Mikoko Guardian
//!
//! Static reference data and the deterministic calculations built on it:
//! species and site lookups, carbon storage estimates, and restoration
//! plans. Everything here is pure; nothing performs I/O.

pub mod carbon;
pub mod catalog;
pub mod restoration;
pub mod sites;
pub mod species;

pub use carbon::{estimate_carbon_storage, CarbonEstimate, CarbonPricing, ForestMaturity};
pub use catalog::{Catalog, SiteReport};
pub use restoration::{plan_restoration, PlanPhase, RestorationPlan};
pub use sites::Site;
pub use species::{Species, SpeciesSummary};

use crate::error::MikokoError;

/// Result of a domain operation, keeping the concrete error kind
pub type DomainResult<T> = std::result::Result<T, MikokoError>;
