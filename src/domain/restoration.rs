//! Restoration plan assembly
//!
//! Plans are built from fixed templates: a four-phase timeline, a linear
//! cost model over area and species count, and threat-driven adjustments
//! taken from the site record.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::catalog::Catalog;
use super::species::SpeciesSummary;
use super::DomainResult;
use crate::error::MikokoError;

/// Area planned when the caller gives no hint
pub const DEFAULT_PLAN_AREA_HECTARES: f64 = 1.0;

/// Seedlings planted per hectare
pub const SEEDLINGS_PER_HECTARE: f64 = 2000.0;

/// Approximate KES per USD
pub const KES_PER_USD: f64 = 130.0;

/// Per-hectare base cost in KES: site preparation 25 000, seedling
/// production 40 000, planting 35 000, first-year monitoring 20 000 and
/// community engagement 15 000
pub const BASE_COST_PER_HECTARE_KES: f64 = 135_000.0;

/// Extra per-hectare cost for pollution mitigation
pub const POLLUTION_COST_PER_HECTARE_KES: f64 = 10_000.0;

/// Extra per-hectare cost for upland erosion control
pub const EROSION_COST_PER_HECTARE_KES: f64 = 15_000.0;

/// One-off nursery bed setup for each species raised
pub const NURSERY_SETUP_PER_SPECIES_KES: f64 = 20_000.0;

/// Extra monitoring months when ecotourism is integrated
const ECOTOURISM_EXTRA_MONTHS: u32 = 6;

/// Species planted when the site has no usable dominant species
pub const DEFAULT_SPECIES: [&str; 3] = [
    "Rhizophora mucronata",
    "Avicennia marina",
    "Sonneratia alba",
];

const COMMUNITY_INVOLVEMENT: &str = "Recommended to engage local community members in seedling production, planting, and monitoring to ensure long-term sustainability.";

const NEXT_STEPS: [&str; 5] = [
    "Conduct detailed site assessment",
    "Engage local community stakeholders",
    "Secure necessary permits from Kenya Forest Service",
    "Establish community nursery for seedling production",
    "Implement planting according to lunar calendar (best during spring tides)",
];

/// One stage of the restoration timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanPhase {
    pub name: String,
    pub duration_months: u32,
}

/// Derived restoration recommendation for a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestorationPlan {
    pub location: String,
    pub area_hectares: f64,
    pub recommended_species: Vec<SpeciesSummary>,
    pub seedlings_needed: u64,
    pub timeline: Vec<PlanPhase>,
    pub estimated_timeline_months: u32,
    pub estimated_cost_kes: f64,
    pub estimated_cost_usd: f64,
    pub special_considerations: Vec<String>,
    pub resources: Vec<String>,
    pub community_involvement: String,
    pub next_steps: Vec<String>,
}

/// Builds a restoration plan for a known site
///
/// # Arguments
///
/// * `catalog` - Species and site tables
/// * `location` - Site name or county, matched like a site lookup
/// * `area_hectares` - Area to restore; defaults to one hectare
///
/// # Errors
///
/// - `MikokoError::NotFound` if the site is unknown
/// - `MikokoError::InvalidInput` if the area is not positive and finite
///
/// # Examples
///
/// ```
/// use mikoko::domain::{plan_restoration, Catalog};
///
/// let catalog = Catalog::kenya_coast();
/// let plan = plan_restoration(&catalog, "Gazi Bay", Some(2.0)).unwrap();
/// assert_eq!(plan.seedlings_needed, 4000);
/// assert_eq!(plan.estimated_timeline_months, 24);
/// ```
pub fn plan_restoration(
    catalog: &Catalog,
    location: &str,
    area_hectares: Option<f64>,
) -> DomainResult<RestorationPlan> {
    let area = area_hectares.unwrap_or(DEFAULT_PLAN_AREA_HECTARES);
    if !(area.is_finite() && area > 0.0) {
        return Err(MikokoError::InvalidInput(
            "Please provide a valid positive number for area in hectares.".to_string(),
        ));
    }

    let site = catalog.find_site(location)?;

    let mut species: Vec<SpeciesSummary> = site
        .dominant_species
        .iter()
        .filter_map(|key| catalog.species_by_key(key))
        .map(|s| s.summary())
        .collect();
    if species.is_empty() {
        species = DEFAULT_SPECIES
            .iter()
            .filter_map(|key| catalog.species_by_key(key))
            .map(|s| s.summary())
            .collect();
    }

    let mut cost_per_hectare = BASE_COST_PER_HECTARE_KES;
    let mut monitoring_months = 12;
    let mut special_considerations = Vec::new();

    if site.has_threat("Urban expansion") || site.has_threat("Pollution") {
        special_considerations.push("Community waste management education essential".to_string());
        cost_per_hectare += POLLUTION_COST_PER_HECTARE_KES;
    }
    if site.has_threat("Tourism development") {
        special_considerations.push("Ecotourism integration recommended".to_string());
        monitoring_months += ECOTOURISM_EXTRA_MONTHS;
    }
    if site.has_threat("Sedimentation") {
        special_considerations.push("Soil erosion control measures required upland".to_string());
        cost_per_hectare += EROSION_COST_PER_HECTARE_KES;
    }

    let timeline = vec![
        phase("Site assessment and preparation", 3),
        phase("Community nursery and seedling production", 6),
        phase("Planting during spring tides", 3),
        phase("Monitoring and maintenance", monitoring_months),
    ];
    let total_months = timeline.iter().map(|p| p.duration_months).sum();

    let cost_kes =
        area * cost_per_hectare + species.len() as f64 * NURSERY_SETUP_PER_SPECIES_KES;
    let seedlings_needed = (area * SEEDLINGS_PER_HECTARE).floor() as u64;

    let mut resources = vec![format!("{} mangrove seedlings", seedlings_needed)];
    resources.extend(
        species
            .iter()
            .map(|s| format!("Nursery bed for {} ({})", s.scientific_name, s.swahili_name)),
    );
    resources.extend([
        "Community planting crew".to_string(),
        "Permits from Kenya Forest Service".to_string(),
        "Monitoring equipment (quadrats, tags, GPS)".to_string(),
    ]);

    debug!(
        site = %site.name,
        area,
        species = species.len(),
        cost_kes,
        "Assembled restoration plan"
    );

    Ok(RestorationPlan {
        location: site.name.clone(),
        area_hectares: area,
        recommended_species: species,
        seedlings_needed,
        timeline,
        estimated_timeline_months: total_months,
        estimated_cost_kes: cost_kes,
        estimated_cost_usd: cost_kes / KES_PER_USD,
        special_considerations,
        resources,
        community_involvement: COMMUNITY_INVOLVEMENT.to_string(),
        next_steps: NEXT_STEPS
            .iter()
            .enumerate()
            .map(|(i, step)| format!("{}. {}", i + 1, step))
            .collect(),
    })
}

fn phase(name: &str, duration_months: u32) -> PlanPhase {
    PlanPhase {
        name: name.to_string(),
        duration_months,
    }
}
