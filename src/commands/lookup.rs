//! Direct tool commands
//!
//! `species`, `site`, `carbon` and `plan` call the domain layer without the
//! model. Each handler renders its report to a string, either as pretty JSON
//! or as a short human-readable summary; the caller prints it.

use colored::Colorize;
use prettytable::{row, Table};
use serde::Serialize;

use crate::domain::{
    estimate_carbon_storage, plan_restoration, CarbonEstimate, CarbonPricing, Catalog,
    ForestMaturity, RestorationPlan, SiteReport, Species,
};
use crate::error::{MikokoError, Result};

fn to_json<T: Serialize>(report: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(report).map_err(MikokoError::Serialization)?)
}

/// Look up one species, or list them all
///
/// # Errors
///
/// Returns the lookup error when the name is blank or unknown
pub fn species(catalog: &Catalog, name: Option<&str>, list: bool, json: bool) -> Result<String> {
    if list || name.is_none() {
        if json {
            return to_json(&catalog.species());
        }
        return Ok(species_table(catalog.species()));
    }

    let query = name.unwrap_or_default();
    tracing::debug!("Looking up species '{}'", query);
    let species = catalog.find_species(query)?;
    if json {
        return to_json(species);
    }
    Ok(render_species(species))
}

/// Look up one site, or list them all
///
/// # Errors
///
/// Returns the lookup error when the location is blank or unknown
pub fn site(catalog: &Catalog, location: Option<&str>, list: bool, json: bool) -> Result<String> {
    if list || location.is_none() {
        if json {
            return to_json(&catalog.sites());
        }
        return Ok(site_table(catalog));
    }

    let query = location.unwrap_or_default();
    tracing::debug!("Looking up site '{}'", query);
    let site = catalog.find_site(query)?;
    let report = catalog.site_report(site);
    if json {
        return to_json(&report);
    }
    Ok(render_site(&report))
}

/// Estimate carbon storage for an area
///
/// A missing age means a mature stand.
///
/// # Errors
///
/// Returns `MikokoError::InvalidInput` for an unknown age or a non-positive
/// area
pub fn carbon(pricing: CarbonPricing, area: f64, age: Option<&str>, json: bool) -> Result<String> {
    let maturity = age
        .map(str::parse::<ForestMaturity>)
        .transpose()?
        .unwrap_or_default();
    let estimate = estimate_carbon_storage(area, maturity, pricing)?;
    if json {
        return to_json(&estimate);
    }
    Ok(render_carbon(&estimate))
}

/// Build a restoration plan for a site
///
/// # Errors
///
/// Returns `MikokoError::NotFound` for an unknown site and
/// `MikokoError::InvalidInput` for a non-positive area
pub fn plan(catalog: &Catalog, location: &str, area: Option<f64>, json: bool) -> Result<String> {
    let plan = plan_restoration(catalog, location, area)?;
    if json {
        return to_json(&plan);
    }
    Ok(render_plan(&plan))
}

fn species_table(species: &[Species]) -> String {
    let mut table = Table::new();
    table.add_row(row!["Scientific Name", "Swahili Name", "Conservation Status"]);
    for s in species {
        table.add_row(row![s.scientific_name, s.swahili_name, s.conservation_status]);
    }
    table.to_string()
}

fn site_table(catalog: &Catalog) -> String {
    let mut table = Table::new();
    table.add_row(row!["Site", "County", "Mangrove Area", "Dominant Species"]);
    for site in catalog.sites() {
        table.add_row(row![
            site.name,
            site.county,
            format!("{:.0} ha", site.area_hectares),
            site.dominant_species.join(", ")
        ]);
    }
    table.to_string()
}

fn render_species(species: &Species) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} ({})\n",
        species.scientific_name.bold(),
        species.swahili_name
    ));
    out.push_str(&format!(
        "{} {}\n",
        "Characteristics:".cyan(),
        species.characteristics
    ));
    out.push_str(&format!("{} {}\n", "Uses:".cyan(), species.uses.join("; ")));
    out.push_str(&format!(
        "{} {}\n",
        "Status:".cyan(),
        species.conservation_status
    ));
    out
}

fn render_site(report: &SiteReport) -> String {
    let species = report
        .dominant_species
        .iter()
        .map(|s| format!("{} ({})", s.scientific_name, s.swahili_name))
        .collect::<Vec<_>>()
        .join(", ");

    let mut out = String::new();
    out.push_str(&format!(
        "{} ({} County)\n",
        report.location.bold(),
        report.county
    ));
    out.push_str(&format!(
        "{} {:.0} hectares\n",
        "Mangrove area:".cyan(),
        report.mangrove_area_hectares
    ));
    out.push_str(&format!("{} {}\n", "Dominant species:".cyan(), species));
    out.push_str(&format!("{} {}\n", "Threats:".cyan(), report.threats.join(", ")));
    if let Some(status) = &report.restoration_status {
        out.push_str(&format!("{} {}\n", "Restoration:".cyan(), status));
    }
    out
}

fn render_carbon(estimate: &CarbonEstimate) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} ha of {} mangrove forest\n",
        "Area:".cyan(),
        estimate.area_hectares,
        estimate.forest_age
    ));
    out.push_str(&format!(
        "{} {:.1} tonnes ({} t/ha)\n",
        "Total carbon:".cyan(),
        estimate.total_carbon_tons,
        estimate.carbon_per_hectare_tons
    ));
    out.push_str(&format!(
        "{} {:.1} tonnes\n",
        "CO2 equivalent:".cyan(),
        estimate.co2_equivalent_tons
    ));
    out.push_str(&format!(
        "{} ${:.2}\n",
        "Credit value:".cyan(),
        estimate.potential_carbon_credit_value_usd
    ));
    out.push_str(&format!("{}\n", estimate.note.dimmed()));
    out
}

fn render_plan(plan: &RestorationPlan) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{} {} ha at {}\n",
        "Restoration plan:".bold(),
        plan.area_hectares,
        plan.location
    ));

    out.push_str(&format!("{}\n", "Recommended species:".cyan()));
    for s in &plan.recommended_species {
        out.push_str(&format!("  - {} ({})\n", s.scientific_name, s.swahili_name));
    }
    out.push_str(&format!(
        "{} {}\n",
        "Seedlings needed:".cyan(),
        plan.seedlings_needed
    ));

    out.push_str(&format!(
        "{} {} months\n",
        "Timeline:".cyan(),
        plan.estimated_timeline_months
    ));
    for phase in &plan.timeline {
        out.push_str(&format!(
            "  - {} ({} months)\n",
            phase.name, phase.duration_months
        ));
    }

    out.push_str(&format!(
        "{} KES {:.0} (about USD {:.0})\n",
        "Estimated cost:".cyan(),
        plan.estimated_cost_kes,
        plan.estimated_cost_usd
    ));

    if !plan.special_considerations.is_empty() {
        out.push_str(&format!("{}\n", "Special considerations:".cyan()));
        for note in &plan.special_considerations {
            out.push_str(&format!("  - {}\n", note));
        }
    }

    out.push_str(&format!(
        "{} {}\n",
        "Community involvement:".cyan(),
        plan.community_involvement
    ));

    out.push_str(&format!("{}\n", "Next steps:".cyan()));
    // Steps arrive already numbered
    for step in &plan.next_steps {
        out.push_str(&format!("  {}\n", step));
    }
    out
}
