//! Read-only catalog of species and sites
//!
//! The catalog owns both reference tables and implements the name-matching
//! rules used by the lookup tools. It is built once at startup and shared
//! through `Arc<Catalog>`; nothing mutates it afterwards.
//!
//! Matching rules (queries are trimmed, whitespace-collapsed and lowercased):
//!
//! - species: exact scientific name, then exact Swahili name, then a partial
//!   match on the scientific name
//! - sites: exact site name, then a partial match on the site name, then an
//!   exact county name
//!
//! Partial matches need at least [`MIN_PARTIAL_QUERY_LEN`] characters when
//! the query is a fragment of a name.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::sites::{kenya_coast_sites, Site};
use super::species::{kenya_coast_species, Species, SpeciesSummary};
use super::DomainResult;
use crate::error::MikokoError;

/// Shortest query accepted as a fragment of a longer name
pub const MIN_PARTIAL_QUERY_LEN: usize = 3;

/// Minimum similarity for a "did you mean" suggestion
const SUGGESTION_THRESHOLD: f64 = 0.7;

/// Immutable species and site tables
#[derive(Debug, Clone)]
pub struct Catalog {
    species: Vec<Species>,
    sites: Vec<Site>,
}

/// Site record with dominant species resolved to name pairs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteReport {
    pub location: String,
    pub county: String,
    pub mangrove_area_hectares: f64,
    pub dominant_species: Vec<SpeciesSummary>,
    pub threats: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restoration_status: Option<String>,
}

impl Catalog {
    /// Builds a catalog from explicit tables
    ///
    /// # Errors
    ///
    /// Returns `MikokoError::InvalidInput` if a site area is not positive, or
    /// if a site references a species missing from the species table.
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::domain::{Catalog, Site};
    ///
    /// let sites = vec![Site::new("Nowhere", "None", 10.0, &["Unknown plant"], &[])];
    /// assert!(Catalog::new(Vec::new(), sites).is_err());
    /// ```
    pub fn new(species: Vec<Species>, sites: Vec<Site>) -> DomainResult<Self> {
        let catalog = Self { species, sites };

        for site in &catalog.sites {
            if !(site.area_hectares.is_finite() && site.area_hectares > 0.0) {
                return Err(MikokoError::InvalidInput(format!(
                    "Site '{}' must have a positive area, got {}",
                    site.name, site.area_hectares
                )));
            }
            for key in &site.dominant_species {
                if catalog.species_by_key(key).is_none() {
                    return Err(MikokoError::InvalidInput(format!(
                        "Site '{}' references unknown species '{}'",
                        site.name, key
                    )));
                }
            }
        }

        Ok(catalog)
    }

    /// The built-in Kenyan coast tables
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::domain::Catalog;
    ///
    /// let catalog = Catalog::kenya_coast();
    /// assert_eq!(catalog.species().len(), 5);
    /// assert_eq!(catalog.sites().len(), 5);
    /// ```
    pub fn kenya_coast() -> Self {
        Self {
            species: kenya_coast_species(),
            sites: kenya_coast_sites(),
        }
    }

    /// All species, in table order
    pub fn species(&self) -> &[Species] {
        &self.species
    }

    /// All sites, in table order
    pub fn sites(&self) -> &[Site] {
        &self.sites
    }

    /// Resolves a species key (scientific name, any case)
    pub fn species_by_key(&self, scientific_name: &str) -> Option<&Species> {
        let key = normalize(scientific_name);
        self.species
            .iter()
            .find(|s| normalize(&s.scientific_name) == key)
    }

    /// Looks up a species by Swahili or scientific name
    ///
    /// # Errors
    ///
    /// - `MikokoError::InvalidInput` for a blank query
    /// - `MikokoError::NotFound` when nothing matches
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::domain::Catalog;
    ///
    /// let catalog = Catalog::kenya_coast();
    /// let species = catalog.find_species("  mkoko ").unwrap();
    /// assert_eq!(species.scientific_name, "Rhizophora mucronata");
    /// ```
    pub fn find_species(&self, query: &str) -> DomainResult<&Species> {
        let q = normalize(query);
        if q.is_empty() {
            return Err(MikokoError::InvalidInput(
                "Species name must not be empty".to_string(),
            ));
        }

        let found = self
            .species
            .iter()
            .find(|s| normalize(&s.scientific_name) == q)
            .or_else(|| self.species.iter().find(|s| normalize(&s.swahili_name) == q))
            .or_else(|| {
                self.species
                    .iter()
                    .find(|s| is_partial_match(&q, &normalize(&s.scientific_name)))
            });

        match found {
            Some(species) => {
                debug!(query = %query, species = %species.scientific_name, "Species matched");
                Ok(species)
            }
            None => {
                let candidates = self
                    .species
                    .iter()
                    .flat_map(|s| [s.scientific_name.as_str(), s.swahili_name.as_str()]);
                Err(MikokoError::NotFound(with_suggestion(
                    format!(
                        "Could not identify mangrove species '{}'. Please try using scientific name or Swahili name.",
                        query.trim()
                    ),
                    suggest(&q, candidates),
                )))
            }
        }
    }

    /// Looks up a site by name or county
    ///
    /// # Errors
    ///
    /// - `MikokoError::InvalidInput` for a blank query
    /// - `MikokoError::NotFound` when nothing matches
    pub fn find_site(&self, query: &str) -> DomainResult<&Site> {
        let q = normalize(query);
        if q.is_empty() {
            return Err(MikokoError::InvalidInput(
                "Location must not be empty".to_string(),
            ));
        }

        let found = self
            .sites
            .iter()
            .find(|s| normalize(&s.name) == q)
            .or_else(|| {
                self.sites
                    .iter()
                    .find(|s| is_partial_match(&q, &normalize(&s.name)))
            })
            .or_else(|| self.sites.iter().find(|s| normalize(&s.county) == q));

        match found {
            Some(site) => {
                debug!(query = %query, site = %site.name, "Site matched");
                Ok(site)
            }
            None => {
                let candidates = self
                    .sites
                    .iter()
                    .flat_map(|s| [s.name.as_str(), s.county.as_str()]);
                Err(MikokoError::NotFound(with_suggestion(
                    format!(
                        "Information about mangroves in '{}' is not available in our database.",
                        query.trim()
                    ),
                    suggest(&q, candidates),
                )))
            }
        }
    }

    /// Builds the report for a site, resolving its dominant species
    pub fn site_report(&self, site: &Site) -> SiteReport {
        SiteReport {
            location: site.name.clone(),
            county: site.county.clone(),
            mangrove_area_hectares: site.area_hectares,
            dominant_species: site
                .dominant_species
                .iter()
                .filter_map(|key| self.species_by_key(key))
                .map(Species::summary)
                .collect(),
            threats: site.threats.clone(),
            restoration_status: site.restoration_status.clone(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::kenya_coast()
    }
}

/// Trims, collapses inner whitespace and lowercases a name
fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// `query` contains `name`, or is a long enough fragment of it
fn is_partial_match(query: &str, name: &str) -> bool {
    query.contains(name)
        || (query.chars().count() >= MIN_PARTIAL_QUERY_LEN && name.contains(query))
}

fn suggest<'a>(query: &str, candidates: impl Iterator<Item = &'a str>) -> Option<&'a str> {
    candidates
        .map(|c| (c, strsim::normalized_levenshtein(query, &normalize(c))))
        .filter(|(_, score)| *score >= SUGGESTION_THRESHOLD)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(c, _)| c)
}

fn with_suggestion(message: String, suggestion: Option<&str>) -> String {
    match suggestion {
        Some(s) => format!("{} Did you mean '{}'?", message, s),
        None => message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_catalog_passes_validation() {
        let catalog = Catalog::new(kenya_coast_species(), kenya_coast_sites());
        assert!(catalog.is_ok());
    }

    #[test]
    fn test_new_rejects_non_positive_site_area() {
        let sites = vec![Site::new("Flat", "Kwale", 0.0, &[], &[])];
        let err = Catalog::new(kenya_coast_species(), sites).unwrap_err();
        assert!(matches!(err, MikokoError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_unknown_species_reference() {
        let sites = vec![Site::new("Odd", "Kwale", 5.0, &["Quercus robur"], &[])];
        let err = Catalog::new(kenya_coast_species(), sites).unwrap_err();
        assert!(err.to_string().contains("Quercus robur"));
    }

    #[test]
    fn test_find_species_by_swahili_name() {
        let catalog = Catalog::kenya_coast();
        let species = catalog.find_species("Mkoko").unwrap();
        assert_eq!(species.scientific_name, "Rhizophora mucronata");
        assert!(species.characteristics.contains("prop roots"));
    }

    #[test]
    fn test_find_species_by_scientific_name_any_case() {
        let catalog = Catalog::kenya_coast();
        let species = catalog.find_species("AVICENNIA   MARINA").unwrap();
        assert_eq!(species.swahili_name, "Mchu");
    }

    #[test]
    fn test_find_species_partial_genus() {
        let catalog = Catalog::kenya_coast();
        let species = catalog.find_species("ceriops").unwrap();
        assert_eq!(species.swahili_name, "Mkandaa");
    }

    #[test]
    fn test_find_species_query_containing_name() {
        let catalog = Catalog::kenya_coast();
        let species = catalog
            .find_species("a young sonneratia alba tree")
            .unwrap();
        assert_eq!(species.swahili_name, "Mlilana");
    }

    #[test]
    fn test_find_species_short_fragment_is_not_found() {
        let catalog = Catalog::kenya_coast();
        let err = catalog.find_species("al").unwrap_err();
        assert!(matches!(err, MikokoError::NotFound(_)));
    }

    #[test]
    fn test_find_species_blank_is_invalid() {
        let catalog = Catalog::kenya_coast();
        let err = catalog.find_species("   ").unwrap_err();
        assert!(matches!(err, MikokoError::InvalidInput(_)));
    }

    #[test]
    fn test_find_species_unknown_suggests_close_name() {
        let catalog = Catalog::kenya_coast();
        let err = catalog.find_species("Mkokko").unwrap_err();
        assert!(matches!(err, MikokoError::NotFound(_)));
        assert!(err.to_string().contains("Did you mean 'Mkoko'?"));
    }

    #[test]
    fn test_find_species_unknown_without_suggestion() {
        let catalog = Catalog::kenya_coast();
        let err = catalog.find_species("Baobab").unwrap_err();
        assert!(!err.to_string().contains("Did you mean"));
    }

    #[test]
    fn test_find_site_exact_and_partial() {
        let catalog = Catalog::kenya_coast();
        assert_eq!(catalog.find_site("gazi bay").unwrap().name, "Gazi Bay");
        assert_eq!(catalog.find_site("Lamu").unwrap().name, "Lamu Archipelago");
        assert_eq!(catalog.find_site("mida").unwrap().name, "Mida Creek");
    }

    #[test]
    fn test_find_site_by_county_takes_first_in_table_order() {
        let catalog = Catalog::kenya_coast();
        assert_eq!(catalog.find_site("Kwale").unwrap().name, "Gazi Bay");
        assert_eq!(catalog.find_site("kilifi").unwrap().name, "Mida Creek");
    }

    #[test]
    fn test_find_site_unknown() {
        let catalog = Catalog::kenya_coast();
        let err = catalog.find_site("Atlantis").unwrap_err();
        assert!(matches!(err, MikokoError::NotFound(_)));
        assert!(err.to_string().contains("Atlantis"));
    }

    #[test]
    fn test_site_report_resolves_species() {
        let catalog = Catalog::kenya_coast();
        let site = catalog.find_site("Gazi Bay").unwrap();
        let report = catalog.site_report(site);
        assert_eq!(report.county, "Kwale");
        assert_eq!(report.mangrove_area_hectares, 615.0);
        let names: Vec<_> = report
            .dominant_species
            .iter()
            .map(|s| s.swahili_name.as_str())
            .collect();
        assert_eq!(names, vec!["Mkoko", "Mlilana", "Mkandaa"]);
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("  Gazi   BAY "), "gazi bay");
        assert_eq!(normalize(""), "");
    }
}
