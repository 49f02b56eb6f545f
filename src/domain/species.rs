//! Mangrove species records
//!
//! Reference entries for the five mangrove taxa found along the Kenyan coast.

use serde::{Deserialize, Serialize};

/// Static reference entry describing one mangrove taxon
///
/// The scientific name is the record's key; sites refer to species by it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Species {
    /// Binomial name, e.g. "Rhizophora mucronata"
    pub scientific_name: String,
    /// Local Swahili name, e.g. "Mkoko"
    pub swahili_name: String,
    /// Physical characteristics useful for field identification
    pub characteristics: String,
    /// Traditional uses by coastal communities
    pub uses: Vec<String>,
    /// Conservation status along the Kenyan coast
    pub conservation_status: String,
}

impl Species {
    /// Creates a species record
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::domain::Species;
    ///
    /// let species = Species::new(
    ///     "Avicennia marina",
    ///     "Mchu",
    ///     "Grey-green leaves",
    ///     &["Honey production"],
    ///     "Relatively stable",
    /// );
    /// assert_eq!(species.swahili_name, "Mchu");
    /// ```
    pub fn new(
        scientific_name: impl Into<String>,
        swahili_name: impl Into<String>,
        characteristics: impl Into<String>,
        uses: &[&str],
        conservation_status: impl Into<String>,
    ) -> Self {
        Self {
            scientific_name: scientific_name.into(),
            swahili_name: swahili_name.into(),
            characteristics: characteristics.into(),
            uses: uses.iter().map(|u| u.to_string()).collect(),
            conservation_status: conservation_status.into(),
        }
    }

    /// Short `{scientific_name, swahili_name}` pair used in site and plan reports
    pub fn summary(&self) -> SpeciesSummary {
        SpeciesSummary {
            scientific_name: self.scientific_name.clone(),
            swahili_name: self.swahili_name.clone(),
        }
    }
}

/// Name pair for a species referenced from another report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeciesSummary {
    pub scientific_name: String,
    pub swahili_name: String,
}

/// Seed table of the Kenyan coastal mangrove species
pub fn kenya_coast_species() -> Vec<Species> {
    vec![
        Species::new(
            "Rhizophora mucronata",
            "Mkoko",
            "Distinctive prop roots, elongated propagules",
            &["Timber", "Firewood", "Boat building"],
            "Vulnerable in many areas",
        ),
        Species::new(
            "Avicennia marina",
            "Mchu",
            "Grey-green leaves, pencil-like pneumatophores",
            &["Medicinal purposes", "Honey production"],
            "Relatively stable",
        ),
        Species::new(
            "Sonneratia alba",
            "Mlilana",
            "White flowers, round fruits, conical pneumatophores",
            &["Edible fruits", "Wood for construction"],
            "Declining in some areas",
        ),
        Species::new(
            "Ceriops tagal",
            "Mkandaa",
            "Small tree, club-shaped propagules with ridges",
            &["Dye production", "Poles for construction"],
            "Threatened by harvesting",
        ),
        Species::new(
            "Bruguiera gymnorrhiza",
            "Muia",
            "Knee-like roots, red flowers, long propagules",
            &["Construction", "Charcoal production"],
            "Vulnerable",
        ),
    ]
}
