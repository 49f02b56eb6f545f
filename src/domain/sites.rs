//! Coastal mangrove site records

use serde::{Deserialize, Serialize};

/// Static reference entry describing one mangrove forest area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Site {
    /// Site name, e.g. "Gazi Bay"
    pub name: String,
    /// County the site belongs to
    pub county: String,
    /// Mangrove cover in hectares
    pub area_hectares: f64,
    /// Scientific names of the dominant species (keys into the species table)
    pub dominant_species: Vec<String>,
    /// Main pressures on the forest
    pub threats: Vec<String>,
    /// Current restoration status, when known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub restoration_status: Option<String>,
}

impl Site {
    /// Creates a site record with no restoration status
    pub fn new(
        name: impl Into<String>,
        county: impl Into<String>,
        area_hectares: f64,
        dominant_species: &[&str],
        threats: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            county: county.into(),
            area_hectares,
            dominant_species: dominant_species.iter().map(|s| s.to_string()).collect(),
            threats: threats.iter().map(|t| t.to_string()).collect(),
            restoration_status: None,
        }
    }

    /// Returns true if any threat matches `threat` case-insensitively
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::domain::Site;
    ///
    /// let site = Site::new("Vanga", "Kwale", 4000.0, &[], &["Pollution"]);
    /// assert!(site.has_threat("pollution"));
    /// assert!(!site.has_threat("Sedimentation"));
    /// ```
    pub fn has_threat(&self, threat: &str) -> bool {
        self.threats.iter().any(|t| t.eq_ignore_ascii_case(threat))
    }
}

/// Seed table of Kenyan coastal regions with significant mangrove forests
pub fn kenya_coast_sites() -> Vec<Site> {
    vec![
        Site::new(
            "Mida Creek",
            "Kilifi",
            1600.0,
            &["Rhizophora mucronata", "Avicennia marina"],
            &["Tourism development", "Wood harvesting", "Climate change"],
        ),
        Site::new(
            "Gazi Bay",
            "Kwale",
            615.0,
            &["Rhizophora mucronata", "Sonneratia alba", "Ceriops tagal"],
            &["Overharvesting", "Sedimentation", "Coastal erosion"],
        ),
        Site::new(
            "Lamu Archipelago",
            "Lamu",
            34000.0,
            &[
                "Rhizophora mucronata",
                "Avicennia marina",
                "Bruguiera gymnorrhiza",
            ],
            &["Port development", "Oil exploration", "Deforestation"],
        ),
        Site::new(
            "Vanga",
            "Kwale",
            4000.0,
            &["Rhizophora mucronata", "Avicennia marina"],
            &["Border disputes", "Illegal cutting", "Pollution"],
        ),
        Site::new(
            "Mombasa",
            "Mombasa",
            1900.0,
            &["Avicennia marina", "Sonneratia alba"],
            &["Urban expansion", "Pollution", "Port activities"],
        ),
    ]
}
