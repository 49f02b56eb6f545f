//! Carbon storage and credit estimation
//!
//! Rates are simplified per-hectare estimates from studies of Kenyan
//! mangroves. The calculation is:
//!
//! ```text
//! total carbon  = area * rate(maturity)
//! CO2e          = total carbon * 3.67
//! credit value  = CO2e * price per tonne CO2e
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::DomainResult;
use crate::error::MikokoError;

/// Mass ratio of CO2 to carbon (44/12, rounded)
pub const CO2_PER_CARBON: f64 = 3.67;

/// Default carbon credit price in USD per tonne of CO2e
pub const DEFAULT_CREDIT_PRICE_USD: f64 = 15.0;

const ESTIMATE_NOTE: &str = "These are estimates based on general studies of Kenyan mangroves. Actual values may vary based on species composition, health, and local conditions.";

/// Age classification of a mangrove stand
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ForestMaturity {
    Young,
    MiddleAged,
    #[default]
    Mature,
}

impl ForestMaturity {
    /// All categories, youngest first
    pub const ALL: [ForestMaturity; 3] = [Self::Young, Self::MiddleAged, Self::Mature];

    /// Stored carbon in tonnes per hectare
    ///
    /// # Examples
    ///
    /// ```
    /// use mikoko::domain::ForestMaturity;
    ///
    /// assert_eq!(ForestMaturity::Mature.carbon_per_hectare(), 392.0);
    /// ```
    pub fn carbon_per_hectare(self) -> f64 {
        match self {
            Self::Young => 143.0,
            Self::MiddleAged => 297.0,
            Self::Mature => 392.0,
        }
    }

    /// Canonical lowercase label
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Young => "young",
            Self::MiddleAged => "middle-aged",
            Self::Mature => "mature",
        }
    }
}

impl fmt::Display for ForestMaturity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ForestMaturity {
    type Err = MikokoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim().to_lowercase();
        match label.as_str() {
            "young" => Ok(Self::Young),
            "middle-aged" | "middle_aged" | "middle aged" | "middleaged" => Ok(Self::MiddleAged),
            "mature" | "old-growth" | "old growth" => Ok(Self::Mature),
            _ => Err(MikokoError::InvalidInput(format!(
                "Unknown forest age '{}'. Expected one of: young, middle-aged, mature",
                s.trim()
            ))),
        }
    }
}

/// Pricing used to turn stored carbon into a credit value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CarbonPricing {
    /// USD per tonne of CO2 equivalent
    pub credit_price_usd: f64,
}

impl Default for CarbonPricing {
    fn default() -> Self {
        Self {
            credit_price_usd: DEFAULT_CREDIT_PRICE_USD,
        }
    }
}

/// Derived carbon storage estimate for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CarbonEstimate {
    pub area_hectares: f64,
    pub forest_age: ForestMaturity,
    pub carbon_per_hectare_tons: f64,
    pub total_carbon_tons: f64,
    pub co2_equivalent_tons: f64,
    pub potential_carbon_credit_value_usd: f64,
    pub note: String,
}

/// Estimates carbon stored in a mangrove area and its credit value
///
/// # Errors
///
/// Returns `MikokoError::InvalidInput` if `area_hectares` is not a positive,
/// finite number.
///
/// # Examples
///
/// ```
/// use mikoko::domain::{estimate_carbon_storage, CarbonPricing, ForestMaturity};
///
/// let estimate =
///     estimate_carbon_storage(10.0, ForestMaturity::Mature, CarbonPricing::default()).unwrap();
/// assert_eq!(estimate.total_carbon_tons, 3920.0);
/// ```
pub fn estimate_carbon_storage(
    area_hectares: f64,
    maturity: ForestMaturity,
    pricing: CarbonPricing,
) -> DomainResult<CarbonEstimate> {
    if !(area_hectares.is_finite() && area_hectares > 0.0) {
        return Err(MikokoError::InvalidInput(
            "Please provide a valid positive number for area in hectares.".to_string(),
        ));
    }

    let carbon_per_hectare = maturity.carbon_per_hectare();
    let total_carbon = area_hectares * carbon_per_hectare;
    let co2_equivalent = total_carbon * CO2_PER_CARBON;

    Ok(CarbonEstimate {
        area_hectares,
        forest_age: maturity,
        carbon_per_hectare_tons: carbon_per_hectare,
        total_carbon_tons: total_carbon,
        co2_equivalent_tons: co2_equivalent,
        potential_carbon_credit_value_usd: co2_equivalent * pricing.credit_price_usd,
        note: ESTIMATE_NOTE.to_string(),
    })
}
