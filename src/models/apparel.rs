//! Apparel Digital Product Passport record.
//!
//! This payload is shaped differently from [`ItemTrace`](crate::models::ItemTrace):
//! it is already close to the page layout (composition, circularity,
//! environmental impact, compliance) and only needs light summarising.

use serde::{Deserialize, Serialize};

use crate::common::{lenient_number, non_empty_string, nullable_vec};
use crate::models::Event;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApparelDppData {
    // Product identification
    #[serde(deserialize_with = "non_empty_string")]
    pub product_name: Option<String>,
    /// e.g. `CC848125-33Q0101`
    #[serde(deserialize_with = "non_empty_string")]
    pub class_id: Option<String>,
    /// e.g. `25034874`
    #[serde(deserialize_with = "non_empty_string")]
    pub lot_id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub taric_code: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub brand: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub manufacturer: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub country_of_production: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub primary_image: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub gs1_digital_link: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub further_information_url: Option<String>,

    pub size_and_fit: Option<SizeAndFitData>,

    #[serde(deserialize_with = "nullable_vec")]
    pub main_fabrics: Vec<MaterialComposition>,
    #[serde(deserialize_with = "nullable_vec")]
    pub supplies_and_components: Vec<MaterialComponent>,

    pub circularity: Option<CircularityMetrics>,
    pub environmental: Option<EnvironmentalMetrics>,

    #[serde(deserialize_with = "nullable_vec")]
    pub certificates: Vec<ComplianceCertificate>,

    pub production: Option<ProductionDetails>,
    pub importer: Option<ImporterInfo>,

    #[serde(deserialize_with = "nullable_vec")]
    pub events: Vec<Event>,

    pub dpp_service_provider: Option<DppServiceProvider>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialComponent {
    #[serde(deserialize_with = "non_empty_string")]
    pub material: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub percentage: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub recycled_content: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub substances_of_concern: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub country_origin: Option<String>,
}

/// A fabric or supply group and its material breakdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MaterialComposition {
    #[serde(deserialize_with = "non_empty_string")]
    pub fabric_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub country_origin: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub components: Vec<MaterialComponent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeMeasurement {
    #[serde(deserialize_with = "non_empty_string")]
    pub measurement_name: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub value: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub unit: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeAndFitData {
    #[serde(deserialize_with = "nullable_vec")]
    pub available_sizes: Vec<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub reference_size: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub measurements: Vec<SizeMeasurement>,
    #[serde(deserialize_with = "non_empty_string")]
    pub description: Option<String>,
}

/// Durability is either a numeric score or a textual placeholder; `"-"`
/// means "not available" and is distinct from a missing field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DurabilityScore {
    Score(f64),
    Text(String),
}

impl DurabilityScore {
    pub const NOT_AVAILABLE: &'static str = "-";

    /// True when the score carries real data: a non-zero number, or text
    /// that is neither empty nor the `"-"` placeholder.
    pub fn is_meaningful(&self) -> bool {
        match self {
            DurabilityScore::Score(score) => *score != 0.0 && !score.is_nan(),
            DurabilityScore::Text(text) => !text.is_empty() && text != Self::NOT_AVAILABLE,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularityMetrics {
    pub durability_score: Option<DurabilityScore>,
    #[serde(deserialize_with = "lenient_number")]
    pub recyclable_percent: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub recycled_content_percent: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub recycling_instructions: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub end_of_life_instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvironmentalMetrics {
    #[serde(deserialize_with = "lenient_number")]
    pub carbon_footprint_kg: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub water_used_l: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub energy_used_kwh: Option<f64>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComplianceCertificate {
    #[serde(deserialize_with = "non_empty_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub administered_by: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub administered_in: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub issued_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certificate_id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductionDetails {
    /// e.g. `2025 W20`
    #[serde(deserialize_with = "non_empty_string")]
    pub date_produced: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub produced_by: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub production_location: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub production_location_address: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub producer_contact: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub production_identifier: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub operator_identifier: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImporterInfo {
    #[serde(deserialize_with = "non_empty_string")]
    pub imported_by: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub eori_number: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub importer_address: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub importer_contact: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DppServiceProvider {
    #[serde(deserialize_with = "non_empty_string")]
    pub name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub provider_id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub contact_address: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub website: Option<String>,
    pub backup_access_available: Option<bool>,
}
