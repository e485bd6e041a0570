use serde::{Deserialize, Serialize};

use crate::common::{lenient_number, non_empty_string, nullable_vec};
use crate::models::{BizLocation, Product};

/// A production batch. `input_material` links to the lots consumed to make
/// it, forming the material provenance tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Lot {
    #[serde(deserialize_with = "non_empty_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub lot_number: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub production_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub expiry_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub best_before_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub sell_by_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub harvest_start_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub harvest_end_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub digital_link: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub quality_report: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub status: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub uom: Option<String>,
    pub product: Option<Product>,
    pub production_location: Option<BizLocation>,
    #[serde(deserialize_with = "nullable_vec")]
    pub input_material: Vec<InputMaterial>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputMaterial {
    #[serde(deserialize_with = "non_empty_string")]
    pub uom: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    pub related_lot_id: Option<Box<Lot>>,
    #[serde(deserialize_with = "lenient_number")]
    pub carbon_footprint: Option<f64>,
}
