//! Nutrient deriver for food products.

use std::collections::HashMap;

use serde::Serialize;
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::common::{format_number, non_empty, present_non_zero, round_half_up};
use crate::models::{Nutrient, Product};

pub const NOT_AVAILABLE: &str = "N/A";
pub const DEFAULT_NUTRIENT_UNIT: &str = "g";

/// Nutrient keywords the nutrition panel knows how to lay out.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum NutrientType {
    #[strum(serialize = "energyPerNutrientBasis")]
    Energy,
    #[strum(serialize = "energyFromFatPerNutrientBasis")]
    EnergyFromFat,
    #[strum(serialize = "fatPerNutrientBasis")]
    Fat,
    #[strum(serialize = "saturatedFatPerNutrientBasis")]
    SaturatedFat,
    #[strum(serialize = "cholesterolPerNutrientBasis")]
    Cholesterol,
    #[strum(serialize = "saltPerNutrientBasis")]
    Salt,
    #[strum(serialize = "carbohydratesPerNutrientBasis")]
    Carbohydrates,
    #[strum(serialize = "sugarsPerNutrientBasis")]
    Sugars,
    #[strum(serialize = "proteinPerNutrientBasis")]
    Protein,
    #[strum(serialize = "fibrePerNutrientBasis")]
    Fibre,
    #[strum(serialize = "vitaminAPerNutrientBasis")]
    VitaminA,
    #[strum(serialize = "vitaminCPerNutrientBasis")]
    VitaminC,
    #[strum(serialize = "calciumPerNutrientBasis")]
    Calcium,
    #[strum(serialize = "ironPerNutrientBasis")]
    Iron,
}

/// Nutrients keyed by their type string. Entries without a type are
/// dropped and a later duplicate replaces an earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct NutrientMap {
    entries: HashMap<String, Nutrient>,
}

impl NutrientMap {
    pub fn from_nutrients(nutrients: &[Nutrient]) -> Self {
        let entries = nutrients
            .iter()
            .filter_map(|nutrient| {
                let key = non_empty(nutrient.nutrient_type.as_deref())?;
                Some((key.to_string(), nutrient.clone()))
            })
            .collect();
        Self { entries }
    }

    pub fn get(&self, nutrient_type: &str) -> Option<&Nutrient> {
        self.entries.get(nutrient_type)
    }

    pub fn get_known(&self, nutrient_type: NutrientType) -> Option<&Nutrient> {
        self.get(nutrient_type.as_ref())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// `"<value><unit>"` for a present non-zero value, `"N/A"` otherwise.
pub fn format_nutrient_value(nutrient: Option<&Nutrient>, unit: Option<&str>) -> String {
    match present_non_zero(nutrient.and_then(|n| n.nutrient_value)) {
        Some(value) => format!(
            "{}{}",
            format_number(value),
            unit.unwrap_or(DEFAULT_NUTRIENT_UNIT)
        ),
        None => NOT_AVAILABLE.to_string(),
    }
}

/// `"<value>%"` for a present non-zero daily intake, `"N/A%"` otherwise.
pub fn format_daily_value(nutrient: Option<&Nutrient>) -> String {
    match present_non_zero(nutrient.and_then(|n| n.daily_value_intake_percent)) {
        Some(value) => format!("{}%", format_number(value)),
        None => format!("{}%", NOT_AVAILABLE),
    }
}

/// Rounded number of servings in a container. Only computed when both sizes
/// are present and non-zero and both units are present and identical.
pub fn calculate_servings_per_container(
    net_content: Option<f64>,
    serving_size: Option<f64>,
    serving_size_unit: Option<&str>,
    net_content_unit: Option<&str>,
) -> Option<i64> {
    let net = present_non_zero(net_content)?;
    let serving = present_non_zero(serving_size)?;
    let serving_unit = non_empty(serving_size_unit)?;
    let net_unit = non_empty(net_content_unit)?;
    if serving_unit != net_unit {
        return None;
    }

    let raw = net / serving;
    raw.is_finite().then(|| round_half_up(raw))
}

/// Display form of a unit code: `MLT` becomes `ml`, absent becomes `""`.
pub fn normalize_unit(unit: Option<&str>) -> String {
    match unit {
        Some("MLT") => "ml".to_string(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Everything the nutrition panel needs from one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NutritionFacts {
    pub nutrients: NutrientMap,
    pub net_content: Option<f64>,
    pub net_content_unit: String,
    pub serving_size: Option<f64>,
    pub serving_size_unit: String,
    pub servings_per_container: Option<i64>,
}

impl NutritionFacts {
    pub fn derive(product: &Product) -> Self {
        Self {
            nutrients: NutrientMap::from_nutrients(&product.nutrients),
            net_content: product.net_content,
            net_content_unit: normalize_unit(product.net_content_unit.as_deref()),
            serving_size: product.serving_size,
            serving_size_unit: normalize_unit(product.serving_size_unit.as_deref()),
            servings_per_container: calculate_servings_per_container(
                product.net_content,
                product.serving_size,
                product.serving_size_unit.as_deref(),
                product.net_content_unit.as_deref(),
            ),
        }
    }

    pub fn value(&self, nutrient_type: NutrientType) -> String {
        format_nutrient_value(self.nutrients.get_known(nutrient_type), None)
    }

    pub fn daily_value(&self, nutrient_type: NutrientType) -> String {
        format_daily_value(self.nutrients.get_known(nutrient_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    fn nutrient(kind: Option<&str>, value: Option<f64>) -> Nutrient {
        Nutrient {
            nutrient_type: kind.map(str::to_string),
            nutrient_value: value,
            ..Default::default()
        }
    }

    // ==================== Map Tests ====================

    #[test]
    fn map_drops_untyped_and_keeps_last_duplicate() {
        let map = NutrientMap::from_nutrients(&[
            nutrient(Some("fatPerNutrientBasis"), Some(1.0)),
            nutrient(None, Some(9.0)),
            nutrient(Some(""), Some(9.0)),
            nutrient(Some("fatPerNutrientBasis"), Some(2.0)),
        ]);

        assert_eq!(map.len(), 1);
        assert_eq!(map.get_known(NutrientType::Fat).unwrap().nutrient_value, Some(2.0));
        assert!(map.get("proteinPerNutrientBasis").is_none());
    }

    #[test]
    fn keywords_round_trip_through_strings() {
        for kind in NutrientType::iter() {
            assert_eq!(NutrientType::from_str(kind.as_ref()).unwrap(), kind);
        }
        assert_eq!(NutrientType::VitaminA.to_string(), "vitaminAPerNutrientBasis");
    }

    // ==================== Formatting Tests ====================

    #[test]
    fn nutrient_value_formats() {
        let fat = nutrient(Some("fatPerNutrientBasis"), Some(12.5));
        assert_eq!(format_nutrient_value(Some(&fat), None), "12.5g");
        assert_eq!(format_nutrient_value(Some(&fat), Some("mg")), "12.5mg");

        let zero = nutrient(Some("fatPerNutrientBasis"), Some(0.0));
        assert_eq!(format_nutrient_value(Some(&zero), None), "N/A");
        assert_eq!(format_nutrient_value(None, None), "N/A");
    }

    #[test]
    fn daily_value_formats() {
        let iron = Nutrient {
            daily_value_intake_percent: Some(15.0),
            ..Default::default()
        };
        assert_eq!(format_daily_value(Some(&iron)), "15%");
        assert_eq!(format_daily_value(Some(&Nutrient::default())), "N/A%");
        assert_eq!(format_daily_value(None), "N/A%");
    }

    // ==================== Serving Tests ====================

    #[test]
    fn servings_require_matching_units() {
        assert_eq!(
            calculate_servings_per_container(Some(1000.0), Some(250.0), Some("ml"), Some("ml")),
            Some(4)
        );
        assert_eq!(
            calculate_servings_per_container(Some(1000.0), Some(250.0), Some("ml"), Some("g")),
            None
        );
        assert_eq!(
            calculate_servings_per_container(Some(1000.0), Some(250.0), None, None),
            None
        );
    }

    #[test]
    fn servings_need_non_zero_sizes() {
        assert_eq!(
            calculate_servings_per_container(Some(1000.0), Some(0.0), Some("g"), Some("g")),
            None
        );
        assert_eq!(
            calculate_servings_per_container(None, Some(30.0), Some("g"), Some("g")),
            None
        );
    }

    #[test]
    fn servings_round_half_up() {
        assert_eq!(
            calculate_servings_per_container(Some(500.0), Some(200.0), Some("g"), Some("g")),
            Some(3)
        );
        assert_eq!(
            calculate_servings_per_container(Some(500.0), Some(30.0), Some("g"), Some("g")),
            Some(17)
        );
    }

    #[test]
    fn normalizes_units() {
        assert_eq!(normalize_unit(Some("MLT")), "ml");
        assert_eq!(normalize_unit(Some("GRM")), "GRM");
        assert_eq!(normalize_unit(None), "");
    }

    #[test]
    fn derives_facts_from_product() {
        let product = Product {
            net_content: Some(1000.0),
            net_content_unit: Some("MLT".into()),
            serving_size: Some(250.0),
            serving_size_unit: Some("MLT".into()),
            nutrients: vec![nutrient(Some("energyPerNutrientBasis"), Some(180.0))],
            ..Default::default()
        };

        let facts = NutritionFacts::derive(&product);
        assert_eq!(facts.net_content_unit, "ml");
        assert_eq!(facts.serving_size_unit, "ml");
        assert_eq!(facts.servings_per_container, Some(4));
        assert_eq!(facts.value(NutrientType::Energy), "180g");
        assert_eq!(facts.value(NutrientType::Sugars), "N/A");
        assert_eq!(facts.daily_value(NutrientType::Energy), "N/A%");
    }
}
