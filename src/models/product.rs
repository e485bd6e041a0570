use serde::{Deserialize, Serialize};

use crate::common::{lenient_number, non_empty_string, nullable_vec};
use crate::models::Certification;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    #[serde(deserialize_with = "non_empty_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub product_name: Option<String>,
    pub brand: Option<Brand>,
    #[serde(deserialize_with = "non_empty_string")]
    pub gtin: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub custom_id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub digital_link: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub variant_description: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub functional_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub primary_image: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub product_manufacturer: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub brand_owner: Option<String>,

    // Quantities
    #[serde(deserialize_with = "lenient_number")]
    pub net_content: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub net_content_unit: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub net_weight: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub net_weight_unit: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub gross_weight: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub gross_weight_unit: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub serving_size: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub serving_size_unit: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub nutrient_basis_quantity: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub nutrient_basis_quantity_type: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub nutrient_basis_quantity_unit: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub nutrients: Vec<Nutrient>,
    #[serde(deserialize_with = "non_empty_string")]
    pub packaging_type_code: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub percentage_of_alcohol_by_volume: Option<f64>,

    // Apparel attributes
    #[serde(deserialize_with = "non_empty_string")]
    pub size: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub target_consumer_gender: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub color: Option<String>,

    pub parent_product: Option<Box<Product>>,
    #[serde(deserialize_with = "nullable_vec")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "nullable_vec")]
    pub translations: Vec<ProductTranslation>,
}

/// Per-language product copy.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProductTranslation {
    #[serde(deserialize_with = "non_empty_string")]
    pub languages_code: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub product_description: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub product_content: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub country_of_origin_statement: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub allergen_statement: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub ingredient_statement: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub ingredients_of_concern_statement: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub care_instructions: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Brand {
    #[serde(deserialize_with = "non_empty_string")]
    pub brand_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub sub_brand_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub primary_image: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub brand_content: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub translations: Vec<BrandTranslation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandTranslation {
    #[serde(deserialize_with = "non_empty_string")]
    pub languages_code: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub brand_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub sub_brand_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub brand_content: Option<String>,
}

/// One nutrient line, tagged with a GS1 nutrient type keyword such as
/// `fatPerNutrientBasis`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Nutrient {
    #[serde(deserialize_with = "non_empty_string")]
    pub nutrient_type: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub nutrient_value: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub daily_value_intake_percent: Option<f64>,
    pub nutrient_unit: Option<NutrientUnit>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NutrientUnit {
    #[serde(deserialize_with = "non_empty_string")]
    pub code: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub description: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub classification: Option<String>,
}
