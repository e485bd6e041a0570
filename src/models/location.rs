use serde::{Deserialize, Serialize};

use crate::common::{lenient_number, non_empty_string, nullable_vec};
use crate::models::{Certification, Reference};

/// A facility (factory, store, farm, ...) referenced by a traceability record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BizLocation {
    #[serde(deserialize_with = "non_empty_string")]
    pub id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub location_name: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub gln: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub address: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub city: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub state: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub postal_code: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub country_code: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub timezone: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub primary_contact_telephone: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub primary_contact_email: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub primary_image: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub digital_link: Option<String>,
    #[serde(deserialize_with = "nullable_vec")]
    pub location_role: Vec<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub latitude: Option<f64>,
    #[serde(deserialize_with = "lenient_number")]
    pub longitude: Option<f64>,
    pub map: Option<MapPoint>,
    pub parent_location: Option<Box<Reference<BizLocation>>>,
    pub third_party_location: Option<bool>,
    #[serde(deserialize_with = "nullable_vec")]
    pub certifications: Vec<Certification>,
    #[serde(deserialize_with = "nullable_vec")]
    pub translations: Vec<LocationTranslation>,
}

/// GeoJSON point, `[longitude, latitude]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapPoint {
    pub coordinates: [f64; 2],
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationTranslation {
    #[serde(deserialize_with = "non_empty_string")]
    pub languages_code: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub location_description: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub location_content: Option<String>,
}

impl BizLocation {
    /// Latitude/longitude pair, preferring explicit fields over the map point.
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => self
                .map
                .as_ref()
                .map(|point| (point.coordinates[1], point.coordinates[0])),
        }
    }
}
