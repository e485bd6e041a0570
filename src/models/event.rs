use serde::{Deserialize, Serialize};

use crate::common::{lenient_number, non_empty_string, nullable_vec};
use crate::models::BizLocation;

/// A supply-chain event (EPCIS style) attached to a record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Event {
    #[serde(deserialize_with = "non_empty_string")]
    pub event_id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub epc_join_key: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub event_type: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub action: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub biz_step: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub disposition: Option<String>,
    /// ISO 8601 timestamp as sent by the API
    #[serde(deserialize_with = "non_empty_string")]
    pub event_time: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub event_time_zone_offset: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(deserialize_with = "non_empty_string")]
    pub uom: Option<String>,
    pub biz_location_join_key: Option<BizLocation>,
    pub read_point_join_key: Option<BizLocation>,
    pub destination_location_join_key: Option<BizLocation>,
    #[serde(deserialize_with = "non_empty_string")]
    pub ilmd_lot_number: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub ilmd_item_expiration_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub ilmd_best_before_date: Option<String>,
    #[serde(deserialize_with = "lenient_number")]
    pub carbon_footprint: Option<f64>,
}
