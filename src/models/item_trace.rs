use serde::{Deserialize, Serialize};

use crate::common::{non_empty_string, nullable_vec};
use crate::models::{BizLocation, Event, Lot, Product, Reference};

/// The raw description of one identified item and its supply-chain history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTrace {
    #[serde(deserialize_with = "non_empty_string")]
    pub epc_join_key: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub epc_type: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub record_time: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub lot_number: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub serial: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub sscc: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub grai: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub giai: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub item_expiration_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub sell_by_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub best_before_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub last_seen_time: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub current_disposition: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub last_biz_step: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub commission_time: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub commission_event_id: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub selling_time: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub recall_time: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub top_parent_join_key: Option<String>,

    #[serde(deserialize_with = "nullable_vec")]
    pub children: Vec<ItemTrace>,
    pub parent_join_key: Option<Box<Reference<ItemTrace>>>,
    pub commission_location_join_key: Option<BizLocation>,
    pub last_seen_biz_location_join_key: Option<BizLocation>,
    pub expected_biz_location_join_key: Option<BizLocation>,
    pub product_join_key: Option<Product>,
    pub lgtin_join_key: Option<Lot>,
    #[serde(deserialize_with = "nullable_vec")]
    pub events: Vec<Event>,
    #[serde(deserialize_with = "nullable_vec")]
    pub inputs: Vec<ItemTraceInput>,
}

/// Flattened input relation reported alongside aggregated items.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemTraceInput {
    #[serde(deserialize_with = "non_empty_string")]
    pub final_output_epc_join_key: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub input_epc_join_key: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub input_epc_type: Option<String>,
    pub input_product_join_key: Option<Product>,
    #[serde(deserialize_with = "non_empty_string")]
    pub input_lot_number: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub uom: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub quantity: Option<String>,
}

impl ItemTrace {
    pub fn parent(&self) -> Option<&ItemTrace> {
        self.parent_join_key.as_deref().and_then(Reference::expanded)
    }

    pub fn gtin(&self) -> Option<&str> {
        self.product_join_key.as_ref()?.gtin.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_is_a_valid_record() {
        let record: ItemTrace = serde_json::from_str("{}").unwrap();
        assert_eq!(record, ItemTrace::default());
    }

    #[test]
    fn nulls_and_empty_strings_collapse_to_none() {
        let record: ItemTrace = serde_json::from_str(
            r#"{
                "serial": "",
                "lot_number": null,
                "children": [],
                "commission_location_join_key": null,
                "product_join_key": { "product_name": "Shirt", "gtin": "" }
            }"#,
        )
        .unwrap();

        assert_eq!(record.serial, None);
        assert_eq!(record.lot_number, None);
        assert!(record.commission_location_join_key.is_none());
        let product = record.product_join_key.as_ref().unwrap();
        assert_eq!(product.product_name.as_deref(), Some("Shirt"));
        assert_eq!(record.gtin(), None);
    }

    #[test]
    fn parent_may_be_a_bare_key_or_a_record() {
        let keyed: ItemTrace =
            serde_json::from_str(r#"{ "parent_join_key": "urn:epc:id:sscc:1" }"#).unwrap();
        assert!(keyed.parent().is_none());

        let expanded: ItemTrace =
            serde_json::from_str(r#"{ "parent_join_key": { "serial": "P-1" } }"#).unwrap();
        assert_eq!(expanded.parent().unwrap().serial.as_deref(), Some("P-1"));
    }
}
