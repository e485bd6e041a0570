#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dpp_passport::{
    context::PassportLoader,
    sources::{ItemTraceApi, PreviewSource},
};
use serde_json::{json, Value};
use tempfile::TempDir;
use wiremock::MockServer;

pub const GTIN: &str = "09506000134352";
pub const SERIAL: &str = "SN-00042";

/// Helper harness pairing a mock item-trace API with a temporary preview
/// directory.
pub struct TestHarness {
    pub server: MockServer,
    pub preview_dir: TempDir,
    pub timeout: Duration,
}

impl TestHarness {
    pub async fn new() -> Self {
        Self {
            server: MockServer::start().await,
            preview_dir: TempDir::new().expect("create preview dir"),
            timeout: Duration::from_millis(500),
        }
    }

    pub fn preview_path(&self) -> PathBuf {
        self.preview_dir.path().join("ApparelItemTraceExample.json")
    }

    /// Writes `record` as the preview document.
    pub fn write_preview(&self, record: &Value) {
        std::fs::write(self.preview_path(), record.to_string()).expect("write preview");
    }

    pub fn api(&self) -> Arc<ItemTraceApi> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .expect("build client");
        Arc::new(ItemTraceApi::with_client(
            client,
            &self.server.uri(),
            Some("test-token".to_string()),
            self.timeout,
        ))
    }

    pub fn loader(&self) -> PassportLoader {
        let api = self.api();
        PassportLoader::new(api.clone(), PreviewSource::new(self.preview_path()))
            .with_scan_recorder(api)
            .with_support_email(Some("support@example.com".to_string()))
    }
}

/// A compact apparel record with one child, nested materials and events.
pub fn sample_record(serial: &str) -> Value {
    json!({
        "serial": serial,
        "lot_number": "25034874",
        "current_disposition": "active",
        "commission_time": "2025-05-14T09:12:00+10:00",
        "commission_location_join_key": {
            "location_name": "Orchard Packhouse",
            "city": "Mildura",
            "country_code": "AU"
        },
        "children": [
            {
                "serial": "CHILD-1",
                "commission_location_join_key": {
                    "location_name": "Gen Factory",
                    "address": "123 Industrial Boulevard",
                    "state": "Victoria",
                    "country_code": "AU"
                }
            }
        ],
        "product_join_key": {
            "product_name": "Organic Cotton Crew Tee",
            "gtin": GTIN,
            "net_content": 1000,
            "net_content_unit": "MLT",
            "serving_size": 250,
            "serving_size_unit": "MLT",
            "nutrients": [
                { "nutrient_type": "energyPerNutrientBasis", "nutrient_value": 180, "daily_value_intake_percent": 9 }
            ],
            "certifications": [
                {
                    "certification_id": {
                        "certification_standard": "GOTS",
                        "certification_agency": "Control Union",
                        "certification_end_date": "2026-03-31T00:00:00Z"
                    }
                },
                { "certification_id": null }
            ],
            "translations": [
                { "languages_code": "en-US", "product_description": "Crew tee" },
                { "languages_code": "es-MX", "product_description": "Camiseta" }
            ]
        },
        "lgtin_join_key": {
            "lot_number": "25034874",
            "input_material": [
                {
                    "quantity": 0.18,
                    "uom": "KGM",
                    "related_lot_id": {
                        "lot_number": "Y-1",
                        "product": { "product_name": "Organic Cotton Yarn" },
                        "production_location": { "state": "Gujarat", "country_code": "IN" }
                    }
                },
                { "quantity": 4, "uom": "H87", "related_lot_id": null }
            ]
        },
        "events": [
            {
                "biz_step": "retail_sold",
                "event_time": "2024-09-15T10:30:00Z",
                "biz_location_join_key": { "location_name": "Flagship Store" }
            },
            { "biz_step": "", "event_time": null }
        ]
    })
}
