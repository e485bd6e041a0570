use serde::{Deserialize, Serialize};

use crate::common::non_empty_string;
use crate::models::Reference;

/// Junction entry linking a product or facility to a certification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Certification {
    pub certification_id: Option<Reference<CertificationRecord>>,
}

impl Certification {
    pub fn record(&self) -> Option<&CertificationRecord> {
        self.certification_id.as_ref()?.expanded()
    }
}

/// A certificate held against a recognised standard (GOTS, Fairtrade, ...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CertificationRecord {
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_standard: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_agency: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_identification: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_type: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_start_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_end_date: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_statement: Option<String>,
    #[serde(deserialize_with = "non_empty_string")]
    pub certification_value: Option<String>,
}
