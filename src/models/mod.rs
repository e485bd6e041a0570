//! Traceability record shapes as delivered by the item-trace API.
//!
//! Every nested reference is optional. String fields collapse `null`, a
//! missing key and `""` into `None` while deserializing, so derivers only
//! ever see one spelling of "absent".

pub mod apparel;
pub mod certification;
pub mod event;
pub mod item_trace;
pub mod location;
pub mod lot;
pub mod product;

pub use apparel::{
    ApparelDppData, CircularityMetrics, ComplianceCertificate, DppServiceProvider,
    DurabilityScore, EnvironmentalMetrics, ImporterInfo, MaterialComponent, MaterialComposition,
    ProductionDetails, SizeAndFitData, SizeMeasurement,
};
pub use certification::{Certification, CertificationRecord};
pub use event::Event;
pub use item_trace::{ItemTrace, ItemTraceInput};
pub use location::{BizLocation, LocationTranslation, MapPoint};
pub use lot::{InputMaterial, Lot};
pub use product::{Brand, BrandTranslation, Nutrient, NutrientUnit, Product, ProductTranslation};

use serde::{Deserialize, Serialize};

/// A join that the API either expands into the full record or leaves as a
/// bare key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference<T> {
    Expanded(T),
    Key(String),
}

impl<T> Reference<T> {
    /// The expanded record, if the API resolved the join.
    pub fn expanded(&self) -> Option<&T> {
        match self {
            Reference::Expanded(value) => Some(value),
            Reference::Key(_) => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        match self {
            Reference::Expanded(_) => None,
            Reference::Key(key) => Some(key.as_str()),
        }
    }
}
