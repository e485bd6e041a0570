//! Stand-in display values.
//!
//! These are placeholders pending real integration. They are injected into
//! the derivers through their constructors and never referenced from the
//! derivation logic itself, so swapping them out does not touch any rule.

use crate::services::location::{LocationDetails, RegionMatcher, RegionRule, RegionRules};

pub const FALLBACK_LOCATION_NAME: &str = "Raw Gen Factory";
pub const FALLBACK_ADDRESS: &str = "309 Morris Ave";
pub const DEFAULT_REGION: &str = "Robinvale";

/// Facility shown when a record resolves no commissioning location.
pub fn fallback_location() -> LocationDetails {
    LocationDetails {
        location_name: Some(FALLBACK_LOCATION_NAME.to_string()),
        address: Some(FALLBACK_ADDRESS.to_string()),
        city: None,
        state: None,
        country: None,
        region: Some(DEFAULT_REGION.to_string()),
    }
}

/// The region table currently in use: a single name rule whose region is
/// the same as the default.
pub fn region_rules() -> RegionRules {
    RegionRules::new(
        vec![RegionRule::new(
            RegionMatcher::NameContains("Gen".to_string()),
            DEFAULT_REGION,
        )],
        DEFAULT_REGION,
    )
}
