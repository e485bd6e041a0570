//! Location deriver: picks the facility a record should be attributed to and
//! flattens it into display fields.

use serde::Serialize;

use crate::common::non_empty;
use crate::i18n::country_display_name;
use crate::models::{BizLocation, ItemTrace, Lot, Product};
use crate::services::placeholders;

/// Flat, display-ready facility fields. Absent values are `None`, never `""`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LocationDetails {
    pub location_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    /// ISO country code as delivered
    pub country: Option<String>,
    pub region: Option<String>,
}

impl LocationDetails {
    /// Country display name for the stored code, if any.
    pub fn country_name(&self) -> Option<&str> {
        self.country.as_deref().map(country_display_name)
    }
}

/// Condition a [`RegionRule`] tests a facility against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegionMatcher {
    /// Case-sensitive substring of the facility name.
    NameContains(String),
    StateEquals(String),
    CountryEquals(String),
}

impl RegionMatcher {
    fn matches(&self, location: &BizLocation) -> bool {
        match self {
            RegionMatcher::NameContains(needle) => location
                .location_name
                .as_deref()
                .is_some_and(|name| name.contains(needle.as_str())),
            RegionMatcher::StateEquals(state) => location.state.as_deref() == Some(state.as_str()),
            RegionMatcher::CountryEquals(code) => {
                location.country_code.as_deref() == Some(code.as_str())
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRule {
    pub matcher: RegionMatcher,
    pub region: String,
}

impl RegionRule {
    pub fn new(matcher: RegionMatcher, region: impl Into<String>) -> Self {
        Self {
            matcher,
            region: region.into(),
        }
    }
}

/// Ordered region table; the first matching rule wins, otherwise the
/// default region applies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRules {
    rules: Vec<RegionRule>,
    default_region: String,
}

impl RegionRules {
    pub fn new(rules: Vec<RegionRule>, default_region: impl Into<String>) -> Self {
        Self {
            rules,
            default_region: default_region.into(),
        }
    }

    pub fn with_rule(mut self, rule: RegionRule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn derive(&self, location: &BizLocation) -> String {
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(location))
            .map(|rule| rule.region.clone())
            .unwrap_or_else(|| self.default_region.clone())
    }
}

impl Default for RegionRules {
    fn default() -> Self {
        placeholders::region_rules()
    }
}

/// Derives a region name using the shipped region table.
pub fn derive_region_from_location(location: &BizLocation) -> String {
    RegionRules::default().derive(location)
}

/// Selects the facility a record is attributed to: the first child's
/// commissioning location, then the record's own, then none.
pub fn extract_primary_location(record: &ItemTrace) -> Option<&BizLocation> {
    record
        .children
        .first()
        .and_then(|child| child.commission_location_join_key.as_ref())
        .or(record.commission_location_join_key.as_ref())
}

/// Reduces facilities to [`LocationDetails`] with an injected region table
/// and fallback facility.
#[derive(Debug, Clone)]
pub struct LocationDeriver {
    rules: RegionRules,
    fallback: LocationDetails,
}

impl LocationDeriver {
    pub fn new(rules: RegionRules, fallback: LocationDetails) -> Self {
        Self { rules, fallback }
    }

    pub fn transform(&self, location: Option<&BizLocation>) -> LocationDetails {
        let Some(location) = location else {
            return self.fallback.clone();
        };

        let field = |value: &Option<String>| non_empty(value.as_deref()).map(str::to_string);

        LocationDetails {
            location_name: field(&location.location_name),
            address: field(&location.address),
            city: field(&location.city),
            state: field(&location.state),
            country: field(&location.country_code),
            region: Some(self.rules.derive(location)),
        }
    }
}

impl Default for LocationDeriver {
    fn default() -> Self {
        Self::new(RegionRules::default(), placeholders::fallback_location())
    }
}

/// Transforms a facility with the shipped region table and fallback.
pub fn transform_location_details(location: Option<&BizLocation>) -> LocationDetails {
    LocationDeriver::default().transform(location)
}

/// Core entities and the attributed location of one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ItemTraceSummary<'a> {
    pub product: Option<&'a Product>,
    pub lot: Option<&'a Lot>,
    pub location: Option<&'a BizLocation>,
    #[serde(flatten)]
    pub details: LocationDetails,
}

/// Bundles product, lot and location details for a record. With no record
/// at all every field is absent (no fallback facility).
pub fn process_item_trace<'a>(
    record: Option<&'a ItemTrace>,
    deriver: &LocationDeriver,
) -> ItemTraceSummary<'a> {
    let Some(record) = record else {
        return ItemTraceSummary::default();
    };

    let location = extract_primary_location(record);
    ItemTraceSummary {
        product: record.product_join_key.as_ref(),
        lot: record.lgtin_join_key.as_ref(),
        location,
        details: deriver.transform(location),
    }
}

/// Single-line postal address: street, city, state, postcode and country
/// name, skipping absent parts.
pub fn format_full_address(location: &BizLocation) -> String {
    [
        location.address.as_deref(),
        location.city.as_deref(),
        location.state.as_deref(),
        location.postal_code.as_deref(),
        location.country_code.as_deref().map(country_display_name),
    ]
    .into_iter()
    .filter_map(non_empty)
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn location(name: &str) -> BizLocation {
        BizLocation {
            location_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    // ==================== Region Tests ====================

    #[test]
    fn gen_facility_maps_to_robinvale() {
        assert_eq!(derive_region_from_location(&location("Gen Factory")), "Robinvale");
    }

    #[test]
    fn other_facilities_also_map_to_robinvale_today() {
        // The shipped table has one rule and its region equals the default.
        assert_eq!(derive_region_from_location(&location("Orchard Packhouse")), "Robinvale");
        assert_eq!(derive_region_from_location(&BizLocation::default()), "Robinvale");
    }

    #[test]
    fn name_rule_is_case_sensitive() {
        let rules = RegionRules::new(
            vec![RegionRule::new(RegionMatcher::NameContains("Gen".into()), "Gen Region")],
            "Elsewhere",
        );
        assert_eq!(rules.derive(&location("Gen Factory")), "Gen Region");
        assert_eq!(rules.derive(&location("gen factory")), "Elsewhere");
    }

    #[test]
    fn first_matching_rule_wins() {
        let rules = RegionRules::new(Vec::new(), "Default")
            .with_rule(RegionRule::new(
                RegionMatcher::StateEquals("Victoria".into()),
                "Greater Sunraysia",
            ))
            .with_rule(RegionRule::new(
                RegionMatcher::CountryEquals("AU".into()),
                "Australia",
            ));

        let mut loc = location("Packhouse");
        loc.state = Some("Victoria".into());
        loc.country_code = Some("AU".into());
        assert_eq!(rules.derive(&loc), "Greater Sunraysia");

        loc.state = None;
        assert_eq!(rules.derive(&loc), "Australia");
    }

    // ==================== Selection Tests ====================

    #[test]
    fn prefers_first_child_commission_location() {
        let record = ItemTrace {
            commission_location_join_key: Some(location("Own Site")),
            children: vec![ItemTrace {
                commission_location_join_key: Some(location("Child Site")),
                ..Default::default()
            }],
            ..Default::default()
        };

        let selected = extract_primary_location(&record).unwrap();
        assert_eq!(selected.location_name.as_deref(), Some("Child Site"));
    }

    #[test]
    fn falls_back_to_own_location_when_child_has_none() {
        let record = ItemTrace {
            commission_location_join_key: Some(location("Own Site")),
            children: vec![ItemTrace::default()],
            ..Default::default()
        };

        let selected = extract_primary_location(&record).unwrap();
        assert_eq!(selected.location_name.as_deref(), Some("Own Site"));
    }

    #[test]
    fn no_location_resolves_to_none() {
        assert!(extract_primary_location(&ItemTrace::default()).is_none());
    }

    // ==================== Transform Tests ====================

    #[test]
    fn transforms_facility_fields() {
        let loc = BizLocation {
            location_name: Some("Gen Factory".into()),
            address: Some("1 Main St".into()),
            city: Some("Mildura".into()),
            state: Some("Victoria".into()),
            country_code: Some("AU".into()),
            ..Default::default()
        };

        let details = transform_location_details(Some(&loc));
        assert_eq!(details.location_name.as_deref(), Some("Gen Factory"));
        assert_eq!(details.address.as_deref(), Some("1 Main St"));
        assert_eq!(details.country.as_deref(), Some("AU"));
        assert_eq!(details.country_name(), Some("Australia"));
        assert_eq!(details.region.as_deref(), Some("Robinvale"));
    }

    #[test]
    fn empty_strings_become_absent() {
        let loc = BizLocation {
            location_name: Some(String::new()),
            city: Some(String::new()),
            ..Default::default()
        };

        let details = transform_location_details(Some(&loc));
        assert_eq!(details.location_name, None);
        assert_eq!(details.city, None);
    }

    #[test]
    fn missing_location_uses_fallback_facility() {
        let details = transform_location_details(None);
        assert_eq!(details.location_name.as_deref(), Some("Raw Gen Factory"));
        assert_eq!(details.address.as_deref(), Some("309 Morris Ave"));
        assert_eq!(details.city, None);
        assert_eq!(details.region.as_deref(), Some("Robinvale"));
    }

    #[test]
    fn injected_fallback_replaces_placeholder() {
        let deriver = LocationDeriver::new(RegionRules::default(), LocationDetails::default());
        assert_eq!(deriver.transform(None), LocationDetails::default());
    }

    #[test]
    fn process_without_record_is_all_absent() {
        let summary = process_item_trace(None, &LocationDeriver::default());
        assert!(summary.product.is_none());
        assert!(summary.location.is_none());
        assert_eq!(summary.details, LocationDetails::default());
    }

    #[test]
    fn full_address_skips_absent_parts() {
        let loc = BizLocation {
            address: Some("123 Industrial Boulevard".into()),
            city: Some("Melbourne".into()),
            postal_code: Some("3000".into()),
            country_code: Some("AU".into()),
            ..Default::default()
        };
        assert_eq!(
            format_full_address(&loc),
            "123 Industrial Boulevard, Melbourne, 3000, Australia"
        );
        assert_eq!(format_full_address(&BizLocation::default()), "");
    }
}
