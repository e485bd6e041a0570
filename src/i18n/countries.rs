use once_cell::sync::Lazy;
use std::collections::HashMap;

static COUNTRY_NAMES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("AU", "Australia"),
        ("US", "United States"),
        ("GB", "United Kingdom"),
        ("CA", "Canada"),
        ("DE", "Germany"),
        ("FR", "France"),
        ("IT", "Italy"),
        ("ES", "Spain"),
        ("NZ", "New Zealand"),
        ("JP", "Japan"),
        ("CN", "China"),
        ("IN", "India"),
        ("BR", "Brazil"),
        ("MX", "Mexico"),
        ("NL", "Netherlands"),
        ("BE", "Belgium"),
        ("CH", "Switzerland"),
        ("SE", "Sweden"),
        ("DK", "Denmark"),
        ("NO", "Norway"),
        ("PT", "Portugal"),
        ("GR", "Greece"),
        ("PL", "Poland"),
        ("TH", "Thailand"),
        ("VN", "Vietnam"),
        ("ID", "Indonesia"),
        ("PH", "Philippines"),
        ("SG", "Singapore"),
        ("MY", "Malaysia"),
        ("KR", "South Korea"),
        ("TW", "Taiwan"),
        ("HK", "Hong Kong"),
    ])
});

/// Display name for an ISO country code; unknown codes pass through unchanged.
pub fn country_display_name(code: &str) -> &str {
    COUNTRY_NAMES.get(code).copied().unwrap_or(code)
}
