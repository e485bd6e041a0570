//! Page query parameters.

use serde::Serialize;
use strum::{AsRefStr, Display, EnumString};
use url::form_urlencoded;

/// Which passport layout was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, AsRefStr, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Dpp,
    Food,
}

/// Parameters recognized on the passport page URL. Empty values are
/// treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassportQuery {
    /// Only the literal `preview=true` enables preview mode.
    pub preview: bool,
    pub gtin: Option<String>,
    pub serial: Option<String>,
    pub scan_id: Option<String>,
    pub dpp: Option<String>,
    pub class_id: Option<String>,
    pub lot_id: Option<String>,
    pub mode: Option<Mode>,
}

impl PassportQuery {
    /// Parses a URL query string, with or without its leading `?`.
    /// Unknown keys are ignored; for repeated keys the first value wins.
    pub fn parse(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut parsed = Self::default();

        for (key, value) in form_urlencoded::parse(query.as_bytes()) {
            if value.is_empty() {
                continue;
            }
            let slot = match &*key {
                "preview" => {
                    parsed.preview = parsed.preview || value == "true";
                    continue;
                }
                "mode" => {
                    if parsed.mode.is_none() {
                        parsed.mode = value.parse().ok();
                    }
                    continue;
                }
                "gtin" => &mut parsed.gtin,
                "serial" => &mut parsed.serial,
                "scanid" => &mut parsed.scan_id,
                "dpp" => &mut parsed.dpp,
                "class" => &mut parsed.class_id,
                "lot" => &mut parsed.lot_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        parsed
    }

    pub fn new(gtin: Option<&str>, serial: Option<&str>) -> Self {
        let present = |value: Option<&str>| value.filter(|v| !v.is_empty()).map(str::to_string);
        Self {
            gtin: present(gtin),
            serial: present(serial),
            ..Default::default()
        }
    }

    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    pub fn with_scan_id(mut self, scan_id: impl Into<String>) -> Self {
        let scan_id = scan_id.into();
        self.scan_id = (!scan_id.is_empty()).then_some(scan_id);
        self
    }

    /// Both identifiers the item-trace endpoint needs are present.
    pub fn has_api_params(&self) -> bool {
        self.gtin.is_some() && self.serial.is_some()
    }

    /// A serial is only meaningful together with the product it belongs to.
    pub fn has_orphan_serial(&self) -> bool {
        self.serial.is_some() && self.gtin.is_none()
    }

    pub fn is_dpp_mode(&self) -> bool {
        self.mode == Some(Mode::Dpp) || self.dpp.as_deref() == Some("true")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_parameters() {
        let query = PassportQuery::parse("?gtin=09506000134352&serial=ABC%20123&scanid=s-1");
        assert_eq!(query.gtin.as_deref(), Some("09506000134352"));
        assert_eq!(query.serial.as_deref(), Some("ABC 123"));
        assert_eq!(query.scan_id.as_deref(), Some("s-1"));
        assert!(!query.preview);
        assert!(query.has_api_params());
        assert!(!PassportQuery::parse("gtin=1").has_api_params());
    }

    #[test]
    fn preview_only_when_literally_true() {
        assert!(PassportQuery::parse("preview=true").preview);
        assert!(!PassportQuery::parse("preview=1").preview);
        assert!(!PassportQuery::parse("preview=TRUE").preview);
        assert!(!PassportQuery::parse("preview=").preview);
    }

    #[test]
    fn empty_values_are_absent() {
        let query = PassportQuery::parse("gtin=&serial=&scanid=");
        assert_eq!(query, PassportQuery::default());
        assert!(!query.has_api_params());
    }

    #[test]
    fn dpp_parameters() {
        let query = PassportQuery::parse("dpp=true&class=CC848125-33Q0101&lot=25034874&mode=dpp");
        assert_eq!(query.class_id.as_deref(), Some("CC848125-33Q0101"));
        assert_eq!(query.lot_id.as_deref(), Some("25034874"));
        assert_eq!(query.mode, Some(Mode::Dpp));
        assert!(query.is_dpp_mode());

        assert_eq!(PassportQuery::parse("mode=food").mode, Some(Mode::Food));
        assert_eq!(PassportQuery::parse("mode=other").mode, None);
    }

    #[test]
    fn orphan_serial_is_detected() {
        assert!(PassportQuery::parse("serial=ABC").has_orphan_serial());
        assert!(!PassportQuery::parse("gtin=1&serial=ABC").has_orphan_serial());
        assert!(!PassportQuery::parse("gtin=1").has_orphan_serial());
    }
}
