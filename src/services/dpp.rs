//! Apparel passport summaries: recycled content, data-availability flags
//! and display formatting.

use serde::Serialize;

use crate::common::{format_number, non_empty, parse_date, present_non_zero, round_half_up};
use crate::models::{ApparelDppData, CircularityMetrics, EnvironmentalMetrics};

pub const UNKNOWN_PRODUCT: &str = "Unknown Product";
pub const MISSING_VALUE: &str = "-";
pub const GS1_RESOLVER: &str = "https://id.gs1.org";

const DISPLAY_DATE_FORMAT: &str = "%d-%m-%Y";

/// Average recycled content over every component of every main fabric,
/// rounded half-up. `None` when no component reports a value.
pub fn calculate_recycled_content_percent(data: &ApparelDppData) -> Option<i64> {
    let (total, count) = data
        .main_fabrics
        .iter()
        .flat_map(|fabric| fabric.components.iter())
        .filter_map(|component| component.recycled_content)
        .fold((0.0_f64, 0_u32), |(total, count), value| {
            (total + value, count + 1)
        });

    (count > 0).then(|| round_half_up(total / f64::from(count)))
}

pub fn has_environmental_data(environmental: Option<&EnvironmentalMetrics>) -> bool {
    environmental.is_some_and(|env| {
        [env.carbon_footprint_kg, env.water_used_l, env.energy_used_kwh]
            .into_iter()
            .any(|metric| present_non_zero(metric).is_some())
    })
}

pub fn has_circularity_data(circularity: Option<&CircularityMetrics>) -> bool {
    circularity.is_some_and(|circ| {
        let has_score = circ
            .durability_score
            .as_ref()
            .is_some_and(|score| score.is_meaningful());
        let positive = |value: Option<f64>| value.is_some_and(|v| v > 0.0);

        has_score || positive(circ.recyclable_percent) || positive(circ.recycled_content_percent)
    })
}

/// Formats a passport date as `DD-MM-YYYY`.
///
/// Week notation such as `2025 W20` is kept as written, as is anything that
/// is not a recognizable calendar date. Absent dates render as `-`.
pub fn format_dpp_date(value: Option<&str>) -> String {
    let Some(value) = non_empty(value) else {
        return MISSING_VALUE.to_string();
    };

    if value.contains('W') {
        return value.to_string();
    }

    parse_date(value)
        .map(|date| date.format(DISPLAY_DATE_FORMAT).to_string())
        .unwrap_or_else(|| value.to_string())
}

pub fn get_product_identifier(data: &ApparelDppData) -> String {
    let parts: Vec<String> = [
        data.class_id.clone(),
        data.lot_id.as_ref().map(|lot| format!("Lot: {}", lot)),
    ]
    .into_iter()
    .flatten()
    .collect();

    if parts.is_empty() {
        UNKNOWN_PRODUCT.to_string()
    } else {
        parts.join(" / ")
    }
}

pub fn format_circularity_percent(value: Option<f64>) -> String {
    value
        .map(|v| format!("{}%", format_number(v)))
        .unwrap_or_else(|| MISSING_VALUE.to_string())
}

pub fn format_environmental_metric(value: Option<f64>, unit: &str) -> String {
    match value {
        Some(v) => format!("{} {}", format_number(v), unit),
        None => format!("{} {}", MISSING_VALUE, unit),
    }
}

/// GS1 Digital Link URI for a class and optional lot.
pub fn gs1_digital_link(class_id: Option<&str>, lot_id: Option<&str>) -> Option<String> {
    let class_id = non_empty(class_id)?;
    let mut link = format!("{}/01/{}", GS1_RESOLVER, class_id);
    if let Some(lot_id) = non_empty(lot_id) {
        link.push_str("/10/");
        link.push_str(lot_id);
    }
    Some(link)
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DppComputed {
    pub has_environmental_data: bool,
    pub has_circularity_data: bool,
    pub product_identifier: String,
    pub total_recycled_content: Option<i64>,
}

/// The passport record together with its computed summary.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessedDpp {
    #[serde(flatten)]
    pub data: ApparelDppData,
    pub computed: DppComputed,
}

impl ProcessedDpp {
    /// Link printed on the page: the record's own, else one built from the
    /// class and lot ids.
    pub fn digital_link(&self) -> Option<String> {
        self.data.gs1_digital_link.clone().or_else(|| {
            gs1_digital_link(self.data.class_id.as_deref(), self.data.lot_id.as_deref())
        })
    }
}

pub fn process_dpp_data(data: ApparelDppData) -> ProcessedDpp {
    let computed = DppComputed {
        has_environmental_data: has_environmental_data(data.environmental.as_ref()),
        has_circularity_data: has_circularity_data(data.circularity.as_ref()),
        product_identifier: get_product_identifier(&data),
        total_recycled_content: calculate_recycled_content_percent(&data),
    };
    ProcessedDpp { data, computed }
}
