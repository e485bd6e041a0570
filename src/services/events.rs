//! Product journey rows built from supply-chain events.

use serde::Serialize;

use crate::common::{non_empty, parse_date};
use crate::models::Event;

pub const NOT_AVAILABLE: &str = "N/A";

/// Title-cases an underscore separated business step:
/// `retail_sold` becomes `Retail Sold`.
pub fn format_biz_step(text: Option<&str>) -> String {
    let Some(text) = non_empty(text) else {
        return NOT_AVAILABLE.to_string();
    };

    text.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Short journey date, `DD MMM YY` upper-cased (`15 SEP 24`).
///
/// Timestamps that cannot be read are shown as delivered.
pub fn format_event_date(timestamp: Option<&str>) -> String {
    date_with(timestamp, "%d %b %y")
}

/// Issue date with a four digit year (`15 SEP 2024`).
pub fn format_issue_date(timestamp: Option<&str>) -> String {
    date_with(timestamp, "%d %b %Y")
}

fn date_with(timestamp: Option<&str>, format: &str) -> String {
    let Some(timestamp) = non_empty(timestamp) else {
        return NOT_AVAILABLE.to_string();
    };

    match parse_date(timestamp) {
        Some(date) => date.format(format).to_string().to_uppercase(),
        None => timestamp.to_string(),
    }
}

/// One line of the product journey.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventRow {
    pub date: String,
    pub biz_step: String,
    pub location_name: String,
}

impl EventRow {
    pub fn from_event(event: &Event) -> Self {
        let location_name = event
            .biz_location_join_key
            .as_ref()
            .and_then(|location| non_empty(location.location_name.as_deref()))
            .unwrap_or(NOT_AVAILABLE)
            .to_string();

        Self {
            date: format_event_date(event.event_time.as_deref()),
            biz_step: format_biz_step(event.biz_step.as_deref()),
            location_name,
        }
    }
}

/// Journey rows in the order the events were delivered.
pub fn event_rows(events: &[Event]) -> Vec<EventRow> {
    events.iter().map(EventRow::from_event).collect()
}
