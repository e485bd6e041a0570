//! Certification rows for the compliance section.

use serde::Serialize;

use crate::common::non_empty;
use crate::models::Certification;
use crate::services::events::format_issue_date;

/// One certificate as shown on the page. Optional lines are `None` so the
/// renderer can leave them out.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CertificationRow {
    pub standard: Option<String>,
    pub agency: Option<String>,
    pub identification: Option<String>,
    pub certification_type: Option<String>,
    /// End date as `DD MMM YYYY`
    pub valid_until: Option<String>,
    pub statement: Option<String>,
}

impl CertificationRow {
    /// `None` when the entry does not carry an expanded certification.
    pub fn from_certification(certification: &Certification) -> Option<Self> {
        let record = certification.record()?;
        Some(Self {
            standard: record.certification_standard.clone(),
            agency: record.certification_agency.clone(),
            identification: record.certification_identification.clone(),
            certification_type: record.certification_type.clone(),
            valid_until: non_empty(record.certification_end_date.as_deref())
                .map(|date| format_issue_date(Some(date))),
            statement: record.certification_statement.clone(),
        })
    }
}

pub fn certification_rows(certifications: &[Certification]) -> Vec<CertificationRow> {
    certifications
        .iter()
        .filter_map(CertificationRow::from_certification)
        .collect()
}
