//! Compliance record stored alongside each client, and the field-level
//! updates the datastore accepts for it

use serde::{Deserialize, Serialize};

use crate::types::{CaseworkerId, Quarter, Timestamp};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComplianceRecord {
    pub caseworker_id: CaseworkerId,
    #[serde(rename = "nextAnnualAssessment")]
    pub annual_assessment_date: Timestamp,
    /// Manual per-quarter dates; `None` means use the calculated date
    pub quarter_overrides: [Option<Timestamp>; 4],
    pub quarter_completed: [bool; 4],
    pub next_quarterly_review: Option<Timestamp>,
    pub last_contact_date: Option<Timestamp>,
    pub last_face_to_face_date: Option<Timestamp>,
    #[serde(default)]
    pub archived: bool,
}

impl ComplianceRecord {
    /// Fresh record for a newly created client
    pub fn new(caseworker_id: CaseworkerId, annual_assessment_date: Timestamp) -> Self {
        Self {
            caseworker_id,
            annual_assessment_date,
            quarter_overrides: [None; 4],
            quarter_completed: [false; 4],
            next_quarterly_review: None,
            last_contact_date: None,
            last_face_to_face_date: None,
            archived: false,
        }
    }

    pub fn override_for(&self, quarter: Quarter) -> Option<Timestamp> {
        self.quarter_overrides[quarter.index()]
    }

    pub fn is_completed(&self, quarter: Quarter) -> bool {
        self.quarter_completed[quarter.index()]
    }

    /// Apply a single field write. Other fields are left untouched.
    pub fn apply(&mut self, field: &ComplianceField) {
        match *field {
            ComplianceField::NextAnnualAssessment(date) => self.annual_assessment_date = date,
            ComplianceField::QuarterDate(quarter, date) => {
                self.quarter_overrides[quarter.index()] = date
            }
            ComplianceField::QuarterCompleted(quarter, done) => {
                self.quarter_completed[quarter.index()] = done
            }
            ComplianceField::NextQuarterlyReview(date) => self.next_quarterly_review = date,
            ComplianceField::LastContactDate(date) => self.last_contact_date = date,
            ComplianceField::LastFaceToFaceDate(date) => self.last_face_to_face_date = date,
        }
    }
}

/// One independently writable field of a [`ComplianceRecord`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum ComplianceField {
    NextAnnualAssessment(Timestamp),
    QuarterDate(Quarter, Option<Timestamp>),
    QuarterCompleted(Quarter, bool),
    NextQuarterlyReview(Option<Timestamp>),
    LastContactDate(Option<Timestamp>),
    LastFaceToFaceDate(Option<Timestamp>),
}

impl ComplianceField {
    /// Column name in the hosted datastore
    pub fn name(&self) -> String {
        match self {
            ComplianceField::NextAnnualAssessment(_) => "nextAnnualAssessment".to_string(),
            ComplianceField::QuarterDate(q, _) => format!("qr{}Date", q.number()),
            ComplianceField::QuarterCompleted(q, _) => format!("qr{}Completed", q.number()),
            ComplianceField::NextQuarterlyReview(_) => "nextQuarterlyReview".to_string(),
            ComplianceField::LastContactDate(_) => "lastContactDate".to_string(),
            ComplianceField::LastFaceToFaceDate(_) => "lastFaceToFaceDate".to_string(),
        }
    }
}
