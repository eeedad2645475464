//! Assessment dates from bulk client imports
//!
//! Spreadsheet exports use either ISO dates or US-style month/day/year cells,
//! sometimes with a two-digit year.

use caseload_types::Timestamp;
use chrono::NaiveDate;

use crate::calendar::ReviewCalendar;
use crate::error::{ComplianceError, Result};

/// Parse an imported annual assessment cell to local midnight of that day
pub fn parse_assessment_date(raw: &str, calendar: &ReviewCalendar) -> Result<Timestamp> {
    let cell = raw.trim();
    if cell.is_empty() {
        return Err(ComplianceError::InvalidInput(
            "annual assessment date is empty".to_string(),
        ));
    }

    let format = if cell.contains('/') {
        match cell.rsplit('/').next().map(str::len) {
            Some(2) => "%m/%d/%y",
            _ => "%m/%d/%Y",
        }
    } else {
        "%Y-%m-%d"
    };

    let date = NaiveDate::parse_from_str(cell, format).map_err(|e| {
        ComplianceError::InvalidInput(format!("unrecognized assessment date '{cell}': {e}"))
    })?;
    calendar.midnight(date)
}
