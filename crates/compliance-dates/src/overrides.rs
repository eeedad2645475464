//! Manual per-quarter dates layered over the calculated ones

use caseload_types::{ComplianceField, ComplianceRecord, Quarter, QuarterInfo, Timestamp};
use serde::Serialize;

use crate::calendar::ReviewCalendar;
use crate::cursor::next_due_quarter;
use crate::error::Result;

/// Date in force for `quarter`: the override when one is set, else the calculated date
pub fn effective_quarter_date(
    quarter: Quarter,
    calculated: &[Timestamp; 4],
    overrides: &[Option<Timestamp>; 4],
) -> Timestamp {
    overrides[quarter.index()].unwrap_or(calculated[quarter.index()])
}

/// Effective dates for all four quarters
pub fn effective_quarter_dates(
    calculated: &[Timestamp; 4],
    overrides: &[Option<Timestamp>; 4],
) -> [Timestamp; 4] {
    Quarter::ALL.map(|quarter| effective_quarter_date(quarter, calculated, overrides))
}

/// Field writes that restore the calculated schedule.
///
/// Clears the four overrides in quarter order, then points
/// `nextQuarterlyReview` at the calculated Q1. Applying the same writes twice
/// leaves the record unchanged.
pub fn reset_fields(calculated: &[QuarterInfo; 4]) -> [ComplianceField; 5] {
    [
        ComplianceField::QuarterDate(Quarter::Q1, None),
        ComplianceField::QuarterDate(Quarter::Q2, None),
        ComplianceField::QuarterDate(Quarter::Q3, None),
        ComplianceField::QuarterDate(Quarter::Q4, None),
        ComplianceField::NextQuarterlyReview(Some(calculated[Quarter::Q1.index()].date)),
    ]
}

/// One row of a client's review schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledQuarter {
    pub quarter: Quarter,
    pub label: &'static str,
    pub calculated: Timestamp,
    pub override_date: Option<Timestamp>,
    pub effective: Timestamp,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
    pub annual_assessment_date: Timestamp,
    pub quarters: [ScheduledQuarter; 4],
    pub next_due: Quarter,
}

impl Schedule {
    pub fn build(calendar: &ReviewCalendar, record: &ComplianceRecord) -> Result<Self> {
        let calculated = calendar.compute_quarterly_dates(record.annual_assessment_date)?;
        let quarters = calculated.map(|info| ScheduledQuarter {
            quarter: info.quarter,
            label: info.label,
            calculated: info.date,
            override_date: record.override_for(info.quarter),
            effective: record.override_for(info.quarter).unwrap_or(info.date),
            completed: record.is_completed(info.quarter),
        });

        Ok(Self {
            annual_assessment_date: record.annual_assessment_date,
            quarters,
            next_due: next_due_quarter(record.quarter_completed),
        })
    }

    pub fn next_due_row(&self) -> &ScheduledQuarter {
        &self.quarters[self.next_due.index()]
    }
}
