//! Due-status classification against the current date
//!
//! Every "due" check compares calendar months only. The year is ignored, so an
//! assessment dated in March of any year reads as due throughout every March.

use caseload_types::{ComplianceRecord, DueStatus, Quarter, Timestamp, MILLIS_PER_DAY};

use crate::calendar::ReviewCalendar;
use crate::config::RecencyConfig;
use crate::cursor::next_due_quarter;
use crate::error::{ComplianceError, Result};
use crate::overrides::effective_quarter_dates;

/// Month after `month` on a one-based calendar, December wrapping to January
fn following_month(month: u32) -> u32 {
    month % 12 + 1
}

/// Next face-to-face visit: a fixed number of 24-hour days after the last one
pub fn next_face_to_face_due(
    last_face_to_face: Timestamp,
    cadence_days: u32,
) -> Result<Timestamp> {
    last_face_to_face
        .checked_add_millis(i64::from(cadence_days) * MILLIS_PER_DAY)
        .ok_or_else(|| {
            ComplianceError::InvalidInput(format!(
                "face-to-face date overflows: {}",
                last_face_to_face.millis()
            ))
        })
}

/// Whole days from `last` to `now`. Both instants must map onto the calendar.
fn days_between(calendar: &ReviewCalendar, now: Timestamp, last: Timestamp) -> Result<i64> {
    calendar.date_of(last)?;
    now.days_since(last).ok_or_else(|| {
        ComplianceError::InvalidInput(format!(
            "cannot count days from {} to {}",
            last.millis(),
            now.millis()
        ))
    })
}

pub fn classify(
    calendar: &ReviewCalendar,
    recency: &RecencyConfig,
    now: Timestamp,
    record: &ComplianceRecord,
) -> Result<DueStatus> {
    let current_month = calendar.month_of(now)?;
    let next_month = following_month(current_month);
    let annual_month = calendar.month_of(record.annual_assessment_date)?;

    let calculated = calendar
        .compute_quarterly_dates(record.annual_assessment_date)?
        .map(|info| info.date);
    let effective = effective_quarter_dates(&calculated, &record.quarter_overrides);

    let next_qr_quarter = next_due_quarter(record.quarter_completed);
    let next_qr_date = effective[next_qr_quarter.index()];

    let mut quarter_in_current_month = false;
    for quarter in Quarter::ALL {
        if calendar.month_of(effective[quarter.index()])? == current_month {
            quarter_in_current_month = true;
        }
    }

    let next_face_to_face_due = record
        .last_face_to_face_date
        .map(|last| next_face_to_face_due(last, recency.face_to_face_cadence_days))
        .transpose()?;
    let is_face_to_face_due = match next_face_to_face_due {
        Some(due) => calendar.month_of(due)? == current_month,
        None => false,
    };

    let days_since_contact = record
        .last_contact_date
        .map(|last| days_between(calendar, now, last))
        .transpose()?;
    let days_since_face_to_face = record
        .last_face_to_face_date
        .map(|last| days_between(calendar, now, last))
        .transpose()?;

    let status = DueStatus {
        is_annual_due: annual_month == current_month,
        is_annual_due_next_month: annual_month == next_month,
        next_qr_quarter,
        next_qr_date,
        is_qr_due: calendar.month_of(next_qr_date)? == current_month,
        is_q4: quarter_in_current_month && annual_month == next_month,
        next_face_to_face_due,
        is_face_to_face_due,
        days_since_contact,
        days_since_face_to_face,
    };

    tracing::debug!(
        annual_due = status.is_annual_due,
        qr_due = status.is_qr_due,
        next_qr = %status.next_qr_quarter,
        "Classified due status"
    );

    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseload_types::CaseworkerId;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn at(calendar: &ReviewCalendar, y: i32, m: u32, d: u32) -> Timestamp {
        calendar
            .midnight(NaiveDate::from_ymd_opt(y, m, d).unwrap())
            .unwrap()
    }

    fn record(calendar: &ReviewCalendar, y: i32, m: u32, d: u32) -> ComplianceRecord {
        ComplianceRecord::new(CaseworkerId::new("cw"), at(calendar, y, m, d))
    }

    #[test]
    fn test_annual_due_ignores_year() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let record = record(&calendar, 2022, 6, 10);

        let status = classify(&calendar, &recency, at(&calendar, 2025, 6, 28), &record).unwrap();
        assert!(status.is_annual_due);
        assert!(!status.is_annual_due_next_month);
    }

    #[test]
    fn test_annual_due_next_month_wraps_december() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let record = record(&calendar, 2026, 1, 20);

        let status = classify(&calendar, &recency, at(&calendar, 2025, 12, 5), &record).unwrap();
        assert!(status.is_annual_due_next_month);
        assert!(!status.is_annual_due);
        // Q4 of a January assessment is Dec 31, so both badges show
        assert!(status.is_q4);
    }

    #[test]
    fn test_next_qr_follows_cursor_and_override() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let mut record = record(&calendar, 2025, 1, 15);
        record.quarter_completed = [true, false, false, false];
        record.quarter_overrides[1] = Some(at(&calendar, 2025, 8, 2));

        let status = classify(&calendar, &recency, at(&calendar, 2025, 8, 20), &record).unwrap();
        assert_eq!(status.next_qr_quarter, Quarter::Q2);
        assert_eq!(status.next_qr_date, at(&calendar, 2025, 8, 2));
        assert!(status.is_qr_due);
    }

    #[test]
    fn test_qr_not_due_in_other_month() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let record = record(&calendar, 2025, 1, 15);

        let status = classify(&calendar, &recency, at(&calendar, 2025, 3, 1), &record).unwrap();
        assert_eq!(status.next_qr_quarter, Quarter::Q1);
        assert_eq!(status.next_qr_date, at(&calendar, 2025, 4, 15));
        assert!(!status.is_qr_due);
        assert!(!status.is_q4);
    }

    #[test]
    fn test_face_to_face_uses_fixed_ninety_days() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let mut record = record(&calendar, 2025, 6, 1);
        record.last_face_to_face_date = Some(at(&calendar, 2025, 1, 1));

        let status = classify(&calendar, &recency, at(&calendar, 2025, 4, 10), &record).unwrap();
        assert_eq!(status.next_face_to_face_due, Some(at(&calendar, 2025, 4, 1)));
        assert!(status.is_face_to_face_due);
        assert_eq!(status.days_since_face_to_face, Some(99));
    }

    #[test]
    fn test_unset_dates_yield_no_counts() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let record = record(&calendar, 2025, 6, 1);

        let status = classify(&calendar, &recency, at(&calendar, 2025, 7, 1), &record).unwrap();
        assert_eq!(status.next_face_to_face_due, None);
        assert!(!status.is_face_to_face_due);
        assert_eq!(status.days_since_contact, None);
        assert_eq!(status.days_since_face_to_face, None);
    }

    #[test]
    fn test_days_since_contact_counts_whole_days() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let mut record = record(&calendar, 2025, 6, 1);
        record.last_contact_date = Some(at(&calendar, 2025, 6, 1));

        let now = Timestamp::from_millis(at(&calendar, 2025, 7, 1).millis() + 3_600_000);
        let status = classify(&calendar, &recency, now, &record).unwrap();
        assert_eq!(status.days_since_contact, Some(30));
        assert!(recency.contact_is_fresh(30));
    }

    #[test]
    fn test_out_of_range_contact_date_is_invalid_input() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let mut record = record(&calendar, 2025, 6, 1);
        record.last_contact_date = Some(Timestamp::from_millis(i64::MIN));

        let err = classify(&calendar, &recency, Timestamp::from_millis(1_000), &record).unwrap_err();
        assert!(matches!(err, ComplianceError::InvalidInput(_)));
    }

    #[test]
    fn test_out_of_range_face_to_face_date_is_invalid_input() {
        let calendar = ReviewCalendar::utc();
        let recency = RecencyConfig::default();
        let mut record = record(&calendar, 2025, 6, 1);
        record.last_face_to_face_date = Some(Timestamp::from_millis(i64::MAX));

        let err = classify(&calendar, &recency, Timestamp::from_millis(1_000), &record).unwrap_err();
        assert!(matches!(err, ComplianceError::InvalidInput(_)));
    }
}
