use caseload_types::{Quarter, QuarterInfo, Timestamp};
use chrono::{
    DateTime, Datelike, Days, FixedOffset, NaiveDate, NaiveTime, Offset, TimeZone, Utc,
};

use crate::error::{ComplianceError, Result};

/// Months from the annual assessment to each of Q1..Q3
const QUARTER_MONTH_OFFSETS: [u32; 3] = [3, 6, 9];

/// Calendar for deriving review dates in the caseload's local zone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewCalendar {
    offset: FixedOffset,
}

impl ReviewCalendar {
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    pub fn with_offset_minutes(minutes: i32) -> Result<Self> {
        let offset = minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .ok_or_else(|| {
                ComplianceError::Config(format!("UTC offset out of range: {minutes} minutes"))
            })?;
        Ok(Self { offset })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Local calendar date of an instant
    pub fn date_of(&self, ts: Timestamp) -> Result<NaiveDate> {
        let utc = DateTime::<Utc>::from_timestamp_millis(ts.millis()).ok_or_else(|| {
            ComplianceError::InvalidInput(format!("timestamp outside calendar range: {}", ts.millis()))
        })?;
        Ok(utc.with_timezone(&self.offset).date_naive())
    }

    /// One-based local month of an instant
    pub fn month_of(&self, ts: Timestamp) -> Result<u32> {
        Ok(self.date_of(ts)?.month())
    }

    /// Instant of local midnight at the start of `date`
    pub fn midnight(&self, date: NaiveDate) -> Result<Timestamp> {
        let local = date.and_time(NaiveTime::MIN);
        let instant = self
            .offset
            .from_local_datetime(&local)
            .single()
            .ok_or_else(|| ComplianceError::InvalidInput(format!("no local midnight for {date}")))?;
        Ok(Timestamp::from_millis(instant.timestamp_millis()))
    }

    /// Derive the four quarterly review dates from an annual assessment date.
    ///
    /// Q1..Q3 fall 3, 6 and 9 months after the assessment on the same day of
    /// the month. Q4 is the last day of the month before the assessment month.
    pub fn compute_quarterly_dates(&self, annual: Timestamp) -> Result<[QuarterInfo; 4]> {
        let assessment = self.date_of(annual)?;

        let mut dates = [Timestamp::from_millis(0); 4];
        for (slot, months) in dates.iter_mut().zip(QUARTER_MONTH_OFFSETS) {
            let date = add_months_rolling(assessment, months).ok_or_else(|| {
                ComplianceError::InvalidInput(format!(
                    "{assessment} + {months} months is outside calendar range"
                ))
            })?;
            *slot = self.midnight(date)?;
        }

        let q4 = last_day_of_previous_month(assessment).ok_or_else(|| {
            ComplianceError::InvalidInput(format!(
                "month before {assessment} is outside calendar range"
            ))
        })?;
        dates[Quarter::Q4.index()] = self.midnight(q4)?;

        Ok(Quarter::ALL.map(|quarter| QuarterInfo::new(quarter, dates[quarter.index()])))
    }
}

impl Default for ReviewCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

/// Add whole months by month index, then lay the source day-of-month on top
/// of the first of the target month.
///
/// Days that do not exist in the target month roll into the next one, so
/// Jan 31 + 3 months is May 1 rather than Apr 30.
pub fn add_months_rolling(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let month0 = date.month0().checked_add(months)?;
    let year = date.year().checked_add(i32::try_from(month0 / 12).ok()?)?;
    let first = NaiveDate::from_ymd_opt(year, month0 % 12 + 1, 1)?;
    first.checked_add_days(Days::new(u64::from(date.day() - 1)))
}

/// Last calendar day of the month preceding `date`'s month
pub fn last_day_of_previous_month(date: NaiveDate) -> Option<NaiveDate> {
    date.with_day(1)?.pred_opt()
}
