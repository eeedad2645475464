//! Compliance date engine for caseworker schedules
//!
//! Derives a client's quarterly review dates from the annual assessment,
//! tracks which review is next due, layers manual overrides on top, and
//! classifies what is due in the current month.

pub mod calendar;
pub mod config;
pub mod cursor;
pub mod error;
pub mod import;
pub mod overrides;
pub mod service;
pub mod status;
pub mod store;

use caseload_types::{ComplianceRecord, DueStatus, QuarterInfo, Timestamp};

pub use calendar::ReviewCalendar;
pub use config::EngineConfig;
pub use cursor::next_due_quarter;
pub use error::{ComplianceError, Result};
pub use overrides::{effective_quarter_date, Schedule, ScheduledQuarter};
pub use service::ComplianceService;
pub use store::{ComplianceStore, InMemoryStore};

/// DateEngine entry point
#[derive(Debug, Clone)]
pub struct DateEngine {
    config: EngineConfig,
    calendar: ReviewCalendar,
}

impl DateEngine {
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let calendar = ReviewCalendar::with_offset_minutes(config.calendar.utc_offset_minutes)?;
        Ok(Self { config, calendar })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn calendar(&self) -> &ReviewCalendar {
        &self.calendar
    }

    pub fn compute_quarterly_dates(&self, annual: Timestamp) -> Result<[QuarterInfo; 4]> {
        let quarters = self.calendar.compute_quarterly_dates(annual)?;
        tracing::debug!(
            annual = annual.millis(),
            q1 = quarters[0].date.millis(),
            q4 = quarters[3].date.millis(),
            "Derived quarterly review dates"
        );
        Ok(quarters)
    }

    pub fn schedule(&self, record: &ComplianceRecord) -> Result<Schedule> {
        Schedule::build(&self.calendar, record)
    }

    pub fn classify(&self, now: Timestamp, record: &ComplianceRecord) -> Result<DueStatus> {
        status::classify(&self.calendar, &self.config.recency, now, record)
    }

    /// Like [`DateEngine::classify`], for a `now` handed over as raw milliseconds
    pub fn classify_at_millis(&self, now: f64, record: &ComplianceRecord) -> Result<DueStatus> {
        self.classify(Timestamp::from_f64_millis(now)?, record)
    }
}

impl Default for DateEngine {
    fn default() -> Self {
        Self {
            config: EngineConfig::default(),
            calendar: ReviewCalendar::utc(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caseload_types::{CaseworkerId, Quarter};
    use chrono::NaiveDate;

    #[test]
    fn test_engine_is_idempotent() {
        let engine = DateEngine::default();
        let annual = Timestamp::from_millis(1_738_281_600_000); // 2025-01-31
        assert_eq!(
            engine.compute_quarterly_dates(annual).unwrap(),
            engine.compute_quarterly_dates(annual).unwrap()
        );
    }

    #[test]
    fn test_engine_honours_configured_offset() {
        let config = EngineConfig::from_str("[calendar]\nutc_offset_minutes = 540\n").unwrap();
        let engine = DateEngine::new(config).unwrap();
        // 2025-03-31 20:00 UTC is already April 1 at UTC+9
        let annual = Timestamp::from_millis(1_743_451_200_000);
        let q4 = engine.compute_quarterly_dates(annual).unwrap()[Quarter::Q4.index()];
        assert_eq!(
            engine.calendar().date_of(q4.date).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap()
        );
    }

    #[test]
    fn test_classify_rejects_nan_now() {
        let engine = DateEngine::default();
        let record = ComplianceRecord::new(CaseworkerId::new("cw"), Timestamp::from_millis(0));
        let err = engine.classify_at_millis(f64::NAN, &record).unwrap_err();
        assert!(matches!(err, ComplianceError::InvalidInput(_)));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let mut config = EngineConfig::default();
        config.recency.contact_window_days = 0;
        assert!(matches!(
            DateEngine::new(config),
            Err(ComplianceError::Config(_))
        ));
    }
}
