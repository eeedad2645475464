//! Caseworker actions on a client's compliance schedule

use caseload_types::{
    CaseworkerId, ClientId, ComplianceField, ComplianceRecord, DueStatus, Quarter, Timestamp,
};
use tracing::{info, warn};

use crate::error::{ComplianceError, Result};
use crate::import::parse_assessment_date;
use crate::overrides::{reset_fields, Schedule};
use crate::store::ComplianceStore;
use crate::DateEngine;

pub struct ComplianceService<S> {
    store: S,
    engine: DateEngine,
}

impl<S: ComplianceStore> ComplianceService<S> {
    pub fn new(store: S, engine: DateEngine) -> Self {
        Self { store, engine }
    }

    pub fn engine(&self) -> &DateEngine {
        &self.engine
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    /// Create the compliance record for a new client
    pub fn create_client(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        annual_assessment: Timestamp,
    ) -> Result<ComplianceRecord> {
        // Reject dates the calculator cannot place before anything is stored
        self.engine.compute_quarterly_dates(annual_assessment)?;

        let record = ComplianceRecord::new(caseworker.clone(), annual_assessment);
        self.store.insert(client, record.clone())?;
        info!(%client, %caseworker, "Created compliance record");
        Ok(record)
    }

    /// Create a client from an imported spreadsheet row's assessment cell
    pub fn import_client(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        assessment_cell: &str,
    ) -> Result<ComplianceRecord> {
        let annual = parse_assessment_date(assessment_cell, self.engine.calendar())?;
        self.create_client(client, caseworker, annual)
    }

    /// Change the annual assessment date. Overrides and the cached next
    /// review are left as they are until a reset is requested.
    pub fn set_annual_assessment(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        date: Timestamp,
    ) -> Result<()> {
        self.engine.compute_quarterly_dates(date)?;
        self.write(client, caseworker, ComplianceField::NextAnnualAssessment(date))
    }

    pub fn set_quarter_override(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        quarter: Quarter,
        date: Timestamp,
    ) -> Result<()> {
        self.engine.calendar().date_of(date)?;
        self.write(client, caseworker, ComplianceField::QuarterDate(quarter, Some(date)))
    }

    pub fn clear_quarter_override(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        quarter: Quarter,
    ) -> Result<()> {
        self.write(client, caseworker, ComplianceField::QuarterDate(quarter, None))
    }

    pub fn set_quarter_completed(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        quarter: Quarter,
        completed: bool,
    ) -> Result<()> {
        self.write(
            client,
            caseworker,
            ComplianceField::QuarterCompleted(quarter, completed),
        )
    }

    /// Drop every override and point the next quarterly review at the
    /// calculated Q1. Returns that Q1 date.
    ///
    /// The five writes are issued one at a time. If one fails the earlier
    /// ones stay applied; calling this again finishes the job.
    pub fn reset_to_calculated(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
    ) -> Result<Timestamp> {
        let record = self.store.get(client, caseworker)?;
        let calculated = self
            .engine
            .compute_quarterly_dates(record.annual_assessment_date)?;

        for (applied, field) in reset_fields(&calculated).into_iter().enumerate() {
            if let Err(err) = self.store.update(client, caseworker, field) {
                if applied == 0 {
                    return Err(err);
                }
                warn!(
                    %client,
                    field = %field.name(),
                    applied,
                    error = %err,
                    "Reset to calculated partially applied"
                );
                return Err(ComplianceError::PartialReset {
                    applied,
                    source: Box::new(err),
                });
            }
        }

        let q1 = calculated[Quarter::Q1.index()].date;
        info!(%client, next_quarterly_review = q1.millis(), "Reset schedule to calculated dates");
        Ok(q1)
    }

    pub fn record_contact(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        date: Option<Timestamp>,
    ) -> Result<()> {
        if let Some(date) = date {
            self.engine.calendar().date_of(date)?;
        }
        self.write(client, caseworker, ComplianceField::LastContactDate(date))
    }

    pub fn record_face_to_face(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        date: Option<Timestamp>,
    ) -> Result<()> {
        if let Some(date) = date {
            self.engine.calendar().date_of(date)?;
        }
        self.write(client, caseworker, ComplianceField::LastFaceToFaceDate(date))
    }

    /// Retire the client's record. It stays readable but accepts no writes.
    pub fn archive_client(&mut self, client: &ClientId, caseworker: &CaseworkerId) -> Result<()> {
        self.store.archive(client, caseworker)?;
        info!(%client, %caseworker, "Archived compliance record");
        Ok(())
    }

    pub fn schedule(&self, client: &ClientId, caseworker: &CaseworkerId) -> Result<Schedule> {
        let record = self.store.get(client, caseworker)?;
        self.engine.schedule(&record)
    }

    pub fn status(
        &self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        now: Timestamp,
    ) -> Result<DueStatus> {
        let record = self.store.get(client, caseworker)?;
        self.engine.classify(now, &record)
    }

    fn write(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        field: ComplianceField,
    ) -> Result<()> {
        match self.store.update(client, caseworker, field) {
            Ok(()) => {
                info!(%client, field = %field.name(), "Updated compliance field");
                Ok(())
            }
            Err(err) => {
                warn!(%client, field = %field.name(), error = %err, "Compliance update rejected");
                Err(err)
            }
        }
    }
}
