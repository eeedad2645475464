//! Persistence boundary for compliance records
//!
//! The hosted datastore sits behind [`ComplianceStore`]. Each `update` is an
//! independent single-field write; there is no multi-field transaction.

use std::collections::HashMap;

use caseload_types::{CaseworkerId, ClientId, ComplianceField, ComplianceRecord};
use serde::{Deserialize, Serialize};

use crate::error::{ComplianceError, Result};

pub trait ComplianceStore {
    /// Store the record for a newly created client
    fn insert(&mut self, client: &ClientId, record: ComplianceRecord) -> Result<()>;

    /// Read a record owned by `caseworker`. Archived records stay readable.
    fn get(&self, client: &ClientId, caseworker: &CaseworkerId) -> Result<ComplianceRecord>;

    /// Write one field of an active record owned by `caseworker`
    fn update(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        field: ComplianceField,
    ) -> Result<()>;

    /// Retire the record along with its client
    fn archive(&mut self, client: &ClientId, caseworker: &CaseworkerId) -> Result<()>;
}

/// Store backed by a map, used for tests and offline caseloads
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InMemoryStore {
    records: HashMap<ClientId, ComplianceRecord>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn owned(&self, client: &ClientId, caseworker: &CaseworkerId) -> Result<&ComplianceRecord> {
        let record = self
            .records
            .get(client)
            .ok_or_else(|| ComplianceError::NotFound(client.clone()))?;
        if &record.caseworker_id != caseworker {
            return Err(ComplianceError::Unauthorized {
                client: client.clone(),
                caseworker: caseworker.clone(),
            });
        }
        Ok(record)
    }

    fn owned_active_mut(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
    ) -> Result<&mut ComplianceRecord> {
        if self.owned(client, caseworker)?.archived {
            return Err(ComplianceError::Archived(client.clone()));
        }
        self.records
            .get_mut(client)
            .ok_or_else(|| ComplianceError::NotFound(client.clone()))
    }
}

impl ComplianceStore for InMemoryStore {
    fn insert(&mut self, client: &ClientId, record: ComplianceRecord) -> Result<()> {
        if self.records.contains_key(client) {
            return Err(ComplianceError::AlreadyExists(client.clone()));
        }
        self.records.insert(client.clone(), record);
        Ok(())
    }

    fn get(&self, client: &ClientId, caseworker: &CaseworkerId) -> Result<ComplianceRecord> {
        self.owned(client, caseworker).cloned()
    }

    fn update(
        &mut self,
        client: &ClientId,
        caseworker: &CaseworkerId,
        field: ComplianceField,
    ) -> Result<()> {
        self.owned_active_mut(client, caseworker)?.apply(&field);
        Ok(())
    }

    fn archive(&mut self, client: &ClientId, caseworker: &CaseworkerId) -> Result<()> {
        self.owned_active_mut(client, caseworker)?.archived = true;
        Ok(())
    }
}
