use caseload_types::{CaseworkerId, ClientId, InvalidTimestamp};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ComplianceError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Client not found: {0}")]
    NotFound(ClientId),

    #[error("Caseworker {caseworker} does not own client {client}")]
    Unauthorized {
        client: ClientId,
        caseworker: CaseworkerId,
    },

    #[error("Client {0} is archived")]
    Archived(ClientId),

    #[error("Client already exists: {0}")]
    AlreadyExists(ClientId),

    #[error("Reset to calculated stopped after {applied} of 5 writes: {source}")]
    PartialReset {
        applied: usize,
        #[source]
        source: Box<ComplianceError>,
    },

    #[error("Datastore error: {0}")]
    Store(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InvalidTimestamp> for ComplianceError {
    fn from(err: InvalidTimestamp) -> Self {
        ComplianceError::InvalidInput(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ComplianceError>;
