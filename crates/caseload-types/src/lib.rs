pub mod record;
pub mod types;

pub use record::{ComplianceField, ComplianceRecord};
pub use types::{
    CaseworkerId, ClientId, DueStatus, InvalidTimestamp, Quarter, QuarterInfo, Timestamp,
    MILLIS_PER_DAY,
};
