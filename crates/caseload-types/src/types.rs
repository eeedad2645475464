use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Milliseconds in a fixed 24-hour day
pub const MILLIS_PER_DAY: i64 = 86_400_000;

/// Largest magnitude a browser `Date` accepts, in milliseconds from the epoch
const MAX_DATE_MILLIS: f64 = 8.64e15;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum InvalidTimestamp {
    #[error("timestamp is not a finite number: {0}")]
    NonFinite(f64),

    #[error("timestamp out of range: {0}")]
    OutOfRange(f64),
}

/// Instant in epoch milliseconds, the unit the hosted datastore stores dates in
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Accept a millisecond value as handed over by the UI layer.
    ///
    /// NaN, infinities and values outside the browser date range are rejected;
    /// fractional milliseconds are truncated.
    pub fn from_f64_millis(millis: f64) -> Result<Self, InvalidTimestamp> {
        if !millis.is_finite() {
            return Err(InvalidTimestamp::NonFinite(millis));
        }
        if millis.abs() > MAX_DATE_MILLIS {
            return Err(InvalidTimestamp::OutOfRange(millis));
        }
        Ok(Self(millis.trunc() as i64))
    }

    pub const fn millis(self) -> i64 {
        self.0
    }

    pub fn checked_add_millis(self, millis: i64) -> Option<Self> {
        self.0.checked_add(millis).map(Self)
    }

    /// Whole days elapsed from `earlier` to `self`, rounded toward negative infinity.
    /// `None` when the gap does not fit in an `i64` of milliseconds.
    pub fn days_since(self, earlier: Timestamp) -> Option<i64> {
        self.0
            .checked_sub(earlier.0)
            .map(|elapsed| elapsed.div_euclid(MILLIS_PER_DAY))
    }
}

/// One of the four quarterly reviews derived from an annual assessment
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Quarter {
    Q1,
    Q2,
    Q3,
    Q4,
}

impl Quarter {
    pub const ALL: [Quarter; 4] = [Quarter::Q1, Quarter::Q2, Quarter::Q3, Quarter::Q4];

    /// Zero-based position, also the cursor value
    pub const fn index(self) -> usize {
        match self {
            Quarter::Q1 => 0,
            Quarter::Q2 => 1,
            Quarter::Q3 => 2,
            Quarter::Q4 => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// One-based quarter number used in persisted field names
    pub const fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    pub const fn label(self) -> &'static str {
        match self {
            Quarter::Q1 => "1st Quarter",
            Quarter::Q2 => "2nd Quarter",
            Quarter::Q3 => "3rd Quarter",
            Quarter::Q4 => "4th Quarter",
        }
    }

    /// Following quarter, wrapping from Q4 back to Q1
    pub const fn next(self) -> Self {
        match self {
            Quarter::Q1 => Quarter::Q2,
            Quarter::Q2 => Quarter::Q3,
            Quarter::Q3 => Quarter::Q4,
            Quarter::Q4 => Quarter::Q1,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A derived quarterly review date with its display label
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuarterInfo {
    pub quarter: Quarter,
    pub label: &'static str,
    pub date: Timestamp,
}

impl QuarterInfo {
    pub fn new(quarter: Quarter, date: Timestamp) -> Self {
        Self {
            quarter,
            label: quarter.label(),
            date,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CaseworkerId(pub String);

impl CaseworkerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl fmt::Display for CaseworkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Due-status badges for one client, recomputed on every call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DueStatus {
    pub is_annual_due: bool,
    pub is_annual_due_next_month: bool,
    pub next_qr_quarter: Quarter,
    #[serde(rename = "nextQRDate")]
    pub next_qr_date: Timestamp,
    #[serde(rename = "isQRDue")]
    pub is_qr_due: bool,
    pub is_q4: bool,
    pub next_face_to_face_due: Option<Timestamp>,
    pub is_face_to_face_due: bool,
    pub days_since_contact: Option<i64>,
    pub days_since_face_to_face: Option<i64>,
}
