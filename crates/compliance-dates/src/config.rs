//! Engine configuration
//!
//! Loaded from TOML. Every field has a default, so an empty file is a valid
//! configuration that computes dates in UTC with the standard recency windows.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{ComplianceError, Result};

/// Widest offset in use by any time zone, in minutes
const MAX_OFFSET_MINUTES: i32 = 18 * 60;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Zone used for month and day-of-month arithmetic
    #[serde(default)]
    pub calendar: CalendarConfig,
    /// Contact and face-to-face windows
    #[serde(default)]
    pub recency: RecencyConfig,
}

impl EngineConfig {
    /// Load configuration from a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the TOML is malformed,
    /// or a value is out of range.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
    }

    /// Parse configuration from a TOML string
    ///
    /// # Example
    ///
    /// ```
    /// use compliance_dates::config::EngineConfig;
    ///
    /// # fn example() -> anyhow::Result<()> {
    /// let config = EngineConfig::from_str(r#"
    ///     [calendar]
    ///     utc_offset_minutes = -300
    /// "#)?;
    /// assert_eq!(config.recency.contact_window_days, 30);
    /// # Ok(())
    /// # }
    /// ```
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let offset = self.calendar.utc_offset_minutes;
        if !(-MAX_OFFSET_MINUTES..=MAX_OFFSET_MINUTES).contains(&offset) {
            return Err(ComplianceError::Config(format!(
                "utc_offset_minutes must be within ±{MAX_OFFSET_MINUTES} (found: {offset})"
            )));
        }

        let windows = [
            ("contact_window_days", self.recency.contact_window_days),
            ("face_to_face_window_days", self.recency.face_to_face_window_days),
            ("face_to_face_cadence_days", self.recency.face_to_face_cadence_days),
        ];
        for (name, days) in windows {
            if days == 0 {
                return Err(ComplianceError::Config(format!("{name} must be positive")));
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Minutes east of UTC (default: 0)
    #[serde(default)]
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecencyConfig {
    /// Days after the last contact during which it counts as fresh (default: 30)
    #[serde(default = "default_contact_window")]
    pub contact_window_days: u32,
    /// Days after the last face-to-face visit during which it counts as fresh (default: 90)
    #[serde(default = "default_face_to_face_window")]
    pub face_to_face_window_days: u32,
    /// Fixed interval between face-to-face visits (default: 90)
    #[serde(default = "default_face_to_face_cadence")]
    pub face_to_face_cadence_days: u32,
}

impl Default for RecencyConfig {
    fn default() -> Self {
        Self {
            contact_window_days: default_contact_window(),
            face_to_face_window_days: default_face_to_face_window(),
            face_to_face_cadence_days: default_face_to_face_cadence(),
        }
    }
}

impl RecencyConfig {
    /// Whether a contact `days_since` days ago is inside the contact window
    pub fn contact_is_fresh(&self, days_since: i64) -> bool {
        days_since <= i64::from(self.contact_window_days)
    }

    pub fn face_to_face_is_fresh(&self, days_since: i64) -> bool {
        days_since <= i64::from(self.face_to_face_window_days)
    }
}

fn default_contact_window() -> u32 {
    30
}

fn default_face_to_face_window() -> u32 {
    90
}

fn default_face_to_face_cadence() -> u32 {
    90
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = EngineConfig::from_str("").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert_eq!(config.calendar.utc_offset_minutes, 0);
        assert_eq!(config.recency.contact_window_days, 30);
        assert_eq!(config.recency.face_to_face_window_days, 90);
        assert_eq!(config.recency.face_to_face_cadence_days, 90);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            [calendar]
            utc_offset_minutes = -360

            [recency]
            contact_window_days = 14
            face_to_face_window_days = 60
            face_to_face_cadence_days = 120
        "#;
        let config = EngineConfig::from_str(toml).unwrap();
        assert_eq!(config.calendar.utc_offset_minutes, -360);
        assert_eq!(config.recency.contact_window_days, 14);
        assert_eq!(config.recency.face_to_face_window_days, 60);
        assert_eq!(config.recency.face_to_face_cadence_days, 120);
    }

    #[test]
    fn test_rejects_out_of_range_offset() {
        let err = EngineConfig::from_str("[calendar]\nutc_offset_minutes = 1200\n").unwrap_err();
        assert!(format!("{err:#}").contains("utc_offset_minutes"));
    }

    #[test]
    fn test_rejects_extreme_offsets() {
        for offset in [i32::MIN, i32::MAX, -1081, 1081] {
            let toml = format!("[calendar]\nutc_offset_minutes = {offset}\n");
            let err = EngineConfig::from_str(&toml).unwrap_err();
            assert!(format!("{err:#}").contains("utc_offset_minutes"), "{offset}");
        }
        for offset in [-1080, 1080] {
            let toml = format!("[calendar]\nutc_offset_minutes = {offset}\n");
            assert!(EngineConfig::from_str(&toml).is_ok(), "{offset}");
        }
    }

    #[test]
    fn test_rejects_zero_cadence() {
        let err =
            EngineConfig::from_str("[recency]\nface_to_face_cadence_days = 0\n").unwrap_err();
        assert!(err.to_string().contains("face_to_face_cadence_days"));
    }

    #[test]
    fn test_rejects_malformed_toml() {
        assert!(EngineConfig::from_str("[calendar\n").is_err());
    }

    #[test]
    fn test_recency_windows_are_inclusive() {
        let recency = RecencyConfig::default();
        assert!(recency.contact_is_fresh(30));
        assert!(!recency.contact_is_fresh(31));
        assert!(recency.face_to_face_is_fresh(90));
        assert!(!recency.face_to_face_is_fresh(91));
    }

    #[test]
    fn test_from_file_reports_missing_path() {
        let err = EngineConfig::from_file("/nonexistent/compliance.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
