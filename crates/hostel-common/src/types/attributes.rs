//! Typed attribute bags stored as JSONB on hostels.
//!
//! Both bags carry a `schema_version` and keep unknown keys in `extra`, so
//! documents written by newer clients survive a read-modify-write cycle.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{HostelError, Result};

/// Latest attribute schema version understood by this build.
pub const ATTRIBUTE_SCHEMA_VERSION: u32 = 1;

fn current_schema_version() -> u32 {
    ATTRIBUTE_SCHEMA_VERSION
}

fn check_version(found: u32) -> Result<()> {
    if found > ATTRIBUTE_SCHEMA_VERSION {
        return Err(HostelError::UnsupportedSchemaVersion {
            found,
            latest: ATTRIBUTE_SCHEMA_VERSION,
        });
    }
    Ok(())
}

/// Descriptive facts about a hostel beyond its core columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HostelFeatures {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    /// University the hostel serves; matched by location search.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub university: Option<String>,

    /// Utilities covered by the rent, e.g. `water`, `electricity`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rent_included: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for HostelFeatures {
    fn default() -> Self {
        Self {
            schema_version: ATTRIBUTE_SCHEMA_VERSION,
            university: None,
            rent_included: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl HostelFeatures {
    pub fn validate(&self) -> Result<()> {
        check_version(self.schema_version)
    }
}

/// Landlord-controlled availability settings.
///
/// `available` is the stored flag. The value presented to clients is
/// derived by [`AvailabilitySettings::presented`], which forces it to
/// `false` once no rooms remain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilitySettings {
    #[serde(default = "current_schema_version")]
    pub schema_version: u32,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_from: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_stay: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deposit: Option<f64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub price_includes: Vec<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for AvailabilitySettings {
    fn default() -> Self {
        Self {
            schema_version: ATTRIBUTE_SCHEMA_VERSION,
            available: None,
            available_from: None,
            minimum_stay: None,
            deposit: None,
            price_includes: Vec::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl AvailabilitySettings {
    pub fn validate(&self) -> Result<()> {
        check_version(self.schema_version)?;
        if let Some(deposit) = self.deposit {
            if !deposit.is_finite() || deposit < 0.0 {
                return Err(HostelError::InvalidAttribute(format!(
                    "deposit must be non-negative, got {deposit}"
                )));
            }
        }
        Ok(())
    }

    /// Landlord's stored flag, treating an unset flag as open for booking.
    pub fn landlord_open(&self) -> bool {
        self.available.unwrap_or(true)
    }

    /// Copy of the settings as shown to clients for the given remaining rooms.
    ///
    /// The stored settings are never modified.
    pub fn presented(&self, available_rooms: i32) -> AvailabilitySettings {
        let mut shown = self.clone();
        shown.available = Some(self.landlord_open() && available_rooms > 0);
        shown
    }
}
