//! Flat key: the wing + unit composite identifier of a residential unit.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use society_core::AppError;

/// Wing and unit number of a flat, rendered as `"B-203"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FlatKey {
    /// Building wing, e.g. `"B"`.
    pub wing: String,
    /// Unit number within the wing, e.g. `"203"`.
    pub unit: String,
}

impl FlatKey {
    /// Build a flat key, trimming and upper-casing the wing.
    pub fn new(wing: impl AsRef<str>, unit: impl AsRef<str>) -> Result<Self, AppError> {
        let wing = wing.as_ref().trim().to_ascii_uppercase();
        let unit = unit.as_ref().trim().to_string();
        if wing.is_empty() || unit.is_empty() {
            return Err(AppError::validation("Flat key needs both a wing and a unit"));
        }
        if wing.contains('-') {
            return Err(AppError::validation("Wing must not contain '-'"));
        }
        Ok(Self { wing, unit })
    }
}

impl fmt::Display for FlatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wing, self.unit)
    }
}

impl FromStr for FlatKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (wing, unit) = s
            .split_once('-')
            .ok_or_else(|| AppError::validation(format!("Invalid flat key: '{s}'")))?;
        Self::new(wing, unit)
    }
}

impl Serialize for FlatKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for FlatKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
