//! Unit system value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Unit system used for the human-readable distance text
///
/// Distance values are always returned in meters; this only affects
/// the `text` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Kilometers and meters
    #[default]
    Metric,
    /// Miles and feet
    Imperial,
}

impl UnitSystem {
    /// Canonical string sent as the `units` query parameter
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// All unit systems
    #[must_use]
    pub const fn all() -> [Self; 2] {
        [Self::Metric, Self::Imperial]
    }
}

impl fmt::Display for UnitSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UnitSystem {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|units| units.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownUnitSystem(s.to_string()))
    }
}
