//! Travel mode value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Mode of transport used when computing distances
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    /// On foot, via pedestrian paths and sidewalks
    Walking,
    /// By bicycle, via bike paths and preferred streets
    Bicycling,
    /// By public transit routes
    Transit,
    /// By car over the road network
    #[default]
    Driving,
}

impl TravelMode {
    /// Canonical string sent as the `mode` query parameter
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Walking => "walking",
            Self::Bicycling => "bicycling",
            Self::Transit => "transit",
            Self::Driving => "driving",
        }
    }

    /// All travel modes
    #[must_use]
    pub const fn all() -> [Self; 4] {
        [Self::Walking, Self::Bicycling, Self::Transit, Self::Driving]
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DomainError::UnknownTravelMode(s.to_string()))
    }
}
