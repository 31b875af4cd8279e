//! Geographic coordinate value object

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::DomainError;

/// Separator between coordinates in an `origins` / `destinations` parameter
const COORDINATE_SEPARATOR: &str = "|";

/// A geographic point with latitude and longitude in degrees
///
/// Renders as `"<lat>,<lon>"` with the shortest decimal form that
/// round-trips, which is exactly what the distance matrix service expects.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate", into = "RawCoordinate")]
pub struct Coordinate {
    /// Latitude in degrees (-90 to 90)
    latitude: f64,
    /// Longitude in degrees (-180 to 180)
    longitude: f64,
}

impl Coordinate {
    /// Create a new coordinate with validation
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidCoordinate` if either value is not finite,
    /// latitude is not in [-90, 90] or longitude is not in [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, DomainError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(DomainError::InvalidCoordinate(format!(
                "{latitude},{longitude} is not finite"
            )));
        }
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "latitude {latitude} must be -90 to 90"
            )));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(DomainError::InvalidCoordinate(format!(
                "longitude {longitude} must be -180 to 180"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate without validation (for trusted sources)
    ///
    /// Caller must ensure both values are finite and in range.
    #[must_use]
    pub const fn new_unchecked(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Get the latitude
    #[must_use]
    pub const fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Get the longitude
    #[must_use]
    pub const fn longitude(&self) -> f64 {
        self.longitude
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl FromStr for Coordinate {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (lat, lon) = s
            .split_once(',')
            .ok_or_else(|| DomainError::InvalidCoordinate(format!("expected \"lat,lon\", got {s:?}")))?;
        let parse = |part: &str| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| DomainError::InvalidCoordinate(format!("{part:?}: {e}")))
        };
        Self::new(parse(lat)?, parse(lon)?)
    }
}

/// Join coordinates into the pipe-separated form used by the service
///
/// `[(53.4720286, -2.3308237), (51.556021, -0.279519)]` becomes
/// `"53.4720286,-2.3308237|51.556021,-0.279519"`.
#[must_use]
pub fn join_coordinates(coordinates: &[Coordinate]) -> String {
    coordinates
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(COORDINATE_SEPARATOR)
}

#[derive(Serialize, Deserialize)]
struct RawCoordinate {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = DomainError;

    fn try_from(raw: RawCoordinate) -> Result<Self, Self::Error> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(coordinate: Coordinate) -> Self {
        Self {
            latitude: coordinate.latitude,
            longitude: coordinate.longitude,
        }
    }
}
