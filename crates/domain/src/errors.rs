//! Domain-level errors

use thiserror::Error;

/// Errors that can occur when constructing domain values
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// Coordinate is not finite or out of range
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),

    /// Travel mode string is not one the service understands
    #[error("Unknown travel mode: {0}")]
    UnknownTravelMode(String),

    /// Unit system string is not one the service understands
    #[error("Unknown unit system: {0}")]
    UnknownUnitSystem(String),

    /// Account tier string does not name a known tier
    #[error("Unknown account tier: {0}")]
    UnknownAccountTier(String),
}
