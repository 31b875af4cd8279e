//! Distance matrix data models
//!
//! Typed representation of the service's JSON response. The same type is
//! used for a single call and for the merged result of a partitioned request.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Response of the distance matrix service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DistanceMatrixResponse {
    /// Resolved origin addresses, one per origin
    #[serde(default)]
    pub origin_addresses: Vec<String>,
    /// Resolved destination addresses, one per destination
    #[serde(default)]
    pub destination_addresses: Vec<String>,
    /// One row per origin, in origin order
    #[serde(default)]
    pub rows: Vec<Row>,
    /// Top-level status; for a merged response, the last call's status
    pub status: String,
    /// Explanation returned with some non-OK statuses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl DistanceMatrixResponse {
    /// Element for the given origin and destination indices
    #[must_use]
    pub fn element(&self, origin: usize, destination: usize) -> Option<&Element> {
        self.rows.get(origin)?.elements.get(destination)
    }

    /// Total number of elements across all rows
    #[must_use]
    pub fn element_count(&self) -> usize {
        self.rows.iter().map(|row| row.elements.len()).sum()
    }

    /// Elements whose status is not `OK`, with their (origin, destination) indices
    pub fn failed_elements(&self) -> impl Iterator<Item = (usize, usize, &Element)> {
        self.rows.iter().enumerate().flat_map(|(origin, row)| {
            row.elements
                .iter()
                .enumerate()
                .filter(|(_, element)| !element.status.is_ok())
                .map(move |(destination, element)| (origin, destination, element))
        })
    }
}

/// A row of elements for a single origin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// One element per destination, in destination order
    #[serde(default)]
    pub elements: Vec<Element>,
}

/// Travel information for a single origin-destination pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Element status
    pub status: ElementStatus,
    /// Travel distance; absent when no route was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<Distance>,
    /// Travel time; absent when no route was found
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<TravelDuration>,
    /// Total fare, only for transit where available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fare: Option<Fare>,
}

/// Distance in meters with a human-readable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Distance {
    /// Text in the configured unit system and language, e.g. "225 mi"
    pub text: String,
    /// Distance in meters
    pub value: u64,
}

/// Duration in seconds with a human-readable text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelDuration {
    /// Text in the configured language, e.g. "3 hours 55 mins"
    pub text: String,
    /// Duration in seconds
    pub value: u64,
}

/// Transit fare
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fare {
    /// ISO 4217 currency code
    pub currency: String,
    /// Amount in the given currency
    pub value: f64,
    /// Formatted amount
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// Element-level status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ElementStatus {
    /// Valid result
    Ok,
    /// Origin and/or destination could not be geocoded
    NotFound,
    /// No route between origin and destination
    ZeroResults,
    /// Route too long to be processed
    MaxRouteLengthExceeded,
    /// Status this client does not know about
    #[serde(other)]
    Unknown,
}

impl ElementStatus {
    /// Wire representation
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::NotFound => "NOT_FOUND",
            Self::ZeroResults => "ZERO_RESULTS",
            Self::MaxRouteLengthExceeded => "MAX_ROUTE_LENGTH_EXCEEDED",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Whether the element carries a valid result
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }
}

impl fmt::Display for ElementStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
