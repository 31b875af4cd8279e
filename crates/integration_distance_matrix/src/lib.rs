//! Distance matrix integration
//!
//! Client for a pairwise-distance web service: given origins and
//! destinations it returns distance and travel time for every pair.
//!
//! # Architecture
//!
//! The service limits both the number of elements (origins x destinations)
//! and the URL length of a single call. [`DistanceMatrixApi`] hides those
//! limits:
//!
//! 1. [`compute_call_count`] and [`partition`] split the larger side of the
//!    request into contiguous blocks.
//! 2. [`QuotaPacer`] waits once the rolling element budget is spent.
//! 3. [`Dispatcher`] performs one call through a [`Transport`] and validates
//!    status and shape.
//! 4. [`merge`] reassembles the parts in call order.
//!
//! Calls run strictly in sequence. The first error aborts the request and no
//! partial result is returned. A [`CallContext`] carries the deadline and
//! cancellation token checked before every call.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_distance_matrix::{
//!     CallContext, DistanceMatrixApi, DistanceMatrixClient, DistanceMatrixConfig,
//! };
//! use domain::{Coordinate, TravelMode};
//!
//! let config = DistanceMatrixConfig::with_api_key("...");
//! let client = DistanceMatrixApi::new(&config)?;
//!
//! let origins = [Coordinate::new(55.853551, -4.311093)?];
//! let destinations = [
//!     Coordinate::new(53.4720286, -2.3308237)?,
//!     Coordinate::new(51.556021, -0.279519)?,
//! ];
//! let matrix = client
//!     .get_distances(&origins, &destinations, TravelMode::Driving, &CallContext::new())
//!     .await?;
//! ```

mod client;
mod config;
mod context;
mod dispatch;
mod error;
mod merge;
mod models;
mod pacer;
mod partition;
mod request;
mod transport;

pub use client::{DistanceMatrixApi, DistanceMatrixClient};
pub use config::{Credentials, DistanceMatrixConfig};
pub use context::CallContext;
pub use dispatch::{Dispatcher, ensure_elements_ok, parse_response, validate_response};
pub use error::DistanceMatrixError;
pub use merge::merge;
pub use models::{
    Distance, DistanceMatrixResponse, Element, ElementStatus, Fare, Row, TravelDuration,
};
pub use pacer::QuotaPacer;
pub use partition::{CallGroup, Partition, SplitAxis, compute_call_count, partition};
pub use request::{DISTANCE_MATRIX_PATH, RequestBuilder, redact};
pub use transport::{HttpTransport, Transport};
