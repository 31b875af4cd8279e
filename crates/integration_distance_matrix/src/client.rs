//! Distance matrix client
//!
//! Splits oversized requests into calls that fit the service's per-call
//! limits, paces them against the rolling element quota, and merges the
//! partial responses back into one.

use async_trait::async_trait;
use domain::{Coordinate, TravelMode};
use tracing::{debug, info, instrument, warn};

use crate::config::DistanceMatrixConfig;
use crate::context::CallContext;
use crate::dispatch::{Dispatcher, ensure_elements_ok};
use crate::error::DistanceMatrixError;
use crate::merge::merge;
use crate::models::DistanceMatrixResponse;
use crate::pacer::QuotaPacer;
use crate::partition::{SplitAxis, compute_call_count, partition};
use crate::request::RequestBuilder;
use crate::transport::{HttpTransport, Transport};

/// Trait for distance matrix service clients
#[async_trait]
pub trait DistanceMatrixClient: Send + Sync {
    /// Distance and duration for every origin-destination pair
    ///
    /// Rows follow the order of `origins`, elements within a row the order
    /// of `destinations`. Either the full matrix or an error is returned,
    /// never a partial result.
    async fn get_distances(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
        ctx: &CallContext,
    ) -> Result<DistanceMatrixResponse, DistanceMatrixError>;
}

/// Client for the distance matrix web service
#[derive(Debug)]
pub struct DistanceMatrixApi<T = HttpTransport> {
    transport: T,
    request: RequestBuilder,
    config: DistanceMatrixConfig,
}

impl DistanceMatrixApi<HttpTransport> {
    /// Create a client that talks HTTP
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the HTTP client
    /// cannot be initialized.
    pub fn new(config: &DistanceMatrixConfig) -> Result<Self, DistanceMatrixError> {
        let transport = HttpTransport::new(config)?;
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> DistanceMatrixApi<T> {
    /// Create a client over the given transport
    ///
    /// # Errors
    ///
    /// Returns `ConfigurationError` if the configuration is invalid or the
    /// signing key cannot be decoded.
    pub fn with_transport(
        config: &DistanceMatrixConfig,
        transport: T,
    ) -> Result<Self, DistanceMatrixError> {
        Ok(Self {
            transport,
            request: RequestBuilder::new(config)?,
            config: config.clone(),
        })
    }

    /// The configuration this client was built from
    #[must_use]
    pub const fn config(&self) -> &DistanceMatrixConfig {
        &self.config
    }
}

#[async_trait]
impl<T: Transport> DistanceMatrixClient for DistanceMatrixApi<T> {
    #[instrument(
        skip(self, origins, destinations, ctx),
        fields(origins = origins.len(), destinations = destinations.len(), mode = %mode)
    )]
    async fn get_distances(
        &self,
        origins: &[Coordinate],
        destinations: &[Coordinate],
        mode: TravelMode,
        ctx: &CallContext,
    ) -> Result<DistanceMatrixResponse, DistanceMatrixError> {
        if origins.is_empty() {
            return Err(DistanceMatrixError::InvalidInput(
                "at least one origin is required".to_string(),
            ));
        }
        if destinations.is_empty() {
            return Err(DistanceMatrixError::InvalidInput(
                "at least one destination is required".to_string(),
            ));
        }

        let cap = self.config.max_elements_per_call();
        let url_length = self.request.url(origins, destinations, mode)?.len();
        let call_count = compute_call_count(
            origins.len(),
            destinations.len(),
            cap,
            url_length,
            self.config.max_url_length,
        );
        let plan = partition(origins, destinations, call_count);
        let axis = plan.axis();
        info!(calls = plan.len(), ?axis, url_length, "Dispatching distance matrix request");

        let dispatcher = Dispatcher::new(&self.transport, &self.request);
        let mut pacer = QuotaPacer::new(cap, self.config.quota_wait());
        let mut merged = None;
        let mut origin_offset = 0;
        let mut destination_offset = 0;

        for (index, group) in plan.into_iter().enumerate() {
            ctx.check()?;

            let need = group.element_count();
            if need > cap {
                warn!(
                    call = index,
                    elements = need,
                    cap,
                    "Call still exceeds the per-call element cap"
                );
            }

            if let Some(wait) = pacer.admit(need) {
                ctx.sleep(wait).await?;
            }

            let part = dispatcher.dispatch(&group, mode, ctx).await?;
            if self.config.strict_element_status {
                ensure_elements_ok(&part, origin_offset, destination_offset)?;
            }
            pacer.commit(need);
            merged = Some(merge(merged, part, axis)?);

            match axis {
                SplitAxis::Origins => origin_offset += group.origins.len(),
                SplitAxis::Destinations => destination_offset += group.destinations.len(),
                SplitAxis::None => {},
            }
            debug!(call = index, elements = need, "Call merged");
        }

        merged.ok_or_else(|| {
            DistanceMatrixError::InvalidInput("request produced no calls".to_string())
        })
    }
}
