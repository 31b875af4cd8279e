//! Single-call dispatch and response validation

use domain::TravelMode;
use tracing::{debug, instrument, warn};

use crate::context::CallContext;
use crate::error::DistanceMatrixError;
use crate::models::DistanceMatrixResponse;
use crate::partition::CallGroup;
use crate::request::RequestBuilder;
use crate::transport::Transport;

/// Sends one call group and validates what comes back
#[derive(Debug)]
pub struct Dispatcher<'a, T: ?Sized> {
    transport: &'a T,
    request: &'a RequestBuilder,
}

impl<'a, T: Transport + ?Sized> Dispatcher<'a, T> {
    /// Create a dispatcher over a transport and URL builder
    #[must_use]
    pub const fn new(transport: &'a T, request: &'a RequestBuilder) -> Self {
        Self { transport, request }
    }

    /// Perform one call
    ///
    /// # Errors
    ///
    /// Returns the transport error, a parse error, the error mapped from a
    /// non-OK status, or a shape mismatch. Fails with `Cancelled` or
    /// `DeadlineExceeded` if `ctx` ends while the call is in flight.
    #[instrument(skip_all, fields(origins = group.origins.len(), destinations = group.destinations.len()))]
    pub async fn dispatch(
        &self,
        group: &CallGroup<'_>,
        mode: TravelMode,
        ctx: &CallContext,
    ) -> Result<DistanceMatrixResponse, DistanceMatrixError> {
        let url = self.request.url(group.origins, group.destinations, mode)?;
        let body = ctx.run(self.transport.fetch(&url)).await?;
        let response = parse_response(&body)?;
        validate_response(&response, group)?;
        debug!(rows = response.rows.len(), "Call validated");
        Ok(response)
    }
}

/// Decode a raw response body
///
/// # Errors
///
/// Returns `ParseError` if the body is not a distance matrix response.
pub fn parse_response(body: &str) -> Result<DistanceMatrixResponse, DistanceMatrixError> {
    serde_json::from_str(body).map_err(|e| DistanceMatrixError::ParseError(e.to_string()))
}

/// Check status and shape of a single call's response
///
/// # Errors
///
/// Returns the status error for non-OK responses, `RowCountMismatch` if the
/// row count differs from the group's origins, and `ElementCountMismatch`
/// if any row's length differs from the group's destinations.
pub fn validate_response(
    response: &DistanceMatrixResponse,
    group: &CallGroup<'_>,
) -> Result<(), DistanceMatrixError> {
    if let Some(err) = DistanceMatrixError::from_status(&response.status, response.error_message.clone()) {
        warn!(status = %response.status, "Service returned an error status");
        return Err(err);
    }

    if response.rows.len() != group.origins.len() {
        return Err(DistanceMatrixError::RowCountMismatch {
            expected: group.origins.len(),
            actual: response.rows.len(),
        });
    }

    for (row, entry) in response.rows.iter().enumerate() {
        if entry.elements.len() != group.destinations.len() {
            return Err(DistanceMatrixError::ElementCountMismatch {
                row,
                expected: group.destinations.len(),
                actual: entry.elements.len(),
            });
        }
    }

    Ok(())
}

/// Fail on the first element whose status is not `OK`
///
/// Offsets translate the call's indices back into the full request.
///
/// # Errors
///
/// Returns `ElementFailed` with request-wide indices.
pub fn ensure_elements_ok(
    response: &DistanceMatrixResponse,
    origin_offset: usize,
    destination_offset: usize,
) -> Result<(), DistanceMatrixError> {
    match response.failed_elements().next() {
        Some((origin, destination, element)) => Err(DistanceMatrixError::ElementFailed {
            origin_index: origin_offset + origin,
            destination_index: destination_offset + destination,
            status: element.status.to_string(),
        }),
        None => Ok(()),
    }
}
