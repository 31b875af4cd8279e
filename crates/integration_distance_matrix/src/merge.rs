//! Reassembly of partial responses

use crate::error::DistanceMatrixError;
use crate::models::DistanceMatrixResponse;
use crate::partition::SplitAxis;

/// Fold one call's response into the accumulated result
///
/// Parts must be merged in call order. The first part becomes the
/// accumulator. When origins were split, addresses and rows are appended;
/// when destinations were split, destination addresses are appended and
/// each row is extended column-wise. The top-level status always comes from
/// the latest part.
///
/// # Errors
///
/// Returns `RowCountMismatch` if a destination-split part does not carry
/// one row per accumulated origin.
pub fn merge(
    accumulator: Option<DistanceMatrixResponse>,
    part: DistanceMatrixResponse,
    axis: SplitAxis,
) -> Result<DistanceMatrixResponse, DistanceMatrixError> {
    let Some(mut merged) = accumulator else {
        return Ok(part);
    };

    match axis {
        SplitAxis::None | SplitAxis::Origins => {
            merged.origin_addresses.extend(part.origin_addresses);
            merged.rows.extend(part.rows);
        },
        SplitAxis::Destinations => {
            if merged.rows.len() != part.rows.len() {
                return Err(DistanceMatrixError::RowCountMismatch {
                    expected: merged.rows.len(),
                    actual: part.rows.len(),
                });
            }
            merged.destination_addresses.extend(part.destination_addresses);
            for (row, extra) in merged.rows.iter_mut().zip(part.rows) {
                row.elements.extend(extra.elements);
            }
        },
    }

    merged.status = part.status;
    merged.error_message = part.error_message;
    Ok(merged)
}
