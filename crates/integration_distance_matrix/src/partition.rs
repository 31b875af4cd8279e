//! Request partitioning
//!
//! The service caps both the number of elements (origins x destinations) and
//! the URL length of a single call. A request over either limit is split
//! along its larger side into contiguous, near-equal blocks, each paired with
//! the full other side.

use domain::Coordinate;

/// Number of calls needed to stay under both per-call limits
///
/// `rendered_url_length` is the length of the fully encoded URL for the
/// unsplit request. Zero limits are treated as one. Always returns at least 1.
#[must_use]
pub fn compute_call_count(
    origins_count: usize,
    destinations_count: usize,
    per_call_element_cap: usize,
    rendered_url_length: usize,
    max_url_length: usize,
) -> usize {
    let elements = origins_count.saturating_mul(destinations_count);
    let by_elements = elements.div_ceil(per_call_element_cap.max(1));
    let by_url_length = rendered_url_length.div_ceil(max_url_length.max(1));
    by_elements.max(by_url_length).max(1)
}

/// Which side of the request was split across calls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitAxis {
    /// Single call, nothing split
    None,
    /// Origins split, every call carries all destinations
    Origins,
    /// Destinations split, every call carries all origins
    Destinations,
}

/// The origins and destinations of exactly one physical call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CallGroup<'a> {
    /// Contiguous slice of the request's origins
    pub origins: &'a [Coordinate],
    /// Contiguous slice of the request's destinations
    pub destinations: &'a [Coordinate],
}

impl CallGroup<'_> {
    /// Number of elements this call will return
    #[must_use]
    pub const fn element_count(&self) -> usize {
        self.origins.len() * self.destinations.len()
    }
}

/// Ordered call groups for one request
#[derive(Debug, Clone, PartialEq)]
pub struct Partition<'a> {
    axis: SplitAxis,
    groups: Vec<CallGroup<'a>>,
}

impl<'a> Partition<'a> {
    /// The side that was split
    #[must_use]
    pub const fn axis(&self) -> SplitAxis {
        self.axis
    }

    /// Groups in dispatch order
    #[must_use]
    pub fn groups(&self) -> &[CallGroup<'a>] {
        &self.groups
    }

    /// Number of calls
    #[must_use]
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    /// Whether there are no groups (only for empty input)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl<'a> IntoIterator for Partition<'a> {
    type Item = CallGroup<'a>;
    type IntoIter = std::vec::IntoIter<CallGroup<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.groups.into_iter()
    }
}

/// Split a request into `call_count` ordered call groups
///
/// The larger side is split; on a tie the destinations are split. When
/// `call_count` exceeds the length of the side being split, one group per
/// item is produced instead, so no group is ever empty.
///
/// Both sides are expected to be non-empty; callers reject empty input.
#[must_use]
pub fn partition<'a>(
    origins: &'a [Coordinate],
    destinations: &'a [Coordinate],
    call_count: usize,
) -> Partition<'a> {
    if call_count <= 1 {
        return Partition {
            axis: SplitAxis::None,
            groups: vec![CallGroup {
                origins,
                destinations,
            }],
        };
    }

    if destinations.len() >= origins.len() {
        let groups = split_into_blocks(destinations, call_count)
            .into_iter()
            .map(|block| CallGroup {
                origins,
                destinations: block,
            })
            .collect();
        Partition {
            axis: SplitAxis::Destinations,
            groups,
        }
    } else {
        let groups = split_into_blocks(origins, call_count)
            .into_iter()
            .map(|block| CallGroup {
                origins: block,
                destinations,
            })
            .collect();
        Partition {
            axis: SplitAxis::Origins,
            groups,
        }
    }
}

/// Split `items` into `block_count` contiguous blocks
///
/// Blocks get `len / block_count` items each and the remainder goes one
/// extra item each to the tail blocks, so sizes differ by at most one.
/// `block_count` is clamped to `1..=len`.
fn split_into_blocks<T>(items: &[T], block_count: usize) -> Vec<&[T]> {
    if items.is_empty() {
        return Vec::new();
    }

    let block_count = block_count.clamp(1, items.len());
    let base = items.len() / block_count;
    let remainder = items.len() % block_count;
    let first_larger = block_count - remainder;

    let mut blocks = Vec::with_capacity(block_count);
    let mut rest = items;
    for index in 0..block_count {
        let size = if index >= first_larger { base + 1 } else { base };
        let (block, tail) = rest.split_at(size);
        blocks.push(block);
        rest = tail;
    }
    blocks
}
