use std::ops::Range;

use crate::common::{DomainError, DomainResult};

/// The two independent identifier counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpace {
    Pedestrian,
    Polygon,
}

impl IdSpace {
    fn label(&self) -> &'static str {
        match self {
            IdSpace::Pedestrian => "pedestrian",
            IdSpace::Polygon => "polygon",
        }
    }
}

/// Hands out monotonically increasing instance identifiers per entity class.
/// Counters live for the whole process and never reset; the first allocated
/// id of each space is 1 (0 belongs to the reserved agent).
#[derive(Debug, Default)]
pub struct IdAllocator {
    last_pedestrian: u64,
    last_polygon: u64,
}

impl IdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the counter of `space` by `n` and returns the allocated ids
    /// as a half-open range. Running out of the representable range is
    /// reported, not wrapped.
    pub fn next_block(&mut self, space: IdSpace, n: usize) -> DomainResult<Range<u64>> {
        let slot = match space {
            IdSpace::Pedestrian => &mut self.last_pedestrian,
            IdSpace::Polygon => &mut self.last_polygon,
        };
        let end = slot
            .checked_add(n as u64)
            .and_then(|last| last.checked_add(1))
            .ok_or_else(|| DomainError::IdSpaceExhausted {
                space: space.label().to_string(),
            })?;
        let first = *slot + 1;
        *slot = end - 1;
        Ok(first..end)
    }
}
