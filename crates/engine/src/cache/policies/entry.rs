//! Per-line replacement records.
//!
//! The host owns one [`IpvEntry`] per cache line slot and hands it to the
//! policy on every lifecycle event. The record's `age` is the durable copy of
//! the line's rank: victim selection rebuilds the set's age vector from it.

use crate::common::Placement;

/// Replacement metadata for one cache line slot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IpvEntry {
    /// Rank of the line within its set; larger is more recent.
    pub age: u64,
    /// Whether the slot currently holds a line.
    pub valid: bool,
    placement: Placement,
}

impl IpvEntry {
    /// Where the record lives, as stamped by the last selection pass.
    #[inline]
    pub const fn placement(&self) -> Placement {
        self.placement
    }

    pub(crate) const fn place(&mut self, set: u32, way: u32) {
        self.placement = Placement::Placed { set, way };
    }
}
