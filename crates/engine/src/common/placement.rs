//! Set/way placement of a replacement record.
//!
//! Records are created before the host tells the policy where they live. A
//! record starts out `Unplaced` and becomes `Placed` the first time it takes
//! part in a victim selection pass. Only placed records may be touched or
//! refilled.

/// Where a replacement record lives inside the cache.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Placement {
    /// The record has not yet been seen by a selection pass.
    #[default]
    Unplaced,
    /// The record's coordinates, stamped by a selection pass.
    Placed {
        /// Cache set index.
        set: u32,
        /// Way index within the set.
        way: u32,
    },
}

impl Placement {
    /// Returns `(set, way)` if the record has been placed.
    #[inline]
    pub const fn coords(self) -> Option<(u32, u32)> {
        match self {
            Self::Unplaced => None,
            Self::Placed { set, way } => Some((set, way)),
        }
    }

    /// Returns `true` once a selection pass has stamped the record.
    #[inline]
    pub const fn is_placed(self) -> bool {
        matches!(self, Self::Placed { .. })
    }
}
