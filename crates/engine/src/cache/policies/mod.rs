//! Cache Replacement Policies.
//!
//! Implements LRU replacement with an Insertion Policy Vector (LRU-IPV) for
//! set-associative caches, split into its building blocks.
//!
//! # Components
//!
//! - `age_table`: per-set rank vectors and the stable normalize.
//! - `rank`: promote-to-MRU and insert-near-LRU update rules.
//! - `schedule`: the cyclic MRU / near-LRU insertion pattern.
//! - `lru_ipv`: victim selection and the record lifecycle.
//! - `events`: structured operation events and the text trace observer.

/// Per-set age vectors.
pub mod age_table;

/// Replacement records owned by the host.
pub mod entry;

/// Policy events and observers.
pub mod events;

/// LRU-IPV replacement policy.
pub mod lru_ipv;

/// Rank update rules.
pub mod rank;

/// Insertion schedule.
pub mod schedule;

pub use age_table::AgeTable;
pub use entry::IpvEntry;
pub use events::{PolicyEvent, PolicyObserver, TextTraceObserver};
pub use lru_ipv::LruIpvPolicy;
pub use schedule::{Insertion, InsertionSchedule};

use crate::common::PolicyError;

/// A cache line slot offered to victim selection.
///
/// The host owns the slot and its replacement record; the policy only reads
/// the coordinates and reads or stamps the record.
pub trait ReplaceableEntry<D> {
    /// The cache set this slot belongs to.
    fn set(&self) -> u32;

    /// The way this slot occupies within its set.
    fn way(&self) -> u32;

    /// The slot's replacement record.
    fn replacement_data(&self) -> &D;

    /// Mutable access to the slot's replacement record.
    fn replacement_data_mut(&mut self) -> &mut D;
}

/// Trait for cache replacement policies.
///
/// Defines the lifecycle callbacks a host drives on slot creation, hit,
/// fill after miss and removal, plus victim selection.
pub trait ReplacementPolicy: Send {
    /// Per-slot replacement record.
    type Data;

    /// Creates the record for a new cache line slot.
    fn instantiate_entry(&self) -> Self::Data;

    /// Updates the record when its line is removed.
    fn invalidate(&mut self, data: &mut Self::Data);

    /// Updates the policy state when a line is hit.
    ///
    /// # Errors
    ///
    /// Fails if the record has never been placed by [`get_victim`](Self::get_victim).
    fn touch(&mut self, data: &mut Self::Data) -> Result<(), PolicyError>;

    /// Updates the policy state when a line is filled after a miss.
    ///
    /// # Errors
    ///
    /// Fails if the record has never been placed by [`get_victim`](Self::get_victim).
    fn reset(&mut self, data: &mut Self::Data) -> Result<(), PolicyError>;

    /// Selects a victim among the ways of one set.
    ///
    /// # Returns
    ///
    /// The index into `candidates` of the line to evict.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::NoCandidates`] if `candidates` is empty.
    fn get_victim<C>(&mut self, candidates: &mut [C]) -> Result<usize, PolicyError>
    where
        C: ReplaceableEntry<Self::Data>;
}
