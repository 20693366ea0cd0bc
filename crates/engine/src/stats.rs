//! Replacement and cache statistics.
//!
//! This module tracks counters for the engine and its reference host. It provides:
//! 1. **Policy counters:** Touches, fills split by insertion position, victim
//!    selections, and invalidations.
//! 2. **Cache counters:** Accesses, hits, misses, write-backs and invalidations,
//!    with a derived hit rate.
//!
//! Both structures serialize to JSON for the CLI.

use serde::Serialize;

/// Counters maintained by the LRU-IPV policy.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PolicyStats {
    /// Hits promoted to MRU.
    pub touches: u64,
    /// Fills placed through the insertion schedule.
    pub fills: u64,
    /// Fills the schedule inserted at MRU.
    pub mru_insertions: u64,
    /// Fills the schedule inserted near LRU.
    pub near_lru_insertions: u64,
    /// Completed victim selection passes.
    pub victim_selections: u64,
    /// Records invalidated.
    pub invalidations: u64,
}

impl PolicyStats {
    /// Share of fills inserted at MRU, in percent.
    pub fn mru_insertion_pct(&self) -> f64 {
        if self.fills == 0 {
            0.0
        } else {
            self.mru_insertions as f64 * 100.0 / self.fills as f64
        }
    }
}

/// Counters maintained by the reference cache model.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total demand accesses.
    pub accesses: u64,
    /// Accesses that found their line.
    pub hits: u64,
    /// Accesses that had to fill a line.
    pub misses: u64,
    /// Dirty victims written back on eviction.
    pub writebacks: u64,
    /// Valid lines evicted to make room.
    pub evictions: u64,
    /// Lines removed by explicit invalidation or flush.
    pub invalidations: u64,
}

impl CacheStats {
    /// Hit rate in percent.
    pub fn hit_rate(&self) -> f64 {
        if self.accesses == 0 {
            0.0
        } else {
            self.hits as f64 * 100.0 / self.accesses as f64
        }
    }

    /// Prints a short report to stdout.
    pub fn print(&self, policy: &PolicyStats) {
        println!("cache:");
        println!("  accesses      {}", self.accesses);
        println!("  hits          {}", self.hits);
        println!("  misses        {}", self.misses);
        println!("  hit rate      {:.2}%", self.hit_rate());
        println!("  evictions     {}", self.evictions);
        println!("  writebacks    {}", self.writebacks);
        println!("  invalidations {}", self.invalidations);
        println!("policy:");
        println!("  touches       {}", policy.touches);
        println!("  fills         {}", policy.fills);
        println!(
            "  mru inserts   {} ({:.2}%)",
            policy.mru_insertions,
            policy.mru_insertion_pct()
        );
        println!("  lru inserts   {}", policy.near_lru_insertions);
        println!("  victim passes {}", policy.victim_selections);
    }
}
