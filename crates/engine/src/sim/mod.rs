//! Trace replay.
//!
//! Feeds parsed access traces through a [`CacheSim`] so the policy can be
//! exercised and inspected outside a full system model.

/// Plain-text access trace reader.
pub mod trace;

use serde::Serialize;
use tracing::debug;

use self::trace::{AccessKind, TraceRecord};
use crate::cache::CacheSim;
use crate::common::PolicyError;

/// Totals produced by one replay.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Trace records processed.
    pub records: u64,
    /// Cycles spent on demand accesses: the cache latency for every access,
    /// the next-level latency for every miss, and write-back penalties.
    pub access_cycles: u64,
    /// Sum of write-back penalties reported by the cache.
    pub writeback_cycles: u64,
    /// Invalidations that found no line to remove.
    pub invalidate_misses: u64,
}

/// Replays `records` against `cache` in order.
///
/// Every access is charged `cache.latency`; a miss additionally pays
/// `next_level_latency` for the fill plus any write-back penalty.
///
/// # Errors
///
/// Stops at the first policy failure.
pub fn replay(
    cache: &mut CacheSim,
    records: &[TraceRecord],
    next_level_latency: u64,
) -> Result<ReplaySummary, PolicyError> {
    let mut summary = ReplaySummary::default();
    for record in records {
        match record.kind {
            AccessKind::Read | AccessKind::Write => {
                let is_write = record.kind == AccessKind::Write;
                let (hit, penalty) = cache.access(record.addr, is_write, next_level_latency)?;
                summary.access_cycles += cache.latency + penalty;
                if !hit {
                    summary.access_cycles += next_level_latency;
                }
                summary.writeback_cycles += penalty;
            }
            AccessKind::Invalidate => {
                if !cache.invalidate(record.addr) {
                    summary.invalidate_misses += 1;
                }
            }
        }
        summary.records += 1;
    }
    debug!(
        records = summary.records,
        cycles = summary.access_cycles,
        "replay finished"
    );
    Ok(summary)
}
