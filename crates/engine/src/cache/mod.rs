//! Set-Associative Cache Model.
//!
//! This module implements a small set-associative cache that drives the
//! LRU-IPV policy through its full calling protocol. It models tags, valid
//! and dirty bits, and write-back penalties so that traces can be replayed
//! against the policy and hit rates compared across schedule settings.
//!
//! Line contents are not modelled.

/// Cache replacement policy implementation (LRU-IPV).
pub mod policies;

use tracing::{debug, warn};

use self::policies::{IpvEntry, LruIpvPolicy, ReplaceableEntry, ReplacementPolicy};
use crate::common::PolicyError;
use crate::config::{Config, IpvConfig};
use crate::stats::CacheStats;

/// Cache line slot: tag, validity and dirty bits plus its replacement record.
#[derive(Clone, Debug)]
struct CacheLine {
    tag: u64,
    valid: bool,
    dirty: bool,
    set: u32,
    way: u32,
    repl: IpvEntry,
}

impl ReplaceableEntry<IpvEntry> for CacheLine {
    fn set(&self) -> u32 {
        self.set
    }

    fn way(&self) -> u32 {
        self.way
    }

    fn replacement_data(&self) -> &IpvEntry {
        &self.repl
    }

    fn replacement_data_mut(&mut self) -> &mut IpvEntry {
        &mut self.repl
    }
}

/// Cache simulator driving an LRU-IPV policy.
///
/// Hits call `touch`; misses offer every way of the set to `get_victim`,
/// invalidate a valid victim, install the new tag and call `reset`.
#[derive(Debug)]
pub struct CacheSim {
    /// Access latency in cycles.
    pub latency: u64,
    lines: Vec<CacheLine>,
    num_sets: usize,
    ways: usize,
    line_bytes: usize,
    policy: LruIpvPolicy,
    stats: CacheStats,
}

impl CacheSim {
    /// Creates a new cache simulator with the specified configuration.
    ///
    /// The policy's associativity and set count are taken from the cache
    /// geometry; the insertion schedule and tie-break come from `config.policy`.
    /// A `policy.num_ways` or `policy.num_sets` that disagrees with the
    /// geometry is reported with a warning and overridden.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidWays`] if the cache has zero ways.
    pub fn new(config: &Config) -> Result<Self, PolicyError> {
        let cache = &config.cache;
        let safe_line = if cache.line_bytes == 0 {
            64
        } else {
            cache.line_bytes
        };
        let safe_size = if cache.size_bytes == 0 {
            4096
        } else {
            cache.size_bytes
        };
        let num_sets = (safe_size / safe_line)
            .checked_div(cache.ways)
            .unwrap_or(0)
            .max(1);

        if config.policy.num_ways != cache.ways as i64 {
            warn!(
                policy_ways = config.policy.num_ways,
                cache_ways = cache.ways,
                "policy.num_ways differs from cache.ways; using the cache geometry"
            );
        }
        if let Some(sets) = config.policy.num_sets.filter(|&sets| sets != num_sets) {
            warn!(
                policy_sets = sets,
                cache_sets = num_sets,
                "policy.num_sets differs from the cache geometry; using the cache geometry"
            );
        }

        let policy = LruIpvPolicy::new(&IpvConfig {
            num_ways: cache.ways as i64,
            num_sets: Some(num_sets),
            ..config.policy.clone()
        })?;

        let mut lines = Vec::with_capacity(num_sets * cache.ways);
        for set in 0..num_sets {
            for way in 0..cache.ways {
                lines.push(CacheLine {
                    tag: 0,
                    valid: false,
                    dirty: false,
                    set: set as u32,
                    way: way as u32,
                    repl: policy.instantiate_entry(),
                });
            }
        }
        debug!(num_sets, ways = cache.ways, line_bytes = safe_line, "cache created");

        Ok(Self {
            latency: cache.latency,
            lines,
            num_sets,
            ways: cache.ways,
            line_bytes: safe_line,
            policy,
            stats: CacheStats::default(),
        })
    }

    /// Number of sets.
    pub const fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// The replacement policy.
    pub const fn policy(&self) -> &LruIpvPolicy {
        &self.policy
    }

    /// Mutable access to the replacement policy, e.g. to attach an observer.
    pub const fn policy_mut(&mut self) -> &mut LruIpvPolicy {
        &mut self.policy
    }

    /// Access counters.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Set index an address maps to.
    pub const fn set_index(&self, addr: u64) -> usize {
        ((addr as usize) / self.line_bytes) % self.num_sets
    }

    const fn tag(&self, addr: u64) -> u64 {
        addr / (self.line_bytes * self.num_sets) as u64
    }

    fn find(&self, addr: u64) -> Option<usize> {
        let set = self.set_index(addr);
        let tag = self.tag(addr);
        let base = set * self.ways;
        (base..base + self.ways).find(|&idx| self.lines[idx].valid && self.lines[idx].tag == tag)
    }

    /// Checks if the cache contains the specified address.
    pub fn contains(&self, addr: u64) -> bool {
        self.find(addr).is_some()
    }

    /// Way holding `addr`, if present.
    pub fn way_of(&self, addr: u64) -> Option<u32> {
        self.find(addr).map(|idx| self.lines[idx].way)
    }

    /// Stored replacement age of the line holding `addr`, if present.
    pub fn age_of(&self, addr: u64) -> Option<u64> {
        self.find(addr).map(|idx| self.lines[idx].repl.age)
    }

    /// Installs a line for `addr`, evicting the policy's victim.
    ///
    /// # Returns
    ///
    /// The penalty in cycles for writing back a dirty victim.
    fn install_line(
        &mut self,
        addr: u64,
        is_write: bool,
        next_level_latency: u64,
    ) -> Result<u64, PolicyError> {
        let set = self.set_index(addr);
        let tag = self.tag(addr);
        let base = set * self.ways;

        let victim = {
            let candidates = &mut self.lines[base..base + self.ways];
            self.policy.get_victim(candidates)?
        };
        let line = &mut self.lines[base + victim];

        let mut penalty = 0;
        if line.valid {
            self.stats.evictions += 1;
            if line.dirty {
                penalty += next_level_latency;
                self.stats.writebacks += 1;
            }
            self.policy.invalidate(&mut line.repl);
        }

        line.tag = tag;
        line.valid = true;
        line.dirty = is_write;
        self.policy.reset(&mut line.repl)?;

        Ok(penalty)
    }

    /// Accesses the cache for the specified address.
    ///
    /// # Arguments
    ///
    /// * `addr` - The address to access
    /// * `is_write` - Whether this is a write operation
    /// * `next_level_latency` - Latency of the next cache level
    ///
    /// # Returns
    ///
    /// A tuple `(hit, penalty)` where `penalty` is the write-back cost of
    /// the evicted line (always 0 on a hit).
    ///
    /// # Errors
    ///
    /// Propagates policy failures, which indicate an inconsistent host.
    pub fn access(
        &mut self,
        addr: u64,
        is_write: bool,
        next_level_latency: u64,
    ) -> Result<(bool, u64), PolicyError> {
        self.stats.accesses += 1;

        if let Some(idx) = self.find(addr) {
            let line = &mut self.lines[idx];
            self.policy.touch(&mut line.repl)?;
            if is_write {
                line.dirty = true;
            }
            self.stats.hits += 1;
            return Ok((true, 0));
        }

        self.stats.misses += 1;
        let penalty = self.install_line(addr, is_write, next_level_latency)?;
        Ok((false, penalty))
    }

    /// Removes the line holding `addr`.
    ///
    /// # Returns
    ///
    /// `true` if a line was removed.
    pub fn invalidate(&mut self, addr: u64) -> bool {
        let Some(idx) = self.find(addr) else {
            return false;
        };
        let line = &mut self.lines[idx];
        self.policy.invalidate(&mut line.repl);
        line.valid = false;
        line.dirty = false;
        self.stats.invalidations += 1;
        true
    }

    /// Invalidates every valid line.
    ///
    /// # Returns
    ///
    /// The number of dirty lines that were written back.
    pub fn flush(&mut self) -> usize {
        let mut written_back = 0;
        for line in self.lines.iter_mut().filter(|line| line.valid) {
            if line.dirty {
                written_back += 1;
            }
            self.policy.invalidate(&mut line.repl);
            line.valid = false;
            line.dirty = false;
            self.stats.invalidations += 1;
        }
        written_back
    }

    /// Snapshot of the replacement records of one set, in way order.
    ///
    /// Returns `None` if `set` is not below [`num_sets`](Self::num_sets).
    pub fn set_records(&self, set: usize) -> Option<Vec<IpvEntry>> {
        if set >= self.num_sets {
            return None;
        }
        let base = set * self.ways;
        let lines = self.lines.get(base..base + self.ways)?;
        Some(lines.iter().map(|line| line.repl).collect())
    }
}
