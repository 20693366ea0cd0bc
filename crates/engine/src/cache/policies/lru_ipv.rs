//! LRU replacement with an Insertion Policy Vector (LRU-IPV).
//!
//! Hits promote a line to MRU exactly as in true LRU. Fills after a miss are
//! placed by a deterministic schedule: some enter at MRU, the rest enter at
//! rank `0` so that lines with no reuse are the next to go. This keeps
//! streaming data from flushing the useful part of a set.
//!
//! # Calling protocol
//!
//! 1. `instantiate_entry` when the host creates a line slot.
//! 2. `get_victim` with every way of the set when a miss needs room. This
//!    stamps each candidate's record with its set and way.
//! 3. `reset` on the victim's record once the new line is in place.
//! 4. `touch` on every later hit, `invalidate` when the line is removed.
//!
//! # Performance
//!
//! - **Time Complexity:**
//!   - `touch()` / `reset()`: O(W)
//!   - `get_victim()`: O(W log W) for the stable normalize
//! - **Space Complexity:** O(S × W) where S is the number of sets seen

use std::fmt;

use tracing::{debug, trace, warn};

use super::age_table::{AgeTable, normalize};
use super::entry::IpvEntry;
use super::events::{PolicyEvent, PolicyObserver};
use super::rank::{insert_near_lru, promote_to_mru};
use super::schedule::{Insertion, InsertionSchedule};
use super::{ReplaceableEntry, ReplacementPolicy};
use crate::common::PolicyError;
use crate::config::{IpvConfig, TieBreak};
use crate::stats::PolicyStats;

/// LRU-IPV policy state.
pub struct LruIpvPolicy {
    num_ways: usize,
    tie_break: TieBreak,
    ages: AgeTable,
    schedule: InsertionSchedule,
    stats: PolicyStats,
    observer: Option<Box<dyn PolicyObserver>>,
}

impl LruIpvPolicy {
    /// Creates a new LRU-IPV policy instance.
    ///
    /// # Arguments
    ///
    /// * `config` - Associativity, insertion schedule and storage parameters.
    ///
    /// # Errors
    ///
    /// Returns [`PolicyError::InvalidWays`] if `config.num_ways` is not positive.
    pub fn new(config: &IpvConfig) -> Result<Self, PolicyError> {
        if config.num_ways <= 0 {
            return Err(PolicyError::InvalidWays(config.num_ways));
        }
        let num_ways = config.num_ways as usize;
        let schedule = InsertionSchedule::new(config.quantum, config.mru_pct);
        debug!(
            num_ways,
            mru_pct = config.mru_pct,
            quantum = schedule.quantum(),
            mru_slots = schedule.mru_slots(),
            "LRU-IPV policy created"
        );

        Ok(Self {
            num_ways,
            tie_break: config.tie_break,
            ages: AgeTable::new(num_ways, config.num_sets, config.sparse_warn_sets),
            schedule,
            stats: PolicyStats::default(),
            observer: None,
        })
    }

    /// Attaches an event observer, replacing any previous one.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn PolicyObserver>) -> Self {
        self.observer = Some(observer);
        self
    }

    /// Attaches or detaches the event observer.
    pub fn set_observer(&mut self, observer: Option<Box<dyn PolicyObserver>>) {
        self.observer = observer;
    }

    /// Configured associativity.
    pub const fn num_ways(&self) -> usize {
        self.num_ways
    }

    /// The insertion schedule, including its cursor.
    pub const fn schedule(&self) -> &InsertionSchedule {
        &self.schedule
    }

    /// Current age vector for `set`, if the set has been referenced.
    pub fn set_ages(&self, set: u32) -> Option<&[u64]> {
        self.ages.get(set)
    }

    /// The per-set age table.
    pub const fn age_table(&self) -> &AgeTable {
        &self.ages
    }

    /// Counters accumulated since construction.
    pub const fn stats(&self) -> &PolicyStats {
        &self.stats
    }

    fn placed_way(&self, entry: &IpvEntry) -> Result<(u32, u32), PolicyError> {
        let (set, way) = entry.placement().coords().ok_or(PolicyError::Unplaced)?;
        if way as usize >= self.num_ways {
            return Err(PolicyError::WayOutOfRange {
                way,
                ways: self.num_ways,
            });
        }
        Ok((set, way))
    }

    fn emit(&mut self, event: &PolicyEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.on_event(event);
        }
    }
}

impl ReplacementPolicy for LruIpvPolicy {
    type Data = IpvEntry;

    fn instantiate_entry(&self) -> IpvEntry {
        IpvEntry::default()
    }

    /// Marks the record invalid and drops its rank to `0`.
    ///
    /// The placement is kept; the next selection pass restamps it anyway.
    fn invalidate(&mut self, entry: &mut IpvEntry) {
        entry.valid = false;
        entry.age = 0;
        self.stats.invalidations += 1;
        trace!(placement = ?entry.placement(), "invalidate");

        if self.observer.is_some() {
            self.emit(&PolicyEvent::Invalidate {
                placement: entry.placement(),
            });
        }
    }

    /// Promotes the record's way to MRU on a hit.
    fn touch(&mut self, entry: &mut IpvEntry) -> Result<(), PolicyError> {
        let (set, way) = self.placed_way(entry)?;
        let observed = self.observer.is_some();

        let ages = self.ages.ensure(set);
        let before = observed.then(|| ages.to_vec());
        let age = promote_to_mru(ages, way as usize);
        trace!(set, way, age, ages = ?ages, "touch");
        let after = observed.then(|| ages.to_vec());

        entry.age = age;
        entry.valid = true;
        self.stats.touches += 1;

        if let (Some(before), Some(after)) = (before, after) {
            self.emit(&PolicyEvent::Touch {
                set,
                way,
                before,
                after,
            });
        }
        Ok(())
    }

    /// Places a freshly filled record according to the insertion schedule.
    ///
    /// The schedule cursor only advances once the record is known to be placed.
    fn reset(&mut self, entry: &mut IpvEntry) -> Result<(), PolicyError> {
        let (set, way) = self.placed_way(entry)?;
        let observed = self.observer.is_some();
        let insertion = self.schedule.next_insertion();

        let ages = self.ages.ensure(set);
        let before = observed.then(|| ages.to_vec());
        let age = match insertion {
            Insertion::Mru => promote_to_mru(ages, way as usize),
            Insertion::NearLru => insert_near_lru(ages, way as usize),
        };
        trace!(set, way, %insertion, age, ages = ?ages, "reset");
        let after = observed.then(|| ages.to_vec());

        entry.age = age;
        entry.valid = true;
        self.stats.fills += 1;
        match insertion {
            Insertion::Mru => self.stats.mru_insertions += 1,
            Insertion::NearLru => self.stats.near_lru_insertions += 1,
        }

        if let (Some(before), Some(after)) = (before, after) {
            self.emit(&PolicyEvent::Reset {
                set,
                way,
                insertion,
                before,
                after,
            });
        }
        Ok(())
    }

    /// Selects the least recently used candidate.
    ///
    /// Every candidate is stamped with its coordinates, then the set's age
    /// vector is overwritten from the candidates' stored ages and normalized.
    /// The minimum-age candidate is returned as an index into `candidates`;
    /// ties go to the last one unless [`TieBreak::First`] is configured.
    fn get_victim<C>(&mut self, candidates: &mut [C]) -> Result<usize, PolicyError>
    where
        C: ReplaceableEntry<IpvEntry>,
    {
        let set = candidates.first().ok_or(PolicyError::NoCandidates)?.set();

        for candidate in candidates.iter_mut() {
            let (cset, cway) = (candidate.set(), candidate.way());
            if cset != set {
                warn!(set, candidate_set = cset, way = cway, "candidate from another set");
            }
            candidate.replacement_data_mut().place(cset, cway);
        }

        let ages = self.ages.ensure(set);
        for candidate in candidates.iter() {
            if let Some(slot) = ages.get_mut(candidate.way() as usize) {
                *slot = candidate.replacement_data().age;
            }
        }
        normalize(ages);

        let victim = select_min(candidates, self.tie_break);
        let way = candidates[victim].way();
        trace!(set, victim = way, ages = ?ages, "getVictim");
        let snapshot = self.observer.is_some().then(|| ages.to_vec());

        self.stats.victim_selections += 1;
        if let Some(ages) = snapshot {
            self.emit(&PolicyEvent::Victim { set, ages, way });
        }
        Ok(victim)
    }
}

/// Index of the minimum-age candidate under `tie_break`.
fn select_min<C: ReplaceableEntry<IpvEntry>>(candidates: &[C], tie_break: TieBreak) -> usize {
    let mut victim = 0;
    let mut min_age = u64::MAX;
    for (i, candidate) in candidates.iter().enumerate() {
        let age = candidate.replacement_data().age;
        let wins = match tie_break {
            TieBreak::Last => age <= min_age,
            TieBreak::First => age < min_age,
        };
        if wins {
            min_age = age;
            victim = i;
        }
    }
    victim
}

impl fmt::Debug for LruIpvPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruIpvPolicy")
            .field("num_ways", &self.num_ways)
            .field("tie_break", &self.tie_break)
            .field("schedule", &self.schedule)
            .field("tracked_sets", &self.ages.tracked_sets())
            .field("stats", &self.stats)
            .field("observed", &self.observer.is_some())
            .finish_non_exhaustive()
    }
}
