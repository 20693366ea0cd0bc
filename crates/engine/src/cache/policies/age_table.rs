//! Per-set age vectors.
//!
//! Each set owns one vector of `ways` ranks indexed by way. After a
//! [`normalize`] the ranks are a permutation of `0..ways`, with `0` the
//! least recently used way and `ways - 1` the most recently used.
//!
//! The table is a rebuildable cache of the ages stored in the host's
//! records: victim selection overwrites it from those records before
//! deciding anything, so dropping or recreating a set's vector is harmless.
//!
//! # Storage
//!
//! - **Dense:** used when the host knows its set count. Vectors are indexed by
//!   set id and allocated on first reference. Ids at or past the configured
//!   count land in a small overflow map, so a stray id never sizes the table.
//! - **Sparse:** a hash map keyed by set id for hosts that cannot bound the id
//!   space. Entries are never evicted, so the map logs a warning once it
//!   tracks more sets than the configured threshold.

use std::collections::HashMap;

use tracing::warn;

#[derive(Debug, Clone)]
enum Storage {
    Dense {
        sets: Vec<Vec<u64>>,
        overflow: HashMap<u32, Vec<u64>>,
    },
    Sparse(HashMap<u32, Vec<u64>>),
}

/// Age vectors for every set the policy has seen.
#[derive(Debug, Clone)]
pub struct AgeTable {
    ways: usize,
    storage: Storage,
    warn_at: usize,
    warned: bool,
}

impl AgeTable {
    /// Creates an empty table.
    ///
    /// # Arguments
    ///
    /// * `ways` - Length of every set vector.
    /// * `num_sets` - Number of sets when known; selects dense storage.
    /// * `warn_at` - Sparse-storage size above which growth is reported.
    pub fn new(ways: usize, num_sets: Option<usize>, warn_at: usize) -> Self {
        let storage = match num_sets {
            Some(sets) => Storage::Dense {
                sets: vec![Vec::new(); sets],
                overflow: HashMap::new(),
            },
            None => Storage::Sparse(HashMap::new()),
        };
        Self {
            ways,
            storage,
            warn_at,
            warned: false,
        }
    }

    /// Number of ways tracked per set.
    #[inline]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Returns the vector for `set`, creating or repairing it first.
    ///
    /// A missing or undersized vector is replaced by the identity permutation
    /// `[0, 1, .., ways - 1]`. A vector that is already `ways` long is returned
    /// untouched.
    pub fn ensure(&mut self, set: u32) -> &mut [u64] {
        let ways = self.ways;
        let vector = match &mut self.storage {
            Storage::Dense { sets, overflow } => {
                let idx = set as usize;
                if idx < sets.len() {
                    &mut sets[idx]
                } else {
                    if !self.warned {
                        warn!(
                            set,
                            sets = sets.len(),
                            "set id beyond configured set count; tracking it separately"
                        );
                        self.warned = true;
                    }
                    overflow.entry(set).or_default()
                }
            }
            Storage::Sparse(map) => {
                if !self.warned && map.len() >= self.warn_at && !map.contains_key(&set) {
                    warn!(
                        tracked = map.len(),
                        "sparse age table keeps growing; configure num_sets to bound it"
                    );
                    self.warned = true;
                }
                map.entry(set).or_default()
            }
        };

        if vector.len() < ways {
            vector.clear();
            vector.extend(0..ways as u64);
        }
        vector
    }

    /// Returns the vector for `set` if it has been created.
    pub fn get(&self, set: u32) -> Option<&[u64]> {
        let vector = match &self.storage {
            Storage::Dense { sets, overflow } => match sets.get(set as usize) {
                Some(vector) => vector,
                None => overflow.get(&set)?,
            },
            Storage::Sparse(map) => map.get(&set)?,
        };
        (!vector.is_empty()).then_some(vector.as_slice())
    }

    /// Number of sets that currently hold a vector.
    pub fn tracked_sets(&self) -> usize {
        match &self.storage {
            Storage::Dense { sets, overflow } => {
                sets.iter().filter(|v| !v.is_empty()).count() + overflow.len()
            }
            Storage::Sparse(map) => map.len(),
        }
    }
}

/// Relabels `ages` densely to `0..len`, preserving their relative order.
///
/// The sort is stable: equal ages keep their index order, so the lower way
/// receives the lower rank. This is the only place duplicate or
/// out-of-range ranks are repaired.
pub fn normalize(ages: &mut [u64]) {
    let mut order: Vec<usize> = (0..ages.len()).collect();
    order.sort_by_key(|&way| ages[way]);
    for (rank, way) in order.into_iter().enumerate() {
        ages[way] = rank as u64;
    }
}

/// Returns the largest rank in `ages`, or `0` for an empty slice.
#[inline]
pub fn current_mru(ages: &[u64]) -> u64 {
    ages.iter().copied().max().unwrap_or(0)
}
