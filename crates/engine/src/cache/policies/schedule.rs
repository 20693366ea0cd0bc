//! Insertion Policy Vector (IPV) schedule.
//!
//! A fixed cyclic pattern decides where each filled line enters its set.
//! The first `mru_count` slots of a `quantum`-long pattern insert at MRU,
//! the remaining slots insert near LRU. One cursor walks the pattern for
//! every fill regardless of set, so the MRU share holds across the whole
//! cache rather than within any single set.
//!
//! The schedule is deterministic, which keeps replayed traces identical from
//! run to run.

use std::fmt;

/// Where a filled line enters the recency order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Insertion {
    /// Insert at the most recently used rank.
    Mru,
    /// Insert at rank `0`, just ahead of eviction.
    NearLru,
}

impl fmt::Display for Insertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mru => write!(f, "MRU"),
            Self::NearLru => write!(f, "near-LRU"),
        }
    }
}

/// The cyclic insertion pattern and its shared cursor.
///
/// Only the period and the MRU slot count are stored; slot `i` inserts at MRU
/// exactly when `i < mru_count`.
#[derive(Debug, Clone)]
pub struct InsertionSchedule {
    quantum: u64,
    mru_count: u64,
    cursor: u64,
}

impl InsertionSchedule {
    /// Builds the pattern for a period of `quantum` fills.
    ///
    /// `quantum` is clamped up to 1 and the MRU slot count is clamped into
    /// `0..=quantum`, so every input yields a usable schedule.
    pub fn new(quantum: i64, mru_pct: i64) -> Self {
        Self {
            quantum: quantum.max(1) as u64,
            mru_count: mru_count(quantum, mru_pct) as u64,
            cursor: 0,
        }
    }

    /// Consumes the slot under the cursor and advances it circularly.
    pub const fn next_insertion(&mut self) -> Insertion {
        let insertion = self.slot(self.cursor);
        self.cursor = (self.cursor + 1) % self.quantum;
        insertion
    }

    /// Rule applied by slot `index` of the period.
    pub const fn slot(&self, index: u64) -> Insertion {
        if index < self.mru_count {
            Insertion::Mru
        } else {
            Insertion::NearLru
        }
    }

    /// The full pattern, in schedule order.
    pub fn pattern(&self) -> impl Iterator<Item = Insertion> + '_ {
        (0..self.quantum).map(move |index| self.slot(index))
    }

    /// Period of the schedule.
    pub const fn quantum(&self) -> u64 {
        self.quantum
    }

    /// MRU slots at the start of each period.
    pub const fn mru_slots(&self) -> u64 {
        self.mru_count
    }

    /// Index of the slot the next fill will consume.
    pub const fn cursor(&self) -> u64 {
        self.cursor
    }
}

/// Number of MRU slots per period: `clamp(quantum * mru_pct / 100, 0, quantum)`.
///
/// The division truncates toward zero. `quantum` is clamped up to 1 first.
/// The product is taken in 128 bits so large periods stay exact.
pub fn mru_count(quantum: i64, mru_pct: i64) -> i64 {
    let quantum = quantum.max(1);
    let count = (i128::from(quantum) * i128::from(mru_pct) / 100).clamp(0, i128::from(quantum));
    count as i64
}
