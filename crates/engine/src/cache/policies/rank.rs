//! Rank update rules.
//!
//! Both rules run in O(W) and keep a dense permutation dense, so no sort is
//! needed after an update. If the input is not dense (a near-LRU insert
//! since the last selection pass leaves a gap) the output is not either; the
//! next selection pass normalizes it.

use super::age_table::current_mru;

/// Promotes `way` to the most recently used rank.
///
/// Every other way ranked above the target's old rank moves down by one,
/// closing the gap, and the target takes the current maximum.
///
/// # Returns
///
/// The target's new rank.
pub fn promote_to_mru(ages: &mut [u64], way: usize) -> u64 {
    let old = ages[way];
    let mru = current_mru(ages);
    for (i, age) in ages.iter_mut().enumerate() {
        if i != way && *age > old {
            *age -= 1;
        }
    }
    ages[way] = mru;
    mru
}

/// Inserts `way` at the least recently used rank.
///
/// Every other way moves up by one to make room at the bottom.
///
/// # Returns
///
/// The target's new rank, always `0`.
pub fn insert_near_lru(ages: &mut [u64], way: usize) -> u64 {
    for (i, age) in ages.iter_mut().enumerate() {
        if i != way {
            *age += 1;
        }
    }
    ages[way] = 0;
    0
}
