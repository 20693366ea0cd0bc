//! Rank Update Rule Tests.
//!
//! Promote-to-MRU maps a dense permutation to a dense permutation without a
//! sort: the target takes the maximum and the gap it leaves is closed.
//! Insert-near-LRU drops the target to 0 and lifts everyone else, which is
//! dense again once the next selection pass normalizes the set.

use ipvsim_core::cache::policies::age_table::normalize;
use ipvsim_core::cache::policies::rank::{insert_near_lru, promote_to_mru};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn is_dense(ages: &[u64]) -> bool {
    let mut sorted = ages.to_vec();
    sorted.sort_unstable();
    sorted.iter().copied().eq(0..ages.len() as u64)
}

fn perm_and_way() -> impl Strategy<Value = (Vec<u64>, usize)> {
    (1usize..16).prop_flat_map(|n| {
        (
            Just((0..n as u64).collect::<Vec<_>>()).prop_shuffle(),
            0..n,
        )
    })
}

// ══════════════════════════════════════════════════════════
// 1. Promote-to-MRU
// ══════════════════════════════════════════════════════════

/// Promoting the LRU way shifts everything above it down by one.
#[test]
fn promote_lru_way() {
    let mut ages = vec![0, 1, 2, 3];
    assert_eq!(promote_to_mru(&mut ages, 0), 3);
    assert_eq!(ages, vec![3, 0, 1, 2]);
}

/// Promoting a middle way leaves the ranks below it alone.
#[test]
fn promote_middle_way() {
    let mut ages = vec![2, 0, 3, 1];
    assert_eq!(promote_to_mru(&mut ages, 3), 3);
    assert_eq!(ages, vec![1, 0, 2, 3]);
}

/// Promoting the MRU way is a no-op.
#[test]
fn promote_mru_way_is_noop() {
    let mut ages = vec![1, 3, 0, 2];
    assert_eq!(promote_to_mru(&mut ages, 1), 3);
    assert_eq!(ages, vec![1, 3, 0, 2]);
}

/// On a non-dense vector the target still takes the current maximum.
#[test]
fn promote_on_transient_state() {
    let mut ages = vec![4, 0, 2, 3];
    assert_eq!(promote_to_mru(&mut ages, 1), 4);
    assert_eq!(ages, vec![3, 4, 1, 2]);
}

// ══════════════════════════════════════════════════════════
// 2. Insert-near-LRU
// ══════════════════════════════════════════════════════════

#[test]
fn near_lru_insert_lifts_others() {
    let mut ages = vec![3, 0, 1, 2];
    assert_eq!(insert_near_lru(&mut ages, 1), 0);
    assert_eq!(ages, vec![4, 0, 2, 3]);
}

#[test]
fn near_lru_insert_of_mru_way() {
    let mut ages = vec![0, 1, 2, 3];
    assert_eq!(insert_near_lru(&mut ages, 3), 0);
    assert_eq!(ages, vec![1, 2, 3, 0]);
    assert!(is_dense(&ages));
}

#[test]
fn single_way_set() {
    let mut ages = vec![0];
    assert_eq!(promote_to_mru(&mut ages, 0), 0);
    assert_eq!(insert_near_lru(&mut ages, 0), 0);
    assert_eq!(ages, vec![0]);
}

proptest! {
    #[test]
    fn promote_preserves_permutation((mut ages, way) in perm_and_way()) {
        let before = ages.clone();
        let n = ages.len() as u64;
        let rank = promote_to_mru(&mut ages, way);

        prop_assert!(is_dense(&ages));
        prop_assert_eq!(rank, n - 1);
        prop_assert_eq!(ages[way], n - 1);
        for i in (0..ages.len()).filter(|&i| i != way) {
            if before[i] > before[way] {
                prop_assert_eq!(ages[i], before[i] - 1);
            } else {
                prop_assert_eq!(ages[i], before[i]);
            }
        }
    }

    /// Inserting the MRU way near LRU is a pure rotation and stays dense.
    #[test]
    fn near_lru_preserves_permutation_when_target_is_mru((mut ages, way) in perm_and_way()) {
        let n = ages.len() as u64;
        let mru_way = ages.iter().position(|&a| a == n - 1).unwrap();
        ages.swap(way, mru_way);
        let rank = insert_near_lru(&mut ages, way);

        prop_assert!(is_dense(&ages));
        prop_assert_eq!(rank, 0);
        prop_assert_eq!(ages[way], 0);
    }

    /// Everything but the target moves up by exactly one and the target
    /// becomes the unique minimum.
    #[test]
    fn near_lru_makes_target_unique_minimum((mut ages, way) in perm_and_way()) {
        let before = ages.clone();
        let _ = insert_near_lru(&mut ages, way);

        prop_assert_eq!(ages[way], 0);
        for i in (0..ages.len()).filter(|&i| i != way) {
            prop_assert_eq!(ages[i], before[i] + 1);
        }
    }

    /// Any other target leaves a gap at its old rank; the next normalize
    /// closes it and keeps the target at 0.
    #[test]
    fn near_lru_is_dense_after_normalize((mut ages, way) in perm_and_way()) {
        let _ = insert_near_lru(&mut ages, way);
        normalize(&mut ages);

        prop_assert!(is_dense(&ages));
        prop_assert_eq!(ages[way], 0);
    }
}
