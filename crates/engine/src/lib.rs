//! LRU-IPV cache replacement engine.
//!
//! This crate implements LRU replacement with an Insertion Policy Vector for
//! set-associative caches:
//! 1. **Policy:** Per-set age vectors, O(W) rank updates, a deterministic
//!    MRU / near-LRU insertion schedule, and victim selection.
//! 2. **Cache:** A reference set-associative cache that drives the policy's
//!    calling protocol.
//! 3. **Simulation:** Trace parsing and replay.
//! 4. **Support:** Configuration, statistics and error types.
//!
//! # Examples
//!
//! ```
//! use ipvsim_core::{CacheSim, Config};
//!
//! let mut cache = CacheSim::new(&Config::default()).unwrap();
//! let (hit, _) = cache.access(0x1000, false, 10).unwrap();
//! assert!(!hit);
//! let (hit, _) = cache.access(0x1000, false, 10).unwrap();
//! assert!(hit);
//! ```

/// Reference cache model and the replacement policy.
pub mod cache;
/// Common types (errors, record placement).
pub mod common;
/// Configuration structures and defaults.
pub mod config;
/// Trace parsing and replay.
pub mod sim;
/// Policy and cache statistics.
pub mod stats;

/// Reference cache model; construct with `CacheSim::new`.
pub use crate::cache::CacheSim;
/// The LRU-IPV policy and its host-facing traits.
pub use crate::cache::policies::{
    IpvEntry, LruIpvPolicy, ReplaceableEntry, ReplacementPolicy,
};
/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
