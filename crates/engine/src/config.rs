//! Configuration system for the replacement engine and its reference cache.
//!
//! This module defines all configuration structures used to parameterize the
//! engine. It provides:
//! 1. **Defaults:** Baseline cache geometry and insertion schedule constants.
//! 2. **Structures:** `Config` with a `cache` section (geometry of the reference
//!    host) and a `policy` section (LRU-IPV parameters).
//! 3. **Enums:** Tie-break rule used by victim selection.
//!
//! Configuration is supplied as JSON (`Config::from_json`, `Config::from_file`)
//! or built with `Config::default()`.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::common::ConfigError;

/// Default configuration constants.
///
/// These values apply whenever a field is omitted from the JSON configuration.
mod defaults {
    /// Default cache size in bytes (4 KiB).
    pub const CACHE_SIZE: usize = 4096;

    /// Default cache line size in bytes (64 bytes).
    pub const CACHE_LINE: usize = 64;

    /// Default cache associativity.
    pub const CACHE_WAYS: usize = 4;

    /// Default cache access latency in cycles.
    pub const CACHE_LATENCY: u64 = 1;

    /// Default policy associativity.
    pub const NUM_WAYS: i64 = 4;

    /// Default share of fills inserted at MRU, in percent.
    pub const MRU_PCT: i64 = 50;

    /// Default insertion schedule period.
    pub const QUANTUM: i64 = 4;

    /// Number of distinct sets a sparse age table may track before a warning is logged.
    pub const SPARSE_WARN_SETS: usize = 65_536;
}

/// Rule used to break ties between candidates holding the same minimum age.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum TieBreak {
    /// The last minimum-age candidate in iteration order wins.
    ///
    /// This is the historical behaviour and keeps traces byte-compatible.
    #[default]
    Last,
    /// The first minimum-age candidate in iteration order wins.
    First,
}

/// Root configuration structure.
///
/// # Examples
///
/// ```
/// use ipvsim_core::config::{Config, TieBreak};
///
/// let json = r#"{
///     "cache": { "size_bytes": 8192, "line_bytes": 64, "ways": 8 },
///     "policy": { "mru_pct": 25, "quantum": 8, "tie_break": "First" }
/// }"#;
///
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.cache.ways, 8);
/// assert_eq!(config.policy.quantum, 8);
/// assert_eq!(config.policy.tie_break, TieBreak::First);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Reference cache geometry.
    #[serde(default)]
    pub cache: CacheConfig,
    /// LRU-IPV policy parameters.
    #[serde(default)]
    pub policy: IpvConfig,
}

impl Config {
    /// Parses a configuration from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Json`] if the input is not a valid configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads and parses a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] if the file cannot be read and
    /// [`ConfigError::Json`] if its contents are not a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }
}

/// Geometry of the reference set-associative cache.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Total cache size in bytes
    #[serde(default = "CacheConfig::default_size_bytes")]
    pub size_bytes: usize,

    /// Cache line size in bytes
    #[serde(default = "CacheConfig::default_line_bytes")]
    pub line_bytes: usize,

    /// Associativity (number of ways per set)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Access latency in cycles
    #[serde(default = "CacheConfig::default_latency")]
    pub latency: u64,
}

impl CacheConfig {
    fn default_size_bytes() -> usize {
        defaults::CACHE_SIZE
    }

    fn default_line_bytes() -> usize {
        defaults::CACHE_LINE
    }

    fn default_ways() -> usize {
        defaults::CACHE_WAYS
    }

    fn default_latency() -> u64 {
        defaults::CACHE_LATENCY
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::CACHE_SIZE,
            line_bytes: defaults::CACHE_LINE,
            ways: defaults::CACHE_WAYS,
            latency: defaults::CACHE_LATENCY,
        }
    }
}

/// LRU-IPV policy parameters.
///
/// Integer fields are signed so out-of-range values reach the policy, which
/// either clamps them (`mru_pct`, `quantum`) or rejects them (`num_ways`).
#[derive(Debug, Clone, Deserialize)]
pub struct IpvConfig {
    /// Set associativity; must be positive.
    #[serde(default = "IpvConfig::default_num_ways")]
    pub num_ways: i64,

    /// Percentage (0..=100) of fills within a quantum inserted at MRU.
    #[serde(default = "IpvConfig::default_mru_pct")]
    pub mru_pct: i64,

    /// Insertion schedule period; non-positive values are treated as 1.
    #[serde(default = "IpvConfig::default_quantum")]
    pub quantum: i64,

    /// Number of sets, when known. Selects dense per-set storage.
    #[serde(default)]
    pub num_sets: Option<usize>,

    /// Tie-break rule for victim selection.
    #[serde(default)]
    pub tie_break: TieBreak,

    /// Sparse-table size above which growth is reported.
    #[serde(default = "IpvConfig::default_sparse_warn_sets")]
    pub sparse_warn_sets: usize,
}

impl IpvConfig {
    fn default_num_ways() -> i64 {
        defaults::NUM_WAYS
    }

    fn default_mru_pct() -> i64 {
        defaults::MRU_PCT
    }

    fn default_quantum() -> i64 {
        defaults::QUANTUM
    }

    fn default_sparse_warn_sets() -> usize {
        defaults::SPARSE_WARN_SETS
    }
}

impl Default for IpvConfig {
    fn default() -> Self {
        Self {
            num_ways: defaults::NUM_WAYS,
            mru_pct: defaults::MRU_PCT,
            quantum: defaults::QUANTUM,
            num_sets: None,
            tie_break: TieBreak::Last,
            sparse_warn_sets: defaults::SPARSE_WARN_SETS,
        }
    }
}
