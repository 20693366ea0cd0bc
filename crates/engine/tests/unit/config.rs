//! Configuration Tests.
//!
//! Defaults, partial JSON documents, the tie-break enum, and loading from disk.

use ipvsim_core::common::ConfigError;
use ipvsim_core::config::{CacheConfig, Config, IpvConfig, TieBreak};
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

#[test]
fn defaults() {
    let config = Config::default();
    assert_eq!(config.cache.size_bytes, 4096);
    assert_eq!(config.cache.line_bytes, 64);
    assert_eq!(config.cache.ways, 4);
    assert_eq!(config.cache.latency, 1);

    let policy = IpvConfig::default();
    assert_eq!(policy.num_ways, 4);
    assert_eq!(policy.mru_pct, 50);
    assert_eq!(policy.quantum, 4);
    assert_eq!(policy.num_sets, None);
    assert_eq!(policy.tie_break, TieBreak::Last);
    assert_eq!(policy.sparse_warn_sets, 65_536);
}

/// An empty document is the default configuration.
#[test]
fn empty_json_uses_defaults() {
    let config = Config::from_json("{}").unwrap();
    assert_eq!(config.cache.size_bytes, CacheConfig::default().size_bytes);
    assert_eq!(config.policy.quantum, IpvConfig::default().quantum);
}

/// Omitted fields inside a section keep their defaults.
#[test]
fn partial_sections_fill_in_defaults() {
    let config = Config::from_json(r#"{ "cache": { "ways": 16 }, "policy": { "mru_pct": 10 } }"#)
        .unwrap();
    assert_eq!(config.cache.ways, 16);
    assert_eq!(config.cache.line_bytes, 64);
    assert_eq!(config.policy.mru_pct, 10);
    assert_eq!(config.policy.quantum, 4);
    assert_eq!(config.policy.tie_break, TieBreak::Last);
}

/// Out-of-range schedule values are accepted here and clamped by the policy.
#[test]
fn signed_policy_fields_accept_negatives() {
    let config =
        Config::from_json(r#"{ "policy": { "num_ways": -2, "mru_pct": -5, "quantum": 0 } }"#)
            .unwrap();
    assert_eq!(config.policy.num_ways, -2);
    assert_eq!(config.policy.mru_pct, -5);
    assert_eq!(config.policy.quantum, 0);
}

#[test]
fn tie_break_and_dense_storage() {
    let config =
        Config::from_json(r#"{ "policy": { "tie_break": "First", "num_sets": 256 } }"#).unwrap();
    assert_eq!(config.policy.tie_break, TieBreak::First);
    assert_eq!(config.policy.num_sets, Some(256));
}

#[test]
fn unknown_tie_break_is_rejected() {
    let err = Config::from_json(r#"{ "policy": { "tie_break": "Random" } }"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
    assert!(err.to_string().starts_with("invalid configuration:"));
}

#[test]
fn malformed_json_is_rejected() {
    assert!(matches!(
        Config::from_json("{ cache: "),
        Err(ConfigError::Json(_))
    ));
    assert!(matches!(
        Config::from_json(r#"{ "cache": { "ways": -1 } }"#),
        Err(ConfigError::Json(_))
    ));
}

#[test]
fn from_file_reads_json() {
    let mut file = NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{ "cache": {{ "size_bytes": 8192, "latency": 4 }}, "policy": {{ "quantum": 8 }} }}"#
    )
    .unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.cache.size_bytes, 8192);
    assert_eq!(config.cache.latency, 4);
    assert_eq!(config.policy.quantum, 8);
}

#[test]
fn from_file_missing_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = Config::from_file(dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
    assert!(err.to_string().starts_with("failed to read configuration:"));
}
