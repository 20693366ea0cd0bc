//! Error definitions.
//!
//! This module defines the failure modes of the engine and its surroundings. It provides:
//! 1. **Policy Errors:** Fatal construction and selection failures, plus loud
//!    rejection of records the host never let the policy place.
//! 2. **Trace Errors:** Malformed or unreadable access traces.
//! 3. **Config Errors:** Unreadable or malformed JSON configuration.

use std::io;

use thiserror::Error;

/// Failures raised by the replacement policy.
///
/// None of these are recoverable at runtime: each one indicates either an
/// invalid configuration or a host that broke the calling protocol.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    /// The configured associativity is zero or negative.
    #[error("numWays must be > 0 (got {0})")]
    InvalidWays(i64),

    /// `get_victim` was called with an empty candidate list.
    #[error("no candidates to select a victim from")]
    NoCandidates,

    /// `touch` or `reset` was called on a record that no selection pass has placed yet.
    #[error("replacement record has not been placed by a victim selection pass")]
    Unplaced,

    /// A placed record names a way outside the configured associativity.
    #[error("way {way} is out of range for a {ways}-way set")]
    WayOutOfRange {
        /// The offending way index.
        way: u32,
        /// The configured associativity.
        ways: usize,
    },
}

/// Failures raised while reading an access trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// A trace line could not be parsed.
    #[error("trace line {line}: {reason}")]
    Parse {
        /// One-based line number.
        line: usize,
        /// What was wrong with the line.
        reason: String,
    },

    /// The trace file could not be read.
    #[error("failed to read trace: {0}")]
    Io(#[from] io::Error),
}

/// Failures raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration is not valid JSON for [`Config`](crate::config::Config).
    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),

    /// The configuration file could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] io::Error),
}
