//! Common types shared across the engine, the cache model and the trace tools.
//!
//! This module provides:
//! 1. **Error Handling:** Policy, trace and configuration error types.
//! 2. **Placement:** The `(set, way)` coordinates a selection pass stamps onto records.

/// Error types for the policy, trace reader and configuration loader.
pub mod error;

/// Set/way coordinates of a replacement record.
pub mod placement;

pub use error::{ConfigError, PolicyError, TraceError};
pub use placement::Placement;
