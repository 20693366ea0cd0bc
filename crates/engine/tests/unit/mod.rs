//! # Unit Components
//!
//! Fine-grained tests for each part of the engine.


/// Configuration defaults and JSON loading.
pub mod config;
