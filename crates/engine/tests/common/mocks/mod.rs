//! Mock implementations of engine traits.
