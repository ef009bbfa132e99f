//! Inbound message handling
//!
//! Validates and truncates user text before it is sent upstream.

pub mod normalizer;

pub use normalizer::{normalize, Normalized};
