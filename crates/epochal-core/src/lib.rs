//! Epochal Core - Fundamental types for the timestamp conversion engine
//!
//! This crate defines the types shared across the engine:
//! - The canonical `Instant` (epoch milliseconds plus a sub-millisecond
//!   nanosecond remainder)
//! - The active rendering `Precision`
//! - `LocalFields` calendar decomposition
//! - The conversion error taxonomy

pub mod error;
pub mod fields;
pub mod instant;

pub use error::*;
pub use fields::*;
pub use instant::*;
