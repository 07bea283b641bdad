//! Epochal Conversion Engine - bidirectional timestamp/date synchronization
//!
//! This crate implements the conversion engine:
//! - Canonical instant ownership and wholesale state replacement
//! - Numeric field parse/render in seconds, milliseconds, or nanoseconds
//! - Local datetime field parse/render at second resolution
//! - Readable and copy projections (copy keeps full nanosecond precision)
//! - Collaborator seams: wall clock, calendar, readable formatter, clipboard
//! - Effects-as-data for the surrounding shell (clipboard writes, advisory
//!   auto-clear timers)

pub mod calendar;
pub mod clipboard;
pub mod clock;
pub mod engine;
pub mod render;

pub use calendar::*;
pub use clipboard::*;
pub use clock::*;
pub use engine::*;
pub use render::*;
