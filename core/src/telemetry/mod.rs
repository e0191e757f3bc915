//! telemetry/mod.rs
//! Unified telemetry module: counters, timers, and immutable snapshots.
//!
//! Notes:
//! - Workers keep private counters and merge them on join, no shared atomics.
//! - A snapshot is taken once per run and never mutated afterwards, except to
//!   attach captured output in tests.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
