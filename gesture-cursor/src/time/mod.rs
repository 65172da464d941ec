//! Frame timing
//!
//! Timestamps are microseconds since the session clock's epoch. The live
//! loop uses [`MonotonicClock`]; replays and tests use [`ManualClock`].

pub mod clock;

pub use clock::{Clock, ManualClock, MonotonicClock, Timestamp};
