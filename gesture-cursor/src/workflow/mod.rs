//! Workflow Module
//!
//! Drives a tracking session end to end: landmark source in, pointer
//! commands out.

pub mod session;

pub use session::{Session, SessionSummary, StopReason};
