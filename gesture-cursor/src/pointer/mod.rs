//! Pointer output
//!
//! Abstract pointer commands and the sinks that carry them to the OS
//! injection layer.

pub mod command;
pub mod sink;

pub use command::PointerCommand;
pub use sink::{JsonLinesSink, PointerSink, RecordingSink};
