//! Out-of-band control of the running loop.

pub mod queue;

pub use queue::{ControlMessage, ControlQueue, ControlReceiver, ControlSender, ControlStats};
