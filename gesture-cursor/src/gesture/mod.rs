//! Gesture-to-cursor core
//!
//! Per frame: posture classification, then calibration mapping and anchor
//! stabilization side by side, then the move/drag state machine with click
//! and scroll detectors layered on top.
//!
//! ```text
//! landmarks ─▶ posture ─┬─▶ calibration ─▶ target ─┐
//!                       └─▶ stabilizer  ─▶ anchor ─┴─▶ engine ─▶ commands
//! ```

pub mod calibration;
pub mod detectors;
pub mod engine;
pub mod history;
pub mod posture;
pub mod stabilizer;

pub use calibration::{remap_edge, AdaptiveCalibration, CalibrationConfig, ScreenSize, Span};
pub use detectors::{ClickConfig, ClickDebouncer, ScrollConfig, ScrollTracker};
pub use engine::{
    CursorConfig, DragConfig, FrameOutput, GestureConfig, GestureEngine, GestureEvent,
    MotionMode, SessionState,
};
pub use history::BoundedHistory;
pub use posture::{Posture, PostureConfig};
pub use stabilizer::{AnchorStabilizer, StabilizedAnchor, StabilizerConfig};
