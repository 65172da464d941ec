//! # Gesture Cursor
//!
//! Hand-gesture pointer control: turns per-frame hand landmark detections
//! into cursor moves, clicks, drags and scrolls.
//!
//! ## Quick Start
//!
//! ```no_run
//! use gesture_cursor::gesture::{GestureConfig, GestureEngine, ScreenSize};
//! use gesture_cursor::pointer::JsonLinesSink;
//! use gesture_cursor::time::MonotonicClock;
//! use gesture_cursor::tracking::JsonLinesSource;
//! use gesture_cursor::workflow::Session;
//!
//! let engine = GestureEngine::new(GestureConfig::default(), ScreenSize::default());
//! let source = JsonLinesSource::new(std::io::stdin().lock()).with_min_confidence(0.72);
//! let sink = JsonLinesSink::new(std::io::stdout());
//!
//! let summary = Session::new(engine, source, sink, MonotonicClock::new())
//!     .run()
//!     .expect("session failed");
//! eprintln!("{} frames, {} commands", summary.frames, summary.commands);
//! ```
//!
//! ## Architecture
//!
//! - [`tracking`]: Hand landmarks and the landmark source seam
//! - [`gesture`]: Posture, calibration, stabilization and the gesture state machine
//! - [`pointer`]: Pointer commands and the injection sink seam
//! - [`control`]: Lock-free control queue (enable, disable, stop)
//! - [`workflow`]: The per-frame control loop
//! - [`time`]: Timestamps and injectable clocks
//! - [`app`]: CLI and configuration management
//!
//! ## Frame Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Landmark   │───▶│   Posture   │───▶│ Calibration │───▶│ Stabilizer  │
//! │   Source    │    │ Classifier  │    │   Mapper    │    │             │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//!                                                                 │
//!                                                                 ▼
//!                    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//!                    │   Pointer   │◀───│   Session   │◀───│   Gesture   │
//!                    │    Sink     │    │    Loop     │    │   Engine    │
//!                    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod time;
pub mod tracking;
pub mod gesture;
pub mod pointer;
pub mod control;
pub mod app;
pub mod workflow;

// Re-export commonly used types
pub use gesture::{GestureConfig, GestureEngine, GestureEvent, ScreenSize, SessionState};
pub use pointer::{PointerCommand, PointerSink};
pub use tracking::{HandLandmarks, LandmarkFrame, LandmarkSource};
pub use workflow::{Session, SessionSummary};

/// Result type alias for gesture cursor operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for gesture cursor operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Landmark source error: {0}")]
    Source(String),

    #[error("Pointer sink error: {0}")]
    Sink(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
