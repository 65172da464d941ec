//! Hand tracking input
//!
//! Landmark types plus the seam to the external pose estimator.

pub mod landmarks;
pub mod source;

pub use landmarks::{index, HandLandmarks, Landmark, LandmarkFrame, LANDMARK_COUNT};
pub use source::{JsonLinesSource, LandmarkSource, ScriptedSource};
