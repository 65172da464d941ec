//! Anchor Stabilizer
//!
//! Median filter with jump rejection over the last few raw anchors. Used for
//! drag tracking and the drag-start snap, where a single noisy frame would
//! otherwise teleport the dragged object.

use super::history::BoundedHistory;
use serde::{Deserialize, Serialize};

/// Stabilizer settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StabilizerConfig {
    /// Raw anchors kept for the median
    pub history_len: usize,
    /// Raw-to-median distance treated as tracking noise
    pub jump_threshold: f32,
    /// Consecutive good frames after which the median is preferred
    pub stable_frames_required: u32,
}

impl Default for StabilizerConfig {
    fn default() -> Self {
        Self {
            history_len: 12,
            jump_threshold: 0.06,
            stable_frames_required: 2,
        }
    }
}

/// Result of one stabilizer update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StabilizedAnchor {
    /// Anchor to use this frame
    pub effective: (f32, f32),
    /// Per-axis median of the history
    pub median: (f32, f32),
    /// Distance between the raw anchor and the median
    pub jump: f32,
    /// The raw sample was rejected as noise
    pub rejected: bool,
}

#[derive(Debug, Clone)]
pub struct AnchorStabilizer {
    xs: BoundedHistory<f32>,
    ys: BoundedHistory<f32>,
    stable_frames: u32,
}

impl AnchorStabilizer {
    pub fn new(config: &StabilizerConfig) -> Self {
        Self {
            xs: BoundedHistory::with_capacity(config.history_len),
            ys: BoundedHistory::with_capacity(config.history_len),
            stable_frames: 0,
        }
    }

    pub fn update(&mut self, raw: (f32, f32), config: &StabilizerConfig) -> StabilizedAnchor {
        self.xs.push(raw.0);
        self.ys.push(raw.1);

        // Non-empty after the push above
        let median = (
            self.xs.median().unwrap_or(raw.0),
            self.ys.median().unwrap_or(raw.1),
        );
        let jump = (raw.0 - median.0).hypot(raw.1 - median.1);

        let rejected = jump > config.jump_threshold;
        let mut effective = if rejected {
            self.stable_frames = 0;
            median
        } else {
            self.stable_frames = self.stable_frames.saturating_add(1);
            raw
        };
        if self.stable_frames >= config.stable_frames_required {
            effective = median;
        }

        StabilizedAnchor {
            effective,
            median,
            jump,
            rejected,
        }
    }

    /// Forget all history, e.g. when the hand is lost.
    pub fn reset(&mut self) {
        self.xs.clear();
        self.ys.clear();
        self.stable_frames = 0;
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn stable_frames(&self) -> u32 {
        self.stable_frames
    }
}
