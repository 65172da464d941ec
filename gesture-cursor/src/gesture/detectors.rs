//! Edge-triggered gesture detectors
//!
//! Clicks and scrolling sit on top of the move/drag motion policy. Each
//! detector owns its own counters; none of them move the cursor.

use crate::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Click debounce settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickConfig {
    /// Consecutive frames the left-click pose must hold
    pub left_frames: u32,
    /// Minimum gap between left clicks (ms)
    pub left_interval_ms: u64,
    /// Consecutive frames the right-click pose must hold
    pub right_frames: u32,
    /// Minimum gap between right clicks (ms)
    pub right_interval_ms: u64,
}

impl Default for ClickConfig {
    fn default() -> Self {
        Self {
            left_frames: 3,
            left_interval_ms: 200,
            right_frames: 3,
            right_interval_ms: 450,
        }
    }
}

/// Scroll settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrollConfig {
    /// Reference-to-current offset (normalized) needed to scroll
    pub min_delta: f32,
    /// Scroll units per normalized unit of offset
    pub sensitivity: f32,
    /// Weight of the old reference when rebasing toward the current value
    pub rebase_keep: f32,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            min_delta: 0.004,
            sensitivity: 300.0,
            rebase_keep: 0.85,
        }
    }
}

/// Fires once a pose has held for N consecutive frames, at most once per
/// interval. The frame counter drops to zero the moment the pose breaks and
/// after every trigger, so a held pose has to build up again.
#[derive(Debug, Clone)]
pub struct ClickDebouncer {
    required_frames: u32,
    interval: Duration,
    consecutive: u32,
    last_fired: Option<Timestamp>,
}

impl ClickDebouncer {
    pub fn new(required_frames: u32, interval: Duration) -> Self {
        Self {
            required_frames,
            interval,
            consecutive: 0,
            last_fired: None,
        }
    }

    pub fn left(config: &ClickConfig) -> Self {
        Self::new(
            config.left_frames,
            Duration::from_millis(config.left_interval_ms),
        )
    }

    pub fn right(config: &ClickConfig) -> Self {
        Self::new(
            config.right_frames,
            Duration::from_millis(config.right_interval_ms),
        )
    }

    /// Feed one frame. Returns true when the click fires.
    pub fn update(&mut self, pose_held: bool, now: Timestamp) -> bool {
        if !pose_held {
            self.consecutive = 0;
            return false;
        }
        self.consecutive = self.consecutive.saturating_add(1);

        let interval_elapsed = self
            .last_fired
            .map_or(true, |last| now.duration_since(last) > self.interval);

        if self.consecutive >= self.required_frames && interval_elapsed {
            self.last_fired = Some(now);
            self.consecutive = 0;
            return true;
        }
        false
    }

    /// Drop the frame counter without forgetting the last trigger time.
    pub fn disarm(&mut self) {
        self.consecutive = 0;
    }

    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }

    pub fn last_fired(&self) -> Option<Timestamp> {
        self.last_fired
    }
}

/// Velocity-like scrolling from the mean fingertip height.
#[derive(Debug, Clone, Default)]
pub struct ScrollTracker {
    reference: Option<f32>,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current mean fingertip y while the open-hand posture holds,
    /// or `None` when it does not. Returns a signed scroll amount
    /// (positive = up) when the hand moved far enough.
    pub fn update(&mut self, mean_y: Option<f32>, config: &ScrollConfig) -> Option<i32> {
        let Some(current) = mean_y else {
            self.reference = None;
            return None;
        };
        let Some(reference) = self.reference else {
            self.reference = Some(current);
            return None;
        };

        let delta = reference - current;
        let amount = if delta.abs() > config.min_delta {
            Some((delta * config.sensitivity).trunc() as i32).filter(|&a| a != 0)
        } else {
            None
        };

        self.reference = Some(reference * config.rebase_keep + current * (1.0 - config.rebase_keep));
        amount
    }

    pub fn reset(&mut self) {
        self.reference = None;
    }

    pub fn reference(&self) -> Option<f32> {
        self.reference
    }
}
