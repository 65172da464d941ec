//! Hand landmark types
//!
//! Coordinates follow the 21-point hand landmark convention used by common
//! pose estimators: x and y are normalized to [0, 1] of the image, with y
//! growing downward. The camera image is assumed to be mirrored before
//! estimation, so "up" on screen is "smaller y".

use serde::{Deserialize, Serialize};

/// Hand landmark indices
pub mod index {
    pub const WRIST: usize = 0;
    pub const THUMB_CMC: usize = 1;
    pub const THUMB_MCP: usize = 2;
    pub const THUMB_IP: usize = 3;
    pub const THUMB_TIP: usize = 4;
    pub const INDEX_MCP: usize = 5;
    pub const INDEX_PIP: usize = 6;
    pub const INDEX_DIP: usize = 7;
    pub const INDEX_TIP: usize = 8;
    pub const MIDDLE_MCP: usize = 9;
    pub const MIDDLE_PIP: usize = 10;
    pub const MIDDLE_DIP: usize = 11;
    pub const MIDDLE_TIP: usize = 12;
    pub const RING_MCP: usize = 13;
    pub const RING_PIP: usize = 14;
    pub const RING_DIP: usize = 15;
    pub const RING_TIP: usize = 16;
    pub const PINKY_MCP: usize = 17;
    pub const PINKY_PIP: usize = 18;
    pub const PINKY_DIP: usize = 19;
    pub const PINKY_TIP: usize = 20;

    /// Landmark used as the palm center for fist detection.
    pub const PALM: usize = MIDDLE_MCP;
}

/// Number of landmarks in one hand.
pub const LANDMARK_COUNT: usize = 21;

/// A single landmark in normalized image coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
    /// Depth relative to the wrist. Unused by the gesture core.
    #[serde(default)]
    pub z: f32,
}

impl Landmark {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Planar Euclidean distance to another landmark.
    #[inline]
    pub fn distance(&self, other: &Landmark) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// One detected hand.
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks {
    pub landmarks: [Landmark; LANDMARK_COUNT],
    /// Detection confidence (0.0 to 1.0)
    pub score: f32,
    /// "Left" or "Right" as reported by the estimator
    pub handedness: String,
}

impl HandLandmarks {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self {
            landmarks,
            score: 1.0,
            handedness: String::from("Right"),
        }
    }

    #[inline]
    pub fn get(&self, idx: usize) -> &Landmark {
        &self.landmarks[idx]
    }

    /// Midpoint of the index and middle fingertips.
    pub fn anchor(&self) -> (f32, f32) {
        let it = self.get(index::INDEX_TIP);
        let mt = self.get(index::MIDDLE_TIP);
        ((it.x + mt.x) / 2.0, (it.y + mt.y) / 2.0)
    }

    /// Gap between the index and middle fingertips.
    pub fn index_middle_gap(&self) -> f32 {
        self.get(index::INDEX_TIP).distance(self.get(index::MIDDLE_TIP))
    }

    /// Mean vertical coordinate of the four non-thumb fingertips.
    pub fn mean_fingertip_y(&self) -> f32 {
        let sum: f32 = FINGERTIPS.iter().map(|&i| self.landmarks[i].y).sum();
        sum / FINGERTIPS.len() as f32
    }

    /// Mean distance from the four non-thumb fingertips to the palm.
    pub fn mean_tip_to_palm(&self) -> f32 {
        let palm = self.get(index::PALM);
        let sum: f32 = FINGERTIPS
            .iter()
            .map(|&i| self.landmarks[i].distance(palm))
            .sum();
        sum / FINGERTIPS.len() as f32
    }

    /// Flip horizontally (x -> 1 - x).
    pub fn mirrored(mut self) -> Self {
        for lm in self.landmarks.iter_mut() {
            lm.x = 1.0 - lm.x;
        }
        self
    }
}

const FINGERTIPS: [usize; 4] = [
    index::INDEX_TIP,
    index::MIDDLE_TIP,
    index::RING_TIP,
    index::PINKY_TIP,
];

/// What the pose estimator produced for one camera frame.
#[derive(Debug, Clone, PartialEq)]
pub enum LandmarkFrame {
    Hand(HandLandmarks),
    NoHand,
}

impl LandmarkFrame {
    pub fn hand(&self) -> Option<&HandLandmarks> {
        match self {
            LandmarkFrame::Hand(hand) => Some(hand),
            LandmarkFrame::NoHand => None,
        }
    }

    pub fn has_hand(&self) -> bool {
        matches!(self, LandmarkFrame::Hand(_))
    }
}

impl From<Option<HandLandmarks>> for LandmarkFrame {
    fn from(hand: Option<HandLandmarks>) -> Self {
        hand.map_or(LandmarkFrame::NoHand, LandmarkFrame::Hand)
    }
}
