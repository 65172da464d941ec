//! Finger posture classification
//!
//! A finger counts as extended when its tip is strictly above its PIP joint
//! in image space (tip.y < pip.y) and folded when strictly below
//! (tip.y > pip.y). This assumes a mirrored, upright camera image; a tip
//! level with its joint is neither.

use crate::tracking::{index, HandLandmarks};
use serde::{Deserialize, Serialize};

/// Posture classifier settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PostureConfig {
    /// Mean tip-to-palm distance below which a folded hand is a fist
    pub fist_palm_distance: f32,
}

impl Default for PostureConfig {
    fn default() -> Self {
        Self {
            fist_palm_distance: 0.11,
        }
    }
}

/// Per-frame finger classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Posture {
    pub index_up: bool,
    pub middle_up: bool,
    pub ring_up: bool,
    pub pinky_up: bool,
    pub ring_down: bool,
    pub pinky_down: bool,
    /// All four fingers extended (open hand)
    pub all_up: bool,
    /// Index and middle not extended, ring and pinky folded
    pub all_down: bool,
    /// `all_down` with fingertips gathered around the palm
    pub fist: bool,
}

fn extended(hand: &HandLandmarks, tip: usize, pip: usize) -> bool {
    hand.get(tip).y < hand.get(pip).y
}

fn folded(hand: &HandLandmarks, tip: usize, pip: usize) -> bool {
    hand.get(tip).y > hand.get(pip).y
}

impl Posture {
    pub fn classify(hand: &HandLandmarks, config: &PostureConfig) -> Self {
        let index_up = extended(hand, index::INDEX_TIP, index::INDEX_PIP);
        let middle_up = extended(hand, index::MIDDLE_TIP, index::MIDDLE_PIP);
        let ring_up = extended(hand, index::RING_TIP, index::RING_PIP);
        let pinky_up = extended(hand, index::PINKY_TIP, index::PINKY_PIP);
        let ring_down = folded(hand, index::RING_TIP, index::RING_PIP);
        let pinky_down = folded(hand, index::PINKY_TIP, index::PINKY_PIP);

        let all_up = index_up && middle_up && ring_up && pinky_up;
        let all_down = !index_up && !middle_up && ring_down && pinky_down;
        let fist = all_down && hand.mean_tip_to_palm() < config.fist_palm_distance;

        Self {
            index_up,
            middle_up,
            ring_up,
            pinky_up,
            ring_down,
            pinky_down,
            all_up,
            all_down,
            fist,
        }
    }

    /// Index and middle both extended; gates calibration sampling.
    pub fn two_fingers_up(&self) -> bool {
        self.index_up && self.middle_up
    }

    /// Index and middle extended with ring and pinky folded.
    pub fn pointing(&self) -> bool {
        self.two_fingers_up() && self.ring_down && self.pinky_down
    }

    /// Index folded while middle stays extended.
    pub fn left_click_pose(&self) -> bool {
        !self.index_up && self.middle_up
    }

    /// Middle folded while index stays extended.
    pub fn right_click_pose(&self) -> bool {
        !self.middle_up && self.index_up
    }
}
