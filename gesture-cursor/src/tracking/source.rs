//! Landmark sources
//!
//! The pose estimator runs outside this crate. It hands detections over as
//! JSON, one object per camera frame:
//!
//! ```text
//! {"hands":[{"handedness":"Right","score":0.93,"landmarks":[{"x":0.41,"y":0.52,"z":-0.01}, ...]}],"error":null}
//! ```

use super::landmarks::{HandLandmarks, Landmark, LandmarkFrame, LANDMARK_COUNT};
use crate::{Error, Result};
use serde::Deserialize;
use std::io::BufRead;
use tracing::{trace, warn};

/// Pull-based supplier of landmark frames.
pub trait LandmarkSource {
    /// Next frame, or `Ok(None)` once the stream is exhausted.
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>>;
}

#[derive(Deserialize, Debug)]
struct LandmarkJson {
    x: f32,
    y: f32,
    #[serde(default)]
    z: f32,
}

#[derive(Deserialize, Debug)]
struct HandJson {
    #[serde(default)]
    handedness: String,
    score: f32,
    landmarks: Vec<LandmarkJson>,
}

#[derive(Deserialize, Debug)]
struct DetectionJson {
    #[serde(default)]
    hands: Vec<HandJson>,
    #[serde(default)]
    error: Option<String>,
}

/// Reads detections as JSON lines from any buffered reader.
pub struct JsonLinesSource<R> {
    reader: R,
    min_confidence: f32,
    mirror_x: bool,
    line: String,
    line_number: usize,
}

impl<R: BufRead> JsonLinesSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            min_confidence: 0.0,
            mirror_x: false,
            line: String::new(),
            line_number: 0,
        }
    }

    /// Ignore hands scored below `threshold`.
    pub fn with_min_confidence(mut self, threshold: f32) -> Self {
        self.min_confidence = threshold.clamp(0.0, 1.0);
        self
    }

    /// Flip x for estimators fed an unmirrored camera image.
    pub fn with_mirror_x(mut self, mirror: bool) -> Self {
        self.mirror_x = mirror;
        self
    }

    fn parse(&self, text: &str) -> Result<LandmarkFrame> {
        let detection: DetectionJson = serde_json::from_str(text).map_err(|e| {
            Error::Source(format!("line {}: invalid detection JSON: {}", self.line_number, e))
        })?;

        if let Some(error) = detection.error {
            warn!("Pose estimator reported error: {}", error);
            return Ok(LandmarkFrame::NoHand);
        }

        for hand in detection.hands {
            if hand.score < self.min_confidence {
                trace!("Skipping hand with score {:.2}", hand.score);
                continue;
            }
            if hand.landmarks.len() != LANDMARK_COUNT {
                warn!(
                    "Expected {} landmarks, got {}",
                    LANDMARK_COUNT,
                    hand.landmarks.len()
                );
                continue;
            }

            let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
            for (slot, lm) in landmarks.iter_mut().zip(&hand.landmarks) {
                *slot = Landmark {
                    x: lm.x,
                    y: lm.y,
                    z: lm.z,
                };
            }

            let hand = HandLandmarks {
                landmarks,
                score: hand.score,
                handedness: hand.handedness,
            };
            let hand = if self.mirror_x { hand.mirrored() } else { hand };
            return Ok(LandmarkFrame::Hand(hand));
        }

        Ok(LandmarkFrame::NoHand)
    }
}

impl<R: BufRead> LandmarkSource for JsonLinesSource<R> {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        loop {
            self.line.clear();
            let read = self.reader.read_line(&mut self.line)?;
            if read == 0 {
                return Ok(None);
            }
            self.line_number += 1;

            let text = self.line.trim();
            if text.is_empty() {
                continue;
            }
            return self.parse(text).map(Some);
        }
    }
}

/// In-memory source that replays a fixed sequence of frames.
pub struct ScriptedSource {
    frames: std::collections::VecDeque<LandmarkFrame>,
}

impl ScriptedSource {
    pub fn new(frames: impl IntoIterator<Item = LandmarkFrame>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for ScriptedSource {
    fn next_frame(&mut self) -> Result<Option<LandmarkFrame>> {
        Ok(self.frames.pop_front())
    }
}
