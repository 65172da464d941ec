//! Synthetic hands shared by the integration tests.

#![allow(dead_code)]

use gesture_cursor::tracking::{index, HandLandmarks, Landmark, LandmarkFrame, LANDMARK_COUNT};

/// Hand with every fingertip at `anchor.1`; the index and middle tips sit
/// 1/64 either side of `anchor.0`. Extended fingers have their PIP joint
/// below the tip, folded fingers above it and close to the palm.
pub fn hand(anchor: (f32, f32), up: [bool; 4]) -> HandLandmarks {
    let (ax, ay) = anchor;
    let mut lm = [Landmark::new(ax, ay + 0.05); LANDMARK_COUNT];
    lm[index::WRIST] = Landmark::new(ax, ay + 0.3);

    let fingers = [
        (index::INDEX_TIP, index::INDEX_PIP, -1.0 / 64.0),
        (index::MIDDLE_TIP, index::MIDDLE_PIP, 1.0 / 64.0),
        (index::RING_TIP, index::RING_PIP, 3.0 / 64.0),
        (index::PINKY_TIP, index::PINKY_PIP, 5.0 / 64.0),
    ];
    for (finger, &(tip, pip, dx)) in fingers.iter().enumerate() {
        let x = ax + dx;
        lm[tip] = Landmark::new(x, ay);
        lm[pip] = if up[finger] {
            Landmark::new(x, ay + 0.08)
        } else {
            Landmark::new(x, ay - 0.04)
        };
    }
    HandLandmarks::new(lm)
}

pub fn pointing(anchor: (f32, f32)) -> LandmarkFrame {
    LandmarkFrame::Hand(hand(anchor, [true, true, false, false]))
}

pub fn fist(anchor: (f32, f32)) -> LandmarkFrame {
    LandmarkFrame::Hand(hand(anchor, [false; 4]))
}

pub fn open(anchor: (f32, f32)) -> LandmarkFrame {
    LandmarkFrame::Hand(hand(anchor, [true; 4]))
}

/// Index folded, middle extended.
pub fn left_click_pose(anchor: (f32, f32)) -> LandmarkFrame {
    LandmarkFrame::Hand(hand(anchor, [false, true, false, false]))
}

/// Middle folded, index extended.
pub fn right_click_pose(anchor: (f32, f32)) -> LandmarkFrame {
    LandmarkFrame::Hand(hand(anchor, [true, false, false, false]))
}

/// One detection line in the estimator's JSON lines format.
pub fn detection_line(frame: &LandmarkFrame, score: f32) -> String {
    match frame {
        LandmarkFrame::NoHand => r#"{"hands":[]}"#.to_string(),
        LandmarkFrame::Hand(hand) => serde_json::json!({
            "hands": [{
                "handedness": hand.handedness,
                "score": score,
                "landmarks": hand.landmarks,
            }]
        })
        .to_string(),
    }
}
