//! Gesture engine
//!
//! Turns one landmark frame into pointer commands. All per-session state
//! lives in [`SessionState`], which the caller owns and lends to
//! [`GestureEngine::step`] once per frame; the engine itself only holds
//! configuration and never blocks.
//!
//! Motion follows exactly one policy per frame:
//!
//! ```text
//!            fist held for N frames
//!   ┌──────┐ ───────────────────────▶ ┌──────┐
//!   │ Move │                          │ Drag │
//!   └──────┘ ◀─────────────────────── └──────┘
//!             open hand, or hand lost
//! ```
//!
//! Clicks and scrolling are edge-triggered on top of `Move` and are
//! suppressed while `Drag` is active.

use super::calibration::{AdaptiveCalibration, CalibrationConfig, ScreenSize};
use super::detectors::{ClickConfig, ClickDebouncer, ScrollConfig, ScrollTracker};
use super::posture::{Posture, PostureConfig};
use super::stabilizer::{AnchorStabilizer, StabilizerConfig};
use crate::pointer::PointerCommand;
use crate::time::Timestamp;
use crate::tracking::{HandLandmarks, LandmarkFrame};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Move-mode cursor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CursorConfig {
    /// Exponential smoothing factor toward the target
    pub smoothing: f64,
    /// Per-axis step (px) below which no move is issued
    pub deadzone_px: f64,
    /// Only steer while index and middle tips are held together
    pub require_close_fingers: bool,
    /// Maximum index/middle tip gap (normalized) when the above is set
    pub max_finger_gap: f32,
}

impl Default for CursorConfig {
    fn default() -> Self {
        Self {
            smoothing: 0.12,
            deadzone_px: 6.0,
            require_close_fingers: true,
            max_finger_gap: 0.035,
        }
    }
}

/// Drag settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DragConfig {
    /// Consecutive fist frames before the button goes down
    pub entry_frames: u32,
    /// Fraction of the anchor displacement followed per frame
    pub follow_fraction: f64,
    /// Per-axis cap on a single drag step (px)
    pub max_step_px: f64,
    /// Normalized displacement treated as noise while dragging
    pub jump_threshold: f64,
    /// Pause between the snap and the button press (ms)
    pub settle_ms: u64,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            entry_frames: 6,
            follow_fraction: 0.03,
            max_step_px: 2.0,
            jump_threshold: 0.06,
            settle_ms: 30,
        }
    }
}

/// Everything the engine is tuned by.
#[derive(Debug, Clone, Default)]
pub struct GestureConfig {
    pub posture: PostureConfig,
    pub calibration: CalibrationConfig,
    pub stabilizer: StabilizerConfig,
    pub cursor: CursorConfig,
    pub click: ClickConfig,
    pub drag: DragConfig,
    pub scroll: ScrollConfig,
}

/// Active motion policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MotionMode {
    /// Cursor eases toward the calibrated target
    Move,
    /// Button held; cursor creeps from `lock` toward the stabilized anchor
    Drag { lock: (f64, f64) },
}

impl MotionMode {
    pub fn is_drag(&self) -> bool {
        matches!(self, MotionMode::Drag { .. })
    }
}

/// Gesture recognized during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GestureEvent {
    LeftClick,
    RightClick,
    Scroll(i32),
    DragStart,
    Drop,
    /// Drag ended because tracking was lost or the session stopped
    DragReleased,
}

impl GestureEvent {
    pub fn label(&self) -> &'static str {
        match self {
            GestureEvent::LeftClick => "LEFT CLICK",
            GestureEvent::RightClick => "RIGHT CLICK",
            GestureEvent::Scroll(_) => "SCROLL",
            GestureEvent::DragStart => "DRAG START",
            GestureEvent::Drop => "DROP",
            GestureEvent::DragReleased => "DRAG RELEASED",
        }
    }
}

/// Mutable state carried from frame to frame.
#[derive(Debug, Clone)]
pub struct SessionState {
    /// Smoothed cursor position (px)
    pub cursor: (f64, f64),
    pub mode: MotionMode,
    /// Consecutive fist frames seen while in `Move`
    pub drag_frames: u32,
    pub left_click: ClickDebouncer,
    pub right_click: ClickDebouncer,
    pub scroll: ScrollTracker,
    pub calibration: AdaptiveCalibration,
    pub stabilizer: AnchorStabilizer,
}

impl SessionState {
    pub fn new(config: &GestureConfig, screen: ScreenSize) -> Self {
        Self {
            cursor: screen.center(),
            mode: MotionMode::Move,
            drag_frames: 0,
            left_click: ClickDebouncer::left(&config.click),
            right_click: ClickDebouncer::right(&config.click),
            scroll: ScrollTracker::new(),
            calibration: AdaptiveCalibration::new(&config.calibration),
            stabilizer: AnchorStabilizer::new(&config.stabilizer),
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.mode.is_drag()
    }
}

/// Commands and diagnostics produced by one step.
#[derive(Debug, Clone, Default)]
pub struct FrameOutput {
    /// Commands in issue order
    pub commands: Vec<PointerCommand>,
    pub gestures: Vec<GestureEvent>,
    /// `None` for frames without a hand
    pub posture: Option<Posture>,
    /// Calibrated screen target (px)
    pub target: Option<(f64, f64)>,
    /// Move-mode steering posture was held
    pub cursor_active: bool,
}

impl FrameOutput {
    fn emit(&mut self, command: PointerCommand) {
        self.commands.push(command);
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn to_px(point: (f64, f64)) -> (i32, i32) {
    (point.0 as i32, point.1 as i32)
}

fn move_to(point: (f64, f64)) -> PointerCommand {
    let (x, y) = to_px(point);
    PointerCommand::MoveTo { x, y }
}

/// Stateless frame processor.
#[derive(Debug, Clone)]
pub struct GestureEngine {
    config: GestureConfig,
    screen: ScreenSize,
}

impl GestureEngine {
    pub fn new(config: GestureConfig, screen: ScreenSize) -> Self {
        Self { config, screen }
    }

    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    pub fn screen(&self) -> ScreenSize {
        self.screen
    }

    /// Fresh state for a new session.
    pub fn new_session(&self) -> SessionState {
        SessionState::new(&self.config, self.screen)
    }

    /// Process one frame.
    pub fn step(
        &self,
        state: &mut SessionState,
        frame: &LandmarkFrame,
        now: Timestamp,
    ) -> FrameOutput {
        match frame {
            LandmarkFrame::Hand(hand) => self.step_hand(state, hand, now),
            LandmarkFrame::NoHand => self.step_no_hand(state),
        }
    }

    /// Release a held button before the session ends.
    pub fn release(&self, state: &mut SessionState) -> FrameOutput {
        let mut out = FrameOutput::default();
        self.force_release(state, &mut out);
        out
    }

    fn force_release(&self, state: &mut SessionState, out: &mut FrameOutput) {
        if state.is_dragging() {
            out.emit(PointerCommand::ButtonUp);
            out.gestures.push(GestureEvent::DragReleased);
            state.mode = MotionMode::Move;
        }
    }

    fn step_no_hand(&self, state: &mut SessionState) -> FrameOutput {
        let mut out = FrameOutput::default();

        state.stabilizer.reset();
        state.scroll.reset();
        state.drag_frames = 0;
        state.left_click.disarm();
        state.right_click.disarm();

        if state.is_dragging() {
            warn!("Hand lost during drag, releasing button");
        }
        self.force_release(state, &mut out);
        out
    }

    fn step_hand(
        &self,
        state: &mut SessionState,
        hand: &HandLandmarks,
        now: Timestamp,
    ) -> FrameOutput {
        let cfg = &self.config;
        let posture = Posture::classify(hand, &cfg.posture);
        let anchor = hand.anchor();

        state.calibration.observe(anchor, &posture);
        let target = state
            .calibration
            .target(anchor, self.screen, &cfg.calibration);
        let stable = state.stabilizer.update(anchor, &cfg.stabilizer);

        trace!(
            "anchor=({:.3},{:.3}) effective=({:.3},{:.3}) jump={:.3} target=({:.0},{:.0})",
            anchor.0,
            anchor.1,
            stable.effective.0,
            stable.effective.1,
            stable.jump,
            target.0,
            target.1
        );

        let mut out = FrameOutput {
            posture: Some(posture),
            target: Some(target),
            ..FrameOutput::default()
        };
        let dragging = state.is_dragging();

        // Motion policy
        match state.mode {
            MotionMode::Drag { lock } => {
                let next = self.follow(lock, stable.effective);
                state.mode = MotionMode::Drag { lock: next };
                state.cursor = next;
                out.emit(move_to(next));
            }
            MotionMode::Move => {
                if self.cursor_allowed(&posture, hand) {
                    out.cursor_active = true;
                    if let Some(next) = self.smooth(state.cursor, target) {
                        state.cursor = next;
                        out.emit(move_to(next));
                    }
                }
            }
        }

        // Clicks
        if state
            .left_click
            .update(posture.left_click_pose() && !dragging, now)
        {
            debug!("Left click at {:?}", to_px(state.cursor));
            out.emit(PointerCommand::Click);
            out.gestures.push(GestureEvent::LeftClick);
        }
        if state
            .right_click
            .update(posture.right_click_pose() && !dragging, now)
        {
            debug!("Right click at {:?}", to_px(state.cursor));
            out.emit(PointerCommand::RightClick);
            out.gestures.push(GestureEvent::RightClick);
        }

        // Scroll
        let scroll_height = (posture.all_up && !dragging).then(|| hand.mean_fingertip_y());
        if let Some(amount) = state.scroll.update(scroll_height, &cfg.scroll) {
            debug!("Scroll by {}", amount);
            out.emit(PointerCommand::ScrollBy { amount });
            out.gestures.push(GestureEvent::Scroll(amount));
        }

        // Drag transitions
        if !dragging {
            if posture.fist {
                state.drag_frames = state.drag_frames.saturating_add(1);
                if state.drag_frames >= cfg.drag.entry_frames {
                    self.start_drag(state, stable.effective, &mut out);
                }
            } else {
                state.drag_frames = 0;
            }
        } else if posture.all_up {
            debug!("Drop at {:?}", to_px(state.cursor));
            out.emit(PointerCommand::ButtonUp);
            out.gestures.push(GestureEvent::Drop);
            state.mode = MotionMode::Move;
        }

        out
    }

    /// Steering posture: index and middle up, ring and pinky down, and
    /// optionally the two tips held together.
    fn cursor_allowed(&self, posture: &Posture, hand: &HandLandmarks) -> bool {
        let cursor = &self.config.cursor;
        posture.pointing()
            && (!cursor.require_close_fingers || hand.index_middle_gap() < cursor.max_finger_gap)
    }

    /// One smoothing step toward `target`, or `None` inside the deadzone.
    fn smooth(&self, pos: (f64, f64), target: (f64, f64)) -> Option<(f64, f64)> {
        let cursor = &self.config.cursor;
        let next = (
            pos.0 + (target.0 - pos.0) * cursor.smoothing,
            pos.1 + (target.1 - pos.1) * cursor.smoothing,
        );
        let moved = (next.0 - pos.0).abs() > cursor.deadzone_px
            || (next.1 - pos.1).abs() > cursor.deadzone_px;
        moved.then_some(next)
    }

    /// One drag step from `lock` toward the stabilized anchor.
    fn follow(&self, lock: (f64, f64), effective: (f32, f32)) -> (f64, f64) {
        let drag = &self.config.drag;
        let raw = self.screen.to_pixels(effective.0, effective.1);
        let dx = raw.0 - lock.0;
        let dy = raw.1 - lock.1;

        let normalized = (dx / f64::from(self.screen.width)).hypot(dy / f64::from(self.screen.height));
        if normalized > drag.jump_threshold {
            trace!("Drag jump {:.3} ignored", normalized);
            return lock;
        }

        let step_x = (dx * drag.follow_fraction).clamp(-drag.max_step_px, drag.max_step_px);
        let step_y = (dy * drag.follow_fraction).clamp(-drag.max_step_px, drag.max_step_px);
        (lock.0 + step_x, lock.1 + step_y)
    }

    fn start_drag(&self, state: &mut SessionState, effective: (f32, f32), out: &mut FrameOutput) {
        let (x, y) = to_px(self.screen.to_pixels(effective.0, effective.1));
        let snap = (f64::from(x), f64::from(y));

        debug!("Drag start at ({}, {})", x, y);
        out.emit(PointerCommand::MoveTo { x, y });
        out.emit(PointerCommand::Settle {
            millis: self.config.drag.settle_ms,
        });
        out.emit(PointerCommand::ButtonDown);
        out.gestures.push(GestureEvent::DragStart);

        state.mode = MotionMode::Drag { lock: snap };
        state.cursor = snap;
        state.drag_frames = 0;
    }
}
