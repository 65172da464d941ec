//! Control loop
//!
//! Pulls frames from a [`LandmarkSource`], runs them through the
//! [`GestureEngine`] and forwards the resulting commands to a
//! [`PointerSink`]. Control messages are polled between frames, never
//! mid-frame. Whatever ends the loop, a held button is released before it
//! returns.

use crate::control::{ControlMessage, ControlReceiver};
use crate::gesture::{FrameOutput, GestureEngine, GestureEvent, SessionState};
use crate::pointer::PointerSink;
use crate::time::{Clock, Timestamp};
use crate::tracking::{LandmarkFrame, LandmarkSource};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

/// Why the loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    EndOfStream,
    Stopped,
    FrameLimit,
}

/// Totals for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSummary {
    pub frames: u64,
    pub hand_frames: u64,
    /// Frames ignored while processing was disabled
    pub disabled_frames: u64,
    pub commands: u64,
    pub left_clicks: u64,
    pub right_clicks: u64,
    pub scroll_events: u64,
    pub scroll_total: i64,
    pub drags: u64,
    pub drops: u64,
    /// Drags ended by hand loss, disable or shutdown
    pub forced_releases: u64,
    pub stop_reason: StopReason,
}

impl Default for SessionSummary {
    fn default() -> Self {
        Self {
            frames: 0,
            hand_frames: 0,
            disabled_frames: 0,
            commands: 0,
            left_clicks: 0,
            right_clicks: 0,
            scroll_events: 0,
            scroll_total: 0,
            drags: 0,
            drops: 0,
            forced_releases: 0,
            stop_reason: StopReason::EndOfStream,
        }
    }
}

impl SessionSummary {
    fn record(&mut self, out: &FrameOutput) {
        self.commands += out.commands.len() as u64;
        for gesture in &out.gestures {
            match gesture {
                GestureEvent::LeftClick => self.left_clicks += 1,
                GestureEvent::RightClick => self.right_clicks += 1,
                GestureEvent::Scroll(amount) => {
                    self.scroll_events += 1;
                    self.scroll_total += i64::from(*amount);
                }
                GestureEvent::DragStart => self.drags += 1,
                GestureEvent::Drop => self.drops += 1,
                GestureEvent::DragReleased => self.forced_releases += 1,
            }
        }
    }
}

/// One tracking session: engine, state and the three I/O seams.
pub struct Session<S, P, C> {
    engine: GestureEngine,
    state: SessionState,
    source: S,
    sink: P,
    clock: C,
    control: Option<ControlReceiver>,
    enabled: bool,
    max_frames: Option<u64>,
    last_frame: Option<Timestamp>,
    summary: SessionSummary,
}

impl<S, P, C> Session<S, P, C>
where
    S: LandmarkSource,
    P: PointerSink,
    C: Clock,
{
    pub fn new(engine: GestureEngine, source: S, sink: P, clock: C) -> Self {
        let state = engine.new_session();
        Self {
            engine,
            state,
            source,
            sink,
            clock,
            control: None,
            enabled: true,
            max_frames: None,
            last_frame: None,
            summary: SessionSummary::default(),
        }
    }

    pub fn with_control(mut self, control: ControlReceiver) -> Self {
        self.control = Some(control);
        self
    }

    pub fn with_max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn summary(&self) -> &SessionSummary {
        &self.summary
    }

    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn into_sink(self) -> P {
        self.sink
    }

    /// Run until the source ends, a stop is requested or the frame limit
    /// is reached.
    pub fn run(&mut self) -> Result<SessionSummary> {
        info!(
            "Session started ({}x{})",
            self.engine.screen().width,
            self.engine.screen().height
        );

        let reason = loop {
            if self.poll_control() {
                break StopReason::Stopped;
            }
            if let Some(limit) = self.max_frames {
                if self.summary.frames >= limit {
                    break StopReason::FrameLimit;
                }
            }

            let frame = match self.source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break StopReason::EndOfStream,
                Err(e) => {
                    warn!("Landmark source failed: {}", e);
                    return Err(self.abort(e));
                }
            };

            if let Err(e) = self.process(&frame) {
                warn!("Frame dispatch failed: {}", e);
                return Err(self.abort(e));
            }
        };

        self.shutdown()?;
        self.summary.stop_reason = reason;
        info!(
            "Session ended ({:?}): {} frames, {} commands, last frame at {:.2}s",
            reason,
            self.summary.frames,
            self.summary.commands,
            self.last_frame.unwrap_or_default().as_secs_f64()
        );
        Ok(self.summary.clone())
    }

    /// Process a single frame.
    pub fn process(&mut self, frame: &LandmarkFrame) -> Result<()> {
        self.summary.frames += 1;

            if frame.has_hand() {
                self.summary.hand_frames += 1;
            }
        let now = self.clock.now();
        self.last_frame = Some(now);

        let out = if self.enabled {
            if frame.has_hand() {
                self.summary.hand_frames += 1;
            }
            self.engine.step(&mut self.state, frame, now)
        } else {
            self.summary.disabled_frames += 1;
            self.engine.step(&mut self.state, &LandmarkFrame::NoHand, now)
        };

        for gesture in &out.gestures {
            debug!("Gesture: {}", gesture.label());
        }
        self.dispatch(&out)
    }

    /// Apply queued control messages. Returns true when a stop is pending.
    fn poll_control(&mut self) -> bool {
        let Some(control) = self.control.as_mut() else {
            return false;
        };

        for message in control.drain() {
            match message {
                ControlMessage::Enable => {
                    if !self.enabled {
                        info!("Gesture processing enabled");
                    }
                    self.enabled = true;
                }
                ControlMessage::Disable => {
                    if self.enabled {
                        info!("Gesture processing disabled");
                    }
                    self.enabled = false;
                }
                ControlMessage::Stop => {}
            }
        }
        control.stop_requested()
    }

    fn dispatch(&mut self, out: &FrameOutput) -> Result<()> {
        self.summary.record(out);
        if out.is_empty() {
            return Ok(());
        }
        for command in &out.commands {
            if command.is_button() {
                debug!("Dispatching {}", command.name());
            } else {
                trace!("Dispatching {}", command.name());
            }
            self.sink.dispatch(command)?;
        }
        self.sink.flush()
    }

    /// Release any held button after a failure, keeping the original error.
    /// The engine leaves drag mode even if the release cannot be delivered.
    fn abort(&mut self, err: Error) -> Error {
        if let Err(release_err) = self.shutdown() {
            warn!("Release after failure failed: {}", release_err);
        }
        err
    }

    fn shutdown(&mut self) -> Result<()> {
        let out = self.engine.release(&mut self.state);
        if !out.is_empty() {
            info!("Releasing held button on shutdown");
        }
        self.dispatch(&out)
    }
}
