//! Adaptive Calibration Mapper
//!
//! Users rarely sweep their hand across the whole camera frame. This module
//! learns the range the anchor actually covers from a rolling history and
//! stretches that range over the screen, with a mild signed-power remap so
//! that motion near the calibrated extremes reaches the screen edges.
//!
//! Samples are only taken while index and middle are both extended, so
//! click and drag postures never drag the calibrated box around.

use super::history::BoundedHistory;
use super::posture::Posture;
use serde::{Deserialize, Serialize};

/// Screen dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenSize {
    pub width: u32,
    pub height: u32,
}

impl ScreenSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }

    /// Normalized fraction to pixels.
    pub fn to_pixels(&self, fx: f32, fy: f32) -> (f64, f64) {
        (
            f64::from(fx) * f64::from(self.width),
            f64::from(fy) * f64::from(self.height),
        )
    }
}

impl Default for ScreenSize {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

/// Calibration settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Anchor samples kept per axis
    pub history_len: usize,
    /// Samples required before the learned span replaces the default
    pub min_samples: usize,
    /// Lower percentile of the learned span
    pub low_percentile: f32,
    /// Upper percentile of the learned span
    pub high_percentile: f32,
    /// Outward margin added to each learned bound (clamped to [0, 1])
    pub expand_margin: f32,
    /// Spans narrower than this are widened
    pub min_span: f32,
    /// Amount each bound moves outward when widening
    pub widen_by: f32,
    /// Span used until enough samples exist
    pub default_low: f32,
    pub default_high: f32,
    /// Exponent of the signed-power edge remap
    pub edge_power: f32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            history_len: 450,
            min_samples: 16,
            low_percentile: 4.0,
            high_percentile: 96.0,
            expand_margin: 0.90,
            min_span: 0.02,
            widen_by: 0.05,
            default_low: 0.15,
            default_high: 0.85,
            edge_power: 1.03,
        }
    }
}

/// Calibrated range along one axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Span {
    pub lo: f32,
    pub hi: f32,
}

impl Span {
    pub const fn new(lo: f32, hi: f32) -> Self {
        Self { lo, hi }
    }

    pub fn width(&self) -> f32 {
        self.hi - self.lo
    }
}

/// Map `v` into [0, 1] against `span`, exaggerating motion near the ends.
///
/// The position is normalized and clamped to t in [0, 1], recentered to
/// [-1, 1], raised to `power` keeping its sign, then scaled back. A
/// zero-width span maps everything to the midpoint.
pub fn remap_edge(v: f32, span: Span, power: f32) -> f32 {
    let t = if span.width() == 0.0 {
        0.5
    } else {
        (v - span.lo) / span.width()
    };
    let t = t.clamp(0.0, 1.0);
    let centered = 2.0 * (t - 0.5);
    let curved = if centered == 0.0 {
        0.0
    } else {
        centered.signum() * centered.abs().powf(power)
    };
    (curved + 1.0) / 2.0
}

/// Rolling per-axis anchor history.
#[derive(Debug, Clone)]
pub struct AdaptiveCalibration {
    xs: BoundedHistory<f32>,
    ys: BoundedHistory<f32>,
}

impl AdaptiveCalibration {
    pub fn new(config: &CalibrationConfig) -> Self {
        Self {
            xs: BoundedHistory::with_capacity(config.history_len),
            ys: BoundedHistory::with_capacity(config.history_len),
        }
    }

    /// Record the anchor if the posture qualifies. Returns whether it did.
    pub fn observe(&mut self, anchor: (f32, f32), posture: &Posture) -> bool {
        if !posture.two_fingers_up() {
            return false;
        }
        self.xs.push(anchor.0);
        self.ys.push(anchor.1);
        true
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    /// Whether the learned span is in use.
    pub fn is_calibrated(&self, config: &CalibrationConfig) -> bool {
        self.xs.len() >= config.min_samples
    }

    /// Current (x, y) spans.
    pub fn spans(&self, config: &CalibrationConfig) -> (Span, Span) {
        if !self.is_calibrated(config) {
            let fallback = Span::new(config.default_low, config.default_high);
            return (fallback, fallback);
        }
        (
            learned_span(&self.xs, config),
            learned_span(&self.ys, config),
        )
    }

    /// Anchor as a screen fraction in [0, 1] x [0, 1].
    pub fn map(&self, anchor: (f32, f32), config: &CalibrationConfig) -> (f32, f32) {
        let (span_x, span_y) = self.spans(config);
        (
            remap_edge(anchor.0, span_x, config.edge_power),
            remap_edge(anchor.1, span_y, config.edge_power),
        )
    }

    /// Anchor as a screen-space target in pixels.
    pub fn target(
        &self,
        anchor: (f32, f32),
        screen: ScreenSize,
        config: &CalibrationConfig,
    ) -> (f64, f64) {
        let (fx, fy) = self.map(anchor, config);
        screen.to_pixels(fx, fy)
    }
}

fn learned_span(history: &BoundedHistory<f32>, config: &CalibrationConfig) -> Span {
    let (Some(lo), Some(hi)) = (
        history.percentile(config.low_percentile),
        history.percentile(config.high_percentile),
    ) else {
        return Span::new(config.default_low, config.default_high);
    };

    let mut lo = (lo - config.expand_margin).max(0.0);
    let mut hi = (hi + config.expand_margin).min(1.0);

    if hi - lo < config.min_span {
        lo = (lo - config.widen_by).max(0.0);
        hi = (hi + config.widen_by).min(1.0);
    }
    Span::new(lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    const P: f32 = 1.03;

    fn two_up() -> Posture {
        Posture {
            index_up: true,
            middle_up: true,
            ..Posture::default()
        }
    }

    #[test]
    fn test_remap_endpoints_and_midpoint() {
        let span = Span::new(0.25, 0.75);
        assert_eq!(remap_edge(0.25, span, P), 0.0);
        assert_eq!(remap_edge(0.75, span, P), 1.0);
        assert_eq!(remap_edge(0.5, span, P), 0.5);
    }

    #[test]
    fn test_remap_is_symmetric() {
        let span = Span::new(0.0, 1.0);
        for v in [0.05f32, 0.2, 0.35, 0.49] {
            let low = remap_edge(v, span, P);
            let high = remap_edge(1.0 - v, span, P);
            assert!((low + high - 1.0).abs() < 1e-5, "v={} {} {}", v, low, high);
        }
    }

    #[test]
    fn test_remap_pulls_toward_center_off_edge() {
        // |v|^p with p > 1 shrinks values inside (-1, 1)
        let mapped = remap_edge(0.25, Span::new(0.0, 1.0), P);
        assert!(mapped > 0.25 && mapped < 0.5);
    }

    #[test]
    fn test_remap_clamps_outside_span() {
        let span = Span::new(0.3, 0.6);
        assert_eq!(remap_edge(0.0, span, P), 0.0);
        assert_eq!(remap_edge(0.9, span, P), 1.0);
    }

    #[test]
    fn test_remap_degenerate_span() {
        assert_eq!(remap_edge(0.9, Span::new(0.4, 0.4), P), 0.5);
    }

    #[test]
    fn test_default_span_before_min_samples() {
        let config = CalibrationConfig::default();
        let mut cal = AdaptiveCalibration::new(&config);
        for _ in 0..config.min_samples - 1 {
            cal.observe((0.5, 0.5), &two_up());
        }
        assert!(!cal.is_calibrated(&config));
        let (sx, sy) = cal.spans(&config);
        assert_eq!(sx, Span::new(0.15, 0.85));
        assert_eq!(sy, Span::new(0.15, 0.85));
        assert_eq!(cal.map((0.15, 0.85), &config), (0.0, 1.0));
    }

    #[test]
    fn test_observe_requires_two_fingers_up() {
        let config = CalibrationConfig::default();
        let mut cal = AdaptiveCalibration::new(&config);
        let only_index = Posture {
            index_up: true,
            ..Posture::default()
        };
        assert!(!cal.observe((0.1, 0.1), &only_index));
        assert!(!cal.observe((0.1, 0.1), &Posture::default()));
        assert!(cal.is_empty());

        let open = Posture {
            index_up: true,
            middle_up: true,
            ring_up: true,
            pinky_up: true,
            all_up: true,
            ..Posture::default()
        };
        assert!(cal.observe((0.1, 0.1), &open));
        assert_eq!(cal.len(), 1);
    }

    #[test]
    fn test_history_never_exceeds_cap() {
        let config = CalibrationConfig {
            history_len: 20,
            ..CalibrationConfig::default()
        };
        let mut cal = AdaptiveCalibration::new(&config);
        for i in 0..100 {
            cal.observe((i as f32 / 100.0, 0.5), &two_up());
            assert!(cal.len() <= 20);
        }
    }

    #[test]
    fn test_constant_anchor_converges_to_center() {
        let config = CalibrationConfig::default();
        let mut cal = AdaptiveCalibration::new(&config);
        for _ in 0..config.history_len {
            cal.observe((0.5, 0.5), &two_up());
        }
        let (fx, fy) = cal.map((0.5, 0.5), &config);
        assert_eq!((fx, fy), (0.5, 0.5));
        let (tx, ty) = cal.target((0.5, 0.5), ScreenSize::new(1920, 1080), &config);
        assert!((tx - 960.0).abs() < 1e-6);
        assert!((ty - 540.0).abs() < 1e-6);
    }

    #[test]
    fn test_narrow_span_is_widened() {
        let config = CalibrationConfig {
            expand_margin: 0.0,
            ..CalibrationConfig::default()
        };
        let mut cal = AdaptiveCalibration::new(&config);
        for _ in 0..32 {
            cal.observe((0.40, 0.70), &two_up());
        }
        let (sx, sy) = cal.spans(&config);
        assert!((sx.lo - 0.35).abs() < 1e-6 && (sx.hi - 0.45).abs() < 1e-6);
        assert!((sy.lo - 0.65).abs() < 1e-6 && (sy.hi - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_learned_span_uses_percentiles() {
        let config = CalibrationConfig {
            expand_margin: 0.05,
            ..CalibrationConfig::default()
        };
        let mut cal = AdaptiveCalibration::new(&config);
        for i in 0..=100 {
            let v = 0.3 + 0.4 * (i as f32 / 100.0);
            cal.observe((v, v), &two_up());
        }
        let (sx, _) = cal.spans(&config);
        // 4th/96th percentile of 0.3..0.7 is 0.316/0.684, then +/- 0.05
        assert!((sx.lo - 0.266).abs() < 1e-4, "lo={}", sx.lo);
        assert!((sx.hi - 0.734).abs() < 1e-4, "hi={}", sx.hi);
    }

    #[test]
    fn test_screen_center() {
        assert_eq!(ScreenSize::new(1920, 1080).center(), (960.0, 540.0));
    }
}
