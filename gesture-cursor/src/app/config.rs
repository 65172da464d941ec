//! Configuration Management

use crate::gesture::{
    CalibrationConfig, ClickConfig, CursorConfig, DragConfig, GestureConfig, PostureConfig,
    ScreenSize, ScrollConfig, StabilizerConfig,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target screen (pixels)
    pub screen: ScreenSize,
    /// Landmark input settings
    pub tracking: TrackingConfig,
    pub posture: PostureConfig,
    pub cursor: CursorConfig,
    pub calibration: CalibrationConfig,
    pub stabilizer: StabilizerConfig,
    pub click: ClickConfig,
    pub drag: DragConfig,
    pub scroll: ScrollConfig,
}

/// Landmark input configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Hands scored below this are ignored
    pub min_confidence: f32,
    /// Flip x for estimators fed an unmirrored camera image
    pub mirror_x: bool,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.72,
            mirror_x: false,
        }
    }
}

fn invalid(message: String) -> crate::Error {
    crate::Error::Config(message)
}

fn check_unit(name: &str, value: f64) -> Result<(), crate::Error> {
    if !(value > 0.0 && value <= 1.0) {
        return Err(invalid(format!("{} must be in (0, 1], got {}", name, value)));
    }
    Ok(())
}

fn check_positive(name: &str, value: f64) -> Result<(), crate::Error> {
    if !(value.is_finite() && value > 0.0) {
        return Err(invalid(format!("{} must be finite and > 0, got {}", name, value)));
    }
    Ok(())
}

impl Config {
    /// Engine settings derived from this config.
    pub fn gesture_config(&self) -> GestureConfig {
        GestureConfig {
            posture: self.posture.clone(),
            calibration: self.calibration.clone(),
            stabilizer: self.stabilizer.clone(),
            cursor: self.cursor.clone(),
            click: self.click.clone(),
            drag: self.drag.clone(),
            scroll: self.scroll.clone(),
        }
    }

    /// Validate config values are within acceptable ranges.
    /// Returns Ok(()) if valid, or Err with a description of the first invalid field.
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.screen.width == 0 || self.screen.height == 0 {
            return Err(invalid(format!(
                "screen size must be non-zero, got {}x{}",
                self.screen.width, self.screen.height
            )));
        }
        if !(0.0..=1.0).contains(&self.tracking.min_confidence) {
            return Err(invalid(format!(
                "min_confidence must be in [0, 1], got {}",
                self.tracking.min_confidence
            )));
        }
        check_positive("fist_palm_distance", f64::from(self.posture.fist_palm_distance))?;

        check_unit("cursor.smoothing", self.cursor.smoothing)?;
        if !(self.cursor.deadzone_px.is_finite() && self.cursor.deadzone_px >= 0.0) {
            return Err(invalid(format!(
                "deadzone_px must be >= 0, got {}",
                self.cursor.deadzone_px
            )));
        }
        check_positive("max_finger_gap", f64::from(self.cursor.max_finger_gap))?;

        let cal = &self.calibration;
        if cal.history_len == 0 {
            return Err(invalid("calibration.history_len must be > 0".to_string()));
        }
        if cal.min_samples == 0 || cal.min_samples > cal.history_len {
            return Err(invalid(format!(
                "calibration.min_samples must be in [1, {}], got {}",
                cal.history_len, cal.min_samples
            )));
        }
        let percentiles = 0.0..=100.0;
        if !percentiles.contains(&cal.low_percentile)
            || !percentiles.contains(&cal.high_percentile)
            || cal.low_percentile >= cal.high_percentile
        {
            return Err(invalid(format!(
                "percentiles must satisfy 0 <= low < high <= 100, got {} and {}",
                cal.low_percentile, cal.high_percentile
            )));
        }
        check_positive("expand_margin", f64::from(cal.expand_margin))?;
        check_positive("min_span", f64::from(cal.min_span))?;
        if !(cal.widen_by.is_finite() && cal.widen_by >= 0.0) {
            return Err(invalid(format!("widen_by must be >= 0, got {}", cal.widen_by)));
        }
        if !(0.0..=1.0).contains(&cal.default_low)
            || !(0.0..=1.0).contains(&cal.default_high)
            || cal.default_low >= cal.default_high
        {
            return Err(invalid(format!(
                "default span must satisfy 0 <= low < high <= 1, got {} and {}",
                cal.default_low, cal.default_high
            )));
        }
        check_positive("edge_power", f64::from(cal.edge_power))?;

        if self.stabilizer.history_len == 0 {
            return Err(invalid("stabilizer.history_len must be > 0".to_string()));
        }
        check_positive("stabilizer.jump_threshold", f64::from(self.stabilizer.jump_threshold))?;

        if self.click.left_frames == 0 || self.click.right_frames == 0 {
            return Err(invalid("click frame counts must be > 0".to_string()));
        }

        if self.drag.entry_frames == 0 {
            return Err(invalid("drag.entry_frames must be > 0".to_string()));
        }
        check_unit("drag.follow_fraction", self.drag.follow_fraction)?;
        check_positive("drag.max_step_px", self.drag.max_step_px)?;
        check_positive("drag.jump_threshold", self.drag.jump_threshold)?;

        check_positive("scroll.min_delta", f64::from(self.scroll.min_delta))?;
        check_positive("scroll.sensitivity", f64::from(self.scroll.sensitivity))?;
        if !(0.0..=1.0).contains(&self.scroll.rebase_keep) {
            return Err(invalid(format!(
                "rebase_keep must be in [0, 1], got {}",
                self.scroll.rebase_keep
            )));
        }
        Ok(())
    }

    /// Load config from file
    pub fn load(path: &PathBuf) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content).map_err(|e| invalid(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load config from default location
    pub fn load_default() -> Result<Self, crate::Error> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save config to file
    pub fn save(&self, path: &PathBuf) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Save to default location
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// Get default config path
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".gesture_cursor").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    /// Generate TOML representation
    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| invalid(e.to_string()))
    }

    /// Look up a value by dotted key, e.g. `cursor.smoothing`.
    pub fn get_value(&self, key: &str) -> Result<String, crate::Error> {
        let root = self.to_value()?;
        let value = lookup(&root, key)?;
        Ok(match value {
            toml::Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }

    /// Set a value by dotted key. The raw text is parsed according to the
    /// type of the current value and the result is re-validated.
    pub fn set_value(&mut self, key: &str, raw: &str) -> Result<(), crate::Error> {
        let mut root = self.to_value()?;
        let slot = lookup_mut(&mut root, key)?;
        *slot = parse_like(slot, raw)
            .ok_or_else(|| invalid(format!("invalid value '{}' for {}", raw, key)))?;

        let updated: Config = root.try_into().map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    fn to_value(&self) -> Result<toml::Value, crate::Error> {
        toml::Value::try_from(self).map_err(|e| invalid(e.to_string()))
    }
}

fn lookup<'a>(root: &'a toml::Value, key: &str) -> Result<&'a toml::Value, crate::Error> {
    let mut current = root;
    for part in key.split('.') {
        current = current
            .get(part)
            .ok_or_else(|| invalid(format!("unknown key: {}", key)))?;
    }
    if current.is_table() {
        return Err(invalid(format!("{} is a section, not a value", key)));
    }
    Ok(current)
}

fn lookup_mut<'a>(root: &'a mut toml::Value, key: &str) -> Result<&'a mut toml::Value, crate::Error> {
    let mut current = root;
    for part in key.split('.') {
        current = current
            .get_mut(part)
            .ok_or_else(|| invalid(format!("unknown key: {}", key)))?;
    }
    if current.is_table() {
        return Err(invalid(format!("{} is a section, not a value", key)));
    }
    Ok(current)
}

fn parse_like(current: &toml::Value, raw: &str) -> Option<toml::Value> {
    let raw = raw.trim();
    match current {
        toml::Value::Boolean(_) => raw.parse().ok().map(toml::Value::Boolean),
        toml::Value::Integer(_) => raw.parse().ok().map(toml::Value::Integer),
        toml::Value::Float(_) => raw.parse().ok().map(toml::Value::Float),
        toml::Value::String(_) => Some(toml::Value::String(raw.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.screen.width, 1920);
        assert_eq!(config.screen.height, 1080);
        assert_eq!(config.tracking.min_confidence, 0.72);
        assert_eq!(config.cursor.smoothing, 0.12);
        assert_eq!(config.drag.entry_frames, 6);
        assert_eq!(config.click.right_interval_ms, 450);
    }

    #[test]
    fn test_config_serialization() {
        let toml = Config::default().to_toml().unwrap();
        for section in [
            "[screen]",
            "[tracking]",
            "[cursor]",
            "[calibration]",
            "[stabilizer]",
            "[click]",
            "[drag]",
            "[scroll]",
        ] {
            assert!(toml.contains(section), "missing {}", section);
        }
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path();
        assert!(path.to_string_lossy().contains(".gesture_cursor"));
        assert!(path.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn test_gesture_config_carries_values() {
        let mut config = Config::default();
        config.drag.settle_ms = 50;
        config.scroll.sensitivity = 150.0;
        let gesture = config.gesture_config();
        assert_eq!(gesture.drag.settle_ms, 50);
        assert_eq!(gesture.scroll.sensitivity, 150.0);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("test_config.toml");

        let mut original = Config::default();
        original.screen = ScreenSize {
            width: 2560,
            height: 1440,
        };
        original.cursor.deadzone_px = 4.0;
        original.tracking.mirror_x = true;

        original.save(&config_path).expect("Failed to save config");
        assert!(config_path.exists());

        let loaded = Config::load(&config_path).expect("Failed to load config");
        assert_eq!(loaded.screen.width, 2560);
        assert_eq!(loaded.cursor.deadzone_px, 4.0);
        assert!(loaded.tracking.mirror_x);
    }

    #[test]
    fn test_config_save_creates_parent_directories() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let nested_path = temp_dir.path().join("nested").join("path").join("config.toml");

        Config::default().save(&nested_path).expect("Failed to save config");
        assert!(nested_path.exists());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let result = Config::load(&temp_dir.path().join("missing.toml"));
        assert!(matches!(result, Err(crate::Error::Io(_))));
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: Config = toml::from_str(
            r#"
[screen]
width = 1280
height = 720
"#,
        )
        .expect("Partial config should deserialize");
        assert_eq!(config.screen.width, 1280);
        assert_eq!(config.drag.entry_frames, 6);
        assert_eq!(config.calibration.history_len, 450);
    }

    #[test]
    fn test_partial_section_uses_field_defaults() {
        let config: Config = toml::from_str(
            r#"
[cursor]
smoothing = 0.2

[screen]
width = 2560

[click]
right_interval_ms = 500
"#,
        )
        .expect("Partial sections should deserialize");
        assert_eq!(config.cursor.smoothing, 0.2);
        assert_eq!(config.cursor.deadzone_px, 6.0);
        assert!(config.cursor.require_close_fingers);
        assert_eq!(config.screen.width, 2560);
        assert_eq!(config.screen.height, 1080);
        assert_eq!(config.click.right_interval_ms, 500);
        assert_eq!(config.click.left_frames, 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_invalid_values() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bad_config.toml");
        std::fs::write(
            &config_path,
            r#"
[screen]
width = 0
height = 1080
"#,
        )
        .expect("Failed to write config");
        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_percentiles() {
        let mut config = Config::default();
        config.calibration.low_percentile = 96.0;
        config.calibration.high_percentile = 4.0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.calibration.high_percentile = 101.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_bad_smoothing() {
        let mut config = Config::default();
        config.cursor.smoothing = 0.0;
        assert!(config.validate().is_err());
        config.cursor.smoothing = 1.0;
        assert!(config.validate().is_ok());
        config.cursor.smoothing = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_counts() {
        let mut config = Config::default();
        config.stabilizer.history_len = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.click.left_frames = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.drag.entry_frames = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_nan_and_infinity() {
        let config: Config = toml::from_str(
            r#"
[cursor]
smoothing = nan
"#,
        )
        .expect("nan is valid TOML");
        assert!(config.cursor.smoothing.is_nan());
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.cursor.deadzone_px = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.drag.follow_fraction = f64::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.calibration.widen_by = f32::NAN;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.scroll.sensitivity = f32::INFINITY;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.drag.max_step_px = f64::INFINITY;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_non_positive_power() {
        let mut config = Config::default();
        config.calibration.edge_power = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_get_value() {
        let config = Config::default();
        assert_eq!(config.get_value("screen.width").unwrap(), "1920");
        assert_eq!(config.get_value("tracking.mirror_x").unwrap(), "false");
        assert_eq!(config.get_value("cursor.smoothing").unwrap(), "0.12");
        assert!(config.get_value("screen.depth").is_err());
        assert!(config.get_value("screen").is_err());
    }

    #[test]
    fn test_set_value() {
        let mut config = Config::default();
        config.set_value("screen.width", "2560").unwrap();
        config.set_value("tracking.mirror_x", "true").unwrap();
        config.set_value("drag.max_step_px", "3.5").unwrap();
        assert_eq!(config.screen.width, 2560);
        assert!(config.tracking.mirror_x);
        assert_eq!(config.drag.max_step_px, 3.5);
    }

    #[test]
    fn test_set_value_rejects_bad_input() {
        let mut config = Config::default();
        assert!(config.set_value("screen.width", "wide").is_err());
        assert!(config.set_value("nope.key", "1").is_err());
        // Parses, but fails validation; the config is left untouched.
        assert!(config.set_value("screen.width", "0").is_err());
        assert_eq!(config.screen.width, 1920);
    }

    #[test]
    fn test_invalid_toml_parsing() {
        let result: Result<Config, _> = toml::from_str("this is not valid toml {{{}}}");
        assert!(result.is_err());
    }
}
