//! Viewer settings

use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_SCALE: f64 = 0.05;
pub const DEFAULT_MAX_SCALE: f64 = 50.0;

/// `[viewer]` section of the configuration file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub min_scale: f64,
    pub max_scale: f64,
    /// Zoom factor per wheel notch or key press.
    pub wheel_step: f64,
    /// Marquee drags smaller than this in either dimension are ignored.
    pub min_marquee_px: f64,
    /// Share of the viewport a fitted graph occupies.
    pub fit_margin: f64,
    pub preview_lines: usize,
    pub viewport_width: f64,
    pub viewport_height: f64,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        ViewerConfig {
            min_scale: DEFAULT_MIN_SCALE,
            max_scale: DEFAULT_MAX_SCALE,
            wheel_step: 1.05,
            min_marquee_px: 8.0,
            fit_margin: 0.9,
            preview_lines: 20,
            viewport_width: 1600.0,
            viewport_height: 800.0,
        }
    }
}

impl ViewerConfig {
    /// Describe the first setting the viewer cannot work with.
    pub fn validate(&self) -> Result<(), String> {
        if !valid_scale_range(self.min_scale, self.max_scale) {
            return Err(format!(
                "scale range [{}, {}] must be finite with 0 < min_scale <= max_scale",
                self.min_scale, self.max_scale
            ));
        }
        if !(self.wheel_step.is_finite() && self.wheel_step > 0.0) {
            return Err(format!("wheel_step must be positive, got {}", self.wheel_step));
        }
        if !(self.fit_margin.is_finite() && self.fit_margin > 0.0) {
            return Err(format!("fit_margin must be positive, got {}", self.fit_margin));
        }
        Ok(())
    }
}

pub(crate) fn valid_scale_range(min: f64, max: f64) -> bool {
    min.is_finite() && max.is_finite() && min > 0.0 && min <= max
}
