use std::path::Path as FsPath;

use anyhow::Context;

use crate::animation::ease::Ease;
use crate::animation::schedule::StaggerPolicy;
use crate::animation::state::{DEFAULT_FILL_DURATION_FRACTION, FillPolicy};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{DrawonError, DrawonResult};
use crate::style::color::Rgba8;

/// Options for one animation/export call. Passed explicitly; never global.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AnimationConfig {
    /// Total timeline length in seconds.
    pub duration: f64,
    /// Frames per second for frame exporters.
    pub fps: u32,
    /// Fade fills in after each path is drawn.
    pub fill: bool,
    /// Stroke for paths without their own `stroke`.
    pub stroke_color: Rgba8,
    /// Stroke width for paths without their own `stroke-width`.
    pub stroke_width: f64,
    pub background_color: Rgba8,
    pub stagger_policy: StaggerPolicy,
    pub easing_kind: Ease,
    /// Fill ramp length as a fraction of the whole timeline.
    pub fill_duration_fraction: f64,
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            duration: 2.0,
            fps: 30,
            fill: true,
            stroke_color: Rgba8::BLACK,
            stroke_width: 2.0,
            background_color: Rgba8::WHITE,
            stagger_policy: StaggerPolicy::Sequential,
            easing_kind: Ease::EaseOut,
            fill_duration_fraction: DEFAULT_FILL_DURATION_FRACTION,
        }
    }
}

impl AnimationConfig {
    pub fn validate(&self) -> DrawonResult<()> {
        if !self.duration.is_finite() || self.duration <= 0.0 {
            return Err(DrawonError::config(format!(
                "duration must be finite and > 0, got {}",
                self.duration
            )));
        }
        if self.fps == 0 {
            return Err(DrawonError::config("fps must be > 0"));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(DrawonError::config(format!(
                "stroke_width must be finite and >= 0, got {}",
                self.stroke_width
            )));
        }
        if !(0.0..=1.0).contains(&self.fill_duration_fraction) {
            return Err(DrawonError::config(format!(
                "fill_duration_fraction must be in [0, 1], got {}",
                self.fill_duration_fraction
            )));
        }
        self.stagger_policy.validate()
    }

    /// Parse and validate a JSON config. Missing fields take their defaults.
    pub fn from_json_str(s: &str) -> DrawonResult<Self> {
        let cfg: Self = serde_json::from_str(s)
            .map_err(|e| DrawonError::config(format!("config json: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_json_file(path: &FsPath) -> DrawonResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json_str(&text)
    }

    pub fn fill_policy(&self) -> FillPolicy {
        FillPolicy::after_draw(self.fill, self.fill_duration_fraction)
    }

    /// `max(1, floor(fps * duration))`.
    pub fn frame_count(&self) -> u64 {
        let n = (f64::from(self.fps) * self.duration).floor();
        if n.is_finite() && n >= 1.0 { n as u64 } else { 1 }
    }

    /// Timeline fraction shown by frame `i`; the last frame shows `t = 1`.
    pub fn frame_time_fraction(&self, frame: FrameIndex) -> f64 {
        let last = self.frame_count().saturating_sub(1).max(1);
        (frame.0 as f64 / last as f64).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/config.rs"]
mod tests;
