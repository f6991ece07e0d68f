//! Core configuration for vitrine-motion-core.

use serde::{Deserialize, Serialize};

/// Engine-wide playback settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionConfig {
    /// Multiplier applied to every `dt` passed to `update`.
    pub time_scale: f32,
    /// When set, a single frame never advances playback by more than this many
    /// seconds (long stalls, background tabs).
    pub lag_threshold: Option<f32>,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            time_scale: 1.0,
            lag_threshold: None,
        }
    }
}

impl MotionConfig {
    /// Scaled, clamped step for one frame. Negative or non-finite input is 0.
    pub fn effective_dt(&self, dt: f32) -> f32 {
        if !dt.is_finite() || dt <= 0.0 {
            return 0.0;
        }
        let scaled = dt * self.time_scale.max(0.0);
        match self.lag_threshold {
            Some(cap) if cap > 0.0 => scaled.min(cap),
            _ => scaled,
        }
    }
}
