use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    CORNER_HIT_RADIUS_PX, LINE_HIT_TOLERANCE_PX, LONG_PRESS_MS, LONG_PRESS_SLOP_PX,
    MAGNIFIER_BASE_SIZE, MAGNIFIER_HIDE_DELAY_MS, MAX_TARGET_WIDTH, MIN_TARGET_WIDTH,
};

/// Top-level tool configuration. Every section falls back to its defaults.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct GraderConfig {
    #[serde(default)]
    pub rectify: RectifyConfig,
    #[serde(default)]
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub magnifier: MagnifierConfig,
}

/// Bounds on the rectified output width.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RectifyConfig {
    pub min_width: u32,
    pub max_width: u32,
}

impl Default for RectifyConfig {
    fn default() -> Self {
        Self {
            min_width: MIN_TARGET_WIDTH,
            max_width: MAX_TARGET_WIDTH,
        }
    }
}

/// Timing and hit-test tolerances for pointer handling.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct InteractionConfig {
    /// Idle time before the magnifier hides (ms).
    pub hide_delay_ms: u64,
    /// Touch press duration before an inspection drag arms (ms).
    pub long_press_ms: u64,
    /// Touch movement that cancels a pending long press (screen px).
    pub long_press_slop_px: f64,
    pub corner_hit_radius_px: f64,
    pub line_hit_tolerance_px: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hide_delay_ms: MAGNIFIER_HIDE_DELAY_MS,
            long_press_ms: LONG_PRESS_MS,
            long_press_slop_px: LONG_PRESS_SLOP_PX,
            corner_hit_radius_px: CORNER_HIT_RADIUS_PX,
            line_hit_tolerance_px: LINE_HIT_TOLERANCE_PX,
        }
    }
}

impl InteractionConfig {
    pub fn hide_delay(&self) -> Duration {
        Duration::from_millis(self.hide_delay_ms)
    }

    pub fn long_press(&self) -> Duration {
        Duration::from_millis(self.long_press_ms)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MagnifierConfig {
    /// Canvas edge length at zoom below 2x (screen px).
    pub base_size: f64,
}

impl Default for MagnifierConfig {
    fn default() -> Self {
        Self {
            base_size: MAGNIFIER_BASE_SIZE,
        }
    }
}

impl MagnifierConfig {
    /// Canvas size for a zoom level: larger lenses at higher magnification.
    pub fn canvas_size(&self, zoom: f64) -> f64 {
        if zoom >= 3.0 {
            self.base_size * 2.0
        } else if zoom >= 2.0 {
            self.base_size * 1.5
        } else {
            self.base_size
        }
    }
}
