//! Tracking configuration.
//!
//! Every option has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! max_hands = 3
//! association_threshold = 0.15
//! stale_timeout_ms = 250
//! smoothing_factor = 0.5
//! max_missing_frames = 5
//! primary_click_cooldown_ms = 300
//! secondary_click_cooldown_ms = 600
//! target_frame_interval_ms = 33
//!
//! [camera]
//! mirror_x = true
//! margin = 0.0
//! ```

use std::path::Path;
use std::time::Duration;

use hand_events::ClickConfig;
use hand_geometry::CameraMapping;
use hand_tracker::TrackerConfig;
use serde::{Deserialize, Serialize};

use crate::cursor::CursorConfig;
use crate::error::{InputError, Result};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Hands considered per frame.
    pub max_hands: usize,
    /// Scene-space distance under which an observation continues a track.
    pub association_threshold: f32,
    /// How long an unseen hand keeps being replayed.
    pub stale_timeout_ms: u64,
    /// Cursor easing per update, in (0, 1]; 1 disables smoothing.
    pub smoothing_factor: f32,
    /// Engine ticks a cursor survives without a move event.
    pub max_missing_frames: u64,
    pub primary_click_cooldown_ms: u64,
    pub secondary_click_cooldown_ms: u64,
    /// Target detection period; 33 ms ≈ 30 Hz.
    pub target_frame_interval_ms: u64,
    pub camera: CameraMapping,
}

impl Default for InputConfig {
    fn default() -> Self {
        InputConfig {
            max_hands:                   3,
            association_threshold:       0.15,
            stale_timeout_ms:            250,
            smoothing_factor:            0.5,
            max_missing_frames:          5,
            primary_click_cooldown_ms:   300,
            secondary_click_cooldown_ms: 600,
            target_frame_interval_ms:    33,
            camera:                      CameraMapping::default(),
        }
    }
}

impl InputConfig {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let cfg: InputConfig = toml::from_str(text)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| InputError::ConfigIo {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Reject values that would make tracking silently misbehave.
    pub fn validate(&self) -> Result<()> {
        if self.max_hands == 0 {
            return Err(InputError::invalid("max_hands", "must be at least 1"));
        }
        if !(self.association_threshold.is_finite() && self.association_threshold > 0.0) {
            return Err(InputError::invalid(
                "association_threshold",
                format!("must be a positive number, got {}", self.association_threshold),
            ));
        }
        if self.stale_timeout_ms == 0 {
            return Err(InputError::invalid("stale_timeout_ms", "must be positive"));
        }
        if !(self.smoothing_factor > 0.0 && self.smoothing_factor <= 1.0) {
            return Err(InputError::invalid(
                "smoothing_factor",
                format!("must be in (0, 1], got {}", self.smoothing_factor),
            ));
        }
        if self.max_missing_frames == 0 {
            return Err(InputError::invalid("max_missing_frames", "must be at least 1"));
        }
        if self.target_frame_interval_ms == 0 {
            return Err(InputError::invalid("target_frame_interval_ms", "must be positive"));
        }
        if self.secondary_click_cooldown_ms < self.primary_click_cooldown_ms {
            return Err(InputError::invalid(
                "secondary_click_cooldown_ms",
                format!(
                    "must not be shorter than primary_click_cooldown_ms ({} < {})",
                    self.secondary_click_cooldown_ms, self.primary_click_cooldown_ms
                ),
            ));
        }
        if !(self.camera.margin >= 0.0 && self.camera.margin < 0.5) {
            return Err(InputError::invalid(
                "camera.margin",
                format!("must be in [0, 0.5), got {}", self.camera.margin),
            ));
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.target_frame_interval_ms)
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            association_threshold: self.association_threshold,
            stale_timeout:         Duration::from_millis(self.stale_timeout_ms),
            max_hands:             self.max_hands,
        }
    }

    pub fn click_config(&self) -> ClickConfig {
        ClickConfig {
            primary_cooldown:   Duration::from_millis(self.primary_click_cooldown_ms),
            secondary_cooldown: Duration::from_millis(self.secondary_click_cooldown_ms),
            ..ClickConfig::default()
        }
    }

    pub fn cursor_config(&self) -> CursorConfig {
        CursorConfig {
            smoothing_factor:   self.smoothing_factor,
            max_missing_frames: self.max_missing_frames,
            ..CursorConfig::default()
        }
    }
}
