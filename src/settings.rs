//! Game settings
//!
//! Physics constants, maze dimensions and timing, loaded from an optional JSON
//! file. Missing fields fall back to the values in `consts`.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// How the collision resolver picks among several walls crossed in one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BounceSelection {
    /// First qualifying wall in boundary order
    #[default]
    FirstMatch,
    /// Qualifying wall whose crossing is closest to the trajectory start
    Nearest,
}

impl BounceSelection {
    pub fn as_str(&self) -> &'static str {
        match self {
            BounceSelection::FirstMatch => "first_match",
            BounceSelection::Nearest => "nearest",
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid setting: {0}")]
    Invalid(String),
}

/// Tunable game settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Physics ===
    /// Acceleration per unit of tilt (pixels/s²)
    pub gravity: f32,
    /// Fraction of velocity kept after a bounce (0.0 - 1.0)
    pub bounce: f32,
    /// Bounce selection when a step crosses several walls
    pub bounce_selection: BounceSelection,

    // === Maze ===
    pub maze_width: usize,
    pub maze_height: usize,
    pub wall_width: f32,
    pub ball_radius: f32,
    pub hole_radius: f32,

    // === Timing ===
    /// Nominal timer interval in milliseconds
    pub tick_interval_ms: u64,
    /// Upper bound on a measured tick delta (seconds)
    pub max_delta_seconds: f32,
    pub fade_out_seconds: f32,
    pub fade_in_seconds: f32,

    // === Sensor ===
    /// Weight of the previous value in the tilt moving average (0.0 - 1.0)
    pub tilt_smoothing: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            gravity: GRAVITY,
            bounce: BOUNCE,
            bounce_selection: BounceSelection::FirstMatch,

            maze_width: MAZE_HORZ_CHAMBERS,
            maze_height: MAZE_VERT_CHAMBERS,
            wall_width: WALL_WIDTH,
            ball_radius: BALL_RADIUS,
            hole_radius: HOLE_RADIUS,

            tick_interval_ms: TICK_INTERVAL_MS,
            max_delta_seconds: MAX_DELTA_SECONDS,
            fade_out_seconds: FADE_OUT_SECONDS,
            fade_in_seconds: FADE_IN_SECONDS,

            tilt_smoothing: TILT_SMOOTHING,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, or defaults when no path is given
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let settings = match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let settings: Settings = serde_json::from_str(&json)?;
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            None => {
                log::info!("Using default settings");
                Self::default()
            }
        };
        settings.validate()?;
        Ok(settings)
    }

    /// Range-check every value the simulation divides by or scales with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if !self.gravity.is_finite() {
            return invalid(format!("gravity must be finite, got {}", self.gravity));
        }
        // A zero bounce leaves nothing to reflect, so walls would stop colliding
        if !(self.bounce > 0.0 && self.bounce <= 1.0) {
            return invalid(format!("bounce must be within (0, 1], got {}", self.bounce));
        }
        if self.maze_width == 0 || self.maze_height == 0 {
            return invalid(format!(
                "maze must have at least one chamber, got {}x{}",
                self.maze_width, self.maze_height
            ));
        }
        for (name, value) in [
            ("wall_width", self.wall_width),
            ("ball_radius", self.ball_radius),
            ("hole_radius", self.hole_radius),
            ("fade_out_seconds", self.fade_out_seconds),
            ("fade_in_seconds", self.fade_in_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return invalid(format!("{name} must be finite and non-negative, got {value}"));
            }
        }
        if self.hole_radius <= self.ball_radius {
            return invalid(format!(
                "hole_radius ({}) must exceed ball_radius ({}) for the goal to be reachable",
                self.hole_radius, self.ball_radius
            ));
        }
        if self.tick_interval_ms == 0 {
            return invalid("tick_interval_ms must be positive".to_string());
        }
        if !self.max_delta_seconds.is_finite() || self.max_delta_seconds <= 0.0 {
            return invalid(format!(
                "max_delta_seconds must be positive, got {}",
                self.max_delta_seconds
            ));
        }
        if !(0.0..1.0).contains(&self.tilt_smoothing) {
            return invalid(format!(
                "tilt_smoothing must be within 0..1, got {}",
                self.tilt_smoothing
            ));
        }
        Ok(())
    }

    /// Nominal timer interval
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}
