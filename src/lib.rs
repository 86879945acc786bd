//! Tilt Maze - a ball rolling through a maze under tilt-driven acceleration
//!
//! Core modules:
//! - `sim`: Physics and collision (segments, wall boundaries, bounce resolution, stepping)
//! - `maze`: Maze collaborator interface and a validated wall-flag grid
//! - `sensor`: Tilt smoothing and the shared acceleration snapshot
//! - `game`: Session driver (timer ticks, win/transition state machine, presenter)
//! - `settings`: Tunable physics and timing configuration

pub mod game;
pub mod maze;
pub mod sensor;
pub mod settings;
pub mod sim;

pub use game::{Presenter, TiltMaze};
pub use maze::{Cell, Maze, MazeSource, WallGrid};
pub use sensor::{SharedTilt, TiltSource};
pub use settings::{BounceSelection, Settings};

/// Game configuration constants
pub mod consts {
    /// Gravity scale applied to the tilt reading (pixels per second squared)
    pub const GRAVITY: f32 = 1000.0;
    /// Fraction of velocity kept after a wall bounce
    pub const BOUNCE: f32 = 2.0 / 3.0;

    /// Default maze size in chambers
    pub const MAZE_HORZ_CHAMBERS: usize = 5;
    pub const MAZE_VERT_CHAMBERS: usize = 8;

    /// Wall and actor sizes (pixels)
    pub const WALL_WIDTH: f32 = 16.0;
    pub const BALL_RADIUS: f32 = 12.0;
    pub const HOLE_RADIUS: f32 = 18.0;

    /// Below this speed the collision pass is skipped (normalizing would be undefined)
    pub const MIN_COLLISION_SPEED: f32 = 0.001;
    /// Distance a bounce point is lifted off the radius-expanded wall
    pub const CONTACT_SKIN: f32 = 0.01;

    /// Nominal timer interval (milliseconds)
    pub const TICK_INTERVAL_MS: u64 = 33;
    /// Largest measured delta fed to the integrator (seconds)
    pub const MAX_DELTA_SECONDS: f32 = 0.1;

    /// Fade durations for the transition between games (seconds)
    pub const FADE_OUT_SECONDS: f32 = 1.0;
    pub const FADE_IN_SECONDS: f32 = 0.1;

    /// Weight of the previous smoothed reading in the tilt moving average
    pub const TILT_SMOOTHING: f32 = 0.5;
}

/// Wrap an angle into (-π, π]
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut angle = angle - (angle / TAU).round() * TAU;
    if angle <= -PI {
        angle += TAU;
    }
    if angle > PI {
        angle -= TAU;
    }
    angle
}
