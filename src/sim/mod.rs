//! Physics and collision core
//!
//! This module is pure: no rendering, no sensors, no clocks.
//! - Time comes in as a measured `dt`
//! - Tilt comes in as one snapshot per tick
//! - Walls are fixed for the lifetime of a `GameSession`

pub mod boundary;
pub mod collision;
pub mod segment;
pub mod state;
pub mod tick;

pub use boundary::{SetupError, build_boundaries, cell_size};
pub use collision::{CollisionParams, Resolution, reflect_velocity, resolve_collisions};
pub use segment::Segment2D;
pub use state::{Ball, GamePhase, GameSession, Hole, Layout, RngState, StartCorner, WallRect, wall_rects};
pub use tick::{TickInput, reached_goal, step_ball, tick, tilt_acceleration};
