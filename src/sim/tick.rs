//! Per-tick physics step
//!
//! Tilt → acceleration → semi-implicit Euler → wall bounces → goal check. The
//! step reads one acceleration snapshot handed in by the caller, so it is a plain
//! function of (session, input, dt).

use glam::{Vec2, Vec3};

use super::collision::{CollisionParams, Resolution, resolve_collisions};
use super::segment::Segment2D;
use super::state::{Ball, GamePhase, GameSession, Hole};

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Smoothed accelerometer reading (in g); only x and y are used
    pub tilt: Vec3,
}

/// Planar acceleration in screen space for a tilt reading
///
/// Screen x runs opposite to the device's x axis.
#[inline]
pub fn tilt_acceleration(tilt: Vec3, gravity: f32) -> Vec2 {
    gravity * Vec2::new(-tilt.x, tilt.y)
}

/// Integrate and collide one ball for `dt` seconds
///
/// Falls back to the pre-step state if the result is not finite.
pub fn step_ball(
    ball: &Ball,
    acceleration: Vec2,
    dt: f32,
    boundaries: &[Segment2D],
    params: &CollisionParams,
) -> Resolution {
    let vel = ball.vel + acceleration * dt;
    let old_pos = ball.pos;
    let proposed = old_pos + vel * dt;

    let resolution = resolve_collisions(old_pos, vel, proposed, boundaries, params);

    if resolution.pos.is_finite() && resolution.vel.is_finite() {
        resolution
    } else {
        log::warn!(
            "Non-finite step from {:?} (vel {:?}, dt {}), keeping previous state",
            ball.pos,
            ball.vel,
            dt
        );
        Resolution {
            pos: ball.pos,
            vel: ball.vel,
            bounces: 0,
            capped: resolution.capped,
        }
    }
}

/// True when the whole ball fits inside the hole (strictly)
#[inline]
pub fn reached_goal(ball: &Ball, hole: &Hole) -> bool {
    (ball.pos - hole.pos).length() < hole.radius - ball.radius
}

/// Advance an in-play session by `dt` seconds
///
/// Returns true when the ball dropped into the hole on this tick; the session
/// is then `Won` and further ticks leave it untouched.
pub fn tick(session: &mut GameSession, input: &TickInput, dt: f32) -> bool {
    if session.phase != GamePhase::InPlay {
        return false;
    }

    let acceleration = tilt_acceleration(input.tilt, session.params().gravity);
    let params = session.collision_params();
    let resolution = step_ball(&session.ball, acceleration, dt, session.boundaries(), &params);

    session.ball.pos = resolution.pos;
    session.ball.vel = resolution.vel;

    if reached_goal(&session.ball, &session.hole) {
        log::info!("Ball reached the hole at {:?}", session.ball.pos);
        session.phase = GamePhase::Won;
        return true;
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::WallGrid;
    use crate::settings::{BounceSelection, Settings};
    use crate::sim::state::StartCorner;

    const DT: f32 = 0.033;

    fn in_play() -> GameSession {
        let maze = WallGrid::enclosed(5, 8);
        let mut session = GameSession::new(
            &maze,
            Vec2::new(500.0, 800.0),
            &Settings::default(),
            StartCorner { left: true, top: true },
        )
        .unwrap();
        session.start();
        session
    }

    fn params() -> CollisionParams {
        CollisionParams {
            ball_radius: 12.0,
            bounce: 2.0 / 3.0,
            selection: BounceSelection::FirstMatch,
        }
    }

    #[test]
    fn test_goal_boundary_is_exclusive() {
        let hole = Hole {
            pos: Vec2::new(50.0, 50.0),
            radius: 18.0,
        };
        let mut ball = Ball::new(Vec2::new(56.0, 50.0), 12.0);
        assert!(!reached_goal(&ball, &hole));

        ball.pos = Vec2::new(55.999, 50.0);
        assert!(reached_goal(&ball, &hole));

        ball.pos = Vec2::new(50.0, 50.0);
        assert!(reached_goal(&ball, &hole));
    }

    #[test]
    fn test_tilt_axis_inverted() {
        let accel = tilt_acceleration(Vec3::new(0.5, 0.25, -1.0), 1000.0);
        assert_eq!(accel, Vec2::new(-500.0, 250.0));
    }

    #[test]
    fn test_zero_motion_is_stable() {
        let mut session = in_play();
        let start = session.ball.pos;
        for _ in 0..500 {
            assert!(!tick(&mut session, &TickInput::default(), DT));
        }
        assert_eq!(session.ball.pos, start);
        assert_eq!(session.ball.vel, Vec2::ZERO);
    }

    #[test]
    fn test_semi_implicit_euler() {
        let ball = Ball::new(Vec2::new(200.0, 200.0), 12.0);
        let res = step_ball(&ball, Vec2::new(100.0, 0.0), 0.1, &[], &params());
        // Velocity first, then position with the new velocity
        assert!((res.vel - Vec2::new(10.0, 0.0)).length() < 1e-5);
        assert!((res.pos - Vec2::new(201.0, 200.0)).length() < 1e-4);
    }

    #[test]
    fn test_non_finite_step_keeps_previous_state() {
        let mut ball = Ball::new(Vec2::new(200.0, 200.0), 12.0);
        ball.vel = Vec2::new(3.0, -4.0);
        let res = step_ball(&ball, Vec2::new(f32::INFINITY, 0.0), 0.1, &[], &params());
        assert_eq!(res.pos, ball.pos);
        assert_eq!(res.vel, ball.vel);
    }

    #[test]
    fn test_ball_stays_inside_under_constant_tilt() {
        let mut session = in_play();
        let input = TickInput {
            tilt: Vec3::new(-0.8, 0.6, 0.0),
        };
        for _ in 0..300 {
            tick(&mut session, &input, DT);
            let p = session.ball.pos;
            assert!(p.is_finite());
            // Expanded outer walls sit 8 + 12 px inside the play area
            assert!(p.x >= 20.0 - 1e-2 && p.x <= 480.0 + 1e-2, "x escaped: {p:?}");
            assert!(p.y >= 20.0 - 1e-2 && p.y <= 780.0 + 1e-2, "y escaped: {p:?}");
        }
    }

    #[test]
    fn test_rolling_into_hole_wins() {
        let mut session = in_play();
        // Put the ball next to the hole and let gravity pull it in
        session.ball.pos = session.hole.pos - Vec2::new(30.0, 0.0);
        let input = TickInput {
            tilt: Vec3::new(-0.2, 0.0, 0.0),
        };

        let mut won = false;
        for _ in 0..200 {
            if tick(&mut session, &input, DT) {
                won = true;
                break;
            }
        }
        assert!(won);
        assert_eq!(session.phase, GamePhase::Won);

        // Won sessions stop moving
        let frozen = session.ball.pos;
        assert!(!tick(&mut session, &input, DT));
        assert_eq!(session.ball.pos, frozen);
    }

    #[test]
    fn test_setup_phase_does_not_tick() {
        let maze = WallGrid::enclosed(2, 2);
        let mut session = GameSession::new(
            &maze,
            Vec2::new(200.0, 200.0),
            &Settings::default(),
            StartCorner { left: false, top: false },
        )
        .unwrap();
        let start = session.ball.pos;
        let input = TickInput {
            tilt: Vec3::new(1.0, 1.0, 0.0),
        };
        assert!(!tick(&mut session, &input, DT));
        assert_eq!(session.ball.pos, start);
    }
}
