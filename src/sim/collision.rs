//! Collision detection and response against straight maze walls
//!
//! The tricky part of Tilt Maze: one step of ball motion can cross several walls
//! (a corner, or a fast ball between two close walls). Each wall is pushed out by
//! the ball radius and lengthened by it at both ends, so circle-vs-wall becomes
//! point-vs-segment against a closed outline with square corners. The step's
//! trajectory is then scanned repeatedly, bouncing off one wall per pass until a
//! full pass finds nothing to hit.

use glam::Vec2;

use super::segment::Segment2D;
use crate::consts::{CONTACT_SKIN, MIN_COLLISION_SPEED};
use crate::settings::BounceSelection;
use crate::wrap_angle;

/// Parameters for one resolution call
#[derive(Debug, Clone, Copy)]
pub struct CollisionParams {
    pub ball_radius: f32,
    /// Fraction of velocity kept per bounce
    pub bounce: f32,
    pub selection: BounceSelection,
}

/// Outcome of resolving one step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Bounces applied this step
    pub bounces: usize,
    /// The bounce cap stopped resolution early
    pub capped: bool,
}

/// A bounce that passed every finiteness check
#[derive(Debug, Clone, Copy)]
struct Bounce {
    contact: Vec2,
    pos: Vec2,
    vel: Vec2,
    /// Distance from the trajectory start to the crossing
    reach: f32,
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

/// Resolve wall bounces for a ball moving from `old_pos` toward `proposed`
///
/// The trajectory always starts at `old_pos`; after each bounce its end moves to
/// the bounced position and the whole wall list is scanned again. At most one
/// bounce per wall in the boundary set is applied; if more are needed the ball is
/// left at the last bounce point.
pub fn resolve_collisions(
    old_pos: Vec2,
    vel: Vec2,
    proposed: Vec2,
    boundaries: &[Segment2D],
    params: &CollisionParams,
) -> Resolution {
    let mut resolution = Resolution {
        pos: proposed,
        vel,
        bounces: 0,
        capped: false,
    };

    if vel.length() <= MIN_COLLISION_SPEED {
        return resolution;
    }

    let max_bounces = boundaries.len().max(1);
    let mut last_contact = None;

    loop {
        let trajectory = Segment2D::new(old_pos, resolution.pos);
        let Some(bounce) = find_bounce(&trajectory, resolution.vel, boundaries, params) else {
            break;
        };

        if resolution.bounces == max_bounces {
            log::warn!(
                "Bounce cap ({}) reached at {:?}, committing last contact",
                max_bounces,
                resolution.pos
            );
            resolution.pos = last_contact.unwrap_or(old_pos);
            resolution.capped = true;
            break;
        }

        log::trace!(
            "Bounce {} at {:?}, velocity {:?} -> {:?}",
            resolution.bounces + 1,
            bounce.contact,
            resolution.vel,
            bounce.vel
        );

        last_contact = Some(bounce.contact);
        resolution.pos = bounce.pos;
        resolution.vel = bounce.vel;
        resolution.bounces += 1;
    }

    resolution
}

/// One scan over the boundary set
fn find_bounce(
    trajectory: &Segment2D,
    vel: Vec2,
    boundaries: &[Segment2D],
    params: &CollisionParams,
) -> Option<Bounce> {
    let heading = trajectory.angle();
    let mut nearest: Option<Bounce> = None;

    for wall in boundaries {
        let normal = wall.normal();
        // Lengthened by the radius too, so faces meeting at a wall tip still close up
        let shifted = wall
            .shift_out(params.ball_radius * normal)
            .extend(params.ball_radius);

        let Some(intersection) = shifted.segment_intersection(trajectory) else {
            continue;
        };

        // Positive only when approaching the wall's face rather than its back
        if wrap_angle(wall.angle() - heading) <= 0.0 {
            continue;
        }

        let Some(bounce) = bounce_off(trajectory, intersection, vel, normal, params.bounce) else {
            continue;
        };

        match params.selection {
            BounceSelection::FirstMatch => return Some(bounce),
            BounceSelection::Nearest => {
                if nearest.is_none_or(|best| bounce.reach < best.reach) {
                    nearest = Some(bounce);
                }
            }
        }
    }

    nearest
}

/// Reflect at `intersection` and carry the leftover distance along the new heading
fn bounce_off(
    trajectory: &Segment2D,
    intersection: Vec2,
    vel: Vec2,
    normal: Vec2,
    bounce: f32,
) -> Option<Bounce> {
    let beyond = (trajectory.end - intersection).length();
    let vel = bounce * reflect_velocity(vel, normal);
    let heading = vel.try_normalize()?;
    let contact = intersection + normal * CONTACT_SKIN;
    let pos = contact + beyond * heading;

    (vel.is_finite() && contact.is_finite() && pos.is_finite()).then(|| Bounce {
        contact,
        pos,
        vel,
        reach: (intersection - trajectory.start).length(),
    })
}
