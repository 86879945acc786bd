//! Directed line segment geometry for maze walls and ball trajectories
//!
//! A segment is defined by:
//! - start, end: endpoints in screen space (y grows downward)
//! - direction: normalized end - start
//! - normal: direction rotated by +90° (`Vec2::perp`), the side a wall faces

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Squared length below which a segment is treated as a point
const DEGENERATE_LENGTH_SQ: f32 = 1e-12;
/// Relative cross product below which two segments are treated as parallel
const PARALLEL_EPSILON: f32 = 1e-6;

/// A directed, finite line segment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment2D {
    pub start: Vec2,
    pub end: Vec2,
}

impl Segment2D {
    pub fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Vector from start to end
    #[inline]
    pub fn delta(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    pub fn length(&self) -> f32 {
        self.delta().length()
    }

    /// Unit direction (zero for a degenerate segment)
    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.delta().normalize_or_zero()
    }

    /// Unit normal: direction rotated by +90°
    #[inline]
    pub fn normal(&self) -> Vec2 {
        self.direction().perp()
    }

    /// Direction angle in radians, in (-π, π]
    #[inline]
    pub fn angle(&self) -> f32 {
        let d = self.direction();
        crate::wrap_angle(d.y.atan2(d.x))
    }

    /// The same segment translated by `offset`
    pub fn shift_out(&self, offset: Vec2) -> Self {
        Self {
            start: self.start + offset,
            end: self.end + offset,
        }
    }

    /// The same line lengthened by `amount` past each endpoint
    pub fn extend(&self, amount: f32) -> Self {
        let reach = self.direction() * amount;
        Self {
            start: self.start - reach,
            end: self.end + reach,
        }
    }

    /// Intersection point of two bounded segments
    ///
    /// Returns `None` for parallel, degenerate, non-finite, or non-overlapping segments.
    /// Only the finite extents are considered, never the infinite lines through them.
    pub fn segment_intersection(&self, other: &Segment2D) -> Option<Vec2> {
        let d1 = self.delta();
        let d2 = other.delta();
        let len1_sq = d1.length_squared();
        let len2_sq = d2.length_squared();

        if len1_sq < DEGENERATE_LENGTH_SQ || len2_sq < DEGENERATE_LENGTH_SQ {
            return None;
        }

        let cross = d1.perp_dot(d2);
        if !cross.is_finite() || cross.abs() <= PARALLEL_EPSILON * (len1_sq * len2_sq).sqrt() {
            return None;
        }

        let offset = other.start - self.start;
        let t = offset.perp_dot(d2) / cross;
        let u = offset.perp_dot(d1) / cross;

        if !(0.0..=1.0).contains(&t) || !(0.0..=1.0).contains(&u) {
            return None;
        }

        Some(self.start + d1 * t).filter(|p| Self::is_valid(*p))
    }

    /// Distance from a point to the closest point on this segment
    pub fn distance_to_point(&self, p: Vec2) -> f32 {
        let d = self.delta();
        let len_sq = d.length_squared();
        if len_sq < DEGENERATE_LENGTH_SQ {
            return (p - self.start).length();
        }
        let t = ((p - self.start).dot(d) / len_sq).clamp(0.0, 1.0);
        (p - (self.start + d * t)).length()
    }

    /// True if both components are finite
    #[inline]
    pub fn is_valid(v: Vec2) -> bool {
        v.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn test_normal_is_direction_rotated() {
        // Downward wall faces left
        let seg = Segment2D::new(Vec2::new(100.0, -50.0), Vec2::new(100.0, 50.0));
        assert!((seg.normal() - Vec2::new(-1.0, 0.0)).length() < 1e-6);

        // Rightward segment faces down (screen space)
        let seg = Segment2D::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((seg.normal() - Vec2::new(0.0, 1.0)).length() < 1e-6);
    }

    #[test]
    fn test_angle() {
        let right = Segment2D::new(Vec2::ZERO, Vec2::new(1.0, 0.0));
        assert!(right.angle().abs() < 1e-6);

        let up = Segment2D::new(Vec2::ZERO, Vec2::new(0.0, -1.0));
        assert!((up.angle() + PI / 2.0).abs() < 1e-6);

        let left = Segment2D::new(Vec2::ZERO, Vec2::new(-1.0, 0.0));
        assert!((left.angle() - PI).abs() < 1e-5);
    }

    #[test]
    fn test_shift_out() {
        let seg = Segment2D::new(Vec2::new(100.0, -50.0), Vec2::new(100.0, 50.0));
        let shifted = seg.shift_out(12.0 * seg.normal());
        assert!((shifted.start - Vec2::new(88.0, -50.0)).length() < 1e-4);
        assert!((shifted.end - Vec2::new(88.0, 50.0)).length() < 1e-4);
        // Original is untouched
        assert_eq!(seg.start, Vec2::new(100.0, -50.0));
    }

    #[test]
    fn test_crossing_segments_intersect() {
        let a = Segment2D::new(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0));
        let b = Segment2D::new(Vec2::new(-5.0, 2.0), Vec2::new(5.0, 2.0));
        let p = a.segment_intersection(&b).unwrap();
        assert!((p - Vec2::new(0.0, 2.0)).length() < 1e-5);
        let q = b.segment_intersection(&a).unwrap();
        assert!((p - q).length() < 1e-5);
    }

    #[test]
    fn test_bounded_not_infinite_lines() {
        // Infinite lines would meet at (0, 20), but the segments stop short
        let a = Segment2D::new(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0));
        let b = Segment2D::new(Vec2::new(-5.0, 20.0), Vec2::new(5.0, 20.0));
        assert!(a.segment_intersection(&b).is_none());
    }

    #[test]
    fn test_parallel_and_degenerate() {
        let a = Segment2D::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        let b = Segment2D::new(Vec2::new(0.0, 1.0), Vec2::new(10.0, 1.0));
        assert!(a.segment_intersection(&b).is_none());

        // Collinear overlap is also rejected
        let c = Segment2D::new(Vec2::new(5.0, 0.0), Vec2::new(15.0, 0.0));
        assert!(a.segment_intersection(&c).is_none());

        let point = Segment2D::new(Vec2::new(5.0, 0.0), Vec2::new(5.0, 0.0));
        assert!(a.segment_intersection(&point).is_none());
    }

    #[test]
    fn test_short_trajectory_still_intersects() {
        let wall = Segment2D::new(Vec2::new(0.0, -10.0), Vec2::new(0.0, 10.0));
        let step = Segment2D::new(Vec2::new(-0.0005, 0.0), Vec2::new(0.0005, 0.0));
        assert!(wall.segment_intersection(&step).is_some());
    }

    #[test]
    fn test_is_valid() {
        assert!(Segment2D::is_valid(Vec2::new(1.0, -2.0)));
        assert!(!Segment2D::is_valid(Vec2::new(f32::NAN, 0.0)));
        assert!(!Segment2D::is_valid(Vec2::new(0.0, f32::INFINITY)));
    }

    #[test]
    fn test_extend_lengthens_both_ends() {
        let seg = Segment2D::new(Vec2::new(92.0, -8.0), Vec2::new(92.0, 108.0)).extend(12.0);
        assert_eq!(seg.start, Vec2::new(92.0, -20.0));
        assert_eq!(seg.end, Vec2::new(92.0, 120.0));
        assert_eq!(seg.normal(), Vec2::new(-1.0, 0.0));

        let point = Segment2D::new(Vec2::ONE, Vec2::ONE).extend(12.0);
        assert_eq!(point.start, Vec2::ONE);
        assert_eq!(point.end, Vec2::ONE);
    }

    #[test]
    fn test_distance_to_point() {
        let seg = Segment2D::new(Vec2::ZERO, Vec2::new(10.0, 0.0));
        assert!((seg.distance_to_point(Vec2::new(5.0, 3.0)) - 3.0).abs() < 1e-6);
        assert!((seg.distance_to_point(Vec2::new(13.0, 4.0)) - 5.0).abs() < 1e-5);
    }
}
