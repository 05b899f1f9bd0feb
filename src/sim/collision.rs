//! Narrow-phase collision tests and response
//!
//! Every test takes a circle (the ball) and a shape, and reports the
//! closest surface point, the surface normal pointing toward the ball
//! center, and how deep the ball overlaps.

use glam::Vec2;

use super::arc::ArcSegment;

/// Result of a collision check
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    /// Collision point on the shape's surface
    pub point: Vec2,
    /// Surface normal at collision (pointing toward ball center, for reflection)
    pub normal: Vec2,
    /// Penetration depth (for position correction)
    pub penetration: f32,
}

/// Circle vs circle: center distance against the sum of radii
pub fn ball_circle_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    center: Vec2,
    radius: f32,
) -> Option<CollisionResult> {
    let offset = ball_pos - center;
    let dist = offset.length();
    let reach = ball_radius + radius;
    if dist > reach {
        return None;
    }

    let normal = if dist > f32::EPSILON {
        offset / dist
    } else {
        Vec2::X
    };
    Some(CollisionResult {
        point: center + normal * radius,
        normal,
        penetration: reach - dist,
    })
}

/// Circle vs axis-aligned rectangle, by clamping to the closest point
pub fn ball_rect_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    rect_center: Vec2,
    half_extents: Vec2,
) -> Option<CollisionResult> {
    let min = rect_center - half_extents;
    let max = rect_center + half_extents;
    let closest = ball_pos.clamp(min, max);
    let offset = ball_pos - closest;
    let dist_sq = offset.length_squared();

    if dist_sq > f32::EPSILON {
        let dist = dist_sq.sqrt();
        if dist >= ball_radius {
            return None;
        }
        return Some(CollisionResult {
            point: closest,
            normal: offset / dist,
            penetration: ball_radius - dist,
        });
    }

    // Ball center inside the rectangle: push out through the nearest side
    let to_min = ball_pos - min;
    let to_max = max - ball_pos;
    let sides = [
        (to_min.x, Vec2::NEG_X),
        (to_max.x, Vec2::X),
        (to_min.y, Vec2::NEG_Y),
        (to_max.y, Vec2::Y),
    ];
    let (depth, normal) = sides
        .into_iter()
        .fold(sides[0], |best, side| if side.0 < best.0 { side } else { best });

    Some(CollisionResult {
        point: ball_pos + normal * depth,
        normal,
        penetration: ball_radius + depth,
    })
}

/// Circle vs the paddle's "C" outline
///
/// `arc` is in the frame of `arc_center`; rotate it before calling.
pub fn ball_arc_collision(
    ball_pos: Vec2,
    ball_radius: f32,
    arc_center: Vec2,
    arc: &ArcSegment,
) -> Option<CollisionResult> {
    let local = ball_pos - arc_center;
    let closest = arc.closest_point(local);
    let offset = local - closest;
    let dist = offset.length();
    let inside = arc.contains_point(local);

    if !inside && dist >= ball_radius {
        return None;
    }

    let normal = if dist <= f32::EPSILON {
        // Center exactly on the outline: use the radial direction
        let radial = local.normalize_or_zero();
        let mid_radius = (arc.inner_radius + arc.outer_radius) / 2.0;
        if local.length() < mid_radius {
            -radial
        } else {
            radial
        }
    } else if inside {
        // Tunneled into the band: exit through the nearest edge
        -offset / dist
    } else {
        offset / dist
    };

    let penetration = if inside {
        ball_radius + dist
    } else {
        ball_radius - dist
    };

    Some(CollisionResult {
        point: arc_center + closest,
        normal,
        penetration,
    })
}

/// Reflect velocity off a surface
///
/// Standard reflection: v' = v - 2(v·n)n
#[inline]
pub fn reflect_velocity(velocity: Vec2, normal: Vec2) -> Vec2 {
    velocity - 2.0 * velocity.dot(normal) * normal
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::polar_to_cartesian;
    use proptest::prelude::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    fn paddle() -> ArcSegment {
        ArcSegment::new(210.0, 220.0, 0.0, 1.5 * PI)
    }

    #[test]
    fn test_reflect_velocity() {
        // Ball moving right, hits vertical wall (normal pointing left)
        let reflected = reflect_velocity(Vec2::new(300.0, 0.0), Vec2::new(-1.0, 0.0));
        assert!((reflected.x - (-300.0)).abs() < 0.001);
        assert!(reflected.y.abs() < 0.001);
    }

    #[test]
    fn test_circle_overlap_and_miss() {
        let hit = ball_circle_collision(Vec2::new(15.0, 0.0), 10.0, Vec2::ZERO, 10.0).unwrap();
        assert!((hit.penetration - 5.0).abs() < 1e-4);
        assert_eq!(hit.normal, Vec2::X);

        assert!(ball_circle_collision(Vec2::new(25.0, 0.0), 10.0, Vec2::ZERO, 10.0).is_none());
    }

    #[test]
    fn test_rect_side_hit() {
        // Right boundary of a 640 wide arena, 1 px thick
        let hit = ball_rect_collision(
            Vec2::new(630.0, 240.0),
            10.0,
            Vec2::new(639.5, 240.0),
            Vec2::new(0.5, 240.0),
        )
        .unwrap();
        assert_eq!(hit.normal, Vec2::NEG_X);
        assert!((hit.penetration - 1.0).abs() < 1e-4);
    }

    #[test]
    fn test_rect_miss() {
        let hit = ball_rect_collision(
            Vec2::new(30.0, 240.0),
            10.0,
            Vec2::new(0.5, 240.0),
            Vec2::new(0.5, 240.0),
        );
        assert!(hit.is_none());
    }

    #[test]
    fn test_rect_center_inside() {
        let hit = ball_rect_collision(
            Vec2::new(2.0, 50.0),
            10.0,
            Vec2::new(2.5, 50.0),
            Vec2::new(2.5, 50.0),
        )
        .unwrap();
        assert_eq!(hit.normal, Vec2::NEG_X);
        assert!((hit.penetration - 12.0).abs() < 1e-4);
    }

    #[test]
    fn test_arc_inner_edge_hit() {
        let center = Vec2::new(320.0, 240.0);
        let ball_pos = center + polar_to_cartesian(205.0, FRAC_PI_2);
        let hit = ball_arc_collision(ball_pos, 10.0, center, &paddle()).unwrap();
        // Normal points back toward the arena center
        assert!(hit.normal.dot(Vec2::Y) < -0.99);
        assert!((hit.penetration - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_arc_outer_edge_hit() {
        let center = Vec2::new(320.0, 240.0);
        let ball_pos = center + polar_to_cartesian(225.0, PI);
        let hit = ball_arc_collision(ball_pos, 10.0, center, &paddle()).unwrap();
        assert!(hit.normal.dot(Vec2::NEG_X) > 0.99);
    }

    #[test]
    fn test_arc_gap_passes() {
        let center = Vec2::ZERO;
        // Middle of the gap at 315°
        let ball_pos = polar_to_cartesian(215.0, 1.75 * PI);
        assert!(ball_arc_collision(ball_pos, 10.0, center, &paddle()).is_none());
    }

    #[test]
    fn test_arc_inside_band() {
        let ball_pos = polar_to_cartesian(211.0, PI);
        let hit = ball_arc_collision(ball_pos, 10.0, Vec2::ZERO, &paddle()).unwrap();
        // Nearest edge is the inner one, so push toward the center
        assert!(hit.normal.dot(Vec2::X) > 0.99);
        assert!((hit.penetration - 11.0).abs() < 1e-3);
    }

    #[test]
    fn test_arc_cap_hit() {
        // Ball in the gap just past the cap at 0°
        let ball_pos = polar_to_cartesian(215.0, -0.02);
        let hit = ball_arc_collision(ball_pos, 10.0, Vec2::ZERO, &paddle()).unwrap();
        assert!(hit.normal.y < 0.0);
    }

    proptest! {
        #[test]
        fn reflection_preserves_speed(angle in 0.0f32..std::f32::consts::TAU, speed in 1.0f32..1000.0) {
            let velocity = polar_to_cartesian(speed, angle);
            let normal = polar_to_cartesian(1.0, angle * 0.37 + 1.0);
            let reflected = reflect_velocity(velocity, normal);
            prop_assert!((reflected.length() - speed).abs() < speed * 1e-4);
        }

        #[test]
        fn arc_hits_preserve_speed(theta in 0.05f32..(1.5 * PI - 0.05), heading in -0.5f32..0.5) {
            let arc = paddle();
            let ball_pos = polar_to_cartesian(202.0, theta);
            let hit = ball_arc_collision(ball_pos, 10.0, Vec2::ZERO, &arc);
            prop_assert!(hit.is_some());
            let hit = hit.unwrap();
            let velocity = polar_to_cartesian(300.0, theta + heading);
            let reflected = reflect_velocity(velocity, hit.normal);
            prop_assert!((reflected.length() - 300.0).abs() < 0.05);
            // Moving back inward after the bounce
            prop_assert!(reflected.dot(ball_pos) < 0.0);
        }
    }
}
