//! Arc geometry for the paddle
//!
//! The paddle is a "C": a band between `inner_radius` and `outer_radius`
//! starting at `theta_start` and sweeping counter-clockwise by `span`.
//! Its outline is a closed path of four pieces:
//! - inner arc (inner_radius, theta_start → theta_end)
//! - radial cap at theta_end
//! - outer arc (outer_radius, theta_end → theta_start)
//! - radial cap at theta_start
//!
//! All positions here are relative to the arc's center.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{polar_to_cartesian, wrap_angle};

/// A thick arc band in polar space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArcSegment {
    pub inner_radius: f32,
    pub outer_radius: f32,
    /// Start angle (radians, wrapped to [0, 2π))
    pub theta_start: f32,
    /// Counter-clockwise angular extent (radians, in (0, 2π))
    pub span: f32,
}

impl ArcSegment {
    pub fn new(inner_radius: f32, outer_radius: f32, theta_start: f32, span: f32) -> Self {
        Self {
            inner_radius,
            outer_radius,
            theta_start: wrap_angle(theta_start),
            span: span.clamp(0.0, std::f32::consts::TAU),
        }
    }

    /// End angle, wrapped to [0, 2π)
    #[inline]
    pub fn theta_end(&self) -> f32 {
        wrap_angle(self.theta_start + self.span)
    }

    /// Same arc turned by `delta` radians
    pub fn rotated(&self, delta: f32) -> Self {
        Self::new(
            self.inner_radius,
            self.outer_radius,
            self.theta_start + delta,
            self.span,
        )
    }

    /// Angle halfway along the band
    pub fn mid_angle(&self) -> f32 {
        wrap_angle(self.theta_start + self.span / 2.0)
    }

    /// Angle halfway across the opening
    pub fn gap_mid_angle(&self) -> f32 {
        let gap = std::f32::consts::TAU - self.span;
        wrap_angle(self.theta_start + self.span + gap / 2.0)
    }

    /// Check if an angle is within the arc's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        wrap_angle(theta - self.theta_start) <= self.span
    }

    /// Closest point on a circular edge of the given radius, limited to the span
    fn closest_on_edge(&self, point: Vec2, radius: f32) -> Vec2 {
        let theta = point.y.atan2(point.x);
        if self.contains_angle(theta) && point.length_squared() > f32::EPSILON {
            return point.normalize() * radius;
        }
        // Outside the span: nearest end of this edge
        let a = polar_to_cartesian(radius, self.theta_start);
        let b = polar_to_cartesian(radius, self.theta_end());
        if point.distance_squared(a) <= point.distance_squared(b) {
            a
        } else {
            b
        }
    }

    /// Closest point on the radial cap at angle `theta`
    fn closest_on_cap(&self, point: Vec2, theta: f32) -> Vec2 {
        let inner_point = polar_to_cartesian(self.inner_radius, theta);
        let outer_point = polar_to_cartesian(self.outer_radius, theta);

        let line_vec = outer_point - inner_point;
        let line_len_sq = line_vec.length_squared();
        if line_len_sq < 0.0001 {
            return inner_point; // Degenerate cap
        }

        let t = ((point - inner_point).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
        inner_point + line_vec * t
    }

    /// Closest point on the arc's outline
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let candidates = [
            self.closest_on_edge(point, self.inner_radius),
            self.closest_on_edge(point, self.outer_radius),
            self.closest_on_cap(point, self.theta_start),
            self.closest_on_cap(point, self.theta_end()),
        ];

        let mut best = candidates[0];
        for c in &candidates[1..] {
            if point.distance_squared(*c) < point.distance_squared(best) {
                best = *c;
            }
        }
        best
    }

    /// Check if a point lies inside the band
    pub fn contains_point(&self, point: Vec2) -> bool {
        let r = point.length();
        let theta = point.y.atan2(point.x);

        r >= self.inner_radius && r <= self.outer_radius && self.contains_angle(theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI, TAU};

    fn paddle() -> ArcSegment {
        ArcSegment::new(210.0, 220.0, 0.0, 1.5 * PI)
    }

    #[test]
    fn test_contains_angle_with_gap() {
        let arc = paddle();
        assert!(arc.contains_angle(0.1));
        assert!(arc.contains_angle(PI));
        assert!(arc.contains_angle(-PI)); // same as π
        assert!(!arc.contains_angle(-FRAC_PI_2 / 2.0)); // inside the gap (315°)
    }

    #[test]
    fn test_contains_angle_wraparound() {
        // Arc from 300° sweeping 120° to 60°
        let arc = ArcSegment::new(100.0, 110.0, 300.0_f32.to_radians(), 120.0_f32.to_radians());
        assert!(arc.contains_angle(0.0));
        assert!(arc.contains_angle(30.0_f32.to_radians()));
        assert!(!arc.contains_angle(PI));
        assert!((arc.theta_end() - 60.0_f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_rotated_wraps() {
        let arc = paddle().rotated(TAU + 0.5);
        assert!((arc.theta_start - 0.5).abs() < 1e-4);
        assert!((arc.span - 1.5 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_closest_point_on_inner_edge() {
        let arc = paddle();
        let p = polar_to_cartesian(190.0, FRAC_PI_2);
        let c = arc.closest_point(p);
        assert!((c - polar_to_cartesian(210.0, FRAC_PI_2)).length() < 1e-3);
    }

    #[test]
    fn test_closest_point_in_gap_uses_cap() {
        let arc = paddle();
        // Just past the end cap at 270°, in the gap
        let p = polar_to_cartesian(215.0, 1.5 * PI + 0.05);
        let c = arc.closest_point(p);
        let (r, theta) = crate::cartesian_to_polar(c);
        assert!(r > 210.0 && r < 220.0);
        assert!((wrap_angle(theta) - 1.5 * PI).abs() < 1e-3);
    }

    #[test]
    fn test_gap_and_mid_angles() {
        let arc = paddle();
        assert!((arc.mid_angle() - 0.75 * PI).abs() < 1e-5);
        assert!((arc.gap_mid_angle() - 1.75 * PI).abs() < 1e-5);
    }

    #[test]
    fn test_contains_point() {
        let arc = paddle();
        assert!(arc.contains_point(polar_to_cartesian(215.0, PI)));
        assert!(!arc.contains_point(polar_to_cartesian(200.0, PI)));
        assert!(!arc.contains_point(polar_to_cartesian(215.0, 1.75 * PI)));
    }
}
