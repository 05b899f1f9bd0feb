//! Circle Keeper - keep the ball in the circle
//!
//! A single-player arcade game: a ball bounces around a circular arena
//! while the player rotates a C-shaped paddle to keep it from escaping
//! through the outer rectangle.
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, contacts, game state machine)
//! - `settings`: Data-driven game tuning
//!
//! Rendering and audio live outside this crate; the core talks to them
//! through [`sim::Presenter`].

pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

use glam::Vec2;
use rand::Rng;

/// Game configuration constants
pub mod consts {
    use std::f32::consts::FRAC_PI_2;

    /// Fixed simulation timestep (120 Hz for smooth physics)
    pub const SIM_DT: f32 = 1.0 / 120.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Arena dimensions
    pub const ARENA_WIDTH: f32 = 640.0;
    pub const ARENA_HEIGHT: f32 = 480.0;
    pub const CIRCLE_RADIUS: f32 = 220.0;
    pub const BOUNDARY_THICKNESS: f32 = 1.0;

    /// Ball defaults
    pub const BALL_RADIUS: f32 = 10.0;
    pub const BALL_SPEED: f32 = 300.0;
    pub const LAUNCH_X: f32 = 30.0;

    /// Paddle defaults - a "C" hugging the circle edge with a quarter gap
    pub const PADDLE_INNER_RADIUS: f32 = 210.0;
    pub const PADDLE_OUTER_RADIUS: f32 = 220.0;
    pub const PADDLE_GAP: f32 = FRAC_PI_2;
    pub const PADDLE_TURN_SECS: f32 = 0.2;
    pub const INTRO_SPIN_SECS: f32 = 1.5;

    /// Star power-ups
    pub const STAR_RADIUS: f32 = 10.0;
    pub const STAR_SPAWN_BAND: f32 = 80.0;
    pub const STAR_LIFETIME_SECS: f32 = 1.0;
    pub const STAR_END_SCALE: f32 = 0.4;
    pub const STAR_SPAWN_INTERVAL_SECS: f32 = 2.0;

    /// Countdown "3", "2", "1", "0" - 0.5s fade in + 0.5s fade out each
    pub const COUNTDOWN_FROM: u32 = 3;
    pub const COUNTDOWN_TICK_SECS: f32 = 1.0;

    /// Banners
    pub const GAME_OVER_BANNER_SECS: f32 = 2.5;
    pub const WELCOME_BANNER_SECS: f32 = 6.0;
    pub const WELCOME_TEXT: &str = "Keep the Ball in the Circle!";
    pub const GAME_OVER_TEXT: &str = "Game Over";

    pub const PLAY_BUTTON_HALF_SIZE: f32 = 32.0;
}

/// Wrap an angle to [0, 2π)
#[inline]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}

/// Signed rotation from `from` to `to` along the shortest path, in (-π, π]
#[inline]
pub fn shortest_arc(from: f32, to: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    let mut delta = (to - from).rem_euclid(TAU);
    if delta > PI {
        delta -= TAU;
    }
    delta
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Convert cartesian (x, y) to polar (r, theta)
#[inline]
pub fn cartesian_to_polar(pos: Vec2) -> (f32, f32) {
    (pos.length(), pos.y.atan2(pos.x))
}

/// Uniform sample in [min, max]
#[inline]
pub fn random_range<R: Rng + ?Sized>(rng: &mut R, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.random_range(min..=max)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;
    use std::f32::consts::{PI, TAU};

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(-PI / 2.0) - 1.5 * PI).abs() < 1e-5);
        assert!((wrap_angle(TAU + 0.25) - 0.25).abs() < 1e-5);
        assert_eq!(wrap_angle(0.0), 0.0);
        let w = wrap_angle(-1e-9);
        assert!((0.0..TAU).contains(&w));
    }

    #[test]
    fn test_shortest_arc_through_zero() {
        let delta = shortest_arc(350.0_f32.to_radians(), 10.0_f32.to_radians());
        assert!((delta - 20.0_f32.to_radians()).abs() < 1e-4);

        let back = shortest_arc(10.0_f32.to_radians(), 350.0_f32.to_radians());
        assert!((back + 20.0_f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_polar_round_trip_angle() {
        let p = polar_to_cartesian(5.0, PI / 3.0);
        let (r, theta) = cartesian_to_polar(p);
        assert!((r - 5.0).abs() < 1e-4);
        assert!((theta - PI / 3.0).abs() < 1e-4);
    }

    #[test]
    fn test_random_range_bounds() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..100 {
            let v = random_range(&mut rng, -80.0, 80.0);
            assert!((-80.0..=80.0).contains(&v));
        }
        assert_eq!(random_range(&mut rng, 3.0, 3.0), 3.0);
    }
}
