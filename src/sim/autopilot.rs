//! Demo mode - the computer plays
//!
//! Produces the pointer input a sensible player would: press play when
//! the prompt shows, open the gap toward the ball while it is outside the
//! circle, and put the middle of the paddle where the ball will meet the
//! rim once it is inside.

use glam::Vec2;

use super::state::{GamePhase, GameState};
use super::tick::TickInput;
use super::world::Shape;
use crate::polar_to_cartesian;

/// Extra clearance before treating the ball as inside the circle
const INSIDE_MARGIN: f32 = 5.0;

/// Where a point moving from `pos` along `vel` crosses a circle of
/// `radius` around the origin, if it is inside and moving
pub fn rim_crossing(pos: Vec2, vel: Vec2, radius: f32) -> Option<Vec2> {
    let a = vel.length_squared();
    if a < f32::EPSILON {
        return None;
    }
    let b = 2.0 * pos.dot(vel);
    let c = pos.length_squared() - radius * radius;
    let disc = b * b - 4.0 * a * c;
    if disc < 0.0 {
        return None;
    }
    let t = (-b + disc.sqrt()) / (2.0 * a);
    (t >= 0.0).then(|| pos + vel * t)
}

/// Scripted player
#[derive(Debug, Clone, Copy, Default)]
pub struct Autopilot;

impl Autopilot {
    /// Input for the next tick
    pub fn input(&self, state: &GameState) -> TickInput {
        let center = state.arena.center;
        let mut input = TickInput::default();

        if state.phase == GamePhase::Idle && state.prompt_visible {
            input.pointer_down = Some(center);
            return input;
        }

        let Some(ball) = state.ball_body().filter(|b| b.active) else {
            return input;
        };

        let rel = ball.pos - center;
        let Shape::Circle { radius } = ball.shape else {
            return input;
        };
        let arc = state.paddle.arc;
        let inside = rel.length() < arc.inner_radius - radius - INSIDE_MARGIN;

        // Paddle angle that puts the chosen feature at `heading`
        let theta = if inside {
            let hit = rim_crossing(rel, ball.vel, arc.inner_radius - radius).unwrap_or(rel);
            hit.y.atan2(hit.x) - arc.mid_angle()
        } else {
            rel.y.atan2(rel.x) - arc.gap_mid_angle()
        };

        input.pointer_move = Some(center + polar_to_cartesian(arc.outer_radius, theta));
        input
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Settings;
    use crate::consts::SIM_DT;
    use crate::sim::tick::tick;
    use crate::wrap_angle;
    use std::f32::consts::PI;

    fn angle_of(state: &GameState, pointer: Vec2) -> f32 {
        let d = pointer - state.arena.center;
        wrap_angle(d.y.atan2(d.x))
    }

    fn activate_ball(state: &mut GameState, pos: Vec2, vel: Vec2) {
        let ball = state.ball;
        let body = state.world.get_mut(ball).unwrap();
        body.pos = pos;
        body.vel = vel;
        body.active = true;
    }

    #[test]
    fn test_rim_crossing() {
        let hit = rim_crossing(Vec2::ZERO, Vec2::new(0.0, 10.0), 200.0).unwrap();
        assert!((hit - Vec2::new(0.0, 200.0)).length() < 1e-3);
        assert!(rim_crossing(Vec2::ZERO, Vec2::ZERO, 200.0).is_none());
    }

    #[test]
    fn test_presses_play_when_prompted() {
        let mut state = GameState::new(Settings::default());
        assert_eq!(Autopilot.input(&state), TickInput::default());
        state.prompt_visible = true;
        assert_eq!(Autopilot.input(&state).pointer_down, Some(state.arena.center));
    }

    #[test]
    fn test_opens_gap_to_incoming_ball() {
        let mut state = GameState::new(Settings::default());
        activate_ball(&mut state, Vec2::new(30.0, 240.0), Vec2::new(300.0, 0.0));
        let pointer = Autopilot.input(&state).pointer_move.unwrap();
        let theta = angle_of(&state, pointer);
        let gap_mid = state.paddle.arc.rotated(theta).gap_mid_angle();
        assert!((gap_mid - PI).abs() < 1e-3);
    }

    #[test]
    fn test_covers_rim_for_inside_ball() {
        let mut state = GameState::new(Settings::default());
        let center = state.arena.center;
        activate_ball(&mut state, center, Vec2::new(0.0, -300.0));
        let pointer = Autopilot.input(&state).pointer_move.unwrap();
        let theta = angle_of(&state, pointer);
        let arc = state.paddle.arc.rotated(theta);
        assert!((arc.mid_angle() - 1.5 * PI).abs() < 1e-3);
        assert!(arc.contains_angle(1.5 * PI));
    }

    #[test]
    fn test_demo_run_is_deterministic() {
        let run = || {
            let mut state = GameState::new(Settings::default());
            for _ in 0..(20.0 / SIM_DT) as u32 {
                let input = Autopilot.input(&state);
                tick(&mut state, &input, SIM_DT);
            }
            (state.phase, state.score, state.stars_spawned, state.time_ticks)
        };
        assert_eq!(run(), run());
    }
}
