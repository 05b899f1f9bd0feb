//! Fixed timestep simulation tick
//!
//! Core game loop that advances simulation deterministically. One tick:
//! 1. apply pointer input
//! 2. fire due timers (countdown, star spawns, banners)
//! 3. turn the paddle
//! 4. age stars
//! 5. step physics
//! 6. dispatch contacts into the state machine

use glam::Vec2;

use super::dispatch::dispatch;
use super::input::PointerEvent;
use super::state::GameState;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};

/// Input gathered for a single tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickInput {
    /// Latest pointer position (turns the paddle)
    pub pointer_move: Option<Vec2>,
    /// Pointer pressed (play button)
    pub pointer_down: Option<Vec2>,
}

impl TickInput {
    /// Fold newer input into this one (latest move wins)
    pub fn merge(&mut self, newer: TickInput) {
        if newer.pointer_move.is_some() {
            self.pointer_move = newer.pointer_move;
        }
        if newer.pointer_down.is_some() {
            self.pointer_down = newer.pointer_down;
        }
    }
}

impl From<PointerEvent> for TickInput {
    fn from(event: PointerEvent) -> Self {
        match event {
            PointerEvent::Down(pos) => TickInput {
                pointer_down: Some(pos),
                ..Default::default()
            },
            PointerEvent::Move(pos) => TickInput {
                pointer_move: Some(pos),
                ..Default::default()
            },
        }
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput, dt: f32) {
    state.time_ticks += 1;

    if let Some(pos) = input.pointer_move {
        state.on_pointer_move(pos);
    }
    if let Some(pos) = input.pointer_down {
        state.on_pointer_down(pos);
    }

    state.timers.advance(dt);
    while let Some((handle, event)) = state.timers.pop_due() {
        state.handle_timer(handle, event);
    }

    state.advance_paddle(dt);
    state.age_stars(dt);

    let contacts = state.world.step(dt);
    for event in dispatch(&contacts) {
        state.handle_event(event);
    }
}

/// Converts variable host frames into fixed ticks
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    accumulator: f32,
    pending: TickInput,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue input for the next tick
    pub fn push_input(&mut self, input: TickInput) {
        self.pending.merge(input);
    }

    /// Run as many fixed ticks as `frame_dt` covers; returns the count
    ///
    /// Queued input goes to the first tick. Long frames are clamped and
    /// capped at `MAX_SUBSTEPS` so a stall cannot spiral.
    pub fn advance(&mut self, state: &mut GameState, frame_dt: f32) -> u32 {
        self.accumulator += frame_dt.clamp(0.0, 0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = std::mem::take(&mut self.pending);
            tick(state, &input, SIM_DT);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }
}
