//! Game tuning settings
//!
//! Every constant the simulation reads lives here so a host can load a
//! JSON tuning file instead of recompiling.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors from loading or validating settings
#[derive(Error, Debug)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    /// Settings JSON is malformed
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    /// A value is out of range
    #[error("invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Game tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Arena ===
    pub arena_width: f32,
    pub arena_height: f32,
    /// Radius of the circular play field (centered in the arena)
    pub circle_radius: f32,
    /// Thickness of the four outer boundary walls
    pub boundary_thickness: f32,

    // === Ball ===
    pub ball_radius: f32,
    /// Constant speed magnitude
    pub ball_speed: f32,
    /// Launch point at each new game (defaults to left edge, mid height)
    pub launch_point: Vec2,

    // === Paddle ===
    pub paddle_inner_radius: f32,
    pub paddle_outer_radius: f32,
    /// Angular width of the opening in the "C" (radians)
    pub paddle_gap: f32,
    /// Duration of a pointer-driven turn
    pub paddle_turn_secs: f32,
    /// Duration of the full-turn spin when the play prompt is about to show
    pub intro_spin_secs: f32,

    // === Stars ===
    pub star_radius: f32,
    /// Stars spawn within ± this distance of the arena center on each axis
    pub star_spawn_band: f32,
    pub star_lifetime_secs: f32,
    /// Collider scale at the end of a star's life
    pub star_end_scale: f32,
    pub star_spawn_interval_secs: f32,

    // === Sequencing ===
    pub countdown_from: u32,
    pub countdown_tick_secs: f32,
    pub game_over_banner_secs: f32,
    pub welcome_text: String,
    pub welcome_banner_secs: f32,
    pub play_button_half_size: f32,

    /// RNG seed for star placement and ball colours
    pub seed: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            arena_width: ARENA_WIDTH,
            arena_height: ARENA_HEIGHT,
            circle_radius: CIRCLE_RADIUS,
            boundary_thickness: BOUNDARY_THICKNESS,

            ball_radius: BALL_RADIUS,
            ball_speed: BALL_SPEED,
            launch_point: Vec2::new(LAUNCH_X, ARENA_HEIGHT / 2.0),

            paddle_inner_radius: PADDLE_INNER_RADIUS,
            paddle_outer_radius: PADDLE_OUTER_RADIUS,
            paddle_gap: PADDLE_GAP,
            paddle_turn_secs: PADDLE_TURN_SECS,
            intro_spin_secs: INTRO_SPIN_SECS,

            star_radius: STAR_RADIUS,
            star_spawn_band: STAR_SPAWN_BAND,
            star_lifetime_secs: STAR_LIFETIME_SECS,
            star_end_scale: STAR_END_SCALE,
            star_spawn_interval_secs: STAR_SPAWN_INTERVAL_SECS,

            countdown_from: COUNTDOWN_FROM,
            countdown_tick_secs: COUNTDOWN_TICK_SECS,
            game_over_banner_secs: GAME_OVER_BANNER_SECS,
            welcome_text: WELCOME_TEXT.to_string(),
            welcome_banner_secs: WELCOME_BANNER_SECS,
            play_button_half_size: PLAY_BUTTON_HALF_SIZE,

            seed: 0x5EED,
        }
    }
}

impl Settings {
    /// Parse settings from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Center of the arena (and of the circular play field)
    pub fn arena_center(&self) -> Vec2 {
        Vec2::new(self.arena_width / 2.0, self.arena_height / 2.0)
    }

    /// Angular span covered by the paddle
    pub fn paddle_span(&self) -> f32 {
        std::f32::consts::TAU - self.paddle_gap
    }

    /// Check every value is in range
    pub fn validate(&self) -> Result<(), SettingsError> {
        let finite = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("circle_radius", self.circle_radius),
            ("boundary_thickness", self.boundary_thickness),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("launch_point.x", self.launch_point.x),
            ("launch_point.y", self.launch_point.y),
            ("paddle_inner_radius", self.paddle_inner_radius),
            ("paddle_outer_radius", self.paddle_outer_radius),
            ("paddle_gap", self.paddle_gap),
            ("paddle_turn_secs", self.paddle_turn_secs),
            ("intro_spin_secs", self.intro_spin_secs),
            ("star_radius", self.star_radius),
            ("star_spawn_band", self.star_spawn_band),
            ("star_lifetime_secs", self.star_lifetime_secs),
            ("star_end_scale", self.star_end_scale),
            ("star_spawn_interval_secs", self.star_spawn_interval_secs),
            ("countdown_tick_secs", self.countdown_tick_secs),
            ("game_over_banner_secs", self.game_over_banner_secs),
            ("welcome_banner_secs", self.welcome_banner_secs),
            ("play_button_half_size", self.play_button_half_size),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(invalid(field, format!("must be finite, got {value}")));
            }
        }

        let positive = [
            ("arena_width", self.arena_width),
            ("arena_height", self.arena_height),
            ("circle_radius", self.circle_radius),
            ("boundary_thickness", self.boundary_thickness),
            ("ball_radius", self.ball_radius),
            ("ball_speed", self.ball_speed),
            ("paddle_inner_radius", self.paddle_inner_radius),
            ("star_radius", self.star_radius),
            ("star_end_scale", self.star_end_scale),
            ("play_button_half_size", self.play_button_half_size),
        ];
        for (field, value) in positive {
            if value <= 0.0 {
                return Err(invalid(field, format!("must be positive, got {value}")));
            }
        }

        // Anything shorter than a tick would fire more than once per step
        let durations = [
            ("paddle_turn_secs", self.paddle_turn_secs),
            ("intro_spin_secs", self.intro_spin_secs),
            ("star_lifetime_secs", self.star_lifetime_secs),
            ("star_spawn_interval_secs", self.star_spawn_interval_secs),
            ("countdown_tick_secs", self.countdown_tick_secs),
            ("game_over_banner_secs", self.game_over_banner_secs),
        ];
        for (field, value) in durations {
            if value < SIM_DT {
                return Err(invalid(
                    field,
                    format!("must be at least one tick ({SIM_DT}s), got {value}"),
                ));
            }
        }

        if self.welcome_banner_secs < 0.0 {
            return Err(invalid("welcome_banner_secs", "must not be negative"));
        }
        if self.star_spawn_band < 0.0 {
            return Err(invalid("star_spawn_band", "must not be negative"));
        }
        if 2.0 * self.circle_radius > self.arena_width.min(self.arena_height) {
            return Err(invalid("circle_radius", "circle does not fit inside the arena"));
        }
        if self.paddle_inner_radius >= self.paddle_outer_radius {
            return Err(invalid(
                "paddle_inner_radius",
                format!(
                    "must be below paddle_outer_radius ({})",
                    self.paddle_outer_radius
                ),
            ));
        }
        if !(self.paddle_gap > 0.0 && self.paddle_gap < std::f32::consts::TAU) {
            return Err(invalid("paddle_gap", "must be within (0, 2π)"));
        }
        let p = self.launch_point;
        if p.x < 0.0 || p.y < 0.0 || p.x > self.arena_width || p.y > self.arena_height {
            return Err(invalid("launch_point", format!("({}, {}) is outside the arena", p.x, p.y)));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> SettingsError {
    SettingsError::Invalid {
        field,
        reason: reason.into(),
    }
}
