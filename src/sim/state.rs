//! Game state and core simulation types
//!
//! [`GameState`] is the single context object the loop owns: the physics
//! world, the entities living in it, the phase machine, score, timers and
//! the outgoing presentation queue.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::arc::ArcSegment;
use super::dispatch::GameEvent;
use super::input::{InputMapper, RotationCommand};
use super::present::{Color, Notification, Sound};
use super::timer::{TimerHandle, TimerQueue};
use super::world::{Body, BodyId, Category, CategoryMask, Shape, World};
use crate::consts::GAME_OVER_TEXT;
use crate::{Settings, random_range};

/// Current phase of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for the player to press play
    Idle,
    /// "3", "2", "1", "0" before the ball launches
    Countdown,
    /// Ball in play, stars spawning, score counting
    Playing,
    /// Ball gone, banner showing
    GameOver,
}

impl GamePhase {
    /// Whether `self -> next` is a legal transition
    pub fn can_transition_to(self, next: GamePhase) -> bool {
        use GamePhase::*;
        matches!(
            (self, next),
            (Idle, Countdown) | (Countdown, Playing) | (Playing, GameOver) | (GameOver, Idle)
        )
    }
}

/// Deferred work scheduled on the timer queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Intro spin finished; show the play prompt
    PromptReady,
    /// Show the next countdown number
    CountdownTick { value: u32 },
    /// Countdown finished; launch the ball
    CountdownDone,
    /// Periodic star spawn while playing
    SpawnStar,
    /// Game-over banner finished
    BannerDone,
}

/// Fixed arena geometry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arena {
    pub width: f32,
    pub height: f32,
    pub center: Vec2,
    pub circle_radius: f32,
}

impl Arena {
    pub fn from_settings(settings: &Settings) -> Self {
        Self {
            width: settings.arena_width,
            height: settings.arena_height,
            center: settings.arena_center(),
            circle_radius: settings.circle_radius,
        }
    }

    /// The four boundary walls as (center, half extents)
    pub fn boundary_rects(&self, thickness: f32) -> [(Vec2, Vec2); 4] {
        let (w, h, t) = (self.width, self.height, thickness);
        [
            // left, bottom, top, right
            (Vec2::new(t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)),
            (Vec2::new(w / 2.0, t / 2.0), Vec2::new(w / 2.0, t / 2.0)),
            (Vec2::new(w / 2.0, h - t / 2.0), Vec2::new(w / 2.0, t / 2.0)),
            (Vec2::new(w - t / 2.0, h / 2.0), Vec2::new(t / 2.0, h / 2.0)),
        ]
    }
}

/// The player's C-shaped paddle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paddle {
    pub body: BodyId,
    /// Current rotation (radians, [0, 2π))
    pub angle: f32,
    /// Shape at rotation zero
    pub arc: ArcSegment,
    /// In-flight rotation, if any
    pub command: Option<RotationCommand>,
}

impl Paddle {
    /// The paddle arc at its current rotation
    pub fn as_arc(&self) -> ArcSegment {
        self.arc.rotated(self.angle)
    }

    /// Start a rotation, replacing any in flight
    pub fn rotate(&mut self, command: RotationCommand) {
        self.command = Some(command);
    }

    /// Drop the in-flight rotation, leaving the paddle where it is
    pub fn stop(&mut self) {
        self.command = None;
    }

    /// Advance the in-flight rotation
    pub fn advance(&mut self, dt: f32) {
        if let Some(cmd) = self.command.as_mut() {
            self.angle = cmd.advance(dt);
            if cmd.is_done() {
                self.command = None;
            }
        }
    }
}

/// A star power-up: a circle the ball passes over, shrinking until it expires
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Star {
    pub body: BodyId,
    pub age: f32,
    pub lifetime: f32,
    pub base_radius: f32,
    pub end_scale: f32,
}

impl Star {
    /// Current size relative to spawn size
    pub fn scale(&self) -> f32 {
        let t = (self.age / self.lifetime).clamp(0.0, 1.0);
        1.0 + (self.end_scale - 1.0) * t
    }

    pub fn radius(&self) -> f32 {
        self.base_radius * self.scale()
    }

    pub fn expired(&self) -> bool {
        self.age >= self.lifetime
    }
}

/// Complete game state
///
/// Presentation requests pile up in an internal queue until the host
/// takes them with [`drain_notifications`](Self::drain_notifications).
/// Hosts must drain once per frame (after [`FrameClock::advance`] or the
/// last [`tick`]) or the queue grows without bound.
///
/// [`FrameClock::advance`]: super::tick::FrameClock::advance
/// [`tick`]: super::tick::tick
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub arena: Arena,
    pub world: World,
    pub phase: GamePhase,
    pub score: u32,
    pub ball: BodyId,
    pub paddle: Paddle,
    pub boundaries: [BodyId; 4],
    /// Live stars (oldest first)
    pub stars: Vec<Star>,
    /// Play prompt is on screen and accepts a press
    pub prompt_visible: bool,
    pub timers: TimerQueue<TimerEvent>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Stars spawned since load
    pub stars_spawned: u64,
    input: InputMapper,
    rng: Pcg32,
    star_timer: Option<TimerHandle>,
    countdown_timer: Option<TimerHandle>,
    banner_timer: Option<TimerHandle>,
    prompt_timer: Option<TimerHandle>,
    notifications: Vec<Notification>,
}

impl GameState {
    /// Build the arena and enter Idle
    ///
    /// Settings that fail [`Settings::validate`] are replaced by the
    /// defaults.
    pub fn new(settings: Settings) -> Self {
        let settings = match settings.validate() {
            Ok(()) => settings,
            Err(e) => {
                log::error!("{e}; falling back to default settings");
                Settings::default()
            }
        };
        let arena = Arena::from_settings(&settings);
        let mut world = World::new();

        let boundaries = arena
            .boundary_rects(settings.boundary_thickness)
            .map(|(center, half_extents)| {
                world.insert(
                    Body::fixed(Category::Boundary, Shape::Rect { half_extents }, center)
                        .collides_with(CategoryMask::BALL)
                        .notifies_on(CategoryMask::BALL),
                )
            });

        let arc = ArcSegment::new(
            settings.paddle_inner_radius,
            settings.paddle_outer_radius,
            0.0,
            settings.paddle_span(),
        );
        let paddle_body = world.insert(
            Body::fixed(Category::Player, Shape::Arc(arc), arena.center)
                .collides_with(CategoryMask::BALL)
                .notifies_on(CategoryMask::BALL),
        );

        // Ball starts at the center, out of play until the first countdown ends
        let ball = world.insert(
            Body::dynamic(
                Category::Ball,
                Shape::Circle {
                    radius: settings.ball_radius,
                },
                arena.center,
            )
            .collides_with(CategoryMask::BOUNDARY | CategoryMask::PLAYER)
            .notifies_on(CategoryMask::BOUNDARY | CategoryMask::PLAYER | CategoryMask::STAR)
            .with_velocity(Vec2::new(settings.ball_speed, 0.0))
            .inactive(),
        );

        let mut state = Self {
            input: InputMapper::new(arena.center, settings.paddle_turn_secs),
            rng: Pcg32::seed_from_u64(settings.seed),
            arena,
            world,
            phase: GamePhase::Idle,
            score: 0,
            ball,
            paddle: Paddle {
                body: paddle_body,
                angle: 0.0,
                arc,
                command: None,
            },
            boundaries,
            stars: Vec::new(),
            prompt_visible: false,
            timers: TimerQueue::new(),
            time_ticks: 0,
            stars_spawned: 0,
            star_timer: None,
            countdown_timer: None,
            banner_timer: None,
            prompt_timer: None,
            notifications: Vec::new(),
            settings,
        };

        log::info!(
            "Arena {}x{} ready, circle radius {}",
            state.arena.width,
            state.arena.height,
            state.arena.circle_radius
        );
        state.notify(Notification::PlaySound(Sound::Music));
        if state.settings.welcome_banner_secs > 0.0 {
            state.notify(Notification::ShowBanner {
                text: state.settings.welcome_text.clone(),
                duration: state.settings.welcome_banner_secs,
            });
        }
        state.begin_idle();
        state
    }

    fn notify(&mut self, note: Notification) {
        self.notifications.push(note);
    }

    /// Pending presentation notifications
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    /// Take pending presentation notifications
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    /// The ball body
    pub fn ball_body(&self) -> Option<&Body> {
        self.world.get(self.ball)
    }

    /// Ball is in play
    pub fn ball_active(&self) -> bool {
        self.ball_body().is_some_and(|b| b.active)
    }

    /// Whether a star-spawn timer is pending
    pub fn star_timer_active(&self) -> bool {
        self.star_timer.is_some_and(|h| self.timers.is_pending(h))
    }

    fn set_phase(&mut self, next: GamePhase) -> bool {
        if !self.phase.can_transition_to(next) {
            log::error!("Refused phase transition {:?} -> {:?}", self.phase, next);
            debug_assert!(false, "illegal transition {:?} -> {:?}", self.phase, next);
            return false;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, next);
        self.phase = next;
        true
    }

    // --- Input ---

    /// Turn the paddle toward the pointer (accepted in every phase)
    pub fn on_pointer_move(&mut self, pointer: Vec2) {
        let command = self.input.on_pointer_move(self.paddle.angle, pointer);
        self.paddle.rotate(command);
    }

    /// Press at a point; starts a game if it lands on the play prompt
    pub fn on_pointer_down(&mut self, pointer: Vec2) -> bool {
        if self.play_button_contains(pointer) {
            self.request_play()
        } else {
            false
        }
    }

    /// Whether a point lies on the play button
    pub fn play_button_contains(&self, point: Vec2) -> bool {
        let offset = (point - self.arena.center).abs();
        let half = self.settings.play_button_half_size;
        offset.x <= half && offset.y <= half
    }

    /// Start a new game if the play prompt is showing
    pub fn request_play(&mut self) -> bool {
        if self.phase != GamePhase::Idle || !self.prompt_visible {
            log::debug!("Play ignored in {:?} (prompt visible: {})", self.phase, self.prompt_visible);
            return false;
        }
        self.prompt_visible = false;
        self.notify(Notification::HidePlayPrompt);
        self.start_countdown();
        true
    }

    // --- Phase entry ---

    /// Spin the paddle a full turn, then show the play prompt
    fn begin_idle(&mut self) {
        self.prompt_visible = false;
        cancel_timer(&mut self.timers, &mut self.banner_timer);
        let spin = self.settings.intro_spin_secs;
        self.paddle.rotate(RotationCommand::by(
            self.paddle.angle,
            std::f32::consts::TAU,
            spin,
        ));
        cancel_timer(&mut self.timers, &mut self.prompt_timer);
        self.prompt_timer = Some(self.timers.schedule(spin, TimerEvent::PromptReady));
    }

    fn start_countdown(&mut self) {
        if !self.set_phase(GamePhase::Countdown) {
            return;
        }
        cancel_timer(&mut self.timers, &mut self.countdown_timer);
        self.score = 0;
        self.notify(Notification::UpdateScore(0));
        self.show_countdown(self.settings.countdown_from);
    }

    fn show_countdown(&mut self, value: u32) {
        let secs = self.settings.countdown_tick_secs;
        self.notify(Notification::ShowBanner {
            text: value.to_string(),
            duration: secs,
        });
        let next = if value == 0 {
            TimerEvent::CountdownDone
        } else {
            TimerEvent::CountdownTick { value: value - 1 }
        };
        self.countdown_timer = Some(self.timers.schedule(secs, next));
    }

    fn start_playing(&mut self) {
        if !self.set_phase(GamePhase::Playing) {
            return;
        }
        let launch = self.settings.launch_point;
        let speed = self.settings.ball_speed;
        if let Some(ball) = self.world.get_mut(self.ball) {
            ball.pos = launch;
            ball.vel = Vec2::new(speed, 0.0);
        }
        self.world.set_active(self.ball, true);

        // Never leave a second spawner running
        cancel_timer(&mut self.timers, &mut self.star_timer);
        self.star_timer = Some(
            self.timers
                .schedule_repeating(self.settings.star_spawn_interval_secs, TimerEvent::SpawnStar),
        );
        log::info!("Ball launched from ({}, {})", launch.x, launch.y);
    }

    fn game_over(&mut self) {
        if !self.set_phase(GamePhase::GameOver) {
            return;
        }
        self.world.set_active(self.ball, false);
        cancel_timer(&mut self.timers, &mut self.star_timer);
        self.paddle.stop();

        let secs = self.settings.game_over_banner_secs;
        self.notify(Notification::ShowBanner {
            text: GAME_OVER_TEXT.to_string(),
            duration: secs,
        });
        self.banner_timer = Some(self.timers.schedule(secs, TimerEvent::BannerDone));
        log::info!("Game over with score {}", self.score);
    }

    // --- Timers and contact events ---

    /// React to a fired timer
    pub fn handle_timer(&mut self, handle: TimerHandle, event: TimerEvent) {
        match event {
            TimerEvent::PromptReady => {
                if self.prompt_timer == Some(handle) {
                    self.prompt_timer = None;
                }
                self.prompt_visible = true;
                self.notify(Notification::ShowPlayPrompt);
            }
            TimerEvent::CountdownTick { value } => {
                self.countdown_timer = None;
                self.show_countdown(value);
            }
            TimerEvent::CountdownDone => {
                self.countdown_timer = None;
                self.start_playing();
            }
            TimerEvent::SpawnStar => {
                debug_assert_eq!(self.phase, GamePhase::Playing);
                self.spawn_star();
            }
            TimerEvent::BannerDone => {
                self.banner_timer = None;
                if self.set_phase(GamePhase::Idle) {
                    self.begin_idle();
                }
            }
        }
    }

    /// React to a contact event
    pub fn handle_event(&mut self, event: GameEvent) {
        match event {
            GameEvent::Score { .. } => {
                self.score += 1;
                self.notify(Notification::UpdateScore(self.score));
                let color = self.random_color();
                self.notify(Notification::SetBallColor(color));
                self.notify(Notification::PlaySound(Sound::Ting));
            }
            GameEvent::OutOfBounds { .. } => {
                if self.phase == GamePhase::Playing {
                    self.game_over();
                }
                self.notify(Notification::PlaySound(Sound::Slip));
            }
            GameEvent::StarHit { .. } => {
                self.notify(Notification::PlaySound(Sound::Clang));
            }
        }
    }

    fn random_color(&mut self) -> Color {
        Color {
            r: random_range(&mut self.rng, 0.0, 1.0),
            g: random_range(&mut self.rng, 0.0, 1.0),
            b: random_range(&mut self.rng, 0.0, 1.0),
        }
    }

    // --- Entities ---

    /// Drop a star at a random spot near the center
    pub fn spawn_star(&mut self) -> BodyId {
        let band = self.settings.star_spawn_band;
        let offset = Vec2::new(
            random_range(&mut self.rng, -band, band),
            random_range(&mut self.rng, -band, band),
        );
        let pos = self.arena.center + offset;
        let radius = self.settings.star_radius;
        let body = self.world.insert(
            Body::fixed(Category::Star, Shape::Circle { radius }, pos)
                .notifies_on(CategoryMask::BALL),
        );
        self.stars.push(Star {
            body,
            age: 0.0,
            lifetime: self.settings.star_lifetime_secs,
            base_radius: radius,
            end_scale: self.settings.star_end_scale,
        });
        self.stars_spawned += 1;
        log::debug!("Star #{} at ({:.1}, {:.1})", body.0, pos.x, pos.y);
        body
    }

    /// Shrink stars and remove the expired ones
    pub fn age_stars(&mut self, dt: f32) {
        let world = &mut self.world;
        self.stars.retain_mut(|star| {
            star.age += dt;
            if star.expired() {
                world.remove(star.body);
                return false;
            }
            if let Some(body) = world.get_mut(star.body) {
                body.shape = Shape::Circle {
                    radius: star.radius(),
                };
            }
            true
        });
    }

    /// Advance the paddle rotation and move its collider to match
    pub fn advance_paddle(&mut self, dt: f32) {
        self.paddle.advance(dt);
        if let Some(body) = self.world.get_mut(self.paddle.body) {
            body.rotation = self.paddle.angle;
        }
    }
}

/// Cancel the timer in `slot`, if any
fn cancel_timer(timers: &mut TimerQueue<TimerEvent>, slot: &mut Option<TimerHandle>) {
    if let Some(handle) = slot.take() {
        timers.cancel(handle);
    }
}
