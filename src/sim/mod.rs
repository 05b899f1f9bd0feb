//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (by body ID)
//! - No rendering or audio; presentation goes out as notifications

pub mod arc;
pub mod autopilot;
pub mod collision;
pub mod dispatch;
pub mod input;
pub mod present;
pub mod state;
pub mod tick;
pub mod timer;
pub mod world;

pub use arc::ArcSegment;
pub use autopilot::Autopilot;
pub use collision::{CollisionResult, ball_arc_collision, reflect_velocity};
pub use dispatch::{GameEvent, dispatch};
pub use input::{InputMapper, PointerEvent, RotationCommand};
pub use present::{Color, Notification, Presenter, Sound, present_all};
pub use state::{Arena, GamePhase, GameState, Paddle, Star, TimerEvent};
pub use tick::{FrameClock, TickInput, tick};
pub use timer::{TimerHandle, TimerQueue};
pub use world::{Body, BodyId, Category, CategoryMask, Contact, Shape, World};
