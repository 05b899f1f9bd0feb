//! Presentation notifications
//!
//! The simulation never draws or plays audio itself. It queues
//! [`Notification`]s that a host forwards to its renderer and mixer
//! through [`Presenter`]. Delivery is fire-and-forget.

use serde::{Deserialize, Serialize};

/// Sounds the core asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sound {
    /// Background music, requested once at load
    Music,
    /// Ball hit the paddle
    Ting,
    /// Ball escaped
    Slip,
    /// Ball passed over a star
    Clang,
}

impl Sound {
    pub fn name(&self) -> &'static str {
        match self {
            Sound::Music => "penguin-pong",
            Sound::Ting => "ting",
            Sound::Slip => "slip",
            Sound::Clang => "clang",
        }
    }
}

/// RGB colour, components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };
}

/// Something the presentation layer should do
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Notification {
    PlaySound(Sound),
    UpdateScore(u32),
    ShowBanner { text: String, duration: f32 },
    ShowPlayPrompt,
    HidePlayPrompt,
    SetBallColor(Color),
}

impl Notification {
    /// Forward to a presenter
    pub fn deliver<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        match self {
            Notification::PlaySound(sound) => presenter.notify_sound(*sound),
            Notification::UpdateScore(score) => presenter.update_score_display(*score),
            Notification::ShowBanner { text, duration } => presenter.show_banner(text, *duration),
            Notification::ShowPlayPrompt => presenter.show_play_prompt(),
            Notification::HidePlayPrompt => presenter.hide_play_prompt(),
            Notification::SetBallColor(color) => presenter.set_ball_color(*color),
        }
    }
}

/// Rendering/audio collaborator implemented by the host
pub trait Presenter {
    fn notify_sound(&mut self, sound: Sound);
    fn update_score_display(&mut self, score: u32);
    fn show_banner(&mut self, text: &str, duration: f32);
    fn show_play_prompt(&mut self);
    fn hide_play_prompt(&mut self);
    fn set_ball_color(&mut self, color: Color);
}

/// Deliver a batch of notifications in order
pub fn present_all<P: Presenter + ?Sized>(notifications: &[Notification], presenter: &mut P) {
    for note in notifications {
        note.deliver(presenter);
    }
}
