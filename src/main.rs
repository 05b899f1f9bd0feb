//! Circle Keeper headless runner
//!
//! Plays a demo game with the autopilot at a steady 60 Hz host frame rate
//! and logs what a renderer and mixer would be asked to do.
//!
//! Usage: `circle-keeper [settings.json] [seconds]`

use circle_keeper::Settings;
use circle_keeper::sim::{
    Autopilot, Color, FrameClock, GameState, Presenter, Sound, present_all,
};

/// Host frame length fed to the frame clock
const FRAME_DT: f32 = 1.0 / 60.0;
const DEFAULT_SECONDS: f32 = 30.0;

/// Presenter that writes every notification to the log
struct LogPresenter;

impl Presenter for LogPresenter {
    fn notify_sound(&mut self, sound: Sound) {
        log::info!("Sound: {}", sound.name());
    }

    fn update_score_display(&mut self, score: u32) {
        log::info!("Score: {}", score);
    }

    fn show_banner(&mut self, text: &str, duration: f32) {
        log::info!("Banner: {:?} for {:.1}s", text, duration);
    }

    fn show_play_prompt(&mut self) {
        log::info!("Play prompt shown");
    }

    fn hide_play_prompt(&mut self) {
        log::info!("Play prompt hidden");
    }

    fn set_ball_color(&mut self, color: Color) {
        log::debug!("Ball color: ({:.2}, {:.2}, {:.2})", color.r, color.g, color.b);
    }
}

fn load_settings(path: Option<&str>) -> Settings {
    let Some(path) = path else {
        return Settings::default();
    };
    match Settings::load(path) {
        Ok(settings) => settings,
        Err(e) => {
            log::error!("Could not load settings from {}: {}", path, e);
            log::warn!("Falling back to default settings");
            Settings::default()
        }
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let settings = load_settings(args.first().map(String::as_str));
    let seconds = match args.get(1).map(|s| s.parse::<f32>()) {
        Some(Ok(secs)) if secs > 0.0 => secs,
        Some(_) => {
            log::warn!("Invalid duration, using {}s", DEFAULT_SECONDS);
            DEFAULT_SECONDS
        }
        None => DEFAULT_SECONDS,
    };

    log::info!("Circle Keeper starting (seed {:#x}, {}s)", settings.seed, seconds);

    let mut state = GameState::new(settings);
    let mut clock = FrameClock::new();
    let mut presenter = LogPresenter;
    let autopilot = Autopilot;

    let frames = (seconds / FRAME_DT).ceil() as u32;
    for _ in 0..frames {
        clock.push_input(autopilot.input(&state));
        clock.advance(&mut state, FRAME_DT);
        present_all(&state.drain_notifications(), &mut presenter);
    }

    log::info!("Ran {} ticks", state.time_ticks);
    println!("Final score: {}", state.score);
    println!("Phase: {:?}", state.phase);
}
