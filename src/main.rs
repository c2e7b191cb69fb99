//! Dino Runner entry point
//!
//! Headless native runner: procedural sprites, an autopilot at the keys and
//! a display that only logs. Real front ends plug their own collaborators
//! into `Session`.
//!
//! Usage: `dino-runner [FRAMES]`; with FRAMES the run quits after that many
//! frames if the autopilot is still alive.

use anyhow::Result;
use directories::ProjectDirs;
use glam::Vec2;

use dino_runner::assets::{FrameRef, ProceduralSprites};
use dino_runner::highscores::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
use dino_runner::platform::{FixedRateClock, InputEvent, ScriptedInput};
use dino_runner::renderer::DisplaySink;
use dino_runner::sim::{FlyingSlot, GameState, Rgb, TickInput};
use dino_runner::{AssetTable, GameConfig, RunOutcome, Session};

/// Display that counts requests and logs a summary now and then
#[derive(Default)]
struct LogDisplay {
    draws: usize,
    frames: u64,
    sky: Option<Rgb>,
}

impl DisplaySink for LogDisplay {
    fn fill(&mut self, color: Rgb) {
        self.sky = Some(color);
        self.draws = 0;
    }

    fn draw(&mut self, _frame: FrameRef, _pos: Vec2) {
        self.draws += 1;
    }

    fn present(&mut self) {
        self.frames += 1;
        if self.frames % 300 == 0 {
            log::debug!(
                "Frame {}: {} draws, sky {:?}",
                self.frames,
                self.draws,
                self.sky
            );
        }
    }
}

/// Jumps whatever is about to reach the runner, unless it flies overhead
fn autopilot(state: &GameState, assets: &AssetTable) -> TickInput {
    let player = &state.player;
    let player_right = player.pos.x + assets.frame(player.frame()).width() as f32;
    let lookahead = state.world.velocity * 6.0;

    let threat = state
        .obstacles
        .iter()
        .filter(|o| o.pos.x + o.width(assets) > player.pos.x)
        .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x));

    match threat {
        Some(o) if o.slot == Some(FlyingSlot::High) => TickInput::default(),
        Some(o) if o.pos.x - player_right < lookahead => TickInput {
            jump: true,
            duck: false,
        },
        _ => TickInput::default(),
    }
}

fn play<S: HighScoreStore>(mut session: Session<S>, frame_limit: Option<u64>) -> RunOutcome {
    let mut display = LogDisplay::default();
    let mut clock = FixedRateClock::new(session.config().fps);
    // No keyboard here: the only event is the optional frame limit
    let mut events = match frame_limit {
        Some(frames) => ScriptedInput::default().with_event(frames, InputEvent::ConfirmQuit),
        None => ScriptedInput::default(),
    };
    session.run_with(&mut display, &mut events, &mut clock, |_, state, assets| {
        autopilot(state, assets)
    })
}

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Dino Runner (headless) starting...");

    let config = ProjectDirs::from("", "", "dino-runner")
        .map(|dirs| GameConfig::load(&dirs.config_dir().join("config.json")))
        .unwrap_or_default();
    let seed: u64 = rand::random();
    let frame_limit = std::env::args().nth(1).and_then(|arg| arg.parse().ok());
    let mut sprites = ProceduralSprites::new();

    let outcome = match FileHighScoreStore::in_data_dir() {
        Ok(store) => {
            log::info!("High score file: {}", store.path().display());
            play(Session::new(config, &mut sprites, store, seed)?, frame_limit)
        }
        Err(e) => {
            log::warn!("{:#}; high score will not be kept", e);
            let store = MemoryHighScoreStore::default();
            play(Session::new(config, &mut sprites, store, seed)?, frame_limit)
        }
    };

    match outcome {
        RunOutcome::GameOver {
            score,
            high_score,
            new_record,
        } => {
            println!("Score: {:05}  High: {:05}", score, high_score);
            if new_record {
                println!("New high score!");
            }
        }
        RunOutcome::Quit => println!("Stopped before the run ended"),
    }
    Ok(())
}
