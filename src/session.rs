//! Outer game loop
//!
//! Owns one run: the asset table, the game state and the high-score store.
//! Pacing, input and presentation are supplied by the caller.

use std::time::Duration;

use anyhow::{Context, Result};

use crate::assets::{AssetProvider, AssetTable};
use crate::highscores::HighScoreStore;
use crate::platform::{FrameClock, InputSource};
use crate::renderer::{DisplaySink, compose};
use crate::settings::GameConfig;
use crate::sim::{GameState, TickInput, TickReport, tick};

/// Result of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Running(TickReport),
    GameOver(TickReport),
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    GameOver {
        score: u64,
        high_score: u64,
        new_record: bool,
    },
    /// Quit event received between frames; nothing persisted
    Quit,
}

/// A single play session
pub struct Session<S: HighScoreStore> {
    config: GameConfig,
    assets: AssetTable,
    state: GameState,
    store: S,
}

impl<S: HighScoreStore> Session<S> {
    /// Load assets through `provider` and start a run. Asset errors are fatal.
    pub fn new(
        config: GameConfig,
        provider: &mut dyn AssetProvider,
        store: S,
        seed: u64,
    ) -> Result<Self> {
        let assets =
            AssetTable::load(provider, &config.sheets).context("loading sprite sheets")?;
        Ok(Self::with_assets(config, assets, store, seed))
    }

    /// Start a run with an already loaded asset table
    pub fn with_assets(config: GameConfig, assets: AssetTable, store: S, seed: u64) -> Self {
        let high_score = store.load_or_default();
        log::info!("New run (seed {}, high score {})", seed, high_score);
        let state = GameState::new(seed, &config, &assets, high_score);
        Self {
            config,
            assets,
            state,
            store,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn assets(&self) -> &AssetTable {
        &self.assets
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Advance one logical frame
    pub fn step(&mut self, input: &TickInput) -> StepOutcome {
        let report = tick(&mut self.state, &self.assets, input);
        if self.state.is_over() {
            StepOutcome::GameOver(report)
        } else {
            StepOutcome::Running(report)
        }
    }

    /// Present the current state
    pub fn present(&self, display: &mut dyn DisplaySink) {
        compose(&self.state, &self.assets, display);
    }

    /// Run until collision or quit
    pub fn run(
        &mut self,
        display: &mut dyn DisplaySink,
        input: &mut dyn InputSource,
        clock: &mut dyn FrameClock,
    ) -> RunOutcome {
        self.run_with(display, input, clock, |keys, _, _| keys)
    }

    /// Run until collision or quit, letting `pilot` turn the sampled keys
    /// into the keys applied this frame. The pilot sees the state the tick
    /// starts from; quit events still come from `input`.
    pub fn run_with<F>(
        &mut self,
        display: &mut dyn DisplaySink,
        input: &mut dyn InputSource,
        clock: &mut dyn FrameClock,
        mut pilot: F,
    ) -> RunOutcome
    where
        F: FnMut(TickInput, &GameState, &AssetTable) -> TickInput,
    {
        loop {
            clock.wait_frame();

            if input.drain_events().iter().any(|e| e.terminates()) {
                log::info!("Quit after {} ticks", self.state.time_ticks);
                return RunOutcome::Quit;
            }

            let keys = pilot(input.sample(), &self.state, &self.assets);
            let outcome = self.step(&keys);
            self.present(display);

            if let StepOutcome::GameOver(_) = outcome {
                // Discard whatever was pressed while dying
                let _ = input.drain_events();
                clock.hold(Duration::from_secs_f32(self.config.game_over_hold_secs));
                return self.finish();
            }
        }
    }

    /// Reconcile and persist the high score (at most one write per run)
    pub fn finish(&mut self) -> RunOutcome {
        let tracker = &mut self.state.player.score;
        tracker.reconcile_high_score();
        let score = tracker.points();
        let high_score = tracker.high_score;
        let new_record = match tracker.take_persist_request() {
            Some(value) => {
                if let Err(e) = self.store.save(value) {
                    log::error!("Failed to save high score: {:#}", e);
                }
                true
            }
            None => false,
        };
        log::info!(
            "Game over: score {}, high score {}{}",
            score,
            high_score,
            if new_record { " (new record)" } else { "" }
        );
        RunOutcome::GameOver {
            score,
            high_score,
            new_record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ProceduralSprites;
    use crate::highscores::MemoryHighScoreStore;
    use crate::platform::{InputEvent, ManualClock, ScriptedInput};
    use crate::renderer::FrameRecorder;
    use crate::sim::Pose;

    fn session(store: MemoryHighScoreStore, seed: u64) -> Session<MemoryHighScoreStore> {
        Session::new(GameConfig::default(), &mut ProceduralSprites::new(), store, seed).unwrap()
    }

    #[test]
    fn test_run_until_collision_persists_once() {
        let mut session = session(MemoryHighScoreStore::default(), 3);
        let mut display = FrameRecorder::default();
        let mut input = ScriptedInput::constant(TickInput::default());
        let mut clock = ManualClock::default();

        let outcome = session.run(&mut display, &mut input, &mut clock);
        let RunOutcome::GameOver {
            score,
            high_score,
            new_record,
        } = outcome
        else {
            panic!("expected game over, got {:?}", outcome);
        };
        assert!(score > 0);
        assert_eq!(high_score, score);
        assert!(new_record);
        assert_eq!(session.store().saves, 1);
        assert_eq!(session.store().value, Some(score));
        assert_eq!(clock.held, Duration::from_secs(3));
        assert_eq!(display.frames_presented, clock.frames);
    }

    #[test]
    fn test_no_write_when_record_stands() {
        let mut session = session(MemoryHighScoreStore::with_score(1_000_000), 3);
        let outcome = session.run(
            &mut FrameRecorder::default(),
            &mut ScriptedInput::constant(TickInput::default()),
            &mut ManualClock::default(),
        );
        assert!(matches!(
            outcome,
            RunOutcome::GameOver {
                high_score: 1_000_000,
                new_record: false,
                ..
            }
        ));
        assert_eq!(session.store().saves, 0);
    }

    #[test]
    fn test_quit_between_frames() {
        let mut session = session(MemoryHighScoreStore::default(), 8);
        let mut input =
            ScriptedInput::constant(TickInput::default()).with_event(3, InputEvent::Quit);
        let mut clock = ManualClock::default();
        let outcome = session.run(&mut FrameRecorder::default(), &mut input, &mut clock);
        assert_eq!(outcome, RunOutcome::Quit);
        assert_eq!(session.state().time_ticks, 3);
        assert_eq!(session.store().saves, 0);
        assert_eq!(clock.held, Duration::ZERO);
    }

    #[test]
    fn test_pilot_drives_keys_and_quit_still_applies() {
        let mut session = session(MemoryHighScoreStore::default(), 8);
        let mut input =
            ScriptedInput::constant(TickInput::default()).with_event(4, InputEvent::ConfirmQuit);
        let mut seen = Vec::new();
        let outcome = session.run_with(
            &mut FrameRecorder::default(),
            &mut input,
            &mut ManualClock::default(),
            |keys, state, _| {
                assert_eq!(keys, TickInput::default());
                seen.push(state.time_ticks);
                TickInput {
                    duck: true,
                    ..keys
                }
            },
        );
        assert_eq!(outcome, RunOutcome::Quit);
        assert_eq!(seen, vec![0, 1, 2, 3]);
        assert_eq!(session.state().player.pose, Pose::Duck);
        assert_eq!(session.store().saves, 0);
    }

    #[test]
    fn test_asset_failure_is_fatal() {
        let mut config = GameConfig::default();
        config.sheets.clear();
        let result = Session::new(
            config,
            &mut ProceduralSprites::new(),
            MemoryHighScoreStore::default(),
            1,
        );
        assert!(result.is_err());
    }
}
