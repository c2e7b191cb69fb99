//! Dino Runner - A side-scrolling reflex game
//!
//! Core modules:
//! - `sim`: Fixed-step simulation (physics, animation, spawning, collisions)
//! - `assets`: Opacity masks, frames and the shared asset table
//! - `renderer`: Draw-request composition for an external display sink
//! - `platform`: Frame clock and input sources
//! - `highscores`: Persisted high score
//! - `settings`: Data-driven game tuning

pub mod assets;
pub mod highscores;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use assets::{AssetTable, Frame, OpacityMask};
pub use highscores::{FileHighScoreStore, HighScoreStore, MemoryHighScoreStore};
pub use session::{RunOutcome, Session, StepOutcome};
pub use settings::GameConfig;

/// Nominal game constants (the defaults behind `GameConfig`)
pub mod consts {
    /// Logical frames per second; all velocities are per frame
    pub const FPS: u32 = 60;

    /// Play field dimensions
    pub const WIDTH: f32 = 1000.0;
    pub const HEIGHT: f32 = 700.0;

    /// Player physics
    pub const GRAVITY: f32 = 2.5;
    pub const JUMP_IMPULSE: f32 = -15.0;
    pub const PLAYER_X: f32 = 30.0;
    /// Fall counter gain per airborne tick
    pub const FALL_COUNTER_STEP: u32 = 2;

    /// Animation cadences (ticks per frame)
    pub const PLAYER_ANIM_CADENCE: u32 = 5;
    pub const OBSTACLE_ANIM_CADENCE: u32 = 15;

    /// World scroll
    pub const INITIAL_SCROLL_VELOCITY: f32 = 10.0;
    pub const MAX_SCROLL_VELOCITY: f32 = 30.0;
    pub const SPEED_FACTOR: f32 = 1.1;
    pub const CLOUD_VELOCITY: f32 = 5.0;
    pub const MAX_CLOUDS: usize = 4;

    /// Sky cycle (seconds)
    pub const DAYTIME_SECS: f32 = 20.0;
    pub const NIGHTTIME_SECS: f32 = 20.0;
    pub const SKYCHANGE_PERIOD: f32 = 2.0;

    /// Score
    pub const BASE_INCREMENT: f64 = 0.15;
    pub const INCREMENT_FACTOR: f64 = 1.1;
    pub const MAX_INCREMENT: f64 = 1.0;
    pub const MILESTONE_INTERVAL: f64 = 100.0;
    pub const MIN_SCORE_DIGITS: usize = 5;

    /// Seconds the final frame is held after a collision
    pub const GAME_OVER_HOLD_SECS: f32 = 3.0;
}
