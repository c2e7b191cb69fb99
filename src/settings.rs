//! Game tuning and sprite-sheet manifest
//!
//! Every tunable the simulation reads lives here. Defaults reproduce the
//! classic game; a JSON file can override any subset of fields.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::*;

/// What a sprite sheet is used for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetRole {
    PlayerRun,
    PlayerDuck,
    PlayerJump,
    Ground,
    Cloud,
    Digits,
    HighLabel,
    GroundObstacle,
    FlyingObstacle,
}

impl SheetRole {
    /// Roles the asset table cannot work without (obstacles are checked as a group)
    pub const REQUIRED: [SheetRole; 7] = [
        SheetRole::PlayerRun,
        SheetRole::PlayerDuck,
        SheetRole::PlayerJump,
        SheetRole::Ground,
        SheetRole::Cloud,
        SheetRole::Digits,
        SheetRole::HighLabel,
    ];

    pub fn is_obstacle(&self) -> bool {
        matches!(self, SheetRole::GroundObstacle | SheetRole::FlyingObstacle)
    }
}

/// One pre-sliced sprite sheet: a logical name and its frame count
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSpec {
    pub name: String,
    pub frames: u32,
    pub role: SheetRole,
}

impl SheetSpec {
    pub fn new(name: &str, frames: u32, role: SheetRole) -> Self {
        Self {
            name: name.to_string(),
            frames,
            role,
        }
    }
}

fn default_sheets() -> Vec<SheetSpec> {
    vec![
        SheetSpec::new("dino_run", 2, SheetRole::PlayerRun),
        SheetSpec::new("dino_duck", 2, SheetRole::PlayerDuck),
        SheetSpec::new("dino_jump", 1, SheetRole::PlayerJump),
        SheetSpec::new("ground", 1, SheetRole::Ground),
        SheetSpec::new("cloud", 1, SheetRole::Cloud),
        SheetSpec::new("digits", 10, SheetRole::Digits),
        SheetSpec::new("high_label", 1, SheetRole::HighLabel),
        SheetSpec::new("cactus_small", 1, SheetRole::GroundObstacle),
        SheetSpec::new("cactus_large", 1, SheetRole::GroundObstacle),
        SheetSpec::new("cactus_cluster", 1, SheetRole::GroundObstacle),
        SheetSpec::new("pterodactyl", 2, SheetRole::FlyingObstacle),
    ]
}

/// Game configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    // === Play field ===
    pub width: f32,
    pub height: f32,
    /// Logical frame rate; all per-tick math assumes it
    pub fps: u32,

    // === Player ===
    pub player_x: f32,
    pub gravity: f32,
    /// Negative: upward
    pub jump_impulse: f32,
    /// Fraction of the run sprite height that sits above ground level
    pub run_rest_ratio: f32,
    pub player_anim_cadence: u32,

    // === Obstacles ===
    pub obstacle_anim_cadence: u32,
    /// Fraction of an obstacle's height that sits above ground level
    pub obstacle_rest_ratio: f32,
    pub spawn_interval_secs: f32,
    /// A second obstacle may spawn once the first is left of width * this
    pub spawn_gate_fraction: f32,

    // === World ===
    pub initial_scroll_velocity: f32,
    pub max_scroll_velocity: f32,
    pub speed_factor: f32,
    pub cloud_velocity: f32,
    pub max_clouds: usize,
    pub cloud_spawn_secs: f32,
    pub cloud_min_y: f32,
    /// Clouds keep at least this much clearance above the ground
    pub cloud_ground_margin: f32,

    // === Sky ===
    pub daytime_secs: f32,
    pub nighttime_secs: f32,
    pub skychange_period_secs: f32,

    // === Score ===
    pub base_increment: f64,
    pub increment_factor: f64,
    pub max_increment: f64,
    pub milestone_interval: f64,
    pub min_digits: usize,

    // === Loop ===
    pub game_over_hold_secs: f32,

    /// Sprite-sheet manifest
    pub sheets: Vec<SheetSpec>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: WIDTH,
            height: HEIGHT,
            fps: FPS,

            player_x: PLAYER_X,
            gravity: GRAVITY,
            jump_impulse: JUMP_IMPULSE,
            run_rest_ratio: 0.7,
            player_anim_cadence: PLAYER_ANIM_CADENCE,

            obstacle_anim_cadence: OBSTACLE_ANIM_CADENCE,
            obstacle_rest_ratio: 0.7,
            spawn_interval_secs: 1.3,
            spawn_gate_fraction: 1.0 / 3.0,

            initial_scroll_velocity: INITIAL_SCROLL_VELOCITY,
            max_scroll_velocity: MAX_SCROLL_VELOCITY,
            speed_factor: SPEED_FACTOR,
            cloud_velocity: CLOUD_VELOCITY,
            max_clouds: MAX_CLOUDS,
            cloud_spawn_secs: 2.0,
            cloud_min_y: 0.0,
            cloud_ground_margin: 100.0,

            daytime_secs: DAYTIME_SECS,
            nighttime_secs: NIGHTTIME_SECS,
            skychange_period_secs: SKYCHANGE_PERIOD,

            base_increment: BASE_INCREMENT,
            increment_factor: INCREMENT_FACTOR,
            max_increment: MAX_INCREMENT,
            milestone_interval: MILESTONE_INTERVAL,
            min_digits: MIN_SCORE_DIGITS,

            game_over_hold_secs: GAME_OVER_HOLD_SECS,

            sheets: default_sheets(),
        }
    }
}

impl GameConfig {
    /// Ground level: two thirds down the play field
    #[inline]
    pub fn ground_level(&self) -> f32 {
        self.height * 2.0 / 3.0
    }

    /// Upper bound of the per-tick obstacle spawn roll (spawn on 1)
    pub fn spawn_roll_bound(&self) -> u32 {
        ((self.fps as f32 * self.spawn_interval_secs).round() as u32).max(1)
    }

    /// Upper bound of the per-tick cloud spawn roll (spawn on 1)
    pub fn cloud_roll_bound(&self) -> u32 {
        ((self.fps as f32 * self.cloud_spawn_secs).round() as u32).max(1)
    }

    /// Brightness change per tick while the sky is transitioning
    pub fn brightness_step(&self) -> f32 {
        255.0 / (self.fps as f32 * self.skychange_period_secs)
    }

    /// x threshold the lone in-flight obstacle must pass before another spawns
    pub fn spawn_gate_x(&self) -> f32 {
        self.width * self.spawn_gate_fraction
    }

    /// Parse a configuration from JSON (missing fields take defaults)
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load configuration from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match Self::from_json(&json) {
                Ok(config) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    log::warn!("Invalid config {}: {} - using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                log::info!("No config at {}, using defaults", path.display());
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_values() {
        let config = GameConfig::default();
        assert!((config.ground_level() - 700.0 * 2.0 / 3.0).abs() < 1e-3);
        assert_eq!(config.spawn_roll_bound(), 78);
        assert_eq!(config.cloud_roll_bound(), 120);
        assert!((config.brightness_step() - 2.125).abs() < 1e-5);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = GameConfig::from_json(r#"{ "fps": 30, "width": 800.0 }"#).unwrap();
        assert_eq!(config.fps, 30);
        assert_eq!(config.width, 800.0);
        assert_eq!(config.height, 700.0);
        assert_eq!(config.sheets.len(), default_sheets().len());
    }

    #[test]
    fn test_sheet_roles_parse_snake_case() {
        let json = r#"{ "sheets": [ { "name": "bird", "frames": 2, "role": "flying_obstacle" } ] }"#;
        let config = GameConfig::from_json(json).unwrap();
        assert_eq!(config.sheets[0].role, SheetRole::FlyingObstacle);
        assert!(config.sheets[0].role.is_obstacle());
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let config = GameConfig::load(Path::new("/nonexistent/dino-runner/config.json"));
        assert_eq!(config.fps, FPS);
    }
}
