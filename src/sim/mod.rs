//! Fixed-step simulation module
//!
//! All gameplay logic lives here. This module must stay pure:
//! - Per-frame units only (no delta time)
//! - Seeded RNG only
//! - Stable iteration order (obstacles in spawn order)
//! - No rendering or platform dependencies

pub mod animation;
pub mod collision;
pub mod obstacle;
pub mod player;
pub mod score;
pub mod spawner;
pub mod state;
pub mod tick;
pub mod world;

pub use animation::Animator;
pub use collision::{CollisionResult, check_collisions, masks_overlap, player_obstacle_collision};
pub use obstacle::{FlyingSlot, Obstacle};
pub use player::{Player, Pose, next_pose};
pub use score::{Glyph, ScoreRules, ScoreTracker, crosses_milestone, digit_glyphs};
pub use spawner::Spawner;
pub use state::{GamePhase, GameState};
pub use tick::{TickInput, TickReport, tick};
pub use world::{Cloud, Rgb, Sky, SkyPhase, World};
