//! Game state and run phase
//!
//! Everything a run mutates is owned here and nowhere else.

use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::obstacle::Obstacle;
use super::player::Player;
use super::spawner::Spawner;
use super::world::World;
use crate::assets::AssetTable;
use crate::settings::GameConfig;

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Active gameplay
    Running,
    /// Player hit an obstacle
    GameOver,
}

/// Complete run state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    /// Simulation tick counter
    pub time_ticks: u64,
    pub phase: GamePhase,
    pub player: Player,
    pub world: World,
    /// Active obstacles, in spawn order
    pub obstacles: Vec<Obstacle>,
    pub spawner: Spawner,
    next_id: u32,
}

impl GameState {
    /// Fresh run; `high_score` is the value loaded at session start
    pub fn new(seed: u64, config: &GameConfig, assets: &AssetTable, high_score: u64) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            time_ticks: 0,
            phase: GamePhase::Running,
            player: Player::new(config, assets, high_score),
            world: World::new(config),
            obstacles: Vec::new(),
            spawner: Spawner::new(config),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn is_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }
}
