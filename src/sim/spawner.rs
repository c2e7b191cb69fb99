//! Obstacle spawn policy
//!
//! One Bernoulli trial per tick with probability 1/round(fps * 1.3); a
//! success spawns only if the population/spacing gate is open.

use glam::Vec2;
use rand::Rng;
use rand::seq::IndexedRandom;
use serde::{Deserialize, Serialize};

use super::obstacle::{FlyingSlot, Obstacle};
use super::player::Player;
use crate::assets::AssetTable;
use crate::settings::GameConfig;

/// Spawn tunables, derived from the config once
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Spawner {
    /// Roll is uniform in [1, roll_bound]; 1 spawns
    pub roll_bound: u32,
    /// A second obstacle waits until the first is at or left of this x
    pub gate_x: f32,
    /// Spawn x (right edge of the play field)
    pub spawn_x: f32,
    pub ground_level: f32,
    pub rest_ratio: f32,
    pub anim_cadence: u32,
}

impl Spawner {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            roll_bound: config.spawn_roll_bound(),
            gate_x: config.spawn_gate_x(),
            spawn_x: config.width,
            ground_level: config.ground_level(),
            rest_ratio: config.obstacle_rest_ratio,
            anim_cadence: config.obstacle_anim_cadence,
        }
    }

    /// Per-tick spawn trial
    pub fn roll<R: Rng>(&self, rng: &mut R) -> bool {
        rng.random_range(1..=self.roll_bound) == 1
    }

    /// Population/spacing gate: empty field, or a single obstacle that has
    /// scrolled past the gate
    pub fn is_open(&self, obstacles: &[Obstacle]) -> bool {
        match obstacles {
            [] => true,
            [only] => only.pos.x <= self.gate_x,
            _ => false,
        }
    }

    /// Resting y for a ground obstacle of the given height
    #[inline]
    pub fn ground_y(&self, height: f32) -> f32 {
        self.ground_level - height * self.rest_ratio
    }

    /// y of a flying obstacle in `slot`
    pub fn flying_y(&self, slot: FlyingSlot, height: f32, player: &Player) -> f32 {
        match slot {
            FlyingSlot::High => player.resting_y - height,
            FlyingSlot::Mid => player.resting_y + player.height / 6.0,
            FlyingSlot::Ground => self.ground_y(height),
        }
    }

    /// Build a new obstacle at the right edge with a random variant/placement
    pub fn spawn<R: Rng>(
        &self,
        rng: &mut R,
        id: u32,
        velocity: f32,
        player: &Player,
        assets: &AssetTable,
    ) -> Obstacle {
        let variant = rng.random_range(0..assets.obstacles.len());
        let mut obstacle = Obstacle::new(
            id,
            variant,
            Vec2::new(self.spawn_x, 0.0),
            velocity,
            self.anim_cadence,
        );
        let height = obstacle.height(assets);
        if assets.obstacles[variant].flying {
            let slot = *FlyingSlot::ALL.choose(rng).unwrap_or(&FlyingSlot::Ground);
            obstacle.pos.y = self.flying_y(slot, height, player);
            obstacle.slot = Some(slot);
        } else {
            obstacle.pos.y = self.ground_y(height);
        }
        log::trace!(
            "Spawned obstacle {} (variant {}, slot {:?}) at y={:.1}",
            id,
            variant,
            obstacle.slot,
            obstacle.pos.y
        );
        obstacle
    }
}
