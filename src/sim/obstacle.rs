//! Scrolling obstacles

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::Animator;
use crate::assets::{AssetTable, FrameRef, ObstacleVariant};

/// Vertical placement of a flying obstacle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FlyingSlot {
    /// Bottom edge level with the standing player's head: duck under it
    High,
    /// A sixth of the player's height below its head
    Mid,
    /// Same placement as a ground obstacle: jump it
    Ground,
}

impl FlyingSlot {
    pub const ALL: [FlyingSlot; 3] = [FlyingSlot::High, FlyingSlot::Mid, FlyingSlot::Ground];
}

/// An obstacle scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: u32,
    /// Index into `AssetTable::obstacles`, fixed at spawn
    pub variant: usize,
    pub pos: Vec2,
    /// Mirrors the world scroll velocity every tick
    pub vel: f32,
    pub anim: Animator,
    /// Flying obstacles remember which slot they were placed in
    pub slot: Option<FlyingSlot>,
}

impl Obstacle {
    pub fn new(id: u32, variant: usize, pos: Vec2, vel: f32, cadence: u32) -> Self {
        Self {
            id,
            variant,
            pos,
            vel,
            anim: Animator::new(cadence),
            slot: None,
        }
    }

    fn variant<'a>(&self, assets: &'a AssetTable) -> &'a ObstacleVariant {
        &assets.obstacles[self.variant]
    }

    /// Sync to the world velocity, animate (multi-frame variants only), scroll left
    pub fn advance(&mut self, world_velocity: f32, assets: &AssetTable) {
        self.vel = world_velocity;
        let len = assets.clip(self.variant(assets).clip).len();
        if len > 1 {
            self.anim.advance(len);
        }
        self.pos.x -= self.vel;
    }

    pub fn frame(&self, assets: &AssetTable) -> FrameRef {
        self.anim.frame_ref(self.variant(assets).clip)
    }

    pub fn width(&self, assets: &AssetTable) -> f32 {
        assets.frame(self.frame(assets)).width() as f32
    }

    pub fn height(&self, assets: &AssetTable) -> f32 {
        assets.frame(self.frame(assets)).height() as f32
    }

    /// Right edge has passed the left edge of the play field
    pub fn is_off_screen(&self, assets: &AssetTable) -> bool {
        self.pos.x + self.width(assets) < 0.0
    }

    pub fn is_flying(&self, assets: &AssetTable) -> bool {
        self.variant(assets).flying
    }
}
