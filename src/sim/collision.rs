//! Pixel-accurate collision between the player and obstacles
//!
//! Two sprites collide only if an opaque pixel of one lands on an opaque
//! pixel of the other. Bounding boxes are never treated as a hit.

use glam::Vec2;

use super::obstacle::Obstacle;
use super::player::Player;
use crate::assets::{AssetTable, OpacityMask};

/// Result of a collision check
#[derive(Debug, Clone, PartialEq)]
pub struct CollisionResult {
    /// Whether a collision occurred
    pub hit: bool,
    /// Overlapping pixel in the player's frame coordinates (if hit)
    pub point: Option<(u32, u32)>,
    /// Id of the obstacle that was hit
    pub obstacle_id: Option<u32>,
}

impl CollisionResult {
    pub fn miss() -> Self {
        Self {
            hit: false,
            point: None,
            obstacle_id: None,
        }
    }
}

/// Integer pixel offset of `other` relative to `origin` (truncated toward zero)
#[inline]
pub fn pixel_offset(origin: Vec2, other: Vec2) -> (i32, i32) {
    let d = other - origin;
    (d.x as i32, d.y as i32)
}

/// Mask overlap of two sprites placed at `a_pos` and `b_pos`
pub fn masks_overlap(
    a: &OpacityMask,
    a_pos: Vec2,
    b: &OpacityMask,
    b_pos: Vec2,
) -> Option<(u32, u32)> {
    a.overlap(b, pixel_offset(a_pos, b_pos))
}

/// Check the player's current frame against one obstacle's current frame
pub fn player_obstacle_collision(
    player: &Player,
    obstacle: &Obstacle,
    assets: &AssetTable,
) -> CollisionResult {
    let player_mask = &assets.frame(player.frame()).mask;
    let obstacle_mask = &assets.frame(obstacle.frame(assets)).mask;

    match masks_overlap(
        player_mask,
        player.origin(assets),
        obstacle_mask,
        obstacle.pos,
    ) {
        Some(point) => CollisionResult {
            hit: true,
            point: Some(point),
            obstacle_id: Some(obstacle.id),
        },
        None => CollisionResult::miss(),
    }
}

/// Check every active obstacle; returns the first hit
pub fn check_collisions(
    player: &Player,
    obstacles: &[Obstacle],
    assets: &AssetTable,
) -> CollisionResult {
    obstacles
        .iter()
        .map(|o| player_obstacle_collision(player, o, assets))
        .find(|r| r.hit)
        .unwrap_or_else(CollisionResult::miss)
}
