//! The runner: vertical physics, pose state machine and score

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::animation::Animator;
use super::score::{ScoreRules, ScoreTracker};
use crate::assets::{AssetTable, ClipId, FrameRef};
use crate::consts::FALL_COUNTER_STEP;
use crate::settings::GameConfig;

/// Player pose
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Pose {
    Run,
    Duck,
    /// Derived from height: any tick spent above resting y
    Jump,
}

/// Pose transition table, evaluated once per tick:
///
/// | from        | condition        | to   |
/// |-------------|------------------|------|
/// | any         | airborne         | Jump |
/// | Run/Duck    | grounded + duck  | Duck |
/// | any         | grounded, no duck| Run  |
pub fn next_pose(airborne: bool, duck_held: bool) -> Pose {
    if airborne {
        Pose::Jump
    } else if duck_held {
        Pose::Duck
    } else {
        Pose::Run
    }
}

/// The player character. x never changes; only y moves.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub vel_y: f32,
    /// Grows by 2 each airborne tick, scales the gravity gain
    pub fall_counter: u32,
    pub pose: Pose,
    pub anim: Animator,
    pub score: ScoreTracker,
    /// y at which the run pose stands on the ground
    pub resting_y: f32,
    /// Bottom edge of the run sprite; ducking frames stand on it
    pub base_ground_y: f32,
    /// Run sprite height (reference for flying-obstacle slots)
    pub height: f32,
    gravity: f32,
    jump_impulse: f32,
    fps: f32,
    run_clip: ClipId,
    duck_clip: ClipId,
    jump_clip: ClipId,
}

impl Player {
    pub fn new(config: &GameConfig, assets: &AssetTable, high_score: u64) -> Self {
        let height = assets.first_frame(assets.player_run).height() as f32;
        let ground = config.ground_level();
        let resting_y = ground - height * config.run_rest_ratio;
        Self {
            pos: Vec2::new(config.player_x, resting_y),
            vel_y: 0.0,
            fall_counter: 0,
            pose: Pose::Run,
            anim: Animator::new(config.player_anim_cadence),
            score: ScoreTracker::new(ScoreRules::from_config(config), high_score),
            resting_y,
            base_ground_y: ground + height * (1.0 - config.run_rest_ratio),
            height,
            gravity: config.gravity,
            jump_impulse: config.jump_impulse,
            fps: config.fps as f32,
            run_clip: assets.player_run,
            duck_clip: assets.player_duck,
            jump_clip: assets.player_jump,
        }
    }

    #[inline]
    pub fn is_airborne(&self) -> bool {
        self.pos.y < self.resting_y
    }

    #[inline]
    pub fn is_grounded(&self) -> bool {
        !self.is_airborne()
    }

    /// Whether a jump request would take effect now
    #[inline]
    pub fn can_jump(&self) -> bool {
        self.is_grounded() && self.pose != Pose::Duck
    }

    /// Launch upward. Ignored (returns false) unless grounded and not ducking.
    pub fn jump(&mut self) -> bool {
        if !self.can_jump() {
            return false;
        }
        self.vel_y = self.jump_impulse;
        true
    }

    /// Apply gravity and velocity, clamping to the ground
    pub fn integrate(&mut self) {
        if self.is_airborne() {
            self.vel_y += (self.fall_counter as f32 / self.fps) * self.gravity;
            self.fall_counter += FALL_COUNTER_STEP;
        } else {
            self.fall_counter = 0;
        }

        self.pos.y += self.vel_y;

        if self.pos.y >= self.resting_y {
            self.pos.y = self.resting_y;
            self.vel_y = 0.0;
        }
    }

    fn clip_for_pose(&self) -> ClipId {
        match self.pose {
            Pose::Duck => self.duck_clip,
            Pose::Run => self.run_clip,
            Pose::Jump => self.jump_clip,
        }
    }

    /// Step the run/duck cycle; airborne shows the single jump frame
    pub fn advance_animation(&mut self, assets: &AssetTable) {
        if self.is_airborne() {
            self.anim.reset();
            return;
        }
        let len = assets.clip(self.clip_for_pose()).len();
        self.anim.advance(len);
    }

    /// Frame currently shown (and used for collision)
    pub fn frame(&self) -> FrameRef {
        if self.is_airborne() {
            return FrameRef {
                clip: self.jump_clip,
                index: 0,
            };
        }
        self.anim.frame_ref(self.clip_for_pose())
    }

    /// Top-left of the current frame. Ducking frames stand on the run
    /// sprite's bottom edge rather than at the run resting y.
    pub fn origin(&self, assets: &AssetTable) -> Vec2 {
        match self.pose {
            Pose::Duck if self.is_grounded() => {
                let h = assets.frame(self.frame()).height() as f32;
                Vec2::new(self.pos.x, self.base_ground_y - h)
            }
            _ => self.pos,
        }
    }

    /// Apply the sampled input: jump first (against last tick's pose), then
    /// resolve the pose for the next tick.
    pub fn apply_input(&mut self, jump: bool, duck: bool) {
        if jump {
            self.jump();
        }
        self.pose = next_pose(self.is_airborne(), duck);
    }
}
