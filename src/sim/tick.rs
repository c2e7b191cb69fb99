//! Fixed timestep simulation tick
//!
//! One call is one logical frame. All velocities are per frame, so the
//! caller is responsible for pacing ticks at the nominal rate.

use super::collision::check_collisions;
use super::state::{GamePhase, GameState};
use crate::assets::AssetTable;

/// Input state sampled for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    /// Jump key held
    pub jump: bool,
    /// Duck key held
    pub duck: bool,
}

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Score crossed a milestone (increment and scroll speed both escalated)
    pub milestone: bool,
    /// Id of the obstacle spawned this tick
    pub spawned: Option<u32>,
    /// Obstacles culled off the left edge this tick
    pub despawned: usize,
    /// Id of the obstacle the player hit; the run is over
    pub collided_with: Option<u32>,
}

/// Advance the game state by one logical frame
pub fn tick(state: &mut GameState, assets: &AssetTable, input: &TickInput) -> TickReport {
    let mut report = TickReport::default();
    if state.phase == GamePhase::GameOver {
        return report;
    }

    state.time_ticks += 1;

    // World: sky, clouds, ground scroll
    state.world.advance(&mut state.rng, assets);

    // Player: animation, physics, score
    state.player.advance_animation(assets);
    state.player.integrate();
    report.milestone = state.player.score.tick();
    state.player.score.reconcile_high_score();

    // Difficulty feedback on the same tick as the milestone
    if report.milestone {
        state.world.speed_up();
        log::debug!(
            "Milestone at {} points: increment {:.3}",
            state.player.score.points(),
            state.player.score.increment
        );
    }

    // Obstacles: advance all, then cull
    let velocity = state.world.velocity;
    for obstacle in &mut state.obstacles {
        obstacle.advance(velocity, assets);
    }
    let before = state.obstacles.len();
    state.obstacles.retain(|o| !o.is_off_screen(assets));
    report.despawned = before - state.obstacles.len();

    // Spawner
    if state.spawner.roll(&mut state.rng) && state.spawner.is_open(&state.obstacles) {
        let id = state.next_entity_id();
        let obstacle = state
            .spawner
            .spawn(&mut state.rng, id, velocity, &state.player, assets);
        state.obstacles.push(obstacle);
        report.spawned = Some(id);
    }

    // Collisions
    let collision = check_collisions(&state.player, &state.obstacles, assets);
    if collision.hit {
        state.phase = GamePhase::GameOver;
        report.collided_with = collision.obstacle_id;
        log::debug!(
            "Collision with obstacle {:?} at {:?}",
            collision.obstacle_id,
            collision.point
        );
        return report;
    }

    // Input
    state.player.apply_input(input.jump, input.duck);

    report
}
