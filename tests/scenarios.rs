use dino_runner::assets::ProceduralSprites;
use dino_runner::highscores::{FileHighScoreStore, HighScoreStore};
use dino_runner::platform::{ManualClock, ScriptedInput};
use dino_runner::renderer::FrameRecorder;
use dino_runner::sim::{
    FlyingSlot, GamePhase, GameState, Obstacle, Pose, TickInput, player_obstacle_collision, tick,
};
use dino_runner::{AssetTable, GameConfig, RunOutcome, Session};
use glam::Vec2;

fn setup() -> (GameConfig, AssetTable) {
    let config = GameConfig::default();
    let assets = AssetTable::load(&mut ProceduralSprites::new(), &config.sheets).unwrap();
    (config, assets)
}

fn flying_variant(assets: &AssetTable) -> usize {
    assets.obstacles.iter().position(|v| v.flying).unwrap()
}

fn flying_obstacle(state: &GameState, assets: &AssetTable, slot: FlyingSlot, x: f32) -> Obstacle {
    let variant = flying_variant(assets);
    let mut obstacle = Obstacle::new(99, variant, Vec2::new(x, 0.0), 10.0, 15);
    let h = obstacle.height(assets);
    obstacle.pos.y = state.spawner.flying_y(slot, h, &state.player);
    obstacle.slot = Some(slot);
    obstacle
}

#[test]
fn starting_state_then_first_milestone() {
    let (config, assets) = setup();
    let mut state = GameState::new(2024, &config, &assets, 0);
    assert_eq!(state.player.score.score, 0.0);
    assert_eq!(state.player.score.increment, 0.15);
    assert_eq!(state.world.velocity, 10.0);

    let duck = TickInput {
        duck: true,
        ..Default::default()
    };
    let report = loop {
        state.obstacles.clear();
        let report = tick(&mut state, &assets, &duck);
        if state.player.score.score >= 100.0 {
            break report;
        }
    };
    assert!(report.milestone);
    assert!((state.player.score.increment - 0.165).abs() < 1e-9);
    assert!((state.world.velocity - 11.0).abs() < 1e-4);
}

#[test]
fn empty_field_spawns_on_next_successful_roll() {
    let (config, assets) = setup();
    for seed in 0..20 {
        let mut state = GameState::new(seed, &config, &assets, 0);
        let mut spawned = 0;
        for _ in 0..2_000 {
            state.obstacles.clear();

            // Replay the draws this tick will make before the spawn roll
            let mut rng = state.rng.clone();
            let mut world = state.world.clone();
            world.advance(&mut rng, &assets);
            let roll_succeeds = state.spawner.roll(&mut rng);

            let report = tick(&mut state, &assets, &TickInput::default());
            assert_eq!(report.spawned.is_some(), roll_succeeds);
            if report.spawned.is_some() {
                spawned += 1;
            }
        }
        assert!(spawned > 0);
    }
}

#[test]
fn high_slot_clears_a_ducking_player() {
    let (config, assets) = setup();
    let mut state = GameState::new(1, &config, &assets, 0);
    state.player.apply_input(false, true);
    assert_eq!(state.player.pose, Pose::Duck);

    let mut obstacle = flying_obstacle(&state, &assets, FlyingSlot::High, config.width);
    while obstacle.pos.x + obstacle.width(&assets) >= 0.0 {
        state.player.advance_animation(&assets);
        let hit = player_obstacle_collision(&state.player, &obstacle, &assets);
        assert!(!hit.hit, "hit at x = {}", obstacle.pos.x);
        obstacle.advance(3.0, &assets);
    }
}

#[test]
fn ground_slot_hits_a_ducking_player() {
    let (config, assets) = setup();
    let mut state = GameState::new(1, &config, &assets, 0);
    state.player.apply_input(false, true);
    state.player.advance_animation(&assets);

    let obstacle = flying_obstacle(&state, &assets, FlyingSlot::Ground, state.player.pos.x);
    assert!(player_obstacle_collision(&state.player, &obstacle, &assets).hit);
}

#[test]
fn ducking_through_a_high_flyer_in_the_loop() {
    let (config, assets) = setup();
    let mut state = GameState::new(77, &config, &assets, 0);
    let duck = TickInput {
        duck: true,
        ..Default::default()
    };
    tick(&mut state, &assets, &duck);

    let obstacle = flying_obstacle(&state, &assets, FlyingSlot::High, config.width);
    let id = obstacle.id;
    state.obstacles = vec![obstacle];
    while state.obstacles.iter().any(|o| o.id == id) {
        // Only the high flyer is allowed on the field
        state.obstacles.retain(|o| o.id == id);
        tick(&mut state, &assets, &duck);
        assert_eq!(state.phase, GamePhase::Running);
    }
}

#[test]
fn high_score_survives_sessions() {
    let dir = std::env::temp_dir().join(format!("dino-runner-scenario-{}", std::process::id()));
    let path = dir.join("highscore.json");
    let _ = std::fs::remove_dir_all(&dir);

    let mut first = Session::new(
        GameConfig::default(),
        &mut ProceduralSprites::new(),
        FileHighScoreStore::new(&path),
        5,
    )
    .unwrap();
    let outcome = first.run(
        &mut FrameRecorder::default(),
        &mut ScriptedInput::constant(TickInput::default()),
        &mut ManualClock::default(),
    );
    let RunOutcome::GameOver { high_score, .. } = outcome else {
        panic!("expected game over");
    };
    assert!(high_score > 0);

    let store = FileHighScoreStore::new(&path);
    assert_eq!(store.load().unwrap(), high_score);

    let second = Session::new(
        GameConfig::default(),
        &mut ProceduralSprites::new(),
        store,
        6,
    )
    .unwrap();
    assert_eq!(second.state().player.score.high_score, high_score);

    let _ = std::fs::remove_dir_all(&dir);
}
