//! Background: ground scroll, day/night sky and drifting clouds

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::assets::AssetTable;
use crate::settings::GameConfig;

/// Sky lighting phase; cycles Night -> BecomingDay -> Day -> BecomingNight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkyPhase {
    Night,
    BecomingDay,
    Day,
    BecomingNight,
}

impl SkyPhase {
    pub fn next(self) -> Self {
        match self {
            SkyPhase::Night => SkyPhase::BecomingDay,
            SkyPhase::BecomingDay => SkyPhase::Day,
            SkyPhase::Day => SkyPhase::BecomingNight,
            SkyPhase::BecomingNight => SkyPhase::Night,
        }
    }
}

/// Grayscale sky fill
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Rgb = Rgb(0, 0, 0);
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    pub fn gray(value: u8) -> Self {
        Rgb(value, value, value)
    }
}

/// Sky state machine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sky {
    pub phase: SkyPhase,
    /// Ticks since the last phase change
    pub counter: u32,
    /// 0 (night) ..= 255 (day)
    pub brightness: f32,
    fps: f32,
    day_secs: f32,
    night_secs: f32,
    step: f32,
}

impl Sky {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            phase: SkyPhase::Night,
            counter: 0,
            brightness: 0.0,
            fps: config.fps as f32,
            day_secs: config.daytime_secs,
            night_secs: config.nighttime_secs,
            step: config.brightness_step(),
        }
    }

    fn enter(&mut self, phase: SkyPhase) {
        log::debug!("Sky {:?} -> {:?}", self.phase, phase);
        self.phase = phase;
        self.counter = 0;
    }

    /// Advance one tick. Returns true when the phase changed.
    pub fn update(&mut self) -> bool {
        let before = self.phase;

        let elapsed = self.counter as f32 / self.fps;
        match self.phase {
            SkyPhase::Night if elapsed >= self.night_secs => self.enter(SkyPhase::BecomingDay),
            SkyPhase::Day if elapsed >= self.day_secs => self.enter(SkyPhase::BecomingNight),
            _ => {}
        }

        self.counter += 1;

        match self.phase {
            SkyPhase::BecomingDay => {
                self.brightness += self.step;
                if self.brightness >= 255.0 {
                    self.brightness = 255.0;
                    self.enter(SkyPhase::Day);
                }
            }
            SkyPhase::BecomingNight => {
                self.brightness -= self.step;
                if self.brightness <= 0.0 {
                    self.brightness = 0.0;
                    self.enter(SkyPhase::Night);
                }
            }
            _ => {}
        }

        self.phase != before
    }

    /// Fill color for the current phase
    pub fn color(&self) -> Rgb {
        match self.phase {
            SkyPhase::Night => Rgb::BLACK,
            SkyPhase::Day => Rgb::WHITE,
            SkyPhase::BecomingDay | SkyPhase::BecomingNight => {
                Rgb::gray(self.brightness.clamp(0.0, 255.0) as u8)
            }
        }
    }
}

/// A drifting cloud
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cloud {
    pub pos: Vec2,
}

/// Scrolling world
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    /// x of the first ground tile; the second is drawn right after it
    pub ground_x: f32,
    pub initial_ground_x: f32,
    pub ground_y: f32,
    /// Shared scroll velocity, read by every obstacle
    pub velocity: f32,
    pub sky: Sky,
    pub clouds: Vec<Cloud>,
    width: f32,
    max_velocity: f32,
    speed_factor: f32,
    cloud_velocity: f32,
    max_clouds: usize,
    cloud_roll_bound: u32,
    cloud_min_y: f32,
    cloud_ground_margin: f32,
}

impl World {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            ground_x: 0.0,
            initial_ground_x: 0.0,
            ground_y: config.ground_level(),
            velocity: config.initial_scroll_velocity,
            sky: Sky::new(config),
            clouds: Vec::with_capacity(config.max_clouds),
            width: config.width,
            max_velocity: config.max_scroll_velocity,
            speed_factor: config.speed_factor,
            cloud_velocity: config.cloud_velocity,
            max_clouds: config.max_clouds,
            cloud_roll_bound: config.cloud_roll_bound(),
            cloud_min_y: config.cloud_min_y,
            cloud_ground_margin: config.cloud_ground_margin,
        }
    }

    /// Sky, clouds, then ground scroll
    pub fn advance<R: Rng>(&mut self, rng: &mut R, assets: &AssetTable) {
        self.sky.update();
        self.update_clouds(rng, assets);
        self.scroll(assets);
    }

    /// Move the ground left; wrap once the first tile is fully out of view
    pub fn scroll(&mut self, assets: &AssetTable) {
        self.ground_x -= self.velocity;
        let tile_w = assets.first_frame(assets.ground).width() as f32;
        if self.ground_x + tile_w <= 0.0 {
            self.ground_x = self.initial_ground_x;
        }
    }

    /// Maybe spawn a cloud, drift all clouds, drop those fully off-screen
    pub fn update_clouds<R: Rng>(&mut self, rng: &mut R, assets: &AssetTable) {
        let cloud = assets.first_frame(assets.cloud);
        let (cloud_w, cloud_h) = (cloud.width() as f32, cloud.height() as f32);

        let roll = rng.random_range(1..=self.cloud_roll_bound);
        if roll == 1 && self.clouds.len() < self.max_clouds {
            let max_y = (self.ground_y - cloud_h - self.cloud_ground_margin).max(self.cloud_min_y);
            let y = rng.random_range(self.cloud_min_y..=max_y);
            self.clouds.push(Cloud {
                pos: Vec2::new(self.width, y),
            });
        }

        for cloud in &mut self.clouds {
            cloud.pos.x -= self.cloud_velocity;
        }
        self.clouds.retain(|c| c.pos.x + cloud_w > 0.0);
    }

    /// Milestone speed-up: multiply, capped
    pub fn speed_up(&mut self) {
        self.velocity = (self.velocity * self.speed_factor).min(self.max_velocity);
        log::debug!("Scroll velocity now {:.2}", self.velocity);
    }

    #[inline]
    pub fn play_width(&self) -> f32 {
        self.width
    }

    /// x positions of the two adjacent ground tiles
    pub fn ground_tiles(&self, assets: &AssetTable) -> [f32; 2] {
        let tile_w = assets.first_frame(assets.ground).width() as f32;
        [self.ground_x, self.ground_x + tile_w]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assets::ProceduralSprites;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn setup() -> (GameConfig, AssetTable) {
        let config = GameConfig::default();
        let assets = AssetTable::load(&mut ProceduralSprites::new(), &config.sheets).unwrap();
        (config, assets)
    }

    #[test]
    fn test_sky_cycle_order_and_timing() {
        let (config, _) = setup();
        let mut sky = Sky::new(&config);
        let mut transitions = Vec::new();
        for tick in 0..10_000u32 {
            if sky.update() {
                transitions.push((tick, sky.phase));
            }
            assert!((0.0..=255.0).contains(&sky.brightness));
        }
        let phases: Vec<SkyPhase> = transitions.iter().map(|t| t.1).collect();
        assert_eq!(
            &phases[..5],
            &[
                SkyPhase::BecomingDay,
                SkyPhase::Day,
                SkyPhase::BecomingNight,
                SkyPhase::Night,
                SkyPhase::BecomingDay,
            ]
        );
        for pair in phases.windows(2) {
            assert_eq!(pair[0].next(), pair[1]);
        }
        // 20 s of night at 60 fps
        assert_eq!(transitions[0].0, 1200);
        // ~2 s of dawn
        let dawn = transitions[1].0 - transitions[0].0;
        assert!((119..=121).contains(&dawn), "dawn = {}", dawn);
    }

    #[test]
    fn test_sky_colors() {
        let (config, _) = setup();
        let mut sky = Sky::new(&config);
        assert_eq!(sky.color(), Rgb::BLACK);
        sky.phase = SkyPhase::BecomingDay;
        sky.brightness = 127.6;
        assert_eq!(sky.color(), Rgb::gray(127));
        sky.phase = SkyPhase::Day;
        assert_eq!(sky.color(), Rgb::WHITE);
    }

    #[test]
    fn test_ground_wraps() {
        let (config, assets) = setup();
        let mut world = World::new(&config);
        let tile_w = assets.first_frame(assets.ground).width() as f32;
        let ticks = (tile_w / world.velocity) as usize;
        for _ in 0..ticks - 1 {
            world.scroll(&assets);
            assert!(world.ground_x + tile_w > 0.0);
        }
        world.scroll(&assets);
        assert_eq!(world.ground_x, world.initial_ground_x);
        let tiles = world.ground_tiles(&assets);
        assert_eq!(tiles[1] - tiles[0], tile_w);
    }

    #[test]
    fn test_speed_up_capped() {
        let (config, _) = setup();
        let mut world = World::new(&config);
        world.speed_up();
        assert!((world.velocity - 11.0).abs() < 1e-4);
        for _ in 0..50 {
            world.speed_up();
        }
        assert_eq!(world.velocity, 30.0);
    }

    #[test]
    fn test_cloud_cap_and_band() {
        let (config, assets) = setup();
        let mut world = World::new(&config);
        let mut rng = Pcg32::seed_from_u64(3);
        let cloud_h = assets.first_frame(assets.cloud).height() as f32;
        let mut max_seen = 0;
        for _ in 0..20_000 {
            world.update_clouds(&mut rng, &assets);
            max_seen = max_seen.max(world.clouds.len());
            assert!(world.clouds.len() <= 4);
            for cloud in &world.clouds {
                assert!(cloud.pos.y >= 0.0);
                assert!(cloud.pos.y <= config.ground_level() - cloud_h - 100.0);
            }
        }
        assert!(max_seen >= 2);
    }

    #[test]
    fn test_clouds_culled_once_fully_off_screen() {
        let (config, assets) = setup();
        let mut world = World::new(&config);
        let mut rng = Pcg32::seed_from_u64(9);
        let cloud_w = assets.first_frame(assets.cloud).width() as f32;
        // Full house: the roll cannot add a third cloud
        world.max_clouds = 2;
        let drift = config.cloud_velocity;
        world.clouds = vec![
            Cloud {
                pos: Vec2::new(-cloud_w + drift, 50.0),
            },
            Cloud {
                pos: Vec2::new(-cloud_w + drift + 1.0, 50.0),
            },
        ];

        world.update_clouds(&mut rng, &assets);
        assert_eq!(world.clouds.len(), 1);
        assert_eq!(world.clouds[0].pos.x, -cloud_w + 1.0);

        world.update_clouds(&mut rng, &assets);
        assert!(world.clouds.iter().all(|c| c.pos.x + cloud_w > 0.0));
        assert!(world.clouds.iter().all(|c| c.pos.x > 0.0));
    }
}
