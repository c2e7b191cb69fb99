//! Draw-request composition
//!
//! Turns logical state into fill/draw requests for an external display sink.
//! The sink owns pixels; this module only decides what goes where.

pub mod recorder;

use glam::Vec2;

use crate::assets::{AssetTable, FrameRef};
use crate::sim::{GameState, Glyph, Rgb};

pub use recorder::{DrawCall, FrameRecorder};

/// Margin between the HUD and the play-field edges
pub const HUD_MARGIN: f32 = 10.0;
/// Gap between the high score and the current score
pub const HUD_GAP: f32 = 20.0;

/// External presentation surface
pub trait DisplaySink {
    /// Fill the whole surface
    fn fill(&mut self, color: Rgb);
    /// Draw a frame with its top-left at `pos`
    fn draw(&mut self, frame: FrameRef, pos: Vec2);
    /// Show everything drawn since the last present
    fn present(&mut self);
}

fn glyph_frame(glyph: Glyph, assets: &AssetTable) -> FrameRef {
    match glyph {
        Glyph::Digit(d) => assets.digit(d),
        Glyph::HighLabel => assets.high_label_frame(),
    }
}

fn glyphs_width(glyphs: &[Glyph], assets: &AssetTable) -> f32 {
    glyphs
        .iter()
        .map(|g| assets.frame(glyph_frame(*g, assets)).width() as f32)
        .sum()
}

/// Draw glyphs left to right starting at `pos`
fn draw_glyphs(sink: &mut dyn DisplaySink, glyphs: &[Glyph], pos: Vec2, assets: &AssetTable) {
    let mut x = pos.x;
    for glyph in glyphs {
        let frame = glyph_frame(*glyph, assets);
        sink.draw(frame, Vec2::new(x, pos.y));
        x += assets.frame(frame).width() as f32;
    }
}

/// Compose one full frame and present it
pub fn compose(state: &GameState, assets: &AssetTable, sink: &mut dyn DisplaySink) {
    let world = &state.world;

    sink.fill(world.sky.color());

    let ground = FrameRef {
        clip: assets.ground,
        index: 0,
    };
    for x in world.ground_tiles(assets) {
        sink.draw(ground, Vec2::new(x, world.ground_y));
    }

    let cloud = FrameRef {
        clip: assets.cloud,
        index: 0,
    };
    for c in &world.clouds {
        sink.draw(cloud, c.pos);
    }

    sink.draw(state.player.frame(), state.player.origin(assets));

    for obstacle in &state.obstacles {
        sink.draw(obstacle.frame(assets), obstacle.pos);
    }

    // HUD: score flush right, high score to its left
    let score = &state.player.score;
    let score_x = world.play_width() - HUD_MARGIN - glyphs_width(&score.digits, assets);
    draw_glyphs(sink, &score.digits, Vec2::new(score_x, HUD_MARGIN), assets);

    let high_x = score_x - HUD_GAP - glyphs_width(&score.high_digits, assets);
    draw_glyphs(sink, &score.high_digits, Vec2::new(high_x, HUD_MARGIN), assets);

    sink.present();
}
