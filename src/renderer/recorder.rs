//! A display sink that records requests instead of drawing

use glam::Vec2;

use super::DisplaySink;
use crate::assets::FrameRef;
use crate::sim::Rgb;

/// One recorded request
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCall {
    Fill(Rgb),
    Draw(FrameRef, Vec2),
}

/// Keeps the requests of the last presented frame
#[derive(Debug, Clone, Default)]
pub struct FrameRecorder {
    /// Requests of the frame being built, or of the last presented one
    pub calls: Vec<DrawCall>,
    pub frames_presented: u64,
    pending: Vec<DrawCall>,
}

impl DisplaySink for FrameRecorder {
    fn fill(&mut self, color: Rgb) {
        self.pending.clear();
        self.pending.push(DrawCall::Fill(color));
    }

    fn draw(&mut self, frame: FrameRef, pos: Vec2) {
        self.pending.push(DrawCall::Draw(frame, pos));
    }

    fn present(&mut self) {
        self.calls = std::mem::take(&mut self.pending);
        self.frames_presented += 1;
    }
}
