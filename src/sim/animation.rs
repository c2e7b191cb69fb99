//! Frame cadence shared by every animated entity

use serde::{Deserialize, Serialize};

use crate::assets::{ClipId, FrameRef};

/// Animation cursor over a circular clip.
///
/// The cursor counts ticks; the visible frame is `(cursor / cadence) % len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Animator {
    pub cursor: u32,
    /// Ticks each frame stays on screen
    pub cadence: u32,
    /// Currently shown frame index
    pub frame: usize,
}

impl Animator {
    pub fn new(cadence: u32) -> Self {
        Self {
            cursor: 0,
            cadence: cadence.max(1),
            frame: 0,
        }
    }

    /// Select the frame for this tick, then step the cursor
    pub fn advance(&mut self, clip_len: usize) {
        if clip_len == 0 {
            return;
        }
        self.frame = (self.cursor / self.cadence) as usize % clip_len;
        self.cursor = self.cursor.wrapping_add(1);
    }

    /// Back to the first frame
    pub fn reset(&mut self) {
        self.cursor = 0;
        self.frame = 0;
    }

    pub fn frame_ref(&self, clip: ClipId) -> FrameRef {
        FrameRef {
            clip,
            index: self.frame,
        }
    }
}
