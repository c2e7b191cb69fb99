//! Frame pacing

use std::time::{Duration, Instant};

/// Paces the loop at the nominal frame rate
pub trait FrameClock {
    /// Block until the next frame is due
    fn wait_frame(&mut self);
    /// Halt the loop for a fixed duration (game-over hold)
    fn hold(&mut self, duration: Duration);
}

/// Sleeps so that frames start at most `fps` times per second.
///
/// A slow frame is not made up for: the next one simply starts late.
#[derive(Debug)]
pub struct FixedRateClock {
    frame_time: Duration,
    last: Option<Instant>,
}

impl FixedRateClock {
    pub fn new(fps: u32) -> Self {
        Self {
            frame_time: Duration::from_secs_f64(1.0 / fps.max(1) as f64),
            last: None,
        }
    }

    pub fn frame_time(&self) -> Duration {
        self.frame_time
    }
}

impl FrameClock for FixedRateClock {
    fn wait_frame(&mut self) {
        if let Some(last) = self.last {
            let elapsed = last.elapsed();
            if elapsed < self.frame_time {
                std::thread::sleep(self.frame_time - elapsed);
            }
        }
        self.last = Some(Instant::now());
    }

    fn hold(&mut self, duration: Duration) {
        std::thread::sleep(duration);
        self.last = Some(Instant::now());
    }
}

/// Clock that never sleeps; counts frames and holds for tests and replays
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    pub frames: u64,
    pub held: Duration,
}

impl FrameClock for ManualClock {
    fn wait_frame(&mut self) {
        self.frames += 1;
    }

    fn hold(&mut self, duration: Duration) {
        self.held += duration;
    }
}
