//! Platform abstraction layer
//!
//! Handles the collaborators around the simulation:
//! - Frame pacing (fixed-rate clock)
//! - Input state and quit events

pub mod clock;
pub mod input;

pub use clock::{FixedRateClock, FrameClock, ManualClock};
pub use input::{InputEvent, InputSource, ScriptedInput};
