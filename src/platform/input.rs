//! Input sources

use std::collections::VecDeque;

use crate::sim::TickInput;

/// Discrete input events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Window closed
    Quit,
    /// Explicit quit key
    ConfirmQuit,
}

impl InputEvent {
    pub fn terminates(&self) -> bool {
        matches!(self, InputEvent::Quit | InputEvent::ConfirmQuit)
    }
}

/// Raw key-state source
pub trait InputSource {
    /// Current held state of the jump and duck actions
    fn sample(&mut self) -> TickInput;
    /// Events received since the last drain
    fn drain_events(&mut self) -> Vec<InputEvent>;
}

/// Plays back a fixed sequence of key states, then repeats the last one
#[derive(Debug, Clone, Default)]
pub struct ScriptedInput {
    frames: VecDeque<TickInput>,
    events: VecDeque<(u64, InputEvent)>,
    last: TickInput,
    frame: u64,
}

impl ScriptedInput {
    pub fn new(frames: impl IntoIterator<Item = TickInput>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Hold the same state forever
    pub fn constant(input: TickInput) -> Self {
        Self {
            last: input,
            ..Default::default()
        }
    }

    /// Deliver `event` once `frame` samples have been taken
    pub fn with_event(mut self, frame: u64, event: InputEvent) -> Self {
        self.events.push_back((frame, event));
        self
    }
}

impl InputSource for ScriptedInput {
    fn sample(&mut self) -> TickInput {
        self.frame += 1;
        if let Some(input) = self.frames.pop_front() {
            self.last = input;
        }
        self.last
    }

    fn drain_events(&mut self) -> Vec<InputEvent> {
        let mut due = Vec::new();
        while let Some(&(frame, event)) = self.events.front() {
            if frame > self.frame {
                break;
            }
            due.push(event);
            self.events.pop_front();
        }
        due
    }
}
