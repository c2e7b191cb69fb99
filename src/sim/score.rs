//! Score tracking, escalation and high-score reconciliation

use serde::{Deserialize, Serialize};

use crate::settings::GameConfig;

/// A renderable glyph; placement is the renderer's concern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Glyph {
    Digit(u8),
    /// The "HIGH" label in front of the high score
    HighLabel,
}

/// Score escalation tunables
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreRules {
    pub base_increment: f64,
    pub increment_factor: f64,
    pub max_increment: f64,
    pub milestone_interval: f64,
    pub min_digits: usize,
}

impl ScoreRules {
    pub fn from_config(config: &GameConfig) -> Self {
        Self {
            base_increment: config.base_increment,
            increment_factor: config.increment_factor,
            max_increment: config.max_increment,
            milestone_interval: config.milestone_interval,
            min_digits: config.min_digits,
        }
    }
}

/// True when going from `before` to `after` crosses a multiple of `interval`
/// (and `after` is at least one interval)
pub fn crosses_milestone(before: f64, after: f64, interval: f64) -> bool {
    after >= interval && (after / interval).floor() > (before / interval).floor()
}

/// Decimal glyphs of `value`, left-padded with zeros to `min_width`
pub fn digit_glyphs(value: u64, min_width: usize) -> Vec<Glyph> {
    format!("{:0width$}", value, width = min_width)
        .bytes()
        .map(|b| Glyph::Digit(b - b'0'))
        .collect()
}

/// Fractional score with an accelerating increment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTracker {
    pub score: f64,
    pub increment: f64,
    pub high_score: u64,
    /// Glyphs for floor(score) as of the last tick
    pub digits: Vec<Glyph>,
    /// "HIGH" label followed by the high-score digits
    pub high_digits: Vec<Glyph>,
    rules: ScoreRules,
    persist_pending: bool,
}

impl ScoreTracker {
    pub fn new(rules: ScoreRules, high_score: u64) -> Self {
        let mut tracker = Self {
            score: 0.0,
            increment: rules.base_increment,
            high_score,
            digits: Vec::new(),
            high_digits: Vec::new(),
            rules,
            persist_pending: false,
        };
        tracker.digits = digit_glyphs(0, rules.min_digits);
        tracker.refresh_high_digits();
        tracker
    }

    /// Whole points scored so far
    #[inline]
    pub fn points(&self) -> u64 {
        self.score.floor() as u64
    }

    /// Refresh the digit glyphs, then add the increment.
    ///
    /// Returns true on the tick the score crosses a milestone; the increment
    /// has already been escalated when this returns.
    pub fn tick(&mut self) -> bool {
        self.digits = digit_glyphs(self.points(), self.rules.min_digits);

        let before = self.score;
        self.score += self.increment;

        let milestone = crosses_milestone(before, self.score, self.rules.milestone_interval);
        if milestone {
            self.increment =
                (self.increment * self.rules.increment_factor).min(self.rules.max_increment);
        }
        milestone
    }

    /// Compare against the high score, queueing a persist when beaten.
    ///
    /// The high-score glyphs are rebuilt on every call. Returns true when
    /// this call raised the high score.
    pub fn reconcile_high_score(&mut self) -> bool {
        let beaten = self.points() > self.high_score;
        if beaten {
            self.high_score = self.points();
            self.persist_pending = true;
        }
        self.refresh_high_digits();
        beaten
    }

    /// Take the pending persist request, if the high score changed
    pub fn take_persist_request(&mut self) -> Option<u64> {
        if std::mem::take(&mut self.persist_pending) {
            Some(self.high_score)
        } else {
            None
        }
    }

    fn refresh_high_digits(&mut self) {
        self.high_digits.clear();
        self.high_digits.push(Glyph::HighLabel);
        self.high_digits
            .extend(digit_glyphs(self.high_score, self.rules.min_digits));
    }
}
