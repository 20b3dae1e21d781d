//! One question on the wall
//!
//! A round owns the three answer tiles, routes water impacts into them and
//! decides the outcome: washing the correct answer fails the question,
//! washing both wrong answers solves it.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::erosion::{ErosionSurface, GraffitiColor};
use super::facts::{Question, generate_question};
use super::glyph::GlyphRenderer;
use super::layout::place_answers;
use crate::consts::*;

/// Final result of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundOutcome {
    /// The correct answer was washed away
    Failed,
    /// Both wrong answers were washed away
    Solved { score: u32 },
}

/// A tile that lost paint this frame
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Impact {
    pub tile: usize,
    pub pos: Vec2,
    pub color: GraffitiColor,
    /// This impact pushed the tile over the wash threshold
    pub washed: bool,
}

/// Everything the water did during one input frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImpactReport {
    pub impacts: Vec<Impact>,
    /// Splash cue (rolled once per impacting frame)
    pub splash: bool,
}

/// Score for a question solved `elapsed` seconds after it appeared
pub fn calc_score(elapsed: f32) -> u32 {
    let bonus = ((SPEED_BONUS_WINDOW - elapsed) * SPEED_BONUS_RATE).floor().max(0.0);
    BASE_SCORE + bonus as u32
}

/// The active question and its answer tiles
#[derive(Debug, Clone)]
pub struct Round {
    pub question: Question,
    pub answers: Vec<ErosionSurface>,
    /// Seconds since the question appeared
    elapsed: f32,
    outcome: Option<RoundOutcome>,
}

impl Round {
    /// Generate a question for `table` and lay its answers out on the wall
    pub fn generate<R: Rng + ?Sized>(
        table: u32,
        width: f32,
        height: f32,
        renderer: &dyn GlyphRenderer,
        rng: &mut R,
    ) -> Self {
        let set = generate_question(table, rng);
        let answers = place_answers(&set.answers, width, height, renderer, rng);
        log::debug!(
            "Question {} answers {:?}",
            set.question.text(),
            answers.iter().map(|a| a.text.as_str()).collect::<Vec<_>>()
        );
        Self::from_parts(set.question, answers)
    }

    /// Build a round from already placed tiles
    pub fn from_parts(question: Question, answers: Vec<ErosionSurface>) -> Self {
        Self {
            question,
            answers,
            elapsed: 0.0,
            outcome: None,
        }
    }

    #[inline]
    pub fn elapsed(&self) -> f32 {
        self.elapsed
    }

    #[inline]
    pub fn outcome(&self) -> Option<RoundOutcome> {
        self.outcome
    }

    #[inline]
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }

    /// Index of the correct tile
    pub fn correct_index(&self) -> Option<usize> {
        self.answers.iter().position(|a| a.is_correct)
    }

    /// Number of wrong tiles washed so far
    pub fn wrongs_washed(&self) -> usize {
        self.answers
            .iter()
            .filter(|a| !a.is_correct && a.is_completely_washed())
            .count()
    }

    /// Advance the question clock and spray water at `aim` while firing.
    ///
    /// Every unwashed tile whose hit box contains the aim point takes an
    /// impact. Finished rounds ignore input and stop their clock.
    pub fn on_input<R: Rng + ?Sized>(
        &mut self,
        aim: Vec2,
        firing: bool,
        dt: f32,
        radius: f32,
        rng: &mut R,
    ) -> ImpactReport {
        let mut report = ImpactReport::default();
        if self.is_over() {
            return report;
        }
        self.elapsed += dt;
        if !firing {
            return report;
        }

        for (tile, answer) in self.answers.iter_mut().enumerate() {
            if answer.is_completely_washed() || !answer.hit_test(aim) {
                continue;
            }
            if answer.apply_impact(aim, radius) {
                report.impacts.push(Impact {
                    tile,
                    pos: aim,
                    color: answer.color,
                    washed: answer.is_completely_washed(),
                });
            }
        }

        if !report.impacts.is_empty() {
            report.splash = rng.random_bool(SPLASH_CHANCE);
        }
        report
    }

    /// Decide the round once impacts for the frame are applied.
    ///
    /// Returns the outcome only on the frame it is reached. A washed correct
    /// answer wins over washed wrong answers in the same frame.
    pub fn check_conditions(&mut self) -> Option<RoundOutcome> {
        if self.is_over() {
            return None;
        }
        let correct_washed = self
            .answers
            .iter()
            .any(|a| a.is_correct && a.is_completely_washed());

        let outcome = if correct_washed {
            RoundOutcome::Failed
        } else if self.wrongs_washed() == 2 {
            RoundOutcome::Solved {
                score: calc_score(self.elapsed),
            }
        } else {
            return None;
        };
        self.outcome = Some(outcome);
        Some(outcome)
    }
}
