//! Demo-mode aiming
//!
//! Picks a spot on a wrong answer that still has paint on it. The correct
//! answer is never targeted, so autoplay always solves the question.

use glam::Vec2;

use super::round::Round;

/// Where autoplay should spray next, or `None` when nothing is left to wash
pub fn autoplay_aim(round: &Round) -> Option<Vec2> {
    if round.is_over() {
        return None;
    }
    let correct = round.answers.iter().find(|a| a.is_correct);

    round
        .answers
        .iter()
        .filter(|a| !a.is_correct)
        .flat_map(|a| a.remaining_ink())
        .find(|&aim| correct.is_none_or(|c| !c.hit_test(aim)))
}
