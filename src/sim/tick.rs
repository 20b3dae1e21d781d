//! Per-frame simulation step
//!
//! Advances the session by one variable timestep and reports what happened
//! as a list of events.

use glam::Vec2;
use rand::seq::IndexedRandom;

use super::autoplay::autoplay_aim;
use super::levels::PRAISE_MESSAGES;
use super::round::RoundOutcome;
use super::state::{GameEvent, GamePhase, Session};
use crate::clamp_dt;
use crate::consts::*;
use crate::progress::ProgressStore;

/// Input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct TickInput {
    /// Where the water stream hits (play surface pixels)
    pub aim: Vec2,
    /// Water is spraying this frame
    pub firing: bool,
    /// Pause toggle
    pub pause: bool,
    /// Demo mode - the game washes the wrong answers itself
    pub autoplay: bool,
}

/// Advance the session by `dt` seconds
pub fn tick<S: ProgressStore>(session: &mut Session<S>, input: &TickInput, dt: f32) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let dt = clamp_dt(dt);

    if input.pause {
        events.extend(session.toggle_pause());
        return events;
    }

    if !matches!(session.phase, GamePhase::Playing | GamePhase::Transition) {
        return events;
    }

    session.elapsed += dt;

    if session.phase == GamePhase::Transition {
        session.water.update(dt, input.aim, false, &mut session.fx_rng);
        session.transition_timer -= dt;
        if session.transition_timer <= 0.0 {
            events.extend(session.start_question());
        }
        return events;
    }

    let mut input = *input;
    if input.autoplay {
        match session.round().and_then(autoplay_aim) {
            Some(aim) => {
                input.aim = aim;
                input.firing = true;
            }
            None => input.firing = false,
        }
    }

    session.water.update(dt, input.aim, input.firing, &mut session.fx_rng);

    let radius = session.settings.impact_radius();
    let Some(round) = session.round.as_mut() else {
        return events;
    };
    let report = round.on_input(input.aim, input.firing, dt, radius, &mut session.fx_rng);

    for impact in &report.impacts {
        session.water.spawn_drips(impact.pos, impact.color, &mut session.fx_rng);
        events.push(GameEvent::Drip {
            pos: impact.pos,
            color: impact.color,
        });
        if impact.washed {
            log::debug!("Tile {} washed", impact.tile);
            events.push(GameEvent::TileWashed {
                tile: impact.tile,
                is_correct: round.answers[impact.tile].is_correct,
            });
        }
    }
    if report.splash {
        events.push(GameEvent::Splash);
    }

    match round.check_conditions() {
        Some(RoundOutcome::Failed) => {
            let correct = round.question.correct;
            log::info!("Question failed: the answer was {}", correct);
            session.phase = GamePhase::Failed;
            events.push(GameEvent::QuestionFailed { correct });
        }
        Some(RoundOutcome::Solved { score }) => {
            session.questions_completed += 1;
            session.score += score;
            events.push(GameEvent::QuestionSolved {
                score_gained: score,
                questions_completed: session.questions_completed,
            });
            finish_question(session, &mut events);
        }
        None => {}
    }

    events
}

/// Either close out the level or start the countdown to the next question
fn finish_question<S: ProgressStore>(session: &mut Session<S>, events: &mut Vec<GameEvent>) {
    let Some(level) = session.level() else {
        return;
    };

    if session.questions_completed >= level.question_count {
        let stars = session
            .store
            .record_level_result(level.id, session.score, session.elapsed);
        session.last_stars = Some(stars);
        session.phase = GamePhase::LevelComplete;
        log::info!(
            "Level {} complete: {} points in {:.1}s, {} stars",
            level.id,
            session.score,
            session.elapsed,
            stars
        );
        events.push(GameEvent::LevelComplete {
            level: level.id,
            score: session.score,
            time_secs: session.elapsed,
            stars,
        });
        return;
    }

    let (secs, praise) = if session.questions_completed % PRAISE_EVERY == 0 {
        (
            PRAISE_TRANSITION_SECS,
            PRAISE_MESSAGES.choose(&mut session.fx_rng).copied(),
        )
    } else {
        (TRANSITION_SECS, None)
    };
    session.praise = praise;
    session.transition_timer = secs;
    session.phase = GamePhase::Transition;
    events.push(GameEvent::TransitionStarted { secs, praise });
}
