//! Session state and core simulation types
//!
//! A session plays one level at a time: it owns the active round, the level
//! clock, the score and the transition countdown between questions. All of
//! it is advanced by [`super::tick`].

use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;
use thiserror::Error;

use super::erosion::{GraffitiColor, ProgressBar, WashState};
use super::glyph::{BlockFont, GlyphRenderer};
use super::levels::{LevelSpec, Praise, level_by_id};
use super::round::Round;
use super::water::WaterFx;
use crate::consts::LEVEL_COUNT;
use crate::progress::ProgressStore;
use crate::settings::Settings;

/// Stream offset for the cosmetic RNG
const FX_SEED_SALT: u64 = 0x5eed_f00d_cafe_d00d;

/// Current phase of play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GamePhase {
    /// No level running
    Menu,
    /// Question on the wall, water active
    Playing,
    /// Question solved, waiting for the next one
    Transition,
    /// Frozen; nothing advances
    Paused,
    /// The correct answer was washed away
    Failed,
    /// All questions of the level solved
    LevelComplete,
}

impl GamePhase {
    /// Phase has no way forward without a restart
    pub fn is_terminal(&self) -> bool {
        matches!(self, GamePhase::Failed | GamePhase::LevelComplete)
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GameEvent {
    QuestionStarted { number: u32, text: String },
    /// Splash sound cue
    Splash,
    /// Paint drip effect at an impact
    Drip { pos: Vec2, color: GraffitiColor },
    TileWashed { tile: usize, is_correct: bool },
    QuestionSolved { score_gained: u32, questions_completed: u32 },
    TransitionStarted { secs: f32, praise: Option<Praise> },
    QuestionFailed { correct: u32 },
    LevelComplete { level: u32, score: u32, time_secs: f32, stars: u8 },
    Paused,
    Resumed,
}

/// Why a level could not start
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("level {0} does not exist")]
    UnknownLevel(u32),
    #[error("level {0} is locked")]
    Locked(u32),
}

/// One answer tile as the presentation layer sees it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileView {
    pub text: String,
    pub pos: Vec2,
    pub rotation: f32,
    pub color: GraffitiColor,
    pub state: WashState,
    pub wash_progress: f32,
    pub progress_bar: Option<ProgressBar>,
}

/// Read-only snapshot for drawing the HUD and wall
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrameView {
    pub phase: GamePhase,
    pub level: Option<u32>,
    pub question: Option<String>,
    pub score: u32,
    pub questions_completed: u32,
    pub question_count: u32,
    pub elapsed: f32,
    pub time_remaining: f32,
    pub praise: Option<Praise>,
    pub tiles: Vec<TileView>,
}

/// Complete session state (deterministic for a given seed and input stream)
#[derive(Debug, Clone)]
pub struct Session<S: ProgressStore> {
    pub store: S,
    pub settings: Settings,
    /// Seed for reproducibility
    pub seed: u64,
    /// Play surface size (pixels)
    pub surface: Vec2,
    pub phase: GamePhase,
    /// Questions solved in the current level
    pub questions_completed: u32,
    /// Score in the current level
    pub score: u32,
    /// Seconds spent in the current level, transitions included
    pub elapsed: f32,
    /// Praise banner for the running transition
    pub praise: Option<Praise>,
    /// Stars from the last completed level
    pub last_stars: Option<u8>,
    pub water: WaterFx,
    pub(super) rng: Pcg32,
    pub(super) fx_rng: Pcg32,
    pub(super) round: Option<Round>,
    pub(super) transition_timer: f32,
    /// Phase to return to when unpausing
    resume_phase: GamePhase,
    level: Option<&'static LevelSpec>,
    renderer: Arc<dyn GlyphRenderer + Send + Sync>,
}

impl<S: ProgressStore> Session<S> {
    /// Create an idle session on a `width` x `height` play surface
    pub fn new(store: S, settings: Settings, seed: u64, width: f32, height: f32) -> Self {
        let mut session = Self {
            store,
            settings,
            seed,
            surface: Vec2::new(width, height),
            phase: GamePhase::Menu,
            questions_completed: 0,
            score: 0,
            elapsed: 0.0,
            praise: None,
            last_stars: None,
            water: WaterFx::new(),
            rng: Pcg32::seed_from_u64(seed),
            fx_rng: Pcg32::seed_from_u64(seed ^ FX_SEED_SALT),
            round: None,
            transition_timer: 0.0,
            resume_phase: GamePhase::Playing,
            level: None,
            renderer: Arc::new(BlockFont::default()),
        };
        session.resize(width, height);
        session
    }

    /// Use a different text renderer for answer tiles
    pub fn with_renderer(mut self, renderer: Arc<dyn GlyphRenderer + Send + Sync>) -> Self {
        self.renderer = renderer;
        self
    }

    /// Resize the play surface; takes effect from the next question
    pub fn resize(&mut self, width: f32, height: f32) {
        self.surface = Vec2::new(width, height);
        self.water.set_nozzle(Vec2::new(width / 2.0, height - 180.0));
    }

    #[inline]
    pub fn level(&self) -> Option<&'static LevelSpec> {
        self.level
    }

    #[inline]
    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    /// Mutable access to the active round (scripted setups, tools)
    #[inline]
    pub fn round_mut(&mut self) -> Option<&mut Round> {
        self.round.as_mut()
    }

    /// Seconds left on the level's time limit (display only)
    pub fn time_remaining(&self) -> f32 {
        self.level
            .map(|l| (l.time_limit_secs as f32 - self.elapsed).max(0.0))
            .unwrap_or(0.0)
    }

    #[inline]
    pub fn transition_remaining(&self) -> f32 {
        self.transition_timer.max(0.0)
    }

    /// Start (or restart) a level; returns the first question's event
    pub fn start_level(&mut self, level_id: u32) -> Result<GameEvent, StartError> {
        let level = level_by_id(level_id).ok_or(StartError::UnknownLevel(level_id))?;
        if !self.store.is_unlocked(level_id) {
            return Err(StartError::Locked(level_id));
        }

        self.level = Some(level);
        self.questions_completed = 0;
        self.score = 0;
        self.elapsed = 0.0;
        self.praise = None;
        self.last_stars = None;
        self.water.clear();
        self.phase = GamePhase::Playing;
        log::info!("Level {} ({}) started", level.id, level.name);
        Ok(self.place_question(level))
    }

    pub fn restart_level(&mut self) -> Result<GameEvent, StartError> {
        match self.level {
            Some(level) => self.start_level(level.id),
            None => Err(StartError::UnknownLevel(0)),
        }
    }

    /// Move on to the following level; back to the menu (`None`) after the last one
    pub fn next_level(&mut self) -> Result<Option<GameEvent>, StartError> {
        match self.level {
            Some(level) if level.id < LEVEL_COUNT => self.start_level(level.id + 1).map(Some),
            _ => {
                self.quit_to_menu();
                Ok(None)
            }
        }
    }

    pub fn quit_to_menu(&mut self) {
        self.phase = GamePhase::Menu;
        self.round = None;
        self.level = None;
        self.praise = None;
        self.transition_timer = 0.0;
        self.water.clear();
    }

    /// Toggle pause while a level is in progress
    pub fn toggle_pause(&mut self) -> Option<GameEvent> {
        match self.phase {
            GamePhase::Playing | GamePhase::Transition => {
                self.resume_phase = self.phase;
                self.phase = GamePhase::Paused;
                Some(GameEvent::Paused)
            }
            GamePhase::Paused => {
                self.phase = self.resume_phase;
                Some(GameEvent::Resumed)
            }
            _ => None,
        }
    }

    /// Put the next question of the running level on the wall
    pub(super) fn start_question(&mut self) -> Option<GameEvent> {
        let level = self.level?;
        Some(self.place_question(level))
    }

    fn place_question(&mut self, level: &'static LevelSpec) -> GameEvent {
        let round = Round::generate(
            level.table,
            self.surface.x,
            self.surface.y,
            self.renderer.as_ref(),
            &mut self.rng,
        );
        let text = round.question.text();
        log::info!("Question {}: {}", self.questions_completed + 1, text);
        self.round = Some(round);
        self.transition_timer = 0.0;
        self.praise = None;
        self.phase = GamePhase::Playing;
        GameEvent::QuestionStarted {
            number: self.questions_completed + 1,
            text,
        }
    }

    /// Snapshot for the presentation layer
    pub fn frame(&self) -> FrameView {
        let tiles = self
            .round
            .iter()
            .flat_map(|r| r.answers.iter())
            .map(|a| TileView {
                text: a.text.clone(),
                pos: a.pos,
                rotation: a.rotation,
                color: a.color,
                state: a.state(),
                wash_progress: a.wash_progress(),
                progress_bar: a.progress_bar(),
            })
            .collect();

        FrameView {
            phase: self.phase,
            level: self.level.map(|l| l.id),
            question: self.round.as_ref().map(|r| r.question.text()),
            score: self.score,
            questions_completed: self.questions_completed,
            question_count: self.level.map(|l| l.question_count).unwrap_or(0),
            elapsed: self.elapsed,
            time_remaining: self.time_remaining(),
            praise: self.praise,
            tiles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::MemoryProgress;

    fn session() -> Session<MemoryProgress> {
        Session::new(MemoryProgress::unlocked_through(3), Settings::default(), 17, 1280.0, 720.0)
    }

    #[test]
    fn test_new_session_is_idle() {
        let s = session();
        assert_eq!(s.phase, GamePhase::Menu);
        assert!(s.round().is_none());
        assert!(s.frame().tiles.is_empty());
    }

    #[test]
    fn test_start_level_places_question() {
        let mut s = session();
        s.start_level(2).unwrap();
        assert_eq!(s.phase, GamePhase::Playing);
        let round = s.round().unwrap();
        assert_eq!(round.question.a, 3);
        let frame = s.frame();
        assert_eq!(frame.tiles.len(), 3);
        assert_eq!(frame.question_count, 5);
        assert_eq!(frame.time_remaining, 110.0);
        assert!(frame.question.unwrap().starts_with("3 × "));
    }

    #[test]
    fn test_start_level_reports_first_question() {
        let mut s = session();
        let event = s.start_level(1).unwrap();
        let expected = s.round().unwrap().question.text();
        assert_eq!(event, GameEvent::QuestionStarted { number: 1, text: expected });

        let event = s.restart_level().unwrap();
        assert!(matches!(event, GameEvent::QuestionStarted { number: 1, .. }));
        let event = s.next_level().unwrap();
        assert!(matches!(event, Some(GameEvent::QuestionStarted { number: 1, .. })));
    }

    #[test]
    fn test_next_level_after_last_returns_to_menu() {
        let mut s = Session::new(MemoryProgress::unlocked_through(10), Settings::default(), 3, 1280.0, 720.0);
        s.start_level(10).unwrap();
        assert_eq!(s.next_level(), Ok(None));
        assert_eq!(s.phase, GamePhase::Menu);
    }

    #[test]
    fn test_locked_and_unknown_levels() {
        let mut s = session();
        assert_eq!(s.start_level(4), Err(StartError::Locked(4)));
        assert_eq!(s.start_level(11), Err(StartError::UnknownLevel(11)));
        assert_eq!(s.phase, GamePhase::Menu);
    }

    #[test]
    fn test_pause_round_trip() {
        let mut s = session();
        assert_eq!(s.toggle_pause(), None);
        s.start_level(1).unwrap();
        assert_eq!(s.toggle_pause(), Some(GameEvent::Paused));
        assert_eq!(s.phase, GamePhase::Paused);
        assert_eq!(s.toggle_pause(), Some(GameEvent::Resumed));
        assert_eq!(s.phase, GamePhase::Playing);
    }

    #[test]
    fn test_next_level_and_quit() {
        let mut s = session();
        s.start_level(1).unwrap();
        s.next_level().unwrap();
        assert_eq!(s.level().unwrap().id, 2);
        s.quit_to_menu();
        assert_eq!(s.phase, GamePhase::Menu);
        assert!(s.round().is_none());
        assert!(s.restart_level().is_err());
    }

    #[test]
    fn test_same_seed_same_questions() {
        let mut a = session();
        let mut b = session();
        a.start_level(3).unwrap();
        b.start_level(3).unwrap();
        let (ra, rb) = (a.round().unwrap(), b.round().unwrap());
        assert_eq!(ra.question, rb.question);
        for (x, y) in ra.answers.iter().zip(&rb.answers) {
            assert_eq!(x.text, y.text);
            assert_eq!(x.pos, y.pos);
        }
    }
}
