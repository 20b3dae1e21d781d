//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only (gameplay and cosmetic streams kept apart)
//! - Stable iteration order (tiles in answer order)
//! - No rendering or platform dependencies

pub mod autoplay;
pub mod erosion;
pub mod facts;
pub mod glyph;
pub mod layout;
pub mod levels;
pub mod round;
pub mod state;
pub mod tick;
pub mod water;

pub use autoplay::autoplay_aim;
pub use erosion::{ErosionSurface, GraffitiColor, ProgressBand, ProgressBar, WashState};
pub use facts::{AnswerCandidate, MAX_TABLE, MIXED_TABLE, Question, QuestionSet, generate_question, pick_distractors};
pub use glyph::{BlockFont, GlyphRaster, GlyphRenderer};
pub use layout::{Wall, place_answers};
pub use levels::{LEVELS, LevelSpec, PRAISE_MESSAGES, Praise, level_by_id};
pub use round::{Impact, ImpactReport, Round, RoundOutcome, calc_score};
pub use state::{FrameView, GameEvent, GamePhase, Session, StartError, TileView};
pub use tick::{TickInput, tick};
pub use water::{Drip, SprayParticle, WaterFx};
