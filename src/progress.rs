//! Level progress: stars, best scores and unlocks
//!
//! The simulation only sees the [`ProgressStore`] trait. Stores keep
//! best-of results so replaying a level can never lose stars.

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::consts::LEVEL_COUNT;
use crate::storage;

/// Stars for finishing a level with `score` in `time_secs`
pub fn star_rating(score: u32, time_secs: f32) -> u8 {
    if time_secs < 30.0 && score >= 800 {
        3
    } else if score >= 400 {
        2
    } else {
        1
    }
}

/// Best results for one level
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LevelRecord {
    pub completed: bool,
    pub stars: u8,
    pub best_score: u32,
    /// Fastest completion (seconds); 0 when never completed
    pub best_time: f32,
}

/// Persisted player progress
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressData {
    pub highest_unlocked: u32,
    #[serde(default)]
    pub levels: BTreeMap<u32, LevelRecord>,
    #[serde(default)]
    pub total_score: u64,
}

impl Default for ProgressData {
    fn default() -> Self {
        Self {
            highest_unlocked: 1,
            levels: BTreeMap::new(),
            total_score: 0,
        }
    }
}

impl ProgressData {
    /// Record a completion and return the stars earned by this run
    pub fn complete_level(&mut self, level_id: u32, score: u32, time_secs: f32) -> u8 {
        let stars = star_rating(score, time_secs);
        let prev = self.levels.get(&level_id).copied().unwrap_or_default();
        let best_time = if prev.completed && prev.best_time > 0.0 {
            prev.best_time.min(time_secs)
        } else {
            time_secs
        };
        self.levels.insert(
            level_id,
            LevelRecord {
                completed: true,
                stars: stars.max(prev.stars),
                best_score: score.max(prev.best_score),
                best_time,
            },
        );

        if level_id >= self.highest_unlocked && level_id < LEVEL_COUNT {
            self.highest_unlocked = level_id + 1;
        }
        self.total_score = self.levels.values().map(|l| u64::from(l.best_score)).sum();
        stars
    }

    pub fn level(&self, level_id: u32) -> LevelRecord {
        self.levels.get(&level_id).copied().unwrap_or_default()
    }

    pub fn is_unlocked(&self, level_id: u32) -> bool {
        (1..=self.highest_unlocked.max(1)).contains(&level_id)
    }
}

/// Where level results go
pub trait ProgressStore {
    /// Record a completed level; returns the stars earned by this run
    fn record_level_result(&mut self, level_id: u32, score: u32, time_secs: f32) -> u8;
    fn is_unlocked(&self, level_id: u32) -> bool;
    fn level_record(&self, level_id: u32) -> LevelRecord;
}

/// In-memory store (tests, headless runs)
#[derive(Debug, Clone, Default)]
pub struct MemoryProgress {
    pub data: ProgressData,
}

impl MemoryProgress {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store with levels `1..=level_id` unlocked
    pub fn unlocked_through(level_id: u32) -> Self {
        let mut store = Self::new();
        store.data.highest_unlocked = level_id.clamp(1, LEVEL_COUNT);
        store
    }
}

impl ProgressStore for MemoryProgress {
    fn record_level_result(&mut self, level_id: u32, score: u32, time_secs: f32) -> u8 {
        self.data.complete_level(level_id, score, time_secs)
    }

    fn is_unlocked(&self, level_id: u32) -> bool {
        self.data.is_unlocked(level_id)
    }

    fn level_record(&self, level_id: u32) -> LevelRecord {
        self.data.level(level_id)
    }
}

/// Progress persisted as JSON; write failures are logged, never raised
#[derive(Debug, Clone)]
pub struct PersistentProgress {
    pub data: ProgressData,
    location: PathBuf,
}

impl PersistentProgress {
    /// Storage key / file name
    const STORAGE_KEY: &'static str = "graffiti_wash_progress";

    /// Load from the default location, falling back to fresh progress
    pub fn load() -> Self {
        Self::load_from(storage::default_location(Self::STORAGE_KEY))
    }

    pub fn load_from(location: PathBuf) -> Self {
        let data = match storage::read_json::<ProgressData>(&location) {
            Ok(Some(data)) => {
                log::info!("Loaded progress ({} levels cleared)", data.levels.len());
                data
            }
            Ok(None) => {
                log::info!("No saved progress, starting fresh");
                ProgressData::default()
            }
            Err(e) => {
                log::warn!("Progress unreadable, starting fresh: {}", e);
                ProgressData::default()
            }
        };
        Self { data, location }
    }

    pub fn save(&self) {
        match storage::write_json(&self.location, &self.data) {
            Ok(()) => log::info!("Progress saved"),
            Err(e) => log::warn!("Failed to save progress: {}", e),
        }
    }
}

impl ProgressStore for PersistentProgress {
    fn record_level_result(&mut self, level_id: u32, score: u32, time_secs: f32) -> u8 {
        let stars = self.data.complete_level(level_id, score, time_secs);
        self.save();
        stars
    }

    fn is_unlocked(&self, level_id: u32) -> bool {
        self.data.is_unlocked(level_id)
    }

    fn level_record(&self, level_id: u32) -> LevelRecord {
        self.data.level(level_id)
    }
}
