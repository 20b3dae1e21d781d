//! Level catalog and praise messages

use serde::Serialize;

use super::facts::MIXED_TABLE;

/// Static description of one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LevelSpec {
    pub id: u32,
    pub name: &'static str,
    pub subtitle: &'static str,
    /// Multiplication table, or 0 for mixed
    pub table: u32,
    pub question_count: u32,
    pub time_limit_secs: u32,
}

impl LevelSpec {
    #[inline]
    pub fn is_mixed(&self) -> bool {
        self.table == MIXED_TABLE
    }
}

const fn level(id: u32, name: &'static str, subtitle: &'static str, table: u32, questions: u32, limit: u32) -> LevelSpec {
    LevelSpec {
        id,
        name,
        subtitle,
        table,
        question_count: questions,
        time_limit_secs: limit,
    }
}

pub const LEVELS: [LevelSpec; 10] = [
    level(1, "THE SLUMS", "Multiplication x2", 2, 5, 120),
    level(2, "NEON MARKET", "Multiplication x3", 3, 5, 110),
    level(3, "DATA STREAM", "Multiplication x4", 4, 5, 100),
    level(4, "THE SPIRE", "Multiplication x5", 5, 5, 100),
    level(5, "CORE LOGIC", "Multiplication x6", 6, 6, 100),
    level(6, "SYNTH GARDEN", "Multiplication x7", 7, 6, 90),
    level(7, "GHOST WIRE", "Multiplication x8", 8, 6, 90),
    level(8, "DEEP NET", "Multiplication x9", 9, 7, 90),
    level(9, "CYBER VOID", "Multiplication x10", 10, 7, 80),
    level(10, "FINAL EXAM", "All Tables Mixed", MIXED_TABLE, 10, 180),
];

/// Look up a level by id
pub fn level_by_id(id: u32) -> Option<&'static LevelSpec> {
    LEVELS.iter().find(|l| l.id == id)
}

/// A praise banner shown between questions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Praise {
    pub text: &'static str,
    pub sub: &'static str,
}

pub const PRAISE_MESSAGES: [Praise; 10] = [
    Praise { text: "AWESOME!", sub: "You're on fire!" },
    Praise { text: "GENIUS!", sub: "Math wizard detected!" },
    Praise { text: "UNSTOPPABLE!", sub: "Keep it going!" },
    Praise { text: "INCREDIBLE!", sub: "Your brain is a supercomputer!" },
    Praise { text: "FANTASTIC!", sub: "Nothing can stop you!" },
    Praise { text: "LEGEND!", sub: "Pure clean-up machine!" },
    Praise { text: "BRILLIANT!", sub: "Einstein would be proud!" },
    Praise { text: "PERFECT!", sub: "Flawless technique!" },
    Praise { text: "SUPERSTAR!", sub: "The city is getting cleaner!" },
    Praise { text: "HEROIC!", sub: "Graffiti fears you!" },
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::LEVEL_COUNT;

    #[test]
    fn test_catalog_ids_are_sequential() {
        for (i, l) in LEVELS.iter().enumerate() {
            assert_eq!(l.id, i as u32 + 1);
        }
        assert_eq!(LEVELS.len() as u32, LEVEL_COUNT);
    }

    #[test]
    fn test_only_last_level_is_mixed() {
        assert!(level_by_id(10).unwrap().is_mixed());
        assert!(LEVELS[..9].iter().all(|l| !l.is_mixed()));
    }

    #[test]
    fn test_lookup() {
        let l = level_by_id(5).unwrap();
        assert_eq!((l.table, l.question_count), (6, 6));
        assert!(level_by_id(0).is_none());
        assert!(level_by_id(11).is_none());
    }
}
