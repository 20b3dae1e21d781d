//! Multiplication fact generation
//!
//! A question is `a × b`, where `a` is the level's table (or random 2..=10 on
//! mixed levels) and `b` is random 1..=10. Two distractors are drawn from
//! arithmetic near-misses of the product so wrong answers look plausible.

use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

/// Table value that marks a mixed level
pub const MIXED_TABLE: u32 = 0;
/// Largest table (and second operand) a question uses
pub const MAX_TABLE: u32 = 10;

/// A multiplication fact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub a: u32,
    pub b: u32,
    pub correct: u32,
}

impl Question {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b, correct: a * b }
    }

    /// Text shown above the wall
    pub fn text(&self) -> String {
        format!("{} × {} = ?", self.a, self.b)
    }
}

/// One answer painted on the wall
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerCandidate {
    pub value: u32,
    pub is_correct: bool,
}

/// A question with its three shuffled answers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSet {
    pub question: Question,
    pub answers: [AnswerCandidate; 3],
}

/// Generate a question for `table` (0 = mixed) with shuffled answers
///
/// Tables outside `0..=MAX_TABLE` are a caller bug.
pub fn generate_question<R: Rng + ?Sized>(table: u32, rng: &mut R) -> QuestionSet {
    debug_assert!(table <= MAX_TABLE, "no multiplication table {table}");
    let a = if table == MIXED_TABLE {
        rng.random_range(2..=MAX_TABLE)
    } else {
        table
    };
    let b = rng.random_range(1..=MAX_TABLE);
    let question = Question::new(a, b);
    let [w0, w1] = pick_distractors(a, b, rng);

    let mut answers = [
        AnswerCandidate { value: question.correct, is_correct: true },
        AnswerCandidate { value: w0, is_correct: false },
        AnswerCandidate { value: w1, is_correct: false },
    ];
    answers.shuffle(rng);

    QuestionSet { question, answers }
}

/// All valid distractors for `a × b`, ascending
///
/// Near-misses of the product: neighbouring multiples on either operand,
/// plus ±a, ±10 and ±1. The product itself and non-positive values are
/// removed. For `a >= 1` and `b >= 1` the pool always holds `correct + 1`
/// and `correct + 10`, so it never has fewer than two entries.
pub fn distractor_pool(a: u32, b: u32) -> Vec<u32> {
    let (a, b) = (i64::from(a), i64::from(b));
    let correct = a * b;
    let mut pool: Vec<i64> = vec![
        a * (b + 1),
        a * (b - 1),
        (a + 1) * b,
        (a - 1) * b,
        correct + a,
        correct - a,
        correct + 10,
        correct - 10,
        correct + 1,
        correct - 1,
    ];
    pool.sort_unstable();
    pool.dedup();
    pool.into_iter()
        .filter(|&v| v > 0 && v != correct)
        .map(|v| v as u32)
        .collect()
}

/// Draw two distinct distractors for `a × b`
pub fn pick_distractors<R: Rng + ?Sized>(a: u32, b: u32, rng: &mut R) -> [u32; 2] {
    let mut pool = distractor_pool(a, b);
    debug_assert!(pool.len() >= 2, "distractor pool collapsed for {a} x {b}");
    pool.shuffle(rng);
    [pool[0], pool[1]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_pool_never_collapses() {
        // Covers fixed tables and the mixed range, including a = 1
        for a in 1..=10 {
            for b in 1..=10 {
                let pool = distractor_pool(a, b);
                assert!(pool.len() >= 2, "{a} x {b} -> {pool:?}");
                assert!(!pool.contains(&(a * b)));
                assert!(pool.iter().all(|&v| v > 0));
            }
        }
    }

    #[test]
    fn test_pool_for_two_times_one() {
        // 2*2, 2*0 (dropped), 3*1, 1*1, 2+2, 2-2 (dropped), 12, -8 (dropped), 3, 1
        assert_eq!(distractor_pool(2, 1), vec![1, 3, 4, 12]);
    }

    #[test]
    fn test_fixed_table_keeps_operand() {
        let mut rng = Pcg32::seed_from_u64(7);
        for _ in 0..50 {
            let set = generate_question(6, &mut rng);
            assert_eq!(set.question.a, 6);
            assert!((1..=10).contains(&set.question.b));
        }
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "no multiplication table")]
    fn test_out_of_range_table_is_rejected() {
        let mut rng = Pcg32::seed_from_u64(1);
        generate_question(u32::MAX, &mut rng);
    }

    #[test]
    fn test_catalog_tables_are_in_range() {
        assert!(crate::sim::levels::LEVELS.iter().all(|l| l.table <= MAX_TABLE));
    }

    #[test]
    fn test_question_text() {
        assert_eq!(Question::new(7, 8).text(), "7 × 8 = ?");
    }

    #[test]
    fn test_same_seed_same_question() {
        let mut r1 = Pcg32::seed_from_u64(42);
        let mut r2 = Pcg32::seed_from_u64(42);
        assert_eq!(generate_question(0, &mut r1), generate_question(0, &mut r2));
    }

    #[test]
    fn test_correct_answer_position_varies() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut seen = [false; 3];
        for _ in 0..100 {
            let set = generate_question(4, &mut rng);
            let idx = set.answers.iter().position(|c| c.is_correct).unwrap();
            seen[idx] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    proptest! {
        #[test]
        fn prop_generated_sets_are_valid(seed in any::<u64>(), table in 0u32..=10) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let set = generate_question(table, &mut rng);
            let q = set.question;

            prop_assert_eq!(q.correct, q.a * q.b);
            prop_assert!((1..=10).contains(&q.b));
            if table == MIXED_TABLE {
                prop_assert!((2..=10).contains(&q.a));
            } else {
                prop_assert_eq!(q.a, table);
            }

            let correct: Vec<_> = set.answers.iter().filter(|c| c.is_correct).collect();
            prop_assert_eq!(correct.len(), 1);
            prop_assert_eq!(correct[0].value, q.correct);

            let v = set.answers.map(|c| c.value);
            prop_assert!(v.iter().all(|&x| x > 0));
            prop_assert!(v[0] != v[1] && v[1] != v[2] && v[0] != v[2]);
        }
    }
}
