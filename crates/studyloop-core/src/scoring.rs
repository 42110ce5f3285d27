//! Session scoring policy.
//!
//! Each study mode turns its own session telemetry into an XP award. All
//! formulas use integer arithmetic so awards are exact and never negative.
//!
//! | Mode       | Formula                                                          |
//! |------------|------------------------------------------------------------------|
//! | Flashcards | `5 + min(20, minutes*2) + 10 if all viewed + min(15, flips/5)`   |
//! | Learn      | `10 + (streak/2)*5 + floor(accuracy*10)`                         |
//! | Match      | `20 + max(0, 50 - seconds/10) + (streak/3)*5 + hearts*5`         |
//! | Test       | `15 + floor(ratio*45)`                                           |

use serde::{Deserialize, Serialize};

/// Telemetry of a flashcard session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlashcardStats {
    pub elapsed_secs: u64,
    pub flips: u32,
    pub all_viewed: bool,
}

/// Running counters of a Learn session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearnStats {
    pub correct: u32,
    pub incorrect: u32,
    pub streak: u32,
}

impl LearnStats {
    pub fn answered(&self) -> u32 {
        self.correct + self.incorrect
    }

    /// Fraction of correct answers, 0.0 before anything was answered.
    pub fn accuracy(&self) -> f64 {
        match self.answered() {
            0 => 0.0,
            n => f64::from(self.correct) / f64::from(n),
        }
    }
}

/// Telemetry of a finished matching game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchStats {
    pub elapsed_secs: u64,
    pub streak: u32,
    pub hearts: u32,
}

/// Result of a graded test.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestStats {
    pub correct: u32,
    pub total: u32,
}

pub fn flashcards_xp(stats: &FlashcardStats) -> u32 {
    let minutes = u32::try_from(stats.elapsed_secs / 60).unwrap_or(u32::MAX);
    let time_bonus = minutes.saturating_mul(2).min(20);
    let completion_bonus = if stats.all_viewed { 10 } else { 0 };
    let flip_bonus = (stats.flips / 5).min(15);
    5 + time_bonus + completion_bonus + flip_bonus
}

pub fn learn_xp(stats: &LearnStats) -> u32 {
    let streak_bonus = (stats.streak / 2) * 5;
    let accuracy_bonus = match stats.answered() {
        0 => 0,
        n => stats.correct * 10 / n,
    };
    10 + streak_bonus + accuracy_bonus
}

pub fn match_xp(stats: &MatchStats) -> u32 {
    let tens = u32::try_from(stats.elapsed_secs / 10).unwrap_or(u32::MAX);
    let time_bonus = 50u32.saturating_sub(tens);
    let streak_bonus = (stats.streak / 3) * 5;
    let hearts_bonus = stats.hearts * 5;
    20 + time_bonus + streak_bonus + hearts_bonus
}

pub fn test_xp(stats: &TestStats) -> u32 {
    if stats.total == 0 {
        return 0;
    }
    let correct = stats.correct.min(stats.total);
    15 + correct * 45 / stats.total
}

/// Once-per-completion guard for a mode's reward.
///
/// A mode calls [`RewardClaim::earn`] on its completion transition and the
/// controller drains it with [`RewardClaim::take`]. Re-checking the completion
/// condition, or polling again, never yields the award twice.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "xp", rename_all = "snake_case")]
pub enum RewardClaim {
    #[default]
    NotEarned,
    Pending(u32),
    Claimed(u32),
}

impl RewardClaim {
    /// Record the award. Ignored if an award was already recorded.
    pub fn earn(&mut self, xp: u32) {
        if *self == RewardClaim::NotEarned {
            *self = RewardClaim::Pending(xp);
        }
    }

    /// Hand out a pending award exactly once.
    pub fn take(&mut self) -> Option<u32> {
        match *self {
            RewardClaim::Pending(xp) => {
                *self = RewardClaim::Claimed(xp);
                Some(xp)
            }
            _ => None,
        }
    }

    /// The award recorded for this completion, claimed or not.
    pub fn amount(&self) -> Option<u32> {
        match *self {
            RewardClaim::NotEarned => None,
            RewardClaim::Pending(xp) | RewardClaim::Claimed(xp) => Some(xp),
        }
    }

    pub fn reset(&mut self) {
        *self = RewardClaim::NotEarned;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flashcards_quick_complete_run() {
        let stats = FlashcardStats {
            elapsed_secs: 59,
            flips: 10,
            all_viewed: true,
        };
        assert_eq!(flashcards_xp(&stats), 5 + 10 + 2);
    }

    #[test]
    fn flashcards_bonuses_are_capped() {
        let stats = FlashcardStats {
            elapsed_secs: 60 * 60,
            flips: 500,
            all_viewed: true,
        };
        assert_eq!(flashcards_xp(&stats), 5 + 20 + 10 + 15);
    }

    #[test]
    fn flashcards_time_bonus_steps_per_minute() {
        let at = |secs| {
            flashcards_xp(&FlashcardStats {
                elapsed_secs: secs,
                ..Default::default()
            })
        };
        assert_eq!(at(0), 5);
        assert_eq!(at(60), 7);
        assert_eq!(at(179), 9);
        assert_eq!(at(600), 25);
    }

    #[test]
    fn learn_perfect_four() {
        let stats = LearnStats {
            correct: 4,
            incorrect: 0,
            streak: 4,
        };
        assert_eq!(learn_xp(&stats), 30);
    }

    #[test]
    fn learn_accuracy_floors() {
        let stats = LearnStats {
            correct: 2,
            incorrect: 1,
            streak: 1,
        };
        // 10 + 0 + floor(6.67)
        assert_eq!(learn_xp(&stats), 16);
        assert!((stats.accuracy() - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn learn_without_answers_is_base_only() {
        assert_eq!(learn_xp(&LearnStats::default()), 10);
        assert_eq!(LearnStats::default().accuracy(), 0.0);
    }

    #[test]
    fn match_time_bonus_runs_out() {
        let fast = MatchStats {
            elapsed_secs: 35,
            streak: 3,
            hearts: 2,
        };
        assert_eq!(match_xp(&fast), 20 + 47 + 5 + 10);

        let slow = MatchStats {
            elapsed_secs: 10_000,
            streak: 0,
            hearts: 1,
        };
        assert_eq!(match_xp(&slow), 25);
    }

    #[test]
    fn test_xp_spans_advertised_range() {
        assert_eq!(test_xp(&TestStats { correct: 0, total: 4 }), 15);
        assert_eq!(test_xp(&TestStats { correct: 4, total: 4 }), 60);
        assert_eq!(test_xp(&TestStats { correct: 3, total: 4 }), 48);
        assert_eq!(test_xp(&TestStats { correct: 0, total: 0 }), 0);
    }

    #[test]
    fn claim_is_handed_out_once() {
        let mut claim = RewardClaim::default();
        assert_eq!(claim.take(), None);
        claim.earn(30);
        claim.earn(99);
        assert_eq!(claim.amount(), Some(30));
        assert_eq!(claim.take(), Some(30));
        assert_eq!(claim.take(), None);
        claim.earn(30);
        assert_eq!(claim.take(), None);
        assert_eq!(claim.amount(), Some(30));
    }

    #[test]
    fn reset_claim_can_be_earned_again() {
        let mut claim = RewardClaim::default();
        claim.earn(5);
        claim.take();
        claim.reset();
        claim.earn(7);
        assert_eq!(claim.take(), Some(7));
    }
}
