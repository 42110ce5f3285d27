//! Graded test behind Test mode.
//!
//! The learner fills in an answer sheet, then submits it once. Grading freezes
//! the sheet and makes the reward claimable.

use serde::{Deserialize, Serialize};

use crate::question::QuestionItem;
use crate::scoring::{test_xp, RewardClaim, TestStats};

/// Graded result of a submitted test.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestReport {
    pub correct: u32,
    pub total: u32,
    /// Rounded percentage, 0 for an empty test.
    pub percentage: u32,
    pub message: String,
}

impl TestReport {
    fn new(correct: u32, total: u32) -> Self {
        let percentage = if total == 0 {
            0
        } else {
            (f64::from(correct) / f64::from(total) * 100.0).round() as u32
        };
        Self {
            correct,
            total,
            percentage,
            message: feedback_message(percentage).to_string(),
        }
    }
}

fn feedback_message(percentage: u32) -> &'static str {
    match percentage {
        100.. => "Perfect score! Congratulations!",
        80..=99 => "Great job! You did excellently!",
        60..=79 => "Good effort! You're on the right track.",
        40..=59 => "Not bad, but there's room for improvement.",
        _ => "Keep practicing, you'll get better!",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSession {
    questions: Vec<QuestionItem>,
    answers: Vec<Option<String>>,
    report: Option<TestReport>,
    reward: RewardClaim,
}

impl TestSession {
    pub fn new(questions: &[QuestionItem]) -> Self {
        Self {
            questions: questions.to_vec(),
            answers: vec![None; questions.len()],
            report: None,
            reward: RewardClaim::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn questions(&self) -> &[QuestionItem] {
        &self.questions
    }

    pub fn answer(&self, index: usize) -> Option<&str> {
        self.answers.get(index)?.as_deref()
    }

    pub fn answered_count(&self) -> usize {
        self.answers.iter().filter(|a| a.is_some()).count()
    }

    pub fn is_submitted(&self) -> bool {
        self.report.is_some()
    }

    pub fn report(&self) -> Option<&TestReport> {
        self.report.as_ref()
    }

    pub fn earned_xp(&self) -> Option<u32> {
        self.reward.amount()
    }

    pub fn take_reward(&mut self) -> Option<u32> {
        self.reward.take()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Record `option` as the answer to question `index`. Replaces an earlier
    /// choice. Ignored after submission or for an unknown question.
    pub fn choose(&mut self, index: usize, option: &str) -> bool {
        if self.report.is_some() {
            return false;
        }
        match self.answers.get_mut(index) {
            Some(slot) => {
                *slot = Some(option.to_string());
                true
            }
            None => false,
        }
    }

    /// Grade the sheet. Unanswered questions count as wrong. A second call
    /// returns the existing report.
    pub fn submit(&mut self) -> &TestReport {
        let report = match self.report.take() {
            Some(report) => report,
            None => self.grade(),
        };
        self.report.insert(report)
    }

    /// Blank sheet, new reward.
    pub fn restart(&mut self) {
        self.answers = vec![None; self.questions.len()];
        self.report = None;
        self.reward.reset();
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn grade(&mut self) -> TestReport {
        let correct = self
            .questions
            .iter()
            .zip(&self.answers)
            .filter(|(q, a)| a.as_deref().is_some_and(|a| q.is_correct(a)))
            .count();
        let stats = TestStats {
            correct: u32::try_from(correct).unwrap_or(u32::MAX),
            total: u32::try_from(self.questions.len()).unwrap_or(u32::MAX),
        };
        if stats.total > 0 {
            self.reward.earn(test_xp(&stats));
        }
        tracing::info!(
            correct = stats.correct,
            total = stats.total,
            xp = ?self.reward.amount(),
            "test submitted"
        );
        TestReport::new(stats.correct, stats.total)
    }
}
