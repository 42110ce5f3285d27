//! Spaced-repetition scheduler behind Learn mode.
//!
//! Every question is wrapped in a [`ReviewRecord`] when the session starts.
//! Answers move the record's ease factor and interval; [`LearnSession::advance`]
//! ends the session once nothing is due and otherwise steps to the next queue
//! slot in round-robin order.
//!
//! ## State Transitions
//!
//! ```text
//! Answering -> Answered -> (advance) -> Answering | Completed
//! ```
//!
//! `Completed` is terminal until [`LearnSession::restart`]. An empty question
//! list puts the session in `Empty`, where every command is a no-op.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::question::QuestionItem;
use crate::scoring::{learn_xp, LearnStats, RewardClaim};
use crate::shuffle::{shuffled, study_rng, StudyRng};
use crate::storage::LearnConfig;

/// The ease factor never drops below this.
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Shortest starting interval, one minute. Keeps a correctly answered record
/// from staying due.
pub const MIN_INITIAL_INTERVAL_DAYS: f64 = 1.0 / (24.0 * 60.0);

const MS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;

/// Review metadata wrapped around one question for the length of a session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRecord {
    pub item: QuestionItem,
    /// Days until the item is due again. Fractional.
    pub interval: f64,
    pub next_review_at: DateTime<Utc>,
    pub ease_factor: f64,
    pub correct_count: u32,
    pub incorrect_count: u32,
}

impl ReviewRecord {
    pub fn new(item: QuestionItem, config: &LearnConfig, now: DateTime<Utc>) -> Self {
        Self {
            item,
            interval: config.initial_interval_days.max(MIN_INITIAL_INTERVAL_DAYS),
            next_review_at: now,
            ease_factor: config.initial_ease.max(MIN_EASE_FACTOR),
            correct_count: 0,
            incorrect_count: 0,
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.next_review_at <= now
    }

    /// Apply one answer to the record.
    pub fn review(&mut self, correct: bool, config: &LearnConfig, now: DateTime<Utc>) {
        if correct {
            self.ease_factor = (self.ease_factor + config.ease_bonus).max(MIN_EASE_FACTOR);
            self.interval *= self.ease_factor;
            self.correct_count += 1;
        } else {
            self.ease_factor = (self.ease_factor - config.ease_penalty).max(MIN_EASE_FACTOR);
            self.interval = 1.0;
            self.incorrect_count += 1;
        }
        self.next_review_at = due_after(now, self.interval);
    }
}

/// `now + days`, saturating at the latest representable instant.
fn due_after(now: DateTime<Utc>, days: f64) -> DateTime<Utc> {
    let ms = (days * MS_PER_DAY).round() as i64;
    Duration::try_milliseconds(ms)
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearnPhase {
    /// No questions were supplied.
    Empty,
    Answering,
    Answered,
    Completed,
}

/// Result of submitting an answer.
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub correct: bool,
    /// Text of the correct option, if the question's answer resolves.
    pub correct_option: Option<String>,
    /// The record after the update.
    pub record: ReviewRecord,
}

/// One Learn-mode session.
#[derive(Debug, Clone)]
pub struct LearnSession {
    questions: Vec<QuestionItem>,
    queue: Vec<ReviewRecord>,
    current_index: usize,
    phase: LearnPhase,
    /// Options of the current item in presentation order.
    options: Vec<String>,
    selected: Option<String>,
    explanation_visible: bool,
    stats: LearnStats,
    reward: RewardClaim,
    config: LearnConfig,
    rng: StudyRng,
}

impl LearnSession {
    pub fn new(questions: &[QuestionItem]) -> Self {
        Self::with_config(questions, LearnConfig::default(), None)
    }

    pub fn with_config(questions: &[QuestionItem], config: LearnConfig, seed: Option<u64>) -> Self {
        Self::start_at(questions, config, seed, Utc::now())
    }

    /// Start a session whose records become due at `now`.
    pub fn start_at(
        questions: &[QuestionItem],
        config: LearnConfig,
        seed: Option<u64>,
        now: DateTime<Utc>,
    ) -> Self {
        let mut session = Self {
            questions: questions.to_vec(),
            queue: Vec::new(),
            current_index: 0,
            phase: LearnPhase::Empty,
            options: Vec::new(),
            selected: None,
            explanation_visible: false,
            stats: LearnStats::default(),
            reward: RewardClaim::default(),
            config,
            rng: study_rng(seed),
        };
        session.restart_at(now);
        session
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> LearnPhase {
        self.phase
    }

    pub fn is_completed(&self) -> bool {
        self.phase == LearnPhase::Completed
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn queue(&self) -> &[ReviewRecord] {
        &self.queue
    }

    pub fn current(&self) -> Option<&ReviewRecord> {
        match self.phase {
            LearnPhase::Answering | LearnPhase::Answered => self.queue.get(self.current_index),
            _ => None,
        }
    }

    /// Options of the current item, freshly shuffled for this presentation.
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn explanation_visible(&self) -> bool {
        self.explanation_visible
    }

    pub fn explanation_delay_ms(&self) -> u64 {
        self.config.explanation_delay_ms
    }

    pub fn stats(&self) -> LearnStats {
        self.stats
    }

    /// Share of correct answers so far, 0..=100.
    pub fn progress_pct(&self) -> f64 {
        self.stats.accuracy() * 100.0
    }

    pub fn due_count_at(&self, now: DateTime<Utc>) -> usize {
        self.queue.iter().filter(|r| r.is_due(now)).count()
    }

    /// XP recorded for the completed session, whether or not it was collected.
    pub fn earned_xp(&self) -> Option<u32> {
        self.reward.amount()
    }

    /// Collect the completion award. Yields it at most once.
    pub fn take_reward(&mut self) -> Option<u32> {
        self.reward.take()
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn submit_answer(&mut self, selected: &str) -> Option<AnswerOutcome> {
        self.submit_answer_at(selected, Utc::now())
    }

    /// Judge `selected` against the current item and update its record.
    ///
    /// Returns `None` unless the session is waiting for an answer.
    pub fn submit_answer_at(&mut self, selected: &str, now: DateTime<Utc>) -> Option<AnswerOutcome> {
        if self.phase != LearnPhase::Answering {
            return None;
        }
        let record = self.queue.get_mut(self.current_index)?;
        let correct = record.item.is_correct(selected);
        record.review(correct, &self.config, now);

        if correct {
            self.stats.correct += 1;
            self.stats.streak += 1;
        } else {
            self.stats.incorrect += 1;
            self.stats.streak = 0;
        }

        self.selected = Some(selected.to_string());
        self.phase = LearnPhase::Answered;
        tracing::debug!(
            index = self.current_index,
            correct,
            ease = record.ease_factor,
            interval = record.interval,
            "learn answer submitted"
        );

        Some(AnswerOutcome {
            correct,
            correct_option: record.item.correct_option().map(str::to_string),
            record: record.clone(),
        })
    }

    /// Show the explanation of the answered item. Front ends call this after
    /// [`LearnConfig::explanation_delay_ms`].
    pub fn reveal_explanation(&mut self) -> bool {
        if self.phase == LearnPhase::Answered {
            self.explanation_visible = true;
        }
        self.explanation_visible
    }

    pub fn advance(&mut self) -> Option<LearnPhase> {
        self.advance_at(Utc::now())
    }

    /// Move past the answered item.
    ///
    /// Completes the session when no record is due at `now`; otherwise steps
    /// to the next queue slot cyclically, whether or not that slot is due.
    /// Returns `None` unless the current item has been answered.
    pub fn advance_at(&mut self, now: DateTime<Utc>) -> Option<LearnPhase> {
        if self.phase != LearnPhase::Answered {
            return None;
        }

        if self.due_count_at(now) == 0 {
            self.phase = LearnPhase::Completed;
            self.present();
            if self.stats.correct > 0 {
                self.reward.earn(learn_xp(&self.stats));
            }
            tracing::info!(
                correct = self.stats.correct,
                incorrect = self.stats.incorrect,
                xp = ?self.reward.amount(),
                "learn session completed"
            );
        } else {
            self.current_index = (self.current_index + 1) % self.queue.len();
            self.phase = LearnPhase::Answering;
            self.present();
        }
        Some(self.phase)
    }

    pub fn restart(&mut self) {
        self.restart_at(Utc::now());
    }

    /// Rebuild the queue and stats as they were when the session started.
    pub fn restart_at(&mut self, now: DateTime<Utc>) {
        self.queue = self
            .questions
            .iter()
            .cloned()
            .map(|item| ReviewRecord::new(item, &self.config, now))
            .collect();
        self.current_index = 0;
        self.stats = LearnStats::default();
        self.reward.reset();
        self.phase = if self.queue.is_empty() {
            LearnPhase::Empty
        } else {
            LearnPhase::Answering
        };
        self.present();
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Reset per-item flags and reshuffle the options of the current item.
    /// Nothing is on offer outside `Answering`.
    fn present(&mut self) {
        self.selected = None;
        self.explanation_visible = false;
        self.options = match (self.phase, self.queue.get(self.current_index)) {
            (LearnPhase::Answering, Some(record)) => shuffled(&record.item.options, &mut self.rng),
            _ => Vec::new(),
        };
    }
}
