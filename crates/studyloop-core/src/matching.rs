//! Matching-game state machine behind Match mode.
//!
//! Each question contributes two tiles sharing a pair key: the question text
//! and its answer text. Questions keep their original order; answers are
//! shuffled. The player selects one tile of each role; a correct pair is
//! locked in, a wrong pair costs a heart.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Playing -> Won | Lost
//! ```
//!
//! The timer starts on the first interaction and stops on either terminal
//! state. The caller drives it with [`MatchGame::tick`] once per second.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::question::QuestionItem;
use crate::scoring::{match_xp, MatchStats, RewardClaim};
use crate::shuffle::{shuffled, study_rng, StudyRng};
use crate::storage::MatchConfig;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchItemId(String);

impl MatchItemId {
    fn new(role: Role, pair_key: usize) -> Self {
        match role {
            Role::Question => Self(format!("q{pair_key}")),
            Role::Answer => Self(format!("a{pair_key}")),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for MatchItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for MatchItemId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Question,
    Answer,
}

/// One tile on the board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchItem {
    pub id: MatchItemId,
    pub content: String,
    pub role: Role,
    /// Index of the question this tile came from.
    pub pair_key: usize,
    pub selected: bool,
    pub matched: bool,
    /// Part of the last wrong pair; cleared by [`MatchGame::settle_mistakes`].
    pub wrong: bool,
}

impl MatchItem {
    fn new(role: Role, pair_key: usize, content: &str) -> Self {
        Self {
            id: MatchItemId::new(role, pair_key),
            content: content.to_string(),
            role,
            pair_key,
            selected: false,
            matched: false,
            wrong: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchPhase {
    /// No questions were supplied.
    Empty,
    Idle,
    Playing,
    Won,
    Lost,
}

impl MatchPhase {
    pub fn is_finished(self) -> bool {
        matches!(self, MatchPhase::Won | MatchPhase::Lost)
    }
}

/// What a click did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SelectOutcome {
    /// Unknown tile, matched tile, same-role tile or finished game.
    Ignored,
    /// The tile became the pending selection or stopped being it.
    Toggled { id: MatchItemId, selected: bool },
    Matched {
        pair_key: usize,
        streak: u32,
        /// Streak reached a multiple of the celebration period.
        celebrate: bool,
        won: bool,
    },
    Mismatched { hearts: u32, lost: bool },
}

/// One Match-mode game.
#[derive(Debug, Clone)]
pub struct MatchGame {
    questions: Vec<QuestionItem>,
    /// Question tiles in original order, then answer tiles shuffled.
    items: Vec<MatchItem>,
    pending: Option<MatchItemId>,
    hearts: u32,
    streak: u32,
    matched_pairs: usize,
    celebrations: u32,
    timer_running: bool,
    elapsed_secs: u64,
    phase: MatchPhase,
    reward: RewardClaim,
    config: MatchConfig,
    rng: StudyRng,
}

impl MatchGame {
    /// Build a game from questions whose `answer` is already option text
    /// (see [`QuestionItem::for_matching`]).
    pub fn new(questions: &[QuestionItem]) -> Self {
        Self::with_config(questions, MatchConfig::default(), None)
    }

    pub fn with_config(questions: &[QuestionItem], config: MatchConfig, seed: Option<u64>) -> Self {
        let mut game = Self {
            questions: questions.to_vec(),
            items: Vec::new(),
            pending: None,
            hearts: 0,
            streak: 0,
            matched_pairs: 0,
            celebrations: 0,
            timer_running: false,
            elapsed_secs: 0,
            phase: MatchPhase::Empty,
            reward: RewardClaim::default(),
            config,
            rng: study_rng(seed),
        };
        game.restart();
        game
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn phase(&self) -> MatchPhase {
        self.phase
    }

    pub fn items(&self) -> &[MatchItem] {
        &self.items
    }

    pub fn item(&self, id: &MatchItemId) -> Option<&MatchItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    pub fn question_items(&self) -> impl Iterator<Item = &MatchItem> {
        self.items.iter().filter(|i| i.role == Role::Question)
    }

    pub fn answer_items(&self) -> impl Iterator<Item = &MatchItem> {
        self.items.iter().filter(|i| i.role == Role::Answer)
    }

    pub fn pending(&self) -> Option<&MatchItemId> {
        self.pending.as_ref()
    }

    pub fn hearts(&self) -> u32 {
        self.hearts
    }

    pub fn max_hearts(&self) -> u32 {
        self.config.hearts.max(1)
    }

    pub fn streak(&self) -> u32 {
        self.streak
    }

    pub fn matched_pairs(&self) -> usize {
        self.matched_pairs
    }

    pub fn total_pairs(&self) -> usize {
        self.questions.len()
    }

    /// Number of streak celebrations raised this game.
    pub fn celebrations(&self) -> u32 {
        self.celebrations
    }

    pub fn timer_running(&self) -> bool {
        self.timer_running
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn mistake_delay_ms(&self) -> u64 {
        self.config.mistake_delay_ms
    }

    pub fn stats(&self) -> MatchStats {
        MatchStats {
            elapsed_secs: self.elapsed_secs,
            streak: self.streak,
            hearts: self.hearts,
        }
    }

    pub fn earned_xp(&self) -> Option<u32> {
        self.reward.amount()
    }

    /// Collect the win award. Yields it at most once; a lost game never has one.
    pub fn take_reward(&mut self) -> Option<u32> {
        self.reward.take()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Handle a click on the tile `id`.
    pub fn select_item(&mut self, id: &MatchItemId) -> SelectOutcome {
        if matches!(self.phase, MatchPhase::Empty) || self.phase.is_finished() {
            return SelectOutcome::Ignored;
        }
        let Some(clicked) = self.items.iter().position(|i| &i.id == id) else {
            return SelectOutcome::Ignored;
        };
        if self.items[clicked].matched {
            return SelectOutcome::Ignored;
        }

        if self.phase == MatchPhase::Idle {
            self.phase = MatchPhase::Playing;
            self.timer_running = true;
            tracing::debug!("match timer started");
        }

        let pending = match &self.pending {
            None => return self.pick(clicked),
            Some(p) if p == id => return self.unpick(clicked),
            Some(p) => match self.items.iter().position(|i| &i.id == p) {
                Some(idx) => idx,
                None => return self.pick(clicked),
            },
        };

        if self.items[pending].role == self.items[clicked].role {
            return SelectOutcome::Ignored;
        }

        self.pending = None;
        if self.items[pending].pair_key == self.items[clicked].pair_key {
            self.on_match(pending, clicked)
        } else {
            self.on_mismatch(pending, clicked)
        }
    }

    /// Clear the highlight of the last wrong pair. Front ends call this
    /// [`MatchConfig::mistake_delay_ms`] after a mismatch.
    ///
    /// Returns the number of tiles cleared.
    pub fn settle_mistakes(&mut self) -> usize {
        let mut cleared = 0;
        for item in self.items.iter_mut().filter(|i| i.wrong) {
            item.wrong = false;
            if !item.matched {
                item.selected = false;
            }
            cleared += 1;
        }
        cleared
    }

    /// One second of play time. Does nothing while the timer is stopped.
    pub fn tick(&mut self) -> bool {
        if self.timer_running {
            self.elapsed_secs += 1;
        }
        self.timer_running
    }

    /// Reset all counters and reshuffle the answers.
    pub fn restart(&mut self) {
        let questions = self
            .questions
            .iter()
            .enumerate()
            .map(|(k, q)| MatchItem::new(Role::Question, k, &q.question));
        let answers: Vec<MatchItem> = self
            .questions
            .iter()
            .enumerate()
            .map(|(k, q)| MatchItem::new(Role::Answer, k, &q.answer))
            .collect();
        let answers = shuffled(&answers, &mut self.rng);

        self.items = questions.chain(answers).collect();
        self.pending = None;
        self.hearts = self.max_hearts();
        self.streak = 0;
        self.matched_pairs = 0;
        self.celebrations = 0;
        self.timer_running = false;
        self.elapsed_secs = 0;
        self.reward.reset();
        self.phase = if self.questions.is_empty() {
            MatchPhase::Empty
        } else {
            MatchPhase::Idle
        };
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn clear_stale_mistakes(&mut self) {
        for item in self.items.iter_mut().filter(|i| i.wrong) {
            item.wrong = false;
            if !item.matched {
                item.selected = false;
            }
        }
    }

    fn pick(&mut self, idx: usize) -> SelectOutcome {
        self.clear_stale_mistakes();
        let item = &mut self.items[idx];
        item.selected = true;
        self.pending = Some(item.id.clone());
        SelectOutcome::Toggled {
            id: item.id.clone(),
            selected: true,
        }
    }

    fn unpick(&mut self, idx: usize) -> SelectOutcome {
        self.clear_stale_mistakes();
        let item = &mut self.items[idx];
        item.selected = false;
        self.pending = None;
        SelectOutcome::Toggled {
            id: item.id.clone(),
            selected: false,
        }
    }

    fn on_match(&mut self, first: usize, second: usize) -> SelectOutcome {
        for item in self.items.iter_mut() {
            item.wrong = false;
        }
        for idx in [first, second] {
            let item = &mut self.items[idx];
            item.matched = true;
            item.selected = false;
        }
        self.matched_pairs += 1;
        self.streak += 1;

        let period = self.config.celebration_every.max(1);
        let celebrate = self.streak % period == 0;
        if celebrate {
            self.celebrations += 1;
        }

        let won = self.matched_pairs == self.total_pairs();
        if won {
            self.phase = MatchPhase::Won;
            self.timer_running = false;
            self.reward.earn(match_xp(&self.stats()));
            tracing::info!(
                elapsed_secs = self.elapsed_secs,
                hearts = self.hearts,
                xp = ?self.reward.amount(),
                "match game won"
            );
        }

        SelectOutcome::Matched {
            pair_key: self.items[first].pair_key,
            streak: self.streak,
            celebrate,
            won,
        }
    }

    fn on_mismatch(&mut self, first: usize, second: usize) -> SelectOutcome {
        for idx in [first, second] {
            let item = &mut self.items[idx];
            item.selected = true;
            item.wrong = true;
        }
        self.hearts = self.hearts.saturating_sub(1);
        self.streak = 0;

        let lost = self.hearts == 0;
        if lost {
            self.phase = MatchPhase::Lost;
            self.timer_running = false;
            tracing::info!(
                matched_pairs = self.matched_pairs,
                total_pairs = self.total_pairs(),
                "match game lost"
            );
        }
        SelectOutcome::Mismatched {
            hearts: self.hearts,
            lost,
        }
    }
}
