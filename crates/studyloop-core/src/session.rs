//! Mode navigation controller.
//!
//! A [`StudySession`] owns the question list, the [`RewardLedger`] and at most
//! one active mode. Entering a mode replaces the previous engine, going back
//! drops it. Completion awards are drained from the active engine and handed
//! to the ledger, each one exactly once.

use chrono::Utc;

use crate::error::Result;
use crate::events::Event;
use crate::flashcards::FlashcardDeck;
use crate::learn::LearnSession;
use crate::ledger::RewardLedger;
use crate::matching::MatchGame;
use crate::mode::StudyMode;
use crate::question::QuestionItem;
use crate::storage::{Config, KvStore};
use crate::test_mode::TestSession;

/// Engine of the mode currently on screen.
#[derive(Debug, Clone)]
pub enum ActiveMode {
    Flashcards(FlashcardDeck),
    Learn(LearnSession),
    Match(MatchGame),
    Test(TestSession),
}

impl ActiveMode {
    pub fn mode(&self) -> StudyMode {
        match self {
            Self::Flashcards(_) => StudyMode::Flashcards,
            Self::Learn(_) => StudyMode::Learn,
            Self::Match(_) => StudyMode::Match,
            Self::Test(_) => StudyMode::Test,
        }
    }

    /// Whether the mode shows an elapsed-time clock.
    pub fn is_timed(&self) -> bool {
        matches!(self, Self::Flashcards(_) | Self::Match(_))
    }

    /// The mode reached its terminal state and only a restart changes it.
    pub fn is_finished(&self) -> bool {
        match self {
            Self::Flashcards(deck) => deck.is_complete(),
            Self::Learn(session) => session.is_completed(),
            Self::Match(game) => game.phase().is_finished(),
            Self::Test(test) => test.is_submitted(),
        }
    }

    /// Forward one timer tick. Returns whether the mode's clock is running.
    pub fn tick(&mut self) -> bool {
        match self {
            Self::Flashcards(deck) => deck.tick(),
            Self::Match(game) => game.tick(),
            Self::Learn(_) | Self::Test(_) => false,
        }
    }

    pub fn restart(&mut self) {
        match self {
            Self::Flashcards(deck) => deck.restart(),
            Self::Learn(session) => session.restart(),
            Self::Match(game) => game.restart(),
            Self::Test(test) => test.restart(),
        }
    }

    pub fn take_reward(&mut self) -> Option<u32> {
        match self {
            Self::Flashcards(deck) => deck.take_reward(),
            Self::Learn(session) => session.take_reward(),
            Self::Match(game) => game.take_reward(),
            Self::Test(test) => test.take_reward(),
        }
    }
}

pub struct StudySession<S: KvStore> {
    questions: Vec<QuestionItem>,
    ledger: RewardLedger<S>,
    active: Option<ActiveMode>,
    config: Config,
    seed: Option<u64>,
}

impl<S: KvStore> StudySession<S> {
    pub fn new(questions: Vec<QuestionItem>, ledger: RewardLedger<S>, config: Config) -> Self {
        Self {
            questions,
            ledger,
            active: None,
            config,
            seed: None,
        }
    }

    /// Seed every engine's shuffles for a reproducible session.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn questions(&self) -> &[QuestionItem] {
        &self.questions
    }

    pub fn ledger(&self) -> &RewardLedger<S> {
        &self.ledger
    }

    pub fn total_xp(&self) -> u64 {
        self.ledger.total_xp()
    }

    pub fn mode(&self) -> Option<StudyMode> {
        self.active.as_ref().map(ActiveMode::mode)
    }

    pub fn active(&self) -> Option<&ActiveMode> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ActiveMode> {
        self.active.as_mut()
    }

    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            mode: self.mode(),
            question_count: self.questions.len(),
            total_xp: self.ledger.total_xp(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Build a fresh engine for `mode`, replacing the active one.
    ///
    /// An award still pending in the replaced engine is collected first.
    pub fn enter(&mut self, mode: StudyMode) -> Event {
        self.flush_reward();
        let questions = &self.questions;
        let engine = match mode {
            StudyMode::Flashcards => ActiveMode::Flashcards(FlashcardDeck::new(questions)),
            StudyMode::Learn => ActiveMode::Learn(LearnSession::with_config(
                questions,
                self.config.learn.clone(),
                self.seed,
            )),
            StudyMode::Match => {
                let pairs: Vec<QuestionItem> =
                    questions.iter().map(QuestionItem::for_matching).collect();
                ActiveMode::Match(MatchGame::with_config(
                    &pairs,
                    self.config.matching.clone(),
                    self.seed,
                ))
            }
            StudyMode::Test => ActiveMode::Test(TestSession::new(questions)),
        };
        self.active = Some(engine);
        tracing::debug!(%mode, questions = self.questions.len(), "entered mode");
        Event::ModeEntered {
            mode,
            question_count: self.questions.len(),
            at: Utc::now(),
        }
    }

    /// Drop the active mode and return to the launcher.
    pub fn back(&mut self) -> Option<Event> {
        self.flush_reward();
        let mode = self.active.take()?.mode();
        tracing::debug!(%mode, "left mode");
        Some(Event::ModeExited {
            mode,
            at: Utc::now(),
        })
    }

    pub fn restart(&mut self) -> Option<Event> {
        self.flush_reward();
        let active = self.active.as_mut()?;
        active.restart();
        Some(Event::ModeRestarted {
            mode: active.mode(),
            at: Utc::now(),
        })
    }

    pub fn tick(&mut self) -> bool {
        self.active.as_mut().is_some_and(ActiveMode::tick)
    }

    /// Hand the active mode's pending award, if any, to the ledger.
    ///
    /// # Errors
    /// Returns an error if the ledger cannot persist the new total. The award
    /// is still counted in memory and is not handed out again.
    pub fn collect_reward(&mut self) -> Result<Option<Event>> {
        let Some((mode, amount)) = self.take_pending_reward() else {
            return Ok(None);
        };
        let total_xp = self.ledger.add_xp(amount)?;
        Ok(Some(awarded(mode, amount, total_xp)))
    }

    /// Like [`collect_reward`](Self::collect_reward), but a persist failure is
    /// logged and the in-memory total is reported instead.
    pub fn settle_reward(&mut self) -> Option<Event> {
        let (mode, amount) = self.take_pending_reward()?;
        let total_xp = match self.ledger.add_xp(amount) {
            Ok(total) => total,
            Err(e) => {
                tracing::warn!(error = %e, %mode, amount, "failed to persist XP total");
                self.ledger.total_xp()
            }
        };
        Some(awarded(mode, amount, total_xp))
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn take_pending_reward(&mut self) -> Option<(StudyMode, u32)> {
        let active = self.active.as_mut()?;
        let amount = active.take_reward()?;
        Some((active.mode(), amount))
    }

    fn flush_reward(&mut self) {
        self.settle_reward();
    }
}

fn awarded(mode: StudyMode, amount: u32, total_xp: u64) -> Event {
    Event::XpAwarded {
        mode,
        amount,
        total_xp,
        at: Utc::now(),
    }
}
