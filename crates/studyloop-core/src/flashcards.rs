//! Flashcard deck behind Flashcards mode.
//!
//! Cards are shown in the order given. Flipping a card face-up marks it as
//! viewed; once every card has been seen the deck is complete, its timer stops
//! and the completion award becomes claimable.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::question::QuestionItem;
use crate::scoring::{flashcards_xp, FlashcardStats, RewardClaim};

/// Read-only view of the card under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView<'a> {
    pub index: usize,
    pub total: usize,
    pub front: &'a str,
    /// Only present while the card is flipped.
    pub back: Option<&'a str>,
    /// Only present while flipped and the explanation is toggled on.
    pub explanation: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardDeck {
    cards: Vec<QuestionItem>,
    current_index: usize,
    flipped: bool,
    explanation_visible: bool,
    viewed: BTreeSet<usize>,
    flips: u32,
    elapsed_secs: u64,
    reward: RewardClaim,
}

impl FlashcardDeck {
    pub fn new(cards: &[QuestionItem]) -> Self {
        Self {
            cards: cards.to_vec(),
            current_index: 0,
            flipped: false,
            explanation_visible: false,
            viewed: BTreeSet::new(),
            flips: 0,
            elapsed_secs: 0,
            reward: RewardClaim::default(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn explanation_visible(&self) -> bool {
        self.explanation_visible
    }

    pub fn viewed_count(&self) -> usize {
        self.viewed.len()
    }

    /// Every card has been flipped face-up at least once.
    pub fn is_complete(&self) -> bool {
        !self.cards.is_empty() && self.viewed.len() == self.cards.len()
    }

    pub fn flips(&self) -> u32 {
        self.flips
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn stats(&self) -> FlashcardStats {
        FlashcardStats {
            elapsed_secs: self.elapsed_secs,
            flips: self.flips,
            all_viewed: self.is_complete(),
        }
    }

    pub fn current(&self) -> Option<CardView<'_>> {
        let card = self.cards.get(self.current_index)?;
        let explanation = (self.flipped && self.explanation_visible && card.has_explanation())
            .then_some(card.explanation.as_str());
        Some(CardView {
            index: self.current_index,
            total: self.cards.len(),
            front: &card.question,
            back: self.flipped.then(|| card.answer_text()),
            explanation,
        })
    }

    pub fn earned_xp(&self) -> Option<u32> {
        self.reward.amount()
    }

    pub fn take_reward(&mut self) -> Option<u32> {
        self.reward.take()
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Turn the current card over. Returns the new face-up state.
    pub fn flip(&mut self) -> Option<bool> {
        if self.cards.is_empty() {
            return None;
        }
        self.flipped = !self.flipped;
        self.flips += 1;
        if !self.flipped {
            self.explanation_visible = false;
            return Some(false);
        }

        let was_complete = self.is_complete();
        self.viewed.insert(self.current_index);
        if !was_complete && self.is_complete() {
            self.reward.earn(flashcards_xp(&self.stats()));
            tracing::info!(
                cards = self.cards.len(),
                flips = self.flips,
                elapsed_secs = self.elapsed_secs,
                xp = ?self.reward.amount(),
                "flashcard deck complete"
            );
        }
        Some(true)
    }

    pub fn next(&mut self) -> Option<usize> {
        if self.current_index + 1 >= self.cards.len() {
            return None;
        }
        self.move_to(self.current_index + 1)
    }

    pub fn previous(&mut self) -> Option<usize> {
        if self.current_index == 0 || self.cards.is_empty() {
            return None;
        }
        self.move_to(self.current_index - 1)
    }

    /// Show or hide the explanation of a flipped card.
    pub fn toggle_explanation(&mut self) -> Option<bool> {
        let card = self.cards.get(self.current_index)?;
        if !self.flipped || !card.has_explanation() {
            return None;
        }
        self.explanation_visible = !self.explanation_visible;
        Some(self.explanation_visible)
    }

    /// Back to the first card, face-down. Stats are kept.
    pub fn reset(&mut self) {
        self.current_index = 0;
        self.flipped = false;
        self.explanation_visible = false;
    }

    /// Start the deck over with fresh stats and a new reward.
    pub fn restart(&mut self) {
        self.reset();
        self.viewed.clear();
        self.flips = 0;
        self.elapsed_secs = 0;
        self.reward.reset();
    }

    /// One second of study time. Counts until the deck is complete.
    pub fn tick(&mut self) -> bool {
        let running = !self.cards.is_empty() && !self.is_complete();
        if running {
            self.elapsed_secs += 1;
        }
        running
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn move_to(&mut self, index: usize) -> Option<usize> {
        self.current_index = index;
        self.flipped = false;
        self.explanation_visible = false;
        tracing::debug!(index, "flashcard moved");
        Some(index)
    }
}
