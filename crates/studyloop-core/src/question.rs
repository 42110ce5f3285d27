//! Question model shared by every study mode.
//!
//! A [`QuestionItem`] stores its answer either as an option letter (`A`-`D`)
//! or as the literal text of one option. [`QuestionItem::correct_option`]
//! resolves both forms so the engines never have to care which one the
//! question generator produced.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ValidationError};

/// Option letters in display order.
pub const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// A single quiz question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionItem {
    pub question: String,
    /// Option letter (`"A"`..`"D"`) or the literal text of the correct option.
    pub answer: String,
    #[serde(default)]
    pub options: Vec<String>,
    #[serde(default)]
    pub explanation: String,
}

impl QuestionItem {
    pub fn new(
        question: impl Into<String>,
        answer: impl Into<String>,
        options: Vec<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            options,
            explanation: explanation.into(),
        }
    }

    /// Index into `options` named by a letter answer, if the answer is one.
    pub fn answer_index(&self) -> Option<usize> {
        let mut chars = self.answer.trim().chars();
        let letter = chars.next()?.to_ascii_uppercase();
        if chars.next().is_some() {
            return None;
        }
        OPTION_LETTERS
            .iter()
            .position(|&l| l == letter)
            .filter(|&i| i < self.options.len())
    }

    /// The text of the correct option.
    ///
    /// Letter answers index into `options`; otherwise the answer must equal one
    /// of the options verbatim. Returns `None` when neither resolves, in which
    /// case no selection can ever be judged correct.
    pub fn correct_option(&self) -> Option<&str> {
        if let Some(i) = self.answer_index() {
            return self.options.get(i).map(String::as_str);
        }
        self.options
            .iter()
            .find(|o| *o == &self.answer)
            .map(String::as_str)
    }

    /// Whether `selected` is the correct option.
    pub fn is_correct(&self, selected: &str) -> bool {
        self.correct_option() == Some(selected)
    }

    /// Text to show on the answer side of a card.
    pub fn answer_text(&self) -> &str {
        self.correct_option().unwrap_or(&self.answer)
    }

    /// Copy with the answer replaced by its resolved option text.
    ///
    /// The matching game pairs questions with answer *text*, never letters.
    pub fn for_matching(&self) -> Self {
        Self {
            answer: self.answer_text().to_string(),
            ..self.clone()
        }
    }

    pub fn has_explanation(&self) -> bool {
        !self.explanation.trim().is_empty()
    }
}

/// An ordered list of questions as handed over by the question generator.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionSet {
    pub items: Vec<QuestionItem>,
}

impl QuestionSet {
    pub fn new(items: Vec<QuestionItem>) -> Self {
        Self { items }
    }

    /// Parse a JSON array of question objects.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a question file from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QuestionItem> {
        self.items.iter()
    }

    /// Structural problems in the set. An empty result means every question
    /// can be played in every mode.
    pub fn validate(&self) -> Vec<ValidationError> {
        if self.items.is_empty() {
            return vec![ValidationError::EmptyCollection("questions".into())];
        }

        let mut problems = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if item.question.trim().is_empty() {
                problems.push(ValidationError::BlankQuestion { index });
            }
            match item.correct_option() {
                None => problems.push(ValidationError::UnresolvedAnswer {
                    index,
                    answer: item.answer.clone(),
                }),
                Some(correct) => {
                    let count = item.options.iter().filter(|o| *o == correct).count();
                    if count > 1 {
                        problems.push(ValidationError::DuplicateAnswer { index, count });
                    }
                }
            }
        }
        problems
    }
}

impl From<Vec<QuestionItem>> for QuestionSet {
    fn from(items: Vec<QuestionItem>) -> Self {
        Self::new(items)
    }
}

impl<'a> IntoIterator for &'a QuestionSet {
    type Item = &'a QuestionItem;
    type IntoIter = std::slice::Iter<'a, QuestionItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
