//! # Studyloop Core Library
//!
//! This library provides the study engines behind the studyloop CLI. A fixed
//! list of quiz questions can be studied in four modes, and every completed
//! session earns experience points that accumulate in a persistent ledger.
//!
//! ## Architecture
//!
//! - **Engines**: synchronous state machines, one per mode. Every user action
//!   is a method call; invalid input is a no-op, never an error
//! - **Controller**: [`StudySession`] owns the active engine and the
//!   [`RewardLedger`], and forwards completion awards exactly once
//! - **Timer**: [`Ticker`] feeds one tick per second to the timed modes; the
//!   caller drives `tick()` like any other action
//! - **Storage**: SQLite key-value slots and TOML configuration
//!
//! ## Key Components
//!
//! - [`LearnSession`]: spaced-repetition review
//! - [`MatchGame`]: pairing game with hearts and streaks
//! - [`FlashcardDeck`]: flip-through cards
//! - [`TestSession`]: graded answer sheet
//! - [`scoring`]: XP formulas shared by all modes

pub mod error;
pub mod events;
pub mod flashcards;
pub mod learn;
pub mod ledger;
pub mod matching;
pub mod mode;
pub mod question;
pub mod scoring;
pub mod session;
pub mod shuffle;
pub mod storage;
pub mod test_mode;
pub mod ticker;

pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use flashcards::{CardView, FlashcardDeck};
pub use learn::{AnswerOutcome, LearnPhase, LearnSession, ReviewRecord, MIN_EASE_FACTOR};
pub use ledger::{RewardLedger, TOTAL_XP_KEY};
pub use matching::{MatchGame, MatchItem, MatchItemId, MatchPhase, Role, SelectOutcome};
pub use mode::{catalog, ModeInfo, StudyMode};
pub use question::{QuestionItem, QuestionSet};
pub use scoring::RewardClaim;
pub use session::{ActiveMode, StudySession};
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use test_mode::{TestReport, TestSession};
pub use ticker::{Ticker, TickerGuard};
