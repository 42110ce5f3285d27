use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::mode::StudyMode;

/// Every navigation or reward change in a study session produces an Event.
/// Front ends render them or write them to a log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    ModeEntered {
        mode: StudyMode,
        question_count: usize,
        at: DateTime<Utc>,
    },
    /// The active mode was dropped and the launcher is showing again.
    ModeExited {
        mode: StudyMode,
        at: DateTime<Utc>,
    },
    ModeRestarted {
        mode: StudyMode,
        at: DateTime<Utc>,
    },
    /// A completion award was handed to the ledger.
    XpAwarded {
        mode: StudyMode,
        amount: u32,
        total_xp: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        mode: Option<StudyMode>,
        question_count: usize,
        total_xp: u64,
    },
}
