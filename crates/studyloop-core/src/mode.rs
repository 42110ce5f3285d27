//! The four study modes and the launcher catalog describing them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StudyMode {
    Flashcards,
    Learn,
    Match,
    Test,
}

impl StudyMode {
    pub const ALL: [StudyMode; 4] = [
        StudyMode::Flashcards,
        StudyMode::Learn,
        StudyMode::Match,
        StudyMode::Test,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Flashcards => "flashcards",
            Self::Learn => "learn",
            Self::Match => "match",
            Self::Test => "test",
        }
    }

    /// Launcher entry for this mode.
    pub fn info(&self) -> ModeInfo {
        match self {
            Self::Flashcards => ModeInfo {
                mode: *self,
                title: "Flashcards",
                description: "Review with interactive cards",
                xp_min: 5,
                xp_max: 50,
                xp_basis: "Based on time spent and cards reviewed",
            },
            Self::Learn => ModeInfo {
                mode: *self,
                title: "Learn",
                description: "Practice with multiple choice",
                xp_min: 10,
                xp_max: 40,
                xp_basis: "Based on correct answers and streaks, long streaks go past the range",
            },
            Self::Match => ModeInfo {
                mode: *self,
                title: "Match",
                description: "Match pairs quickly",
                xp_min: 20,
                xp_max: 75,
                xp_basis: "Based on speed, hearts, and streaks",
            },
            Self::Test => ModeInfo {
                mode: *self,
                title: "Test",
                description: "Test your knowledge",
                xp_min: 15,
                xp_max: 60,
                xp_basis: "Based on test performance",
            },
        }
    }
}

impl fmt::Display for StudyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StudyMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "flashcards" | "cards" => Ok(Self::Flashcards),
            "learn" => Ok(Self::Learn),
            "match" => Ok(Self::Match),
            "test" => Ok(Self::Test),
            other => Err(format!("unknown study mode: {other}")),
        }
    }
}

/// What the launcher shows for one mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ModeInfo {
    pub mode: StudyMode,
    pub title: &'static str,
    pub description: &'static str,
    /// Advertised award range for a typical session. Not enforced: a Learn
    /// streak of ten or more earns more than `xp_max`.
    pub xp_min: u32,
    pub xp_max: u32,
    pub xp_basis: &'static str,
}

impl ModeInfo {
    pub fn xp_range(&self) -> String {
        format!("{}-{} XP", self.xp_min, self.xp_max)
    }
}

/// Catalog of all modes in launcher order.
pub fn catalog() -> Vec<ModeInfo> {
    StudyMode::ALL.iter().map(StudyMode::info).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_through_as_str() {
        for mode in StudyMode::ALL {
            assert_eq!(mode.as_str().parse::<StudyMode>(), Ok(mode));
        }
        assert_eq!(" Match ".parse::<StudyMode>(), Ok(StudyMode::Match));
        assert!("quiz".parse::<StudyMode>().is_err());
    }

    #[test]
    fn catalog_ranges() {
        let ranges: Vec<String> = catalog().iter().map(ModeInfo::xp_range).collect();
        assert_eq!(ranges, ["5-50 XP", "10-40 XP", "20-75 XP", "15-60 XP"]);
    }

    #[test]
    fn learn_range_is_nominal() {
        use crate::scoring::{learn_xp, LearnStats};

        let info = StudyMode::Learn.info();
        let long_streak = LearnStats {
            correct: 10,
            incorrect: 0,
            streak: 10,
        };
        assert_eq!(learn_xp(&long_streak), 45);
        assert!(learn_xp(&long_streak) > info.xp_max);
        assert!(info.xp_basis.contains("past the range"));
    }

    #[test]
    fn serializes_lowercase() {
        let json = serde_json::to_string(&StudyMode::Flashcards).unwrap();
        assert_eq!(json, "\"flashcards\"");
    }
}
