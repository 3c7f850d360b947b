//! Difficulty tiers: the static registry of round configurations.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// Identifier for each difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyId {
    Easy,
    Medium,
    Hard,
    Daily,
    Extreme,
    Infinite,
    Reverse,
    Double,
}

impl DifficultyId {
    pub const ALL: &'static [Self] = &[
        Self::Easy,
        Self::Medium,
        Self::Hard,
        Self::Daily,
        Self::Extreme,
        Self::Infinite,
        Self::Reverse,
        Self::Double,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
            Self::Daily => "daily",
            Self::Extreme => "extreme",
            Self::Infinite => "infinite",
            Self::Reverse => "reverse",
            Self::Double => "double",
        }
    }

    /// Static configuration for this tier.
    #[must_use]
    pub const fn config(self) -> &'static DifficultyConfig {
        match self {
            Self::Easy => &EASY,
            Self::Medium => &MEDIUM,
            Self::Hard => &HARD,
            Self::Daily => &DAILY,
            Self::Extreme => &EXTREME,
            Self::Infinite => &INFINITE,
            Self::Reverse => &REVERSE,
            Self::Double => &DOUBLE,
        }
    }
}

impl fmt::Display for DifficultyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for DifficultyId {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|id| id.key() == wanted)
            .ok_or_else(|| GameError::UnknownDifficulty(s.trim().to_string()))
    }
}

/// Immutable rules for one difficulty tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DifficultyConfig {
    pub id: DifficultyId,
    pub display_name: &'static str,
    pub max_number: u32,
    pub time_budget_secs: Option<u32>,
    pub max_attempts: Option<u32>,
    pub reverse: bool,
    pub double: bool,
    /// Shown when the player picks this tier.
    pub intro: &'static str,
}

impl DifficultyConfig {
    #[must_use]
    pub const fn is_timed(&self) -> bool {
        self.time_budget_secs.is_some()
    }

    /// Whether the target comes from the daily-number collaborator.
    #[must_use]
    pub const fn uses_daily_target(&self) -> bool {
        matches!(self.id, DifficultyId::Daily)
    }

    #[must_use]
    pub const fn accepts(&self, guess: u32) -> bool {
        guess >= 1 && guess <= self.max_number
    }
}

const EASY: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Easy,
    display_name: "Easy",
    max_number: 50,
    time_budget_secs: Some(60),
    max_attempts: None,
    reverse: false,
    double: false,
    intro: "Easy selected: guess 1-50 within 60 seconds",
};

const MEDIUM: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Medium,
    display_name: "Medium",
    max_number: 100,
    time_budget_secs: Some(60),
    max_attempts: None,
    reverse: false,
    double: false,
    intro: "Medium selected: guess 1-100 within 60 seconds",
};

const HARD: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Hard,
    display_name: "Hard",
    max_number: 200,
    time_budget_secs: Some(90),
    max_attempts: None,
    reverse: false,
    double: false,
    intro: "Hard selected: guess 1-200 within 90 seconds",
};

const DAILY: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Daily,
    display_name: "Daily Challenge",
    max_number: 100,
    time_budget_secs: Some(120),
    max_attempts: None,
    reverse: false,
    double: false,
    intro: "Daily challenge selected: the number changes every day",
};

const EXTREME: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Extreme,
    display_name: "Extreme",
    max_number: 500,
    time_budget_secs: Some(30),
    max_attempts: None,
    reverse: false,
    double: false,
    intro: "Extreme mode: 1-500 with only 30 seconds",
};

const INFINITE: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Infinite,
    display_name: "Infinite",
    max_number: 100,
    time_budget_secs: None,
    max_attempts: Some(20),
    reverse: false,
    double: false,
    intro: "Infinite mode: no timer, at most 20 attempts",
};

const REVERSE: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Reverse,
    display_name: "Reverse",
    max_number: 100,
    time_budget_secs: Some(60),
    max_attempts: None,
    reverse: true,
    double: false,
    intro: "Reverse mode: guess a number larger than the target",
};

const DOUBLE: DifficultyConfig = DifficultyConfig {
    id: DifficultyId::Double,
    display_name: "Double",
    max_number: 100,
    time_budget_secs: Some(90),
    max_attempts: None,
    reverse: false,
    double: true,
    intro: "Double mode: solve two numbers in a row",
};

/// Lookup table over every difficulty tier.
#[derive(Debug, Clone, Copy, Default)]
pub struct DifficultyRegistry;

impl DifficultyRegistry {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Resolve a tier by its string key.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownDifficulty`] when no tier matches.
    pub fn get(&self, id: &str) -> Result<&'static DifficultyConfig, GameError> {
        id.parse::<DifficultyId>().map(DifficultyId::config)
    }

    pub fn iter(&self) -> impl Iterator<Item = &'static DifficultyConfig> {
        DifficultyId::ALL.iter().map(|id| id.config())
    }
}
