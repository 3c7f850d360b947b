//! Distance classifiers that drive the two hint surfaces.
//!
//! The directional bucket feeds the main "too high / too low" message while
//! the smart hint is a supplementary warmth indicator. They use different
//! thresholds and must stay independent.
use serde::{Deserialize, Serialize};

use crate::constants::{
    BUCKET_CLOSE, BUCKET_FAR, BUCKET_MODERATE, BUCKET_MODERATE_FAR, SMART_COOL, SMART_SCORCHING,
    SMART_VERY_WARM, SMART_WARM,
};

/// Severity of a miss for the primary directional message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBucket {
    /// distance > 50
    Far,
    /// distance > 20
    ModerateFar,
    /// distance > 10
    Moderate,
    /// distance > 5
    Close,
    /// distance <= 5
    VeryClose,
}

/// Which side of the target the guess landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    High,
    Low,
}

impl DistanceBucket {
    #[must_use]
    pub const fn classify(distance: u32) -> Self {
        if distance > BUCKET_FAR {
            Self::Far
        } else if distance > BUCKET_MODERATE_FAR {
            Self::ModerateFar
        } else if distance > BUCKET_MODERATE {
            Self::Moderate
        } else if distance > BUCKET_CLOSE {
            Self::Close
        } else {
            Self::VeryClose
        }
    }

    /// Hint text telling the player which way to adjust.
    #[must_use]
    pub const fn hint(self, direction: Direction) -> &'static str {
        match (self, direction) {
            (Self::Far, Direction::High) => "way off, go much lower",
            (Self::Far, Direction::Low) => "way off, go much higher",
            (Self::ModerateFar, Direction::High) => "too big, come down a bit",
            (Self::ModerateFar, Direction::Low) => "too small, go up a bit",
            (Self::Moderate, Direction::High) => "a little big, try smaller",
            (Self::Moderate, Direction::Low) => "a little small, try bigger",
            (Self::Close, Direction::High) => "getting close, slightly lower",
            (Self::Close, Direction::Low) => "getting close, slightly higher",
            (Self::VeryClose, _) => "very close, almost there",
        }
    }
}

/// Supplementary warmth hint tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SmartHint {
    Exact,
    Scorching,
    VeryWarm,
    Warm,
    Cool,
    Cold,
}

impl SmartHint {
    #[must_use]
    pub const fn classify(distance: u32) -> Self {
        if distance == 0 {
            Self::Exact
        } else if distance <= SMART_SCORCHING {
            Self::Scorching
        } else if distance <= SMART_VERY_WARM {
            Self::VeryWarm
        } else if distance <= SMART_WARM {
            Self::Warm
        } else if distance <= SMART_COOL {
            Self::Cool
        } else {
            Self::Cold
        }
    }

    #[must_use]
    pub const fn text(self) -> &'static str {
        match self {
            Self::Exact => "Correct!",
            Self::Scorching => "Just a hair away!",
            Self::VeryWarm => "Very close now!",
            Self::Warm => "Getting close",
            Self::Cool => "A bit off",
            Self::Cold => "Keep working at it",
        }
    }

    /// Only the three warm tiers are surfaced as a pop-up hint; the rest are
    /// informational.
    #[must_use]
    pub const fn is_popup(self) -> bool {
        matches!(self, Self::Scorching | Self::VeryWarm | Self::Warm)
    }
}

/// Smart hint for a guess against a target.
#[must_use]
pub const fn smart_hint(guess: u32, target: u32) -> SmartHint {
    SmartHint::classify(guess.abs_diff(target))
}
