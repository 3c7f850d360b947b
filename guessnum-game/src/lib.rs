//! Guessnum Game Engine
//!
//! Platform-agnostic core logic for a number-guessing game with difficulty
//! tiers, achievements, statistics, and a consecutive-win challenge mode.
//! This crate has no UI or platform dependencies: time enters through
//! explicit ticks and persistence through the [`ProfileStorage`] trait.

pub mod achievements;
pub mod challenge;
pub mod constants;
pub mod controller;
pub mod daily;
pub mod difficulty;
pub mod error;
pub mod hints;
pub mod history;
pub mod notice;
pub mod numbers;
pub mod profile;
pub mod session;
pub mod stats;

// Re-export commonly used types
pub use achievements::{ACHIEVEMENTS, AchievementBook, AchievementDef, AchievementId, UnlockSet};
pub use challenge::{ChallengeProgress, ChallengeState};
pub use controller::{GameController, RoundSummary, TickReport, TurnReport};
pub use daily::{DailyDraw, DailyNumberSource, HashedDailyNumbers};
pub use difficulty::{DifficultyConfig, DifficultyId, DifficultyRegistry};
pub use error::{GameError, GameResult};
pub use hints::{Direction, DistanceBucket, SmartHint, smart_hint};
pub use history::{HistoryEntry, HistoryLog};
pub use notice::{Notification, Severity};
pub use profile::{ExportDocument, Profile, ProfileStorage, Theme};
pub use session::{
    GameSession, GuessOutcome, GuessResult, LossReason, SessionEnd, SessionState, Targets,
    TickResult, parse_guess,
};
pub use stats::{BestScores, Statistics};
