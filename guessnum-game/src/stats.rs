//! Cumulative statistics and per-tier best scores.
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::difficulty::DifficultyId;
use crate::numbers::{mean_tenths, percent};

/// Running totals across every finished round.
///
/// Field names follow the exported snapshot format, so older exports with
/// missing counters still load.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Statistics {
    pub total_games: u32,
    pub total_wins: u32,
    /// Attempts spent on winning rounds only.
    pub total_attempts: u32,
    /// Seconds spent on winning rounds only.
    pub total_time: u32,
    pub win_rate: u32,
    pub avg_attempts: f64,
    pub avg_time: f64,
    pub last_win_time: Option<u32>,
    pub last_win_attempts: Option<u32>,
    pub hard_completed: u32,
    pub daily_completed: u32,
    pub extreme_completed: u32,
    pub infinite_completed: u32,
    pub reverse_completed: u32,
    pub double_completed: u32,
    pub challenge_completed: u32,
}

impl Statistics {
    pub fn record_win(&mut self, difficulty: DifficultyId, attempts: u32, time_used: u32) {
        self.total_games = self.total_games.saturating_add(1);
        self.total_wins = self.total_wins.saturating_add(1);
        self.total_attempts = self.total_attempts.saturating_add(attempts);
        self.total_time = self.total_time.saturating_add(time_used);
        self.last_win_time = Some(time_used);
        self.last_win_attempts = Some(attempts);
        if let Some(counter) = self.completion_counter_mut(difficulty) {
            *counter = counter.saturating_add(1);
        }
        self.recompute();
    }

    /// Losses only count toward the win-rate denominator.
    pub fn record_loss(&mut self) {
        self.total_games = self.total_games.saturating_add(1);
        self.recompute();
    }

    pub fn record_challenge_completed(&mut self) {
        self.challenge_completed = self.challenge_completed.saturating_add(1);
    }

    /// Completions recorded for a tier; easy and medium are not tracked.
    #[must_use]
    pub const fn completions(&self, difficulty: DifficultyId) -> Option<u32> {
        match difficulty {
            DifficultyId::Hard => Some(self.hard_completed),
            DifficultyId::Daily => Some(self.daily_completed),
            DifficultyId::Extreme => Some(self.extreme_completed),
            DifficultyId::Infinite => Some(self.infinite_completed),
            DifficultyId::Reverse => Some(self.reverse_completed),
            DifficultyId::Double => Some(self.double_completed),
            DifficultyId::Easy | DifficultyId::Medium => None,
        }
    }

    const fn completion_counter_mut(&mut self, difficulty: DifficultyId) -> Option<&mut u32> {
        match difficulty {
            DifficultyId::Hard => Some(&mut self.hard_completed),
            DifficultyId::Daily => Some(&mut self.daily_completed),
            DifficultyId::Extreme => Some(&mut self.extreme_completed),
            DifficultyId::Infinite => Some(&mut self.infinite_completed),
            DifficultyId::Reverse => Some(&mut self.reverse_completed),
            DifficultyId::Double => Some(&mut self.double_completed),
            DifficultyId::Easy | DifficultyId::Medium => None,
        }
    }

    fn recompute(&mut self) {
        self.win_rate = percent(self.total_wins, self.total_games);
        self.avg_attempts = mean_tenths(self.total_attempts, self.total_wins);
        self.avg_time = mean_tenths(self.total_time, self.total_wins);
    }
}

/// Fewest attempts for a win, per tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BestScores(BTreeMap<DifficultyId, u32>);

impl BestScores {
    #[must_use]
    pub fn get(&self, difficulty: DifficultyId) -> Option<u32> {
        self.0.get(&difficulty).copied()
    }

    /// Store `attempts` when it beats the current best. Returns true on a new
    /// record.
    pub fn record(&mut self, difficulty: DifficultyId, attempts: u32) -> bool {
        match self.0.get(&difficulty) {
            Some(best) if *best <= attempts => false,
            _ => {
                self.0.insert(difficulty, attempts);
                true
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (DifficultyId, u32)> + '_ {
        self.0.iter().map(|(id, best)| (*id, *best))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
