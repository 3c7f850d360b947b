//! Challenge mode: win several rounds in a row.
use serde::{Deserialize, Serialize};

use crate::constants::CHALLENGE_GOAL;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeState {
    pub active: bool,
    pub consecutive_wins: u32,
    pub goal: u32,
}

impl Default for ChallengeState {
    fn default() -> Self {
        Self {
            active: false,
            consecutive_wins: 0,
            goal: CHALLENGE_GOAL,
        }
    }
}

/// What a finished round means for an active challenge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChallengeProgress {
    /// Another round is needed; the controller starts it.
    Continue { wins: u32, goal: u32 },
    Completed { goal: u32 },
    /// Losses keep the streak as it is and the challenge stays open.
    Unchanged { wins: u32, goal: u32 },
}

impl ChallengeState {
    pub fn start(&mut self) {
        *self = Self {
            active: true,
            ..Self::default()
        };
        log::info!("challenge started: goal={}", self.goal);
    }

    pub fn cancel(&mut self) {
        if self.active {
            log::info!(
                "challenge cancelled at {}/{}",
                self.consecutive_wins,
                self.goal
            );
        }
        *self = Self::default();
    }

    /// Advance after a round ends. Returns `None` when no challenge is active.
    pub fn record_round(&mut self, won: bool) -> Option<ChallengeProgress> {
        if !self.active {
            return None;
        }
        if !won {
            return Some(ChallengeProgress::Unchanged {
                wins: self.consecutive_wins,
                goal: self.goal,
            });
        }
        self.consecutive_wins = self.consecutive_wins.saturating_add(1);
        if self.consecutive_wins >= self.goal {
            let goal = self.goal;
            log::info!("challenge completed: goal={goal}");
            *self = Self::default();
            return Some(ChallengeProgress::Completed { goal });
        }
        Some(ChallengeProgress::Continue {
            wins: self.consecutive_wins,
            goal: self.goal,
        })
    }
}
