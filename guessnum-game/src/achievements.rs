//! Achievement definitions and the monotonic unlock ledger.
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;
use std::fmt;

use crate::constants::{
    LIGHTNING_MAX_SECS, MASTER_MAX_ATTEMPTS, PERFECT_MIN_GAMES, PERFECT_WIN_RATE,
    PERSISTENT_MIN_ATTEMPTS,
};
use crate::stats::Statistics;

/// Achievements unlocked by one evaluation, stored inline for the common case.
pub type UnlockSet = SmallVec<[AchievementId; 4]>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    FirstGame,
    Lightning,
    Master,
    Perfect,
    Challenger,
    Persistent,
    Champion,
    Daily,
    Extreme,
    Unlimited,
    Reverse,
    Double,
}

impl AchievementId {
    #[must_use]
    pub fn definition(self) -> &'static AchievementDef {
        ACHIEVEMENTS
            .iter()
            .find(|def| def.id == self)
            .unwrap_or(&ACHIEVEMENTS[0])
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.definition().name)
    }
}

/// A badge and the statistics predicate that unlocks it.
#[derive(Debug, Clone, Copy)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
    pub predicate: fn(&Statistics) -> bool,
}

pub static ACHIEVEMENTS: [AchievementDef; 12] = [
    AchievementDef {
        id: AchievementId::FirstGame,
        name: "Beginner",
        description: "Finish your first game",
        predicate: |s| s.total_games >= 1,
    },
    AchievementDef {
        id: AchievementId::Lightning,
        name: "Lightning Hands",
        description: "Win within 20 seconds",
        predicate: |s| s.last_win_time.is_some_and(|t| t <= LIGHTNING_MAX_SECS),
    },
    AchievementDef {
        id: AchievementId::Master,
        name: "Mastermind",
        description: "Win within 5 attempts",
        predicate: |s| {
            s.last_win_attempts
                .is_some_and(|a| a <= MASTER_MAX_ATTEMPTS)
        },
    },
    AchievementDef {
        id: AchievementId::Perfect,
        name: "Flawless",
        description: "100% win rate over at least 10 games",
        predicate: |s| s.total_games >= PERFECT_MIN_GAMES && s.win_rate == PERFECT_WIN_RATE,
    },
    AchievementDef {
        id: AchievementId::Challenger,
        name: "Challenger",
        description: "Beat hard difficulty",
        predicate: |s| s.hard_completed >= 1,
    },
    AchievementDef {
        id: AchievementId::Persistent,
        name: "Persistent",
        description: "Make 50 attempts in total",
        predicate: |s| s.total_attempts >= PERSISTENT_MIN_ATTEMPTS,
    },
    AchievementDef {
        id: AchievementId::Champion,
        name: "Champion",
        description: "Complete challenge mode",
        predicate: |s| s.challenge_completed >= 1,
    },
    AchievementDef {
        id: AchievementId::Daily,
        name: "Daily Player",
        description: "Beat the daily challenge",
        predicate: |s| s.daily_completed >= 1,
    },
    AchievementDef {
        id: AchievementId::Extreme,
        name: "Extreme Survivor",
        description: "Beat extreme mode",
        predicate: |s| s.extreme_completed >= 1,
    },
    AchievementDef {
        id: AchievementId::Unlimited,
        name: "Limitless",
        description: "Beat infinite mode",
        predicate: |s| s.infinite_completed >= 1,
    },
    AchievementDef {
        id: AchievementId::Reverse,
        name: "Contrarian",
        description: "Beat reverse mode",
        predicate: |s| s.reverse_completed >= 1,
    },
    AchievementDef {
        id: AchievementId::Double,
        name: "Double Victory",
        description: "Beat double mode",
        predicate: |s| s.double_completed >= 1,
    },
];

/// Which achievements are unlocked. Unlocks are never reverted.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AchievementBook(BTreeMap<AchievementId, bool>);

impl AchievementBook {
    #[must_use]
    pub fn is_unlocked(&self, id: AchievementId) -> bool {
        self.0.get(&id).copied().unwrap_or(false)
    }

    /// Unlock every locked achievement whose predicate now holds and return
    /// just those. A second call with unchanged statistics returns nothing.
    pub fn evaluate(&mut self, stats: &Statistics) -> UnlockSet {
        let unlocked = self.preview(stats);
        for id in &unlocked {
            self.0.insert(*id, true);
            log::info!("achievement unlocked: {id:?}");
        }
        unlocked
    }

    /// What [`evaluate`](Self::evaluate) would unlock, without recording it.
    #[must_use]
    pub fn preview(&self, stats: &Statistics) -> UnlockSet {
        ACHIEVEMENTS
            .iter()
            .filter(|def| !self.is_unlocked(def.id) && (def.predicate)(stats))
            .map(|def| def.id)
            .collect()
    }

    /// Every definition paired with its unlock flag, in display order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static AchievementDef, bool)> + '_ {
        ACHIEVEMENTS
            .iter()
            .map(|def| (def, self.is_unlocked(def.id)))
    }

    #[must_use]
    pub fn unlocked_count(&self) -> usize {
        self.0.values().filter(|flag| **flag).count()
    }
}
