//! Bounded newest-first log of finished rounds.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::constants::HISTORY_CAPACITY;
use crate::difficulty::DifficultyId;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub difficulty: DifficultyId,
    pub attempts: u32,
    pub time_used: u32,
    pub won: bool,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HistoryLog {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLog {
    /// Insert at the front, evicting the oldest entries beyond capacity.
    pub fn append(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    /// Up to `limit` entries, newest first.
    pub fn recent(&self, limit: usize) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter().take(limit)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Enforce the capacity on logs loaded from older or hand-edited data.
    pub(crate) fn normalize(&mut self) {
        self.entries.truncate(HISTORY_CAPACITY);
    }
}
