//! Persisted player profile, the storage seam, and the export document.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::achievements::AchievementBook;
use crate::constants::{EXPORT_VERSION, PROFILE_STORAGE_KEY};
use crate::error::{GameError, GameResult};
use crate::history::HistoryLog;
use crate::stats::{BestScores, Statistics};

/// Key-value persistence collaborator for the serialized profile.
pub trait ProfileStorage {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Read the stored text for `key`, if any.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn load(&self, key: &str) -> Result<Option<String>, Self::Error>;

    /// Replace the stored text for `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn save(&self, key: &str, text: &str) -> Result<(), Self::Error>;

    /// Remove `key` entirely.
    ///
    /// # Errors
    ///
    /// Returns an error if the entry cannot be removed.
    fn delete(&self, key: &str) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Everything that survives between runs.
///
/// Each section falls back to its default independently, so a profile written
/// by an older build with missing sections still loads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub achievements: AchievementBook,
    pub stats: Statistics,
    pub game_history: HistoryLog,
    pub best_scores: BestScores,
    pub sound_enabled: bool,
    pub theme: Theme,
}

impl Profile {
    /// Parse a stored profile.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::CorruptedSaveData`] when the text is not a valid
    /// profile document.
    pub fn parse(text: &str) -> GameResult<Self> {
        let mut profile: Self = serde_json::from_str(text)
            .map_err(|err| GameError::CorruptedSaveData(err.to_string()))?;
        profile.game_history.normalize();
        Ok(profile)
    }

    /// Load the profile, falling back to defaults when nothing is stored or
    /// the stored text is unreadable.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] only when the storage itself fails.
    pub fn load_or_default<S: ProfileStorage>(storage: &S) -> GameResult<Self> {
        let stored = storage
            .load(PROFILE_STORAGE_KEY)
            .map_err(|err| GameError::Storage(err.to_string()))?;
        let Some(text) = stored else {
            log::debug!("no saved profile; starting fresh");
            return Ok(Self::default());
        };
        match Self::parse(&text) {
            Ok(profile) => Ok(profile),
            Err(err) => {
                log::warn!("{err}; resetting profile to defaults");
                Ok(Self::default())
            }
        }
    }

    /// Serialize and write the profile under the profile key.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] when serialization or the write fails.
    pub fn save_to<S: ProfileStorage>(&self, storage: &S) -> GameResult<()> {
        let text =
            serde_json::to_string(self).map_err(|err| GameError::Storage(err.to_string()))?;
        storage
            .save(PROFILE_STORAGE_KEY, &text)
            .map_err(|err| GameError::Storage(err.to_string()))
    }

    /// Drop progress while keeping sound and theme preferences.
    pub fn clear_progress(&mut self) {
        self.achievements = AchievementBook::default();
        self.stats = Statistics::default();
        self.game_history = HistoryLog::default();
        self.best_scores = BestScores::default();
    }

    /// Snapshot of the exportable sections.
    #[must_use]
    pub fn export(&self, now: DateTime<Utc>) -> ExportDocument {
        ExportDocument {
            achievements: self.achievements.clone(),
            stats: self.stats.clone(),
            game_history: self.game_history.clone(),
            best_scores: self.best_scores.clone(),
            version: Some(EXPORT_VERSION.to_string()),
            export_date: Some(now),
        }
    }

    /// Replace the exportable sections with an imported document. Preferences
    /// are left as they are.
    pub fn apply_import(&mut self, document: ExportDocument) {
        self.achievements = document.achievements;
        self.stats = document.stats;
        self.game_history = document.game_history;
        self.game_history.normalize();
        self.best_scores = document.best_scores;
    }
}

/// Portable snapshot of player progress.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExportDocument {
    pub achievements: AchievementBook,
    pub stats: Statistics,
    pub game_history: HistoryLog,
    pub best_scores: BestScores,
    pub version: Option<String>,
    pub export_date: Option<DateTime<Utc>>,
}

impl ExportDocument {
    /// Pretty-printed JSON for the player to copy somewhere safe.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] if serialization fails.
    pub fn to_json(&self) -> GameResult<String> {
        serde_json::to_string_pretty(self).map_err(|err| GameError::Storage(err.to_string()))
    }

    /// Parse and validate an import. The document must carry a non-empty
    /// `version`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidImportDocument`] for blank input, malformed
    /// JSON, or a missing version.
    pub fn parse(text: &str) -> GameResult<Self> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GameError::InvalidImportDocument(
                "nothing to import".to_string(),
            ));
        }
        let document: Self = serde_json::from_str(text)
            .map_err(|err| GameError::InvalidImportDocument(err.to_string()))?;
        match document.version.as_deref() {
            Some(version) if !version.is_empty() => Ok(document),
            _ => Err(GameError::InvalidImportDocument(
                "missing version".to_string(),
            )),
        }
    }
}
