//! Error kinds surfaced by the engine.
use thiserror::Error;

/// Errors raised by engine operations. None of them are fatal; callers report
/// them to the player and keep running.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("please enter a whole number between 1 and {max}")]
    InvalidInput { max: u32 },
    #[error("choose a difficulty first")]
    NoActiveDifficulty,
    #[error("unknown difficulty `{0}`")]
    UnknownDifficulty(String),
    #[error("no game in progress; start a new round first")]
    SessionNotPlaying,
    #[error("finish the current game before starting a challenge")]
    ChallengeWhilePlaying,
    #[error("saved data is corrupted: {0}")]
    CorruptedSaveData(String),
    #[error("invalid import document: {0}")]
    InvalidImportDocument(String),
    #[error("today's daily number is unavailable")]
    DailyNumberUnavailable,
    #[error("storage failure: {0}")]
    Storage(String),
}

pub type GameResult<T> = Result<T, GameError>;
