//! Centralized tuning constants for Guessnum game logic.
//!
//! These values define the rules of every difficulty tier. Keeping them
//! together ensures that gameplay can only be adjusted via code changes
//! reviewed in version control.

// Persistence ---------------------------------------------------------------
/// Storage key under which the player profile is saved.
pub const PROFILE_STORAGE_KEY: &str = "guessNumberGame";
/// Version stamped on exported snapshots.
pub const EXPORT_VERSION: &str = "2.1.0";

// History -------------------------------------------------------------------
pub const HISTORY_CAPACITY: usize = 20;
pub const HISTORY_DISPLAY_LIMIT: usize = 10;

// Challenge -----------------------------------------------------------------
pub const CHALLENGE_GOAL: u32 = 3;

// Directional hint buckets (strictly greater than) --------------------------
pub(crate) const BUCKET_FAR: u32 = 50;
pub(crate) const BUCKET_MODERATE_FAR: u32 = 20;
pub(crate) const BUCKET_MODERATE: u32 = 10;
pub(crate) const BUCKET_CLOSE: u32 = 5;

// Smart hint tiers (less than or equal) -------------------------------------
pub(crate) const SMART_SCORCHING: u32 = 3;
pub(crate) const SMART_VERY_WARM: u32 = 10;
pub(crate) const SMART_WARM: u32 = 20;
pub(crate) const SMART_COOL: u32 = 50;

// Achievement thresholds ----------------------------------------------------
pub(crate) const LIGHTNING_MAX_SECS: u32 = 20;
pub(crate) const MASTER_MAX_ATTEMPTS: u32 = 5;
pub(crate) const PERFECT_MIN_GAMES: u32 = 10;
pub(crate) const PERFECT_WIN_RATE: u32 = 100;
pub(crate) const PERSISTENT_MIN_ATTEMPTS: u32 = 50;

// Daily numbers -------------------------------------------------------------
pub const DAILY_MAX_NUMBER: u32 = 100;
pub(crate) const DAILY_DOMAIN_TAG: &[u8] = b"guessnum-daily";
