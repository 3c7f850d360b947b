//! The game controller: owns the profile and drives rounds, challenges, and
//! bookkeeping on behalf of a UI.
use chrono::{DateTime, Local, NaiveDate, Utc};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::Serialize;

use crate::achievements::{AchievementBook, UnlockSet};
use crate::challenge::{ChallengeProgress, ChallengeState};
use crate::daily::{DailyNumberSource, HashedDailyNumbers};
use crate::difficulty::{DifficultyConfig, DifficultyId, DifficultyRegistry};
use crate::error::{GameError, GameResult};
use crate::history::{HistoryEntry, HistoryLog};
use crate::notice::Notification;
use crate::profile::{ExportDocument, Profile, ProfileStorage, Theme};
use crate::session::{GameSession, GuessOutcome, LossReason, SessionEnd, Targets, TickResult};
use crate::stats::{BestScores, Statistics};

/// Bookkeeping performed when a round reached a result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoundSummary {
    pub difficulty: DifficultyId,
    pub end: SessionEnd,
    /// Target of the final stage, revealed once the round is over.
    pub answer: u32,
    pub unlocked: UnlockSet,
    pub challenge: Option<ChallengeProgress>,
    pub new_best: bool,
    /// A challenge win started the next round automatically. After a loss
    /// the challenge stays open and the player starts the next round.
    pub next_round_started: bool,
}

/// Everything a UI needs to render one submitted guess.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TurnReport {
    pub outcome: GuessOutcome,
    pub round: Option<RoundSummary>,
    pub notifications: Vec<Notification>,
}

/// Result of feeding elapsed time to the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickReport {
    pub tick: TickResult,
    pub round: Option<RoundSummary>,
    pub notifications: Vec<Notification>,
}

pub struct GameController<D: DailyNumberSource = HashedDailyNumbers> {
    profile: Profile,
    registry: DifficultyRegistry,
    difficulty: Option<DifficultyId>,
    session: Option<GameSession>,
    challenge: ChallengeState,
    rng: ChaCha20Rng,
    daily: D,
    dirty: bool,
}

impl GameController<HashedDailyNumbers> {
    /// Controller with the built-in daily numbers and a fixed RNG seed.
    #[must_use]
    pub fn with_seed(profile: Profile, seed: u64) -> Self {
        Self::new(profile, HashedDailyNumbers::default(), seed)
    }
}

impl<D: DailyNumberSource> GameController<D> {
    #[must_use]
    pub fn new(profile: Profile, daily: D, seed: u64) -> Self {
        Self {
            profile,
            registry: DifficultyRegistry::new(),
            difficulty: None,
            session: None,
            challenge: ChallengeState::default(),
            rng: ChaCha20Rng::seed_from_u64(seed),
            daily,
            dirty: false,
        }
    }

    /// Choose a tier. A round in progress is abandoned first so its timer
    /// cannot fire against the new tier.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::UnknownDifficulty`] for an unrecognised key.
    pub fn select_difficulty(&mut self, key: &str) -> GameResult<Notification> {
        let cfg = self.registry.get(key)?;
        self.abandon_session();
        self.difficulty = Some(cfg.id);
        log::debug!("difficulty selected: {}", cfg.id);
        Ok(Notification::info(cfg.intro))
    }

    /// Start a fresh round of the selected tier, using today's local date for
    /// the daily tier.
    ///
    /// # Errors
    ///
    /// See [`start_game_at`](Self::start_game_at).
    pub fn start_game(&mut self) -> GameResult<Vec<Notification>> {
        self.start_game_at(Utc::now(), Local::now().date_naive())
    }

    /// Start a fresh round with an explicit clock.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoActiveDifficulty`] before a tier is chosen and
    /// [`GameError::DailyNumberUnavailable`] if the daily source fails.
    pub fn start_game_at(
        &mut self,
        now: DateTime<Utc>,
        today: NaiveDate,
    ) -> GameResult<Vec<Notification>> {
        let id = self.difficulty.ok_or(GameError::NoActiveDifficulty)?;
        let cfg = id.config();
        self.abandon_session();

        let mut notifications = Vec::new();
        let targets = if cfg.uses_daily_target() {
            let draw = self.daily.daily_number(today)?;
            if draw.fresh {
                notifications.push(Notification::info(format!(
                    "Daily number for {} is ready",
                    draw.date
                )));
            }
            Targets::daily(cfg, draw.number)?
        } else {
            Targets::draw(cfg, &mut self.rng)
        };

        self.begin_round(id, targets, now, &mut notifications);
        Ok(notifications)
    }

    /// Start a round of the selected tier with known targets, for replays and
    /// scripted scenarios.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoActiveDifficulty`] before a tier is chosen and
    /// [`GameError::InvalidInput`] when the targets do not fit the tier.
    pub fn start_game_with_targets(
        &mut self,
        primary: u32,
        secondary: Option<u32>,
        now: DateTime<Utc>,
    ) -> GameResult<Vec<Notification>> {
        let id = self.difficulty.ok_or(GameError::NoActiveDifficulty)?;
        let targets = Targets::fixed(id.config(), primary, secondary)?;
        self.abandon_session();
        let mut notifications = Vec::new();
        self.begin_round(id, targets, now, &mut notifications);
        Ok(notifications)
    }

    /// Submit raw player input for the current round.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::NoActiveDifficulty`] before a tier is chosen and
    /// [`GameError::SessionNotPlaying`] when no round is in progress.
    pub fn submit_guess(&mut self, raw: &str) -> GameResult<TurnReport> {
        if self.difficulty.is_none() {
            return Err(GameError::NoActiveDifficulty);
        }
        let session = self.session.as_mut().ok_or(GameError::SessionNotPlaying)?;
        let outcome = session.submit_guess(raw)?;

        let mut notifications = vec![Notification::new(
            outcome.hint_text.clone(),
            outcome.severity,
        )];
        if outcome.ended.is_none()
            && let Some(smart) = outcome.smart_hint
            && smart.is_popup()
        {
            notifications.push(Notification::info(smart.text()));
        }

        let round = match outcome.ended {
            Some(end) => Some(self.conclude(end, Utc::now(), &mut notifications)?),
            None => None,
        };
        Ok(TurnReport {
            outcome,
            round,
            notifications,
        })
    }

    /// Feed elapsed seconds from the caller's clock.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotPlaying`] if the expired round cannot be
    /// recorded.
    pub fn advance_time(&mut self, delta_secs: u32) -> GameResult<TickReport> {
        let tick = match self.session.as_mut() {
            Some(session) => session.advance_time(delta_secs),
            None => TickResult::Idle,
        };
        let mut notifications = Vec::new();
        let round = match tick {
            TickResult::Expired(end) => {
                log::debug!("timer expired after {delta_secs}s tick");
                Some(self.conclude(end, Utc::now(), &mut notifications)?)
            }
            TickResult::Running { remaining } => {
                log::debug!("tick: {remaining}s remaining");
                None
            }
            TickResult::Idle => None,
        };
        Ok(TickReport {
            tick,
            round,
            notifications,
        })
    }

    /// Begin a challenge on the selected tier and start its first round.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::ChallengeWhilePlaying`] while a round is in
    /// progress and [`GameError::NoActiveDifficulty`] before a tier is chosen.
    pub fn start_challenge(&mut self) -> GameResult<Vec<Notification>> {
        if self.is_playing() {
            return Err(GameError::ChallengeWhilePlaying);
        }
        if self.difficulty.is_none() {
            return Err(GameError::NoActiveDifficulty);
        }
        self.challenge.start();
        let mut notifications = vec![Notification::info(format!(
            "Challenge started! Win {} rounds in a row",
            self.challenge.goal
        ))];
        match self.start_game() {
            Ok(started) => notifications.extend(started),
            Err(err) => {
                self.challenge.cancel();
                return Err(err);
            }
        }
        Ok(notifications)
    }

    /// Abandon the challenge and any round it has in flight.
    pub fn cancel_challenge(&mut self) -> Notification {
        self.abandon_session();
        self.challenge.cancel();
        Notification::info("Challenge cancelled")
    }

    #[must_use]
    pub fn export_snapshot(&self, now: DateTime<Utc>) -> ExportDocument {
        self.profile.export(now)
    }

    /// Replace progress with an exported snapshot. Invalid documents leave
    /// everything untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidImportDocument`] when the text is not a
    /// versioned export.
    pub fn import_snapshot(&mut self, json: &str) -> GameResult<Notification> {
        let document = ExportDocument::parse(json).inspect_err(|err| {
            log::warn!("import rejected: {err}");
        })?;
        log::info!(
            "importing snapshot version {}",
            document.version.as_deref().unwrap_or_default()
        );
        self.profile.apply_import(document);
        self.dirty = true;
        Ok(Notification::success("Data imported successfully!"))
    }

    /// Reset statistics, achievements, history, and best scores.
    pub fn clear_data(&mut self) -> Notification {
        self.profile.clear_progress();
        self.dirty = true;
        log::info!("profile progress cleared");
        Notification::info("All game data cleared")
    }

    pub fn toggle_sound(&mut self) -> Notification {
        self.profile.sound_enabled = !self.profile.sound_enabled;
        self.dirty = true;
        Notification::info(if self.profile.sound_enabled {
            "Sound on"
        } else {
            "Sound off"
        })
    }

    pub fn toggle_theme(&mut self) -> Notification {
        self.profile.theme = self.profile.theme.toggled();
        self.dirty = true;
        Notification::info(match self.profile.theme {
            Theme::Dark => "Switched to dark theme",
            Theme::Light => "Switched to light theme",
        })
    }

    /// Write the profile if anything changed since the last save. Returns
    /// whether a write happened.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::Storage`] when the write fails; the profile stays
    /// dirty so a later save can retry.
    pub fn save<S: ProfileStorage>(&mut self, storage: &S) -> GameResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.profile.save_to(storage)?;
        self.dirty = false;
        Ok(true)
    }

    #[must_use]
    pub fn best_score(&self, id: DifficultyId) -> Option<u32> {
        self.profile.best_scores.get(id)
    }

    #[must_use]
    pub const fn best_scores(&self) -> &BestScores {
        &self.profile.best_scores
    }

    #[must_use]
    pub const fn stats(&self) -> &Statistics {
        &self.profile.stats
    }

    #[must_use]
    pub const fn history(&self) -> &HistoryLog {
        &self.profile.game_history
    }

    #[must_use]
    pub const fn achievements(&self) -> &AchievementBook {
        &self.profile.achievements
    }

    #[must_use]
    pub const fn profile(&self) -> &Profile {
        &self.profile
    }

    #[must_use]
    pub const fn registry(&self) -> &DifficultyRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn current_difficulty(&self) -> Option<DifficultyId> {
        self.difficulty
    }

    #[must_use]
    pub const fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    #[must_use]
    pub const fn challenge(&self) -> &ChallengeState {
        &self.challenge
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.session.as_ref().is_some_and(GameSession::is_playing)
    }

    #[must_use]
    pub const fn sound_enabled(&self) -> bool {
        self.profile.sound_enabled
    }

    #[must_use]
    pub const fn theme(&self) -> Theme {
        self.profile.theme
    }

    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    fn begin_round(
        &mut self,
        id: DifficultyId,
        targets: Targets,
        now: DateTime<Utc>,
        notifications: &mut Vec<Notification>,
    ) {
        let mut session = GameSession::new(id, targets);
        session.start(now);
        self.session = Some(session);
        notifications.push(Notification::info(round_banner(id.config())));
    }

    fn abandon_session(&mut self) {
        if let Some(session) = self.session.as_mut()
            && session.abandon()
        {
            log::debug!("abandoned round on {}", session.difficulty());
        }
    }

    /// The single place a finished round is recorded.
    fn conclude(
        &mut self,
        end: SessionEnd,
        now: DateTime<Utc>,
        notifications: &mut Vec<Notification>,
    ) -> GameResult<RoundSummary> {
        let (difficulty, answer) = match self.session.as_ref() {
            Some(session) => (session.difficulty(), session.target()),
            None => return Err(GameError::SessionNotPlaying),
        };
        let cfg = difficulty.config();

        let (won, attempts, time_used) = match end {
            SessionEnd::Won {
                attempts,
                time_used,
            } => (true, attempts, time_used),
            SessionEnd::Lost {
                reason,
                attempts,
                time_used,
            } => {
                notifications.push(Notification::error(loss_message(reason, answer)));
                (false, attempts, time_used)
            }
            SessionEnd::Abandoned => return Err(GameError::SessionNotPlaying),
        };

        let mut new_best = false;
        if won {
            self.profile
                .stats
                .record_win(difficulty, attempts, time_used);
            new_best = self.profile.best_scores.record(difficulty, attempts);
            if new_best {
                notifications.push(Notification::success(format!(
                    "New best for {}: {attempts} attempts!",
                    cfg.display_name
                )));
            }
        } else {
            self.profile.stats.record_loss();
        }

        self.profile.game_history.append(HistoryEntry {
            difficulty,
            attempts,
            time_used,
            won,
            timestamp: now,
        });

        let challenge = self.challenge.record_round(won);
        match challenge {
            Some(ChallengeProgress::Completed { goal }) => {
                self.profile.stats.record_challenge_completed();
                notifications.push(Notification::success(format!(
                    "Challenge complete! {goal} wins in a row"
                )));
            }
            Some(ChallengeProgress::Continue { wins, goal }) => {
                notifications.push(Notification::info(format!(
                    "Challenge progress: {wins} / {goal}"
                )));
            }
            Some(ChallengeProgress::Unchanged { wins, goal }) => {
                notifications.push(Notification::info(format!(
                    "Challenge still open: {wins} / {goal}"
                )));
            }
            None => {}
        }

        let unlocked = self.profile.achievements.evaluate(&self.profile.stats);
        for id in &unlocked {
            let def = id.definition();
            notifications.push(Notification::success(format!(
                "Achievement unlocked: {} - {}",
                def.name, def.description
            )));
        }
        self.dirty = true;

        let mut next_round_started = false;
        if matches!(challenge, Some(ChallengeProgress::Continue { .. })) {
            match self.start_game() {
                Ok(notes) => {
                    notifications.extend(notes);
                    next_round_started = true;
                }
                Err(err) => {
                    log::warn!("next challenge round did not start: {err}");
                    notifications.push(Notification::error(format!(
                        "Could not start the next round: {err}"
                    )));
                }
            }
        }

        Ok(RoundSummary {
            difficulty,
            end,
            answer,
            unlocked,
            challenge,
            new_best,
            next_round_started,
        })
    }
}

fn round_banner(cfg: &DifficultyConfig) -> String {
    let mut banner = format!("New round! Guess a number from 1 to {}", cfg.max_number);
    if let Some(secs) = cfg.time_budget_secs {
        banner.push_str(&format!(" within {secs} seconds"));
    }
    if let Some(limit) = cfg.max_attempts {
        banner.push_str(&format!(" in at most {limit} attempts"));
    }
    banner
}

fn loss_message(reason: LossReason, answer: u32) -> String {
    match reason {
        LossReason::TimeExpired => format!("Time's up! The answer was {answer}"),
        LossReason::AttemptsExhausted => format!("Out of attempts! The answer was {answer}"),
    }
}
