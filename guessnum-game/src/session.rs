//! Single-round state machine: target selection, guess judging, and the
//! tickable countdown.
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::difficulty::{DifficultyConfig, DifficultyId};
use crate::error::{GameError, GameResult};
use crate::hints::{Direction, DistanceBucket, SmartHint};
use crate::notice::Severity;

/// Lifecycle of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Ready,
    Playing,
    Ended,
}

/// Why a round was lost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LossReason {
    TimeExpired,
    AttemptsExhausted,
}

/// Terminal result of a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SessionEnd {
    Won {
        attempts: u32,
        time_used: u32,
    },
    Lost {
        reason: LossReason,
        attempts: u32,
        time_used: u32,
    },
    /// Stopped by a restart, difficulty switch, or challenge cancel. Not
    /// recorded anywhere.
    Abandoned,
}

impl SessionEnd {
    #[must_use]
    pub const fn is_win(self) -> bool {
        matches!(self, Self::Won { .. })
    }
}

/// Classification of a single guess.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuessResult {
    TooHigh,
    TooLow,
    Correct,
    DoubleStageAdvance,
    InvalidInput,
    /// Reverse mode: the guess equals the target, which does not satisfy the
    /// "strictly greater" rule.
    Equal,
    /// Infinite mode ran out of attempts.
    AttemptsExhausted,
}

/// What the UI needs to render a guess. Computed without mutating the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessOutcome {
    pub result: GuessResult,
    pub hint_text: String,
    pub distance_bucket: Option<DistanceBucket>,
    pub smart_hint: Option<SmartHint>,
    pub severity: Severity,
    /// Set when applying this outcome ends the round.
    pub ended: Option<SessionEnd>,
}

impl GuessOutcome {
    fn invalid(max: u32) -> Self {
        Self {
            result: GuessResult::InvalidInput,
            hint_text: GameError::InvalidInput { max }.to_string(),
            distance_bucket: None,
            smart_hint: None,
            severity: Severity::Info,
            ended: None,
        }
    }

    #[must_use]
    pub const fn charges_attempt(&self) -> bool {
        !matches!(self.result, GuessResult::InvalidInput)
    }
}

/// Result of feeding elapsed time to the round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickResult {
    /// Untimed, not playing, or the timer already stopped.
    Idle,
    Running { remaining: u32 },
    Expired(SessionEnd),
}

/// Target numbers for a round, validated against a difficulty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Targets {
    primary: u32,
    secondary: Option<u32>,
}

impl Targets {
    /// Draw uniformly from `[1, max]`; double mode resamples the second number
    /// until it differs from the first.
    pub fn draw<R: Rng + ?Sized>(cfg: &DifficultyConfig, rng: &mut R) -> Self {
        let max = cfg.max_number;
        let primary = rng.random_range(1..=max);
        let secondary = if cfg.double && max > 1 {
            let mut second = rng.random_range(1..=max);
            while second == primary {
                second = rng.random_range(1..=max);
            }
            Some(second)
        } else {
            None
        };
        Self { primary, secondary }
    }

    /// Use an externally supplied daily number.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::DailyNumberUnavailable`] when the number falls
    /// outside the tier's range.
    pub fn daily(cfg: &DifficultyConfig, number: u32) -> GameResult<Self> {
        if !cfg.accepts(number) {
            return Err(GameError::DailyNumberUnavailable);
        }
        Ok(Self {
            primary: number,
            secondary: None,
        })
    }

    /// Explicit targets, for replays and tests.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidInput`] when a number is out of range, the
    /// secondary is missing or present for the wrong tier, or the two match.
    pub fn fixed(cfg: &DifficultyConfig, primary: u32, secondary: Option<u32>) -> GameResult<Self> {
        let invalid = GameError::InvalidInput {
            max: cfg.max_number,
        };
        if !cfg.accepts(primary) || cfg.double != secondary.is_some() {
            return Err(invalid);
        }
        if let Some(second) = secondary
            && (!cfg.accepts(second) || second == primary)
        {
            return Err(invalid);
        }
        Ok(Self { primary, secondary })
    }

    #[must_use]
    pub const fn primary(&self) -> u32 {
        self.primary
    }

    #[must_use]
    pub const fn secondary(&self) -> Option<u32> {
        self.secondary
    }
}

/// One play-through of a difficulty tier.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    difficulty: DifficultyId,
    target: u32,
    secondary_target: Option<u32>,
    attempts: u32,
    time_remaining: Option<u32>,
    state: SessionState,
    started_at: Option<DateTime<Utc>>,
    timer_running: bool,
    end: Option<SessionEnd>,
}

impl GameSession {
    /// Prepare a round in the `Ready` state.
    #[must_use]
    pub fn new(difficulty: DifficultyId, targets: Targets) -> Self {
        let cfg = difficulty.config();
        Self {
            difficulty,
            target: targets.primary,
            secondary_target: targets.secondary,
            attempts: 0,
            time_remaining: cfg.time_budget_secs,
            state: SessionState::Ready,
            started_at: None,
            timer_running: false,
            end: None,
        }
    }

    /// Move from `Ready` to `Playing`, resetting attempts and the countdown.
    /// Starting a round that is already playing or ended does nothing.
    pub fn start(&mut self, now: DateTime<Utc>) {
        if self.state != SessionState::Ready {
            return;
        }
        let cfg = self.config();
        self.attempts = 0;
        self.time_remaining = cfg.time_budget_secs;
        self.timer_running = cfg.is_timed();
        self.started_at = Some(now);
        self.state = SessionState::Playing;
        log::info!(
            "round started: difficulty={} timed={} double={}",
            self.difficulty,
            cfg.is_timed(),
            self.secondary_target.is_some()
        );
    }

    #[must_use]
    pub const fn config(&self) -> &'static DifficultyConfig {
        self.difficulty.config()
    }

    #[must_use]
    pub const fn difficulty(&self) -> DifficultyId {
        self.difficulty
    }

    #[must_use]
    pub const fn target(&self) -> u32 {
        self.target
    }

    #[must_use]
    pub const fn secondary_target(&self) -> Option<u32> {
        self.secondary_target
    }

    #[must_use]
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    #[must_use]
    pub const fn time_remaining(&self) -> Option<u32> {
        self.time_remaining
    }

    #[must_use]
    pub const fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    #[must_use]
    pub const fn end(&self) -> Option<SessionEnd> {
        self.end
    }

    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == SessionState::Playing
    }

    #[must_use]
    pub const fn timer_running(&self) -> bool {
        self.timer_running
    }

    /// Seconds spent so far; zero for untimed tiers.
    #[must_use]
    pub fn time_used(&self) -> u32 {
        match (self.config().time_budget_secs, self.time_remaining) {
            (Some(budget), Some(remaining)) => budget.saturating_sub(remaining),
            _ => 0,
        }
    }

    /// Judge a raw guess against the current round without applying it.
    #[must_use]
    pub fn judge(&self, raw: &str) -> GuessOutcome {
        let cfg = self.config();
        let Some(guess) = parse_guess(raw, cfg) else {
            return GuessOutcome::invalid(cfg.max_number);
        };
        let attempts = self.attempts.saturating_add(1);

        if let Some(limit) = cfg.max_attempts
            && attempts >= limit
        {
            return GuessOutcome {
                result: GuessResult::AttemptsExhausted,
                hint_text: format!("Reached the maximum of {limit} attempts!"),
                distance_bucket: None,
                smart_hint: None,
                severity: Severity::Error,
                ended: Some(SessionEnd::Lost {
                    reason: LossReason::AttemptsExhausted,
                    attempts,
                    time_used: self.time_used(),
                }),
            };
        }

        let target = self.target;
        let smart = Some(SmartHint::classify(guess.abs_diff(target)));
        let correct = if cfg.reverse {
            guess > target
        } else {
            guess == target
        };

        if correct {
            return self.correct_outcome(attempts);
        }

        if cfg.reverse {
            return if guess < target {
                GuessOutcome {
                    result: GuessResult::TooLow,
                    hint_text: format!("Too small! You need a number larger than {target}"),
                    distance_bucket: None,
                    smart_hint: smart,
                    severity: Severity::TooLow,
                    ended: None,
                }
            } else {
                GuessOutcome {
                    result: GuessResult::Equal,
                    hint_text: "That is the number, but reverse mode needs a larger one"
                        .to_string(),
                    distance_bucket: None,
                    smart_hint: None,
                    severity: Severity::Info,
                    ended: None,
                }
            };
        }

        let bucket = DistanceBucket::classify(guess.abs_diff(target));
        let (result, direction, severity, lead) = if guess > target {
            (
                GuessResult::TooHigh,
                Direction::High,
                Severity::TooHigh,
                "Too high!",
            )
        } else {
            (
                GuessResult::TooLow,
                Direction::Low,
                Severity::TooLow,
                "Too low!",
            )
        };
        GuessOutcome {
            result,
            hint_text: format!("{lead} {}", bucket.hint(direction)),
            distance_bucket: Some(bucket),
            smart_hint: smart,
            severity,
            ended: None,
        }
    }

    fn correct_outcome(&self, attempts: u32) -> GuessOutcome {
        if self.secondary_target.is_some() {
            return GuessOutcome {
                result: GuessResult::DoubleStageAdvance,
                hint_text: "First number solved! Now find the second one".to_string(),
                distance_bucket: None,
                smart_hint: None,
                severity: Severity::Success,
                ended: None,
            };
        }
        GuessOutcome {
            result: GuessResult::Correct,
            hint_text: format!("Congratulations! The answer was {}", self.target),
            distance_bucket: None,
            smart_hint: Some(SmartHint::Exact),
            severity: Severity::Success,
            ended: Some(SessionEnd::Won {
                attempts,
                time_used: self.time_used(),
            }),
        }
    }

    /// Judge and apply a guess.
    ///
    /// Invalid input is reported in the outcome without charging an attempt.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::SessionNotPlaying`] unless the round is playing.
    pub fn submit_guess(&mut self, raw: &str) -> GameResult<GuessOutcome> {
        if !self.is_playing() {
            return Err(GameError::SessionNotPlaying);
        }
        let outcome = self.judge(raw);
        if !outcome.charges_attempt() {
            log::debug!("rejected guess input {raw:?}");
            return Ok(outcome);
        }
        self.attempts = self.attempts.saturating_add(1);
        log::debug!(
            "guess #{} on {}: {:?}",
            self.attempts,
            self.difficulty,
            outcome.result
        );

        if outcome.result == GuessResult::DoubleStageAdvance
            && let Some(next) = self.secondary_target.take()
        {
            self.target = next;
        }
        if let Some(end) = outcome.ended {
            self.finish(end);
        }
        Ok(outcome)
    }

    /// Feed elapsed seconds from the external clock.
    pub fn advance_time(&mut self, delta_secs: u32) -> TickResult {
        if !self.is_playing() || !self.timer_running {
            return TickResult::Idle;
        }
        let Some(remaining) = self.time_remaining else {
            return TickResult::Idle;
        };
        let remaining = remaining.saturating_sub(delta_secs);
        self.time_remaining = Some(remaining);
        if remaining > 0 {
            return TickResult::Running { remaining };
        }
        let end = SessionEnd::Lost {
            reason: LossReason::TimeExpired,
            attempts: self.attempts,
            time_used: self.time_used(),
        };
        self.finish(end);
        TickResult::Expired(end)
    }

    /// Force the round to end without a result. Returns whether anything was
    /// in flight.
    pub fn abandon(&mut self) -> bool {
        if self.state == SessionState::Ended {
            return false;
        }
        let was_playing = self.is_playing();
        self.finish(SessionEnd::Abandoned);
        was_playing
    }

    fn finish(&mut self, end: SessionEnd) {
        self.timer_running = false;
        self.state = SessionState::Ended;
        self.end = Some(end);
        log::info!(
            "round ended: difficulty={} attempts={} end={end:?}",
            self.difficulty,
            self.attempts
        );
    }
}

/// Parse raw player input into a guess within the tier's range.
#[must_use]
pub fn parse_guess(raw: &str, cfg: &DifficultyConfig) -> Option<u32> {
    let value: i64 = raw.trim().parse().ok()?;
    let guess = u32::try_from(value).ok()?;
    cfg.accepts(guess).then_some(guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn playing(id: DifficultyId, primary: u32, secondary: Option<u32>) -> GameSession {
        let targets = Targets::fixed(id.config(), primary, secondary).unwrap();
        let mut session = GameSession::new(id, targets);
        session.start(Utc::now());
        session
    }

    #[test]
    fn start_resets_counters_and_timer() {
        let session = playing(DifficultyId::Hard, 120, None);
        assert_eq!(session.state(), SessionState::Playing);
        assert_eq!(session.attempts(), 0);
        assert_eq!(session.time_remaining(), Some(90));
        assert!(session.timer_running());
        assert!(session.started_at().is_some());
    }

    #[test]
    fn ready_session_rejects_guesses() {
        let targets = Targets::fixed(DifficultyId::Easy.config(), 10, None).unwrap();
        let mut session = GameSession::new(DifficultyId::Easy, targets);
        assert_eq!(session.state(), SessionState::Ready);
        assert_eq!(
            session.submit_guess("10"),
            Err(GameError::SessionNotPlaying)
        );
    }

    #[test]
    fn invalid_input_does_not_charge() {
        let mut session = playing(DifficultyId::Easy, 25, None);
        for raw in ["", "abc", "0", "51", "-3", "2.5", "99999999999"] {
            let outcome = session.submit_guess(raw).unwrap();
            assert_eq!(outcome.result, GuessResult::InvalidInput, "input {raw:?}");
        }
        assert_eq!(session.attempts(), 0);
        assert!(session.is_playing());
    }

    #[test]
    fn judge_is_pure() {
        let session = playing(DifficultyId::Medium, 60, None);
        let first = session.judge("10");
        let second = session.judge("10");
        assert_eq!(first, second);
        assert_eq!(session.attempts(), 0);
        assert_eq!(first.result, GuessResult::TooLow);
        assert_eq!(first.distance_bucket, Some(DistanceBucket::ModerateFar));
    }

    #[test]
    fn standard_correct_ends_with_time_used() {
        let mut session = playing(DifficultyId::Medium, 42, None);
        assert_eq!(
            session.advance_time(7),
            TickResult::Running { remaining: 53 }
        );
        let outcome = session.submit_guess(" 42 ").unwrap();
        assert_eq!(outcome.result, GuessResult::Correct);
        assert_eq!(
            outcome.ended,
            Some(SessionEnd::Won {
                attempts: 1,
                time_used: 7
            })
        );
        assert_eq!(session.state(), SessionState::Ended);
        assert!(!session.timer_running());
        assert_eq!(
            session.submit_guess("42"),
            Err(GameError::SessionNotPlaying)
        );
    }

    #[test]
    fn reverse_needs_strictly_greater() {
        let mut session = playing(DifficultyId::Reverse, 50, None);
        let low = session.submit_guess("30").unwrap();
        assert_eq!(low.result, GuessResult::TooLow);
        assert!(low.hint_text.contains("larger than 50"));
        let equal = session.submit_guess("50").unwrap();
        assert_eq!(equal.result, GuessResult::Equal);
        assert!(session.is_playing());
        let win = session.submit_guess("51").unwrap();
        assert_eq!(win.result, GuessResult::Correct);
        assert_eq!(session.attempts(), 3);
        assert_eq!(session.state(), SessionState::Ended);
    }

    #[test]
    fn infinite_ends_on_limit_even_when_correct() {
        let mut session = playing(DifficultyId::Infinite, 70, None);
        for _ in 0..19 {
            let outcome = session.submit_guess("1").unwrap();
            assert_eq!(outcome.result, GuessResult::TooLow);
        }
        let last = session.submit_guess("70").unwrap();
        assert_eq!(last.result, GuessResult::AttemptsExhausted);
        assert_eq!(
            last.ended,
            Some(SessionEnd::Lost {
                reason: LossReason::AttemptsExhausted,
                attempts: 20,
                time_used: 0
            })
        );
        assert_eq!(session.state(), SessionState::Ended);
    }

    #[test]
    fn infinite_ignores_ticks() {
        let mut session = playing(DifficultyId::Infinite, 70, None);
        assert!(!session.timer_running());
        assert_eq!(session.advance_time(1_000), TickResult::Idle);
        assert!(session.is_playing());
    }

    #[test]
    fn double_advances_then_wins() {
        let mut session = playing(DifficultyId::Double, 10, Some(77));
        let miss = session.submit_guess("90").unwrap();
        assert_eq!(miss.result, GuessResult::TooHigh);
        let advance = session.submit_guess("10").unwrap();
        assert_eq!(advance.result, GuessResult::DoubleStageAdvance);
        assert_eq!(advance.ended, None);
        assert_eq!(session.target(), 77);
        assert_eq!(session.secondary_target(), None);
        assert!(session.is_playing());
        let win = session.submit_guess("77").unwrap();
        assert_eq!(win.result, GuessResult::Correct);
        assert_eq!(session.attempts(), 3);
        assert!(win.ended.is_some_and(SessionEnd::is_win));
    }

    #[test]
    fn timer_expiry_stops_once() {
        let mut session = playing(DifficultyId::Extreme, 300, None);
        assert_eq!(
            session.advance_time(29),
            TickResult::Running { remaining: 1 }
        );
        let expired = session.advance_time(5);
        assert_eq!(
            expired,
            TickResult::Expired(SessionEnd::Lost {
                reason: LossReason::TimeExpired,
                attempts: 0,
                time_used: 30
            })
        );
        assert_eq!(session.advance_time(1), TickResult::Idle);
        assert_eq!(session.time_remaining(), Some(0));
    }

    #[test]
    fn abandon_stops_timer_without_result() {
        let mut session = playing(DifficultyId::Easy, 5, None);
        assert!(session.abandon());
        assert_eq!(session.end(), Some(SessionEnd::Abandoned));
        assert_eq!(session.advance_time(100), TickResult::Idle);
        assert!(!session.abandon());
    }

    #[test]
    fn drawn_targets_respect_ranges() {
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for id in DifficultyId::ALL {
            let cfg = id.config();
            for _ in 0..200 {
                let targets = Targets::draw(cfg, &mut rng);
                assert!(cfg.accepts(targets.primary()));
                match targets.secondary() {
                    Some(second) => {
                        assert!(cfg.double);
                        assert!(cfg.accepts(second));
                        assert_ne!(second, targets.primary());
                    }
                    None => assert!(!cfg.double),
                }
            }
        }
    }

    #[test]
    fn fixed_targets_validate() {
        let double = DifficultyId::Double.config();
        assert!(Targets::fixed(double, 10, Some(10)).is_err());
        assert!(Targets::fixed(double, 10, None).is_err());
        assert!(Targets::fixed(DifficultyId::Easy.config(), 60, None).is_err());
        assert!(Targets::daily(DifficultyId::Daily.config(), 0).is_err());
        assert!(Targets::daily(DifficultyId::Daily.config(), 100).is_ok());
    }
}
