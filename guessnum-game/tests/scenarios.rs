use std::cell::RefCell;
use std::collections::HashMap;
use std::convert::Infallible;

use chrono::{NaiveDate, Utc};
use guessnum_game::constants::{HISTORY_CAPACITY, PROFILE_STORAGE_KEY};
use guessnum_game::{
    AchievementBook, AchievementId, DailyDraw, DailyNumberSource, DifficultyId, DistanceBucket,
    GameController, GameError, GameResult, GameSession, GuessResult, HistoryEntry, HistoryLog,
    LossReason, Profile, ProfileStorage, SessionEnd, SessionState, Statistics, Targets,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

#[derive(Default)]
struct MemoryStorage {
    entries: RefCell<HashMap<String, String>>,
}

impl ProfileStorage for MemoryStorage {
    type Error = Infallible;

    fn load(&self, key: &str) -> Result<Option<String>, Self::Error> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn save(&self, key: &str, text: &str) -> Result<(), Self::Error> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), text.to_string());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), Self::Error> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

struct FixedDaily(u32);

impl DailyNumberSource for FixedDaily {
    fn daily_number(&mut self, date: NaiveDate) -> GameResult<DailyDraw> {
        Ok(DailyDraw {
            date,
            number: self.0,
            fresh: true,
        })
    }
}

fn controller(seed: u64) -> GameController<FixedDaily> {
    GameController::new(Profile::default(), FixedDaily(33), seed)
}

#[test]
fn drawn_targets_fall_within_tier_range() {
    let mut ctl = controller(0x5EED);
    let today = NaiveDate::from_ymd_opt(2026, 1, 15).unwrap();
    for id in DifficultyId::ALL {
        if *id == DifficultyId::Daily {
            continue;
        }
        ctl.select_difficulty(id.key()).unwrap();
        for _ in 0..100 {
            ctl.start_game_at(Utc::now(), today).unwrap();
            let session = ctl.session().unwrap();
            let max = id.config().max_number;
            assert!((1..=max).contains(&session.target()), "{id}");
        }
    }
}

#[test]
fn double_targets_are_always_distinct() {
    let cfg = DifficultyId::Double.config();
    for seed in 0..64 {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let targets = Targets::draw(cfg, &mut rng);
        assert_ne!(Some(targets.primary()), targets.secondary());
    }
}

#[test]
fn reverse_equal_guess_never_wins() {
    let cfg = DifficultyId::Reverse.config();
    for target in [1, 42, 99, 100] {
        let mut session = GameSession::new(
            DifficultyId::Reverse,
            Targets::fixed(cfg, target, None).unwrap(),
        );
        session.start(Utc::now());
        let outcome = session.submit_guess(&target.to_string()).unwrap();
        assert_ne!(outcome.result, GuessResult::Correct);
        assert!(session.is_playing());
        if target < 100 {
            let outcome = session.submit_guess(&(target + 1).to_string()).unwrap();
            assert_eq!(outcome.result, GuessResult::Correct);
        }
    }
}

#[test]
fn infinite_mode_ends_after_exactly_twenty_attempts() {
    let mut ctl = controller(3);
    ctl.select_difficulty("infinite").unwrap();
    ctl.start_game_with_targets(50, None, Utc::now()).unwrap();
    for attempt in 1..20 {
        let guess = if attempt % 2 == 0 { "90" } else { "10" };
        let report = ctl.submit_guess(guess).unwrap();
        assert!(report.round.is_none(), "ended early at {attempt}");
    }
    let report = ctl.submit_guess("90").unwrap();
    assert_eq!(report.outcome.result, GuessResult::AttemptsExhausted);
    let round = report.round.unwrap();
    assert_eq!(
        round.end,
        SessionEnd::Lost {
            reason: LossReason::AttemptsExhausted,
            attempts: 20,
            time_used: 0
        }
    );
    assert_eq!(ctl.session().unwrap().state(), SessionState::Ended);
    assert_eq!(ctl.stats().total_games, 1);
    assert_eq!(ctl.stats().total_wins, 0);
}

#[test]
fn achievement_evaluation_is_idempotent() {
    let mut book = AchievementBook::default();
    let mut stats = Statistics::default();
    stats.record_win(DifficultyId::Extreme, 9, 25);
    assert!(!book.evaluate(&stats).is_empty());
    assert!(book.evaluate(&stats).is_empty());
}

#[test]
fn history_never_exceeds_capacity() {
    let mut log = HistoryLog::default();
    for attempts in 1..=25 {
        log.append(HistoryEntry {
            difficulty: DifficultyId::Medium,
            attempts,
            time_used: 10,
            won: true,
            timestamp: Utc::now(),
        });
        assert!(log.len() <= HISTORY_CAPACITY);
    }
    assert_eq!(log.recent(1).next().map(|e| e.attempts), Some(25));
    assert!(log.recent(usize::MAX).all(|e| e.attempts > 5));
}

#[test]
fn ten_straight_wins_unlock_perfect() {
    let mut ctl = controller(10);
    ctl.select_difficulty("medium").unwrap();
    for round in 0..10 {
        ctl.start_game_with_targets(60, None, Utc::now()).unwrap();
        ctl.submit_guess("30").unwrap();
        let report = ctl.submit_guess("60").unwrap();
        let unlocked = report.round.unwrap().unlocked;
        assert_eq!(unlocked.contains(&AchievementId::Perfect), round == 9);
    }
    assert_eq!(ctl.stats().total_games, 10);
    assert_eq!(ctl.stats().win_rate, 100);
    assert!(ctl.achievements().is_unlocked(AchievementId::Perfect));
}

#[test]
fn easy_round_with_fixed_target() {
    let mut ctl = controller(8);
    ctl.select_difficulty("easy").unwrap();
    ctl.start_game_with_targets(25, None, Utc::now()).unwrap();

    let high = ctl.submit_guess("40").unwrap();
    assert_eq!(high.outcome.result, GuessResult::TooHigh);
    assert_eq!(high.outcome.distance_bucket, Some(DistanceBucket::Moderate));
    assert!(high.round.is_none());

    let win = ctl.submit_guess("25").unwrap();
    assert_eq!(win.outcome.result, GuessResult::Correct);
    let round = win.round.unwrap();
    assert!(round.end.is_win());
    assert_eq!(ctl.session().unwrap().state(), SessionState::Ended);
    assert_eq!(ctl.stats().total_wins, 1);
    assert_eq!(ctl.best_score(DifficultyId::Easy), Some(2));
    assert_eq!(ctl.history().recent(1).next().map(|e| e.won), Some(true));
}

#[test]
fn double_round_with_fixed_targets() {
    let mut ctl = controller(9);
    ctl.select_difficulty("double").unwrap();
    ctl.start_game_with_targets(10, Some(77), Utc::now()).unwrap();

    let first = ctl.submit_guess("10").unwrap();
    assert_eq!(first.outcome.result, GuessResult::DoubleStageAdvance);
    let session = ctl.session().unwrap();
    assert_eq!(session.state(), SessionState::Playing);
    assert_eq!(session.target(), 77);

    let second = ctl.submit_guess("77").unwrap();
    assert_eq!(second.outcome.result, GuessResult::Correct);
    assert!(second.round.unwrap().end.is_win());
    assert_eq!(ctl.stats().double_completed, 1);
    assert_eq!(ctl.stats().total_wins, 1);
    assert!(ctl.achievements().is_unlocked(AchievementId::Double));
}

#[test]
fn import_without_version_is_rejected() {
    let mut ctl = controller(4);
    ctl.select_difficulty("easy").unwrap();
    ctl.start_game_with_targets(5, None, Utc::now()).unwrap();
    ctl.submit_guess("5").unwrap();
    let stats = ctl.stats().clone();
    let history = ctl.history().clone();

    let result = ctl.import_snapshot(
        r#"{"stats":{"totalGames":99,"totalWins":99},"gameHistory":[],"bestScores":{}}"#,
    );
    assert!(matches!(result, Err(GameError::InvalidImportDocument(_))));
    assert_eq!(ctl.stats(), &stats);
    assert_eq!(ctl.history(), &history);
}

#[test]
fn daily_round_uses_shared_number_and_profile_survives_reload() {
    let storage = MemoryStorage::default();
    let mut ctl = controller(1);
    ctl.select_difficulty("daily").unwrap();
    let notes = ctl
        .start_game_at(Utc::now(), NaiveDate::from_ymd_opt(2026, 2, 2).unwrap())
        .unwrap();
    assert!(notes.iter().any(|n| n.message.contains("2026-02-02")));
    let report = ctl.submit_guess("33").unwrap();
    assert!(report.round.is_some());
    assert!(ctl.save(&storage).unwrap());
    assert!(!ctl.save(&storage).unwrap());

    let restored = Profile::load_or_default(&storage).unwrap();
    assert_eq!(restored.stats.daily_completed, 1);
    assert!(restored.achievements.is_unlocked(AchievementId::Daily));
    assert!(storage.entries.borrow().contains_key(PROFILE_STORAGE_KEY));
}
