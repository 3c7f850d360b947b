//! Interactive round loop. Wall-clock time between inputs is fed to the
//! controller as whole-second ticks.
use anyhow::Result;
use colored::Colorize;
use guessnum_game::{DailyNumberSource, GameController, ProfileStorage, RoundSummary};
use std::io::{BufRead, Write};
use std::time::{Duration, Instant};

use crate::render;

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayExit {
    Finished,
    Quit,
    EndOfInput,
}

/// Converts elapsed wall time into whole seconds, carrying the remainder.
struct TickClock {
    last: Instant,
    carry: Duration,
}

impl TickClock {
    fn new() -> Self {
        Self {
            last: Instant::now(),
            carry: Duration::ZERO,
        }
    }

    fn take_whole_secs(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = self.carry + now.duration_since(self.last);
        self.last = now;
        let whole = elapsed.as_secs();
        self.carry = elapsed - Duration::from_secs(whole);
        u32::try_from(whole).unwrap_or(u32::MAX)
    }

    fn reset(&mut self) {
        self.last = Instant::now();
        self.carry = Duration::ZERO;
    }
}

/// Play rounds until the player quits, input runs out, or the round (or the
/// whole challenge) is over. The profile is saved after every finished round.
///
/// Input is read with blocking reads, so an expired timer is only noticed
/// when the next line arrives. The prompt shows the seconds left as of the
/// previous line, and a guess that arrives after expiry is rejected.
pub fn run<D, S, R, W>(
    ctl: &mut GameController<D>,
    storage: &S,
    mut input: R,
    out: &mut W,
) -> Result<PlayExit>
where
    D: DailyNumberSource,
    S: ProfileStorage,
    R: BufRead,
    W: Write,
{
    let mut clock = TickClock::new();
    let mut line = String::new();
    loop {
        prompt(ctl, out)?;
        line.clear();
        if input.read_line(&mut line)? == 0 {
            writeln!(out)?;
            return Ok(PlayExit::EndOfInput);
        }

        let elapsed = clock.take_whole_secs();
        if elapsed > 0 {
            let tick = ctl.advance_time(elapsed)?;
            render::notifications(out, &tick.notifications)?;
            if let Some(round) = tick.round {
                if !after_round(ctl, storage, &round, out)? {
                    return Ok(PlayExit::Finished);
                }
                clock.reset();
                writeln!(out, "{}", "That guess came too late.".dimmed())?;
                continue;
            }
        }

        let raw = line.trim();
        if raw.eq_ignore_ascii_case("q") || raw.eq_ignore_ascii_case("quit") {
            if ctl.challenge().active {
                render::notification(out, &ctl.cancel_challenge())?;
            }
            return Ok(PlayExit::Quit);
        }

        let report = ctl.submit_guess(raw)?;
        render::notifications(out, &report.notifications)?;
        if let Some(round) = report.round {
            if !after_round(ctl, storage, &round, out)? {
                return Ok(PlayExit::Finished);
            }
            clock.reset();
        }
    }
}

fn prompt<D: DailyNumberSource, W: Write>(ctl: &GameController<D>, out: &mut W) -> Result<()> {
    if let Some(session) = ctl.session() {
        let cfg = session.config();
        let mut status = format!("#{}", session.attempts() + 1);
        if let Some(remaining) = session.time_remaining() {
            status.push_str(&format!(" {remaining}s"));
        }
        if let Some(limit) = cfg.max_attempts {
            status.push_str(&format!(" of {limit}"));
        }
        write!(
            out,
            "[{}] Guess 1-{} (q to quit): ",
            status.cyan(),
            cfg.max_number
        )?;
    }
    out.flush()?;
    Ok(())
}

/// Record the round and decide whether to keep going. A challenge keeps
/// going after a loss by starting a fresh round.
fn after_round<D, S, W>(
    ctl: &mut GameController<D>,
    storage: &S,
    round: &RoundSummary,
    out: &mut W,
) -> Result<bool>
where
    D: DailyNumberSource,
    S: ProfileStorage,
    W: Write,
{
    render::round_summary(out, round)?;
    if ctl.sound_enabled() && round.end.is_win() {
        write!(out, "\u{7}")?;
    }
    ctl.save(storage)?;

    if round.next_round_started {
        return Ok(true);
    }
    if ctl.challenge().active {
        let notes = ctl.start_game()?;
        render::notifications(out, &notes)?;
        return Ok(true);
    }
    Ok(false)
}
