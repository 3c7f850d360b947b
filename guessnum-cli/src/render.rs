//! Console rendering for notifications, rounds, and saved progress.
use colored::Colorize;
use guessnum_game::{
    AchievementBook, BestScores, ChallengeProgress, DifficultyRegistry, HistoryLog, Notification,
    RoundSummary, SessionEnd, Severity, Statistics,
};
use std::io::{self, Write};

pub fn banner(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", "🎲 Guessnum".bright_cyan().bold())?;
    writeln!(out, "{}", "===========".cyan())
}

pub fn notification(out: &mut dyn Write, note: &Notification) -> io::Result<()> {
    let line = match note.severity {
        Severity::Info => format!("ℹ️  {}", note.message).normal(),
        Severity::Success => format!("✅ {}", note.message).green(),
        Severity::Error => format!("❌ {}", note.message).red(),
        Severity::TooHigh => format!("⬆️  {}", note.message).yellow(),
        Severity::TooLow => format!("⬇️  {}", note.message).blue(),
    };
    writeln!(out, "{line}")
}

pub fn notifications(out: &mut dyn Write, notes: &[Notification]) -> io::Result<()> {
    notes.iter().try_for_each(|note| notification(out, note))
}

pub fn round_summary(out: &mut dyn Write, round: &RoundSummary) -> io::Result<()> {
    let cfg = round.difficulty.config();
    writeln!(out)?;
    match round.end {
        SessionEnd::Won {
            attempts,
            time_used,
        } => {
            writeln!(out, "{}", "🎉 You win!".green().bold())?;
            writeln!(out, "   Answer: {}", round.answer.to_string().bold())?;
            writeln!(out, "   Attempts: {attempts}")?;
            if cfg.is_timed() {
                writeln!(out, "   Time used: {time_used}s")?;
            }
        }
        SessionEnd::Lost { attempts, .. } => {
            writeln!(out, "{}", "⏰ Game over".red().bold())?;
            writeln!(out, "   Answer: {}", round.answer.to_string().bold())?;
            writeln!(out, "   Attempts: {attempts}")?;
        }
        SessionEnd::Abandoned => return Ok(()),
    }
    writeln!(out, "   Difficulty: {}", cfg.display_name)?;
    if let Some(ChallengeProgress::Continue { wins, goal }) = round.challenge {
        writeln!(out, "   Challenge: {wins} / {goal}, next number is ready")?;
    }
    for id in &round.unlocked {
        let def = id.definition();
        writeln!(out, "   🏆 {} - {}", def.name.bold(), def.description)?;
    }
    writeln!(out)
}

pub fn difficulties(
    out: &mut dyn Write,
    registry: &DifficultyRegistry,
    best: &BestScores,
) -> io::Result<()> {
    writeln!(out, "{}", "Difficulties".bright_cyan().bold())?;
    for cfg in registry.iter() {
        let mut rules = format!("1-{}", cfg.max_number);
        if let Some(secs) = cfg.time_budget_secs {
            rules.push_str(&format!(", {secs}s"));
        }
        if let Some(limit) = cfg.max_attempts {
            rules.push_str(&format!(", {limit} attempts"));
        }
        let best_label = best
            .get(cfg.id)
            .map_or_else(|| "-".to_string(), |attempts| attempts.to_string());
        writeln!(
            out,
            "  {:10} {:18} {:22} best: {best_label}",
            cfg.id.key().bold(),
            cfg.display_name,
            rules
        )?;
    }
    Ok(())
}

pub fn stats(out: &mut dyn Write, stats: &Statistics, best: &BestScores) -> io::Result<()> {
    writeln!(out, "{}", "📊 Statistics".bright_cyan().bold())?;
    writeln!(out, "Total games: {}", stats.total_games)?;
    writeln!(out, "Wins: {}", stats.total_wins.to_string().green())?;
    writeln!(out, "Win rate: {}%", stats.win_rate)?;
    writeln!(out, "Average attempts: {:.1}", stats.avg_attempts)?;
    writeln!(out, "Average time: {:.1}s", stats.avg_time)?;
    writeln!(out, "Challenges completed: {}", stats.challenge_completed)?;
    if !best.is_empty() {
        writeln!(out, "Best scores:")?;
        for (id, attempts) in best.iter() {
            writeln!(out, "  {:18} {attempts}", id.config().display_name)?;
        }
    }
    Ok(())
}

pub fn history(out: &mut dyn Write, log: &HistoryLog, limit: usize) -> io::Result<()> {
    writeln!(out, "{}", "📜 Recent games".bright_cyan().bold())?;
    if log.is_empty() {
        return writeln!(out, "No games played yet");
    }
    for entry in log.recent(limit) {
        let result = if entry.won {
            "WIN ".green()
        } else {
            "LOSS".red()
        };
        writeln!(
            out,
            "{result} {:18} {:>3} attempts {:>4}s  {}",
            entry.difficulty.config().display_name,
            entry.attempts,
            entry.time_used,
            entry.timestamp.format("%Y-%m-%d %H:%M")
        )?;
    }
    Ok(())
}

pub fn achievements(out: &mut dyn Write, book: &AchievementBook) -> io::Result<()> {
    writeln!(
        out,
        "{} ({}/{})",
        "🏆 Achievements".bright_cyan().bold(),
        book.unlocked_count(),
        guessnum_game::ACHIEVEMENTS.len()
    )?;
    for (def, unlocked) in book.iter() {
        if unlocked {
            writeln!(out, "  ✅ {} - {}", def.name.green(), def.description)?;
        } else {
            writeln!(out, "  🔒 {} - {}", def.name.dimmed(), def.description)?;
        }
    }
    Ok(())
}
