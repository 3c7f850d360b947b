mod play;
mod render;
mod storage;

use anyhow::{Context, Result, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::Colorize;
use guessnum_game::constants::{HISTORY_DISPLAY_LIMIT, PROFILE_STORAGE_KEY};
use guessnum_game::{GameController, HashedDailyNumbers, Notification, Profile, ProfileStorage};
use rand::Rng;
use std::fs::File;
use std::io::{BufRead, BufWriter, Write, stdin, stdout};
use std::path::PathBuf;

use play::PlayExit;
use storage::FileStorage;

#[derive(Debug, Parser)]
#[command(name = "guessnum", version)]
#[command(about = "Number guessing game with difficulty tiers, achievements, and challenges")]
struct Args {
    /// Where progress is saved
    #[arg(long, default_value = "guessnum-save.json")]
    save_file: PathBuf,

    /// Fix the random seed for reproducible targets
    #[arg(long)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play a round on the given difficulty
    Play { difficulty: String },
    /// Win three rounds in a row on the given difficulty
    Challenge { difficulty: String },
    /// Show cumulative statistics and best scores
    Stats,
    /// Show recent games, newest first
    History {
        #[arg(long, default_value_t = HISTORY_DISPLAY_LIMIT)]
        limit: usize,
    },
    /// List achievements and which are unlocked
    Achievements,
    /// Export progress as JSON
    Export {
        /// Write to a file instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace progress with a previously exported file
    Import { path: PathBuf },
    /// Erase statistics, achievements, history, and best scores
    Clear {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
    /// List difficulty tiers
    Difficulties,
    /// Toggle sound
    Sound,
    /// Toggle light/dark theme
    Theme,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let storage = FileStorage::new(&args.save_file);
    let profile = Profile::load_or_default(&storage)
        .with_context(|| format!("failed to read {}", args.save_file.display()))?;
    let seed = args.seed.unwrap_or_else(|| rand::rng().random());
    log::debug!("session seed {seed}");
    let mut ctl = GameController::with_seed(profile, seed);

    run_command(&args.command, &mut ctl, &storage)?;

    ctl.save(&storage)
        .with_context(|| format!("failed to write {}", args.save_file.display()))?;
    Ok(())
}

fn run_command(
    command: &Command,
    ctl: &mut GameController<HashedDailyNumbers>,
    storage: &FileStorage,
) -> Result<()> {
    let mut out = stdout().lock();
    match command {
        Command::Play { difficulty } => {
            announce_banner(&mut out)?;
            render::notification(&mut out, &ctl.select_difficulty(difficulty)?)?;
            render::notifications(&mut out, &ctl.start_game()?)?;
            finish_play(play::run(ctl, storage, stdin().lock(), &mut out)?, &mut out)?;
        }
        Command::Challenge { difficulty } => {
            announce_banner(&mut out)?;
            render::notification(&mut out, &ctl.select_difficulty(difficulty)?)?;
            render::notifications(&mut out, &ctl.start_challenge()?)?;
            finish_play(play::run(ctl, storage, stdin().lock(), &mut out)?, &mut out)?;
        }
        Command::Stats => render::stats(&mut out, ctl.stats(), ctl.best_scores())?,
        Command::History { limit } => render::history(&mut out, ctl.history(), *limit)?,
        Command::Achievements => render::achievements(&mut out, ctl.achievements())?,
        Command::Export { output } => {
            let json = ctl.export_snapshot(Utc::now()).to_json()?;
            let mut target = OutputTarget::new(output.clone())?;
            writeln!(target.writer(), "{json}")?;
            target.flush_inner()?;
            if let Some(path) = output {
                let note = Notification::info(format!("Data exported to {}", path.display()));
                render::notification(&mut out, &note)?;
            }
        }
        Command::Import { path } => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            match ctl.import_snapshot(&text) {
                Ok(note) => render::notification(&mut out, &note)?,
                Err(err) => {
                    render::notification(&mut out, &Notification::error(err.to_string()))?;
                    bail!("import failed: {err}");
                }
            }
        }
        Command::Clear { yes } => {
            if !*yes && !confirm(&mut out, "Erase all saved progress? Type yes to continue: ")? {
                writeln!(out, "Nothing cleared")?;
                return Ok(());
            }
            storage
                .delete(PROFILE_STORAGE_KEY)
                .with_context(|| format!("failed to clear {}", storage.path().display()))?;
            render::notification(&mut out, &ctl.clear_data())?;
        }
        Command::Difficulties => {
            render::difficulties(&mut out, ctl.registry(), ctl.best_scores())?;
        }
        Command::Sound => render::notification(&mut out, &ctl.toggle_sound())?,
        Command::Theme => render::notification(&mut out, &ctl.toggle_theme())?,
    }
    out.flush()?;
    Ok(())
}

fn announce_banner(out: &mut dyn Write) -> Result<()> {
    render::banner(out)?;
    Ok(())
}

fn finish_play(exit: PlayExit, out: &mut dyn Write) -> Result<()> {
    match exit {
        PlayExit::Finished => {}
        PlayExit::Quit => writeln!(out, "{}", "👋 Round abandoned".dimmed())?,
        PlayExit::EndOfInput => {
            writeln!(out, "{}", "Input closed; round left unfinished".dimmed())?;
        }
    }
    Ok(())
}

fn confirm(out: &mut dyn Write, question: &str) -> Result<bool> {
    write!(out, "{question}")?;
    out.flush()?;
    let mut answer = String::new();
    stdin().lock().read_line(&mut answer)?;
    Ok(answer.trim().eq_ignore_ascii_case("yes"))
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}
