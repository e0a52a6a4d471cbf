// src/cli.rs
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use crate::config::consts::*;
use crate::config::{DelayRange, DetailKind, Options};
use crate::core::GameId;
use crate::error::Error;
use crate::progress::Progress;
use crate::retry::{RetryPolicy, ThreadSleep};
use crate::source::HttpSource;
use crate::{log, runner};

#[derive(Debug, Parser)]
#[command(name = "stats_pull", version, about = "Resume-safe NBA box score puller")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub opts: PullArgs,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch the game log, then every missing box score (default).
    Pull,
    /// Show how many games each dataset still misses. No network.
    Status,
}

#[derive(Debug, Clone, Args)]
pub struct PullArgs {
    /// Season id, e.g. 2024-25.
    #[arg(long, global = true, default_value = DEFAULT_SEASON)]
    pub season: String,

    /// "Regular Season", "Playoffs", "Pre Season", "PlayIn".
    #[arg(long, global = true, default_value = DEFAULT_SEASON_TYPE)]
    pub season_type: String,

    /// Label used in output file names (default: season with '-' → '_').
    #[arg(long, global = true)]
    pub label: Option<String>,

    /// Output directory.
    #[arg(short, long, global = true, default_value = DEFAULT_OUT_DIR)]
    pub out: PathBuf,

    /// Shortest pause between games, seconds.
    #[arg(long, global = true, default_value_t = DELAY_MIN_SECS)]
    pub delay_min: f64,

    /// Longest pause between games, seconds.
    #[arg(long, global = true, default_value_t = DELAY_MAX_SECS)]
    pub delay_max: f64,

    /// Record kinds to pull, in order.
    #[arg(long, global = true, value_delimiter = ',', default_value = "players,teams")]
    pub kinds: Vec<DetailKind>,

    /// Attempts per remote call before giving up on it.
    #[arg(long, global = true, default_value_t = MAX_ATTEMPTS)]
    pub max_attempts: u32,

    /// Mirror the debug log to stderr.
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

fn secs(name: &str, v: f64) -> Result<Duration, Error> {
    Duration::try_from_secs_f64(v).map_err(|_| Error::Config(format!("{name} must be a non-negative number of seconds, got {v}")))
}

impl PullArgs {
    pub fn to_options(&self) -> Result<Options, Error> {
        let opts = Options {
            season: self.season.clone(),
            season_type: self.season_type.clone(),
            season_label: self.label.clone(),
            out_dir: self.out.clone(),
            delay: DelayRange {
                min: secs("--delay-min", self.delay_min)?,
                max: secs("--delay-max", self.delay_max)?,
            },
            retry: RetryPolicy { max_attempts: self.max_attempts, ..RetryPolicy::default() },
            kinds: self.kinds.clone(),
        };
        opts.validate()?;
        Ok(opts)
    }
}

/// Prints one line per phase and per game, like a build log.
#[derive(Default)]
pub struct ConsoleProgress {
    done: usize,
    total: usize,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Progress for ConsoleProgress {
    fn begin(&mut self, total: usize) {
        self.done = 0;
        self.total = total;
    }
    fn log(&mut self, msg: &str) {
        println!("{msg}");
    }
    fn item_start(&mut self, id: &GameId) {
        println!("[{}/{}] {id}", self.done + 1, self.total);
    }
    fn item_done(&mut self, id: &GameId, rows: usize) {
        self.done += 1;
        if rows == 0 {
            println!("    {id}: no rows");
        }
    }
    fn item_failed(&mut self, id: &GameId, err: &Error) {
        self.done += 1;
        eprintln!("    Failed {id}: {err}");
    }
    fn finish(&mut self) {
        if self.total > 0 {
            println!("Pass complete ({}/{})", self.done, self.total);
        }
    }
}

pub fn run(cli: Cli) -> Result<()> {
    let opts = cli.opts.to_options()?;
    log::init(&opts.log_path(), cli.opts.verbose)
        .wrap_err_with(|| format!("opening log {}", opts.log_path().display()))?;

    match cli.command.unwrap_or(Command::Pull) {
        Command::Pull => {
            let source = HttpSource::new()?;
            let mut progress = ConsoleProgress::new();
            let summary = runner::run(&opts, &source, &ThreadSleep, &mut progress)?;
            let failed = summary.failed_games();
            if failed > 0 {
                println!("{failed} game fetches failed; they will be retried on the next run");
            }
            logf!("Run: done, {} games in index, {failed} failed fetches", summary.games);
        }
        Command::Status => {
            for s in runner::status(&opts)? {
                println!(
                    "{:<8} {:>5} done {:>5} missing  {}",
                    s.kind.to_string(),
                    s.completed,
                    s.missing,
                    s.path.display()
                );
            }
        }
    }
    Ok(())
}
