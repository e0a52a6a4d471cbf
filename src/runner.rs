// src/runner.rs
use std::collections::HashSet;
use std::path::PathBuf;

use crate::{
    collect::{self, CollectSummary, Collector},
    config::{DetailKind, Options},
    error::{Error, Result},
    file::{self, ensure_directory},
    index,
    progress::Progress,
    retry::Pause,
    source::StatsSource,
    store,
};

/// Summary of what a pull produced.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub game_log: PathBuf,
    pub game_log_rows: usize,
    pub games: usize,
    pub passes: Vec<(DetailKind, CollectSummary)>,
}

impl RunSummary {
    pub fn failed_games(&self) -> usize {
        self.passes.iter().map(|(_, s)| s.failed.len()).sum()
    }
}

/// Top-level pull: game log first, then one resume-safe pass per record kind.
///
/// The game log is one bulk call: if its retries run out the whole run fails.
/// Inside a pass, a single game failing never stops the pass.
pub fn run(
    opts: &Options,
    source: &dyn StatsSource,
    pause: &dyn Pause,
    progress: &mut dyn Progress,
) -> Result<RunSummary> {
    opts.validate()?;
    ensure_directory(&opts.out_dir)?;

    /* ---------------- Game log ---------------- */

    progress.log("Pulling LeagueGameLog");
    logf!("Run: season={} type={} out={}", opts.season, opts.season_type, opts.out_dir.display());

    let mut log = opts.retry.call("LeagueGameLog", pause, || {
        source.fetch_game_log(&opts.season, &opts.season_type)
    })?;
    index::prepare(&mut log, &opts.season, &opts.season_type)?;
    let entries = index::games(&log, "game log")?;

    // Rewritten in full every run.
    let game_log = opts.game_log_path();
    file::write_dataset(&game_log, &log)?;
    progress.log(&format!("LeagueGameLog saved → {}", game_log.display()));
    progress.log(&format!("   Rows: {} (≈ {} games)", log.row_count(), log.row_count() / 2));

    let games = index::ids(&entries);
    let mut summary = RunSummary {
        game_log,
        game_log_rows: log.row_count(),
        games: games.len(),
        passes: Vec::new(),
    };

    /* ---------------- Detail passes ---------------- */

    let collector = Collector::new(&opts.retry, opts.delay, pause);
    let mut ran = HashSet::new();
    for &kind in &opts.kinds {
        if !ran.insert(kind) {
            continue;
        }
        progress.log(&format!("Pulling {}", kind.label()));
        let path = opts.detail_path(kind);
        let pass = collector.run(
            kind.label(),
            &games,
            &path,
            |g| source.fetch_detail(kind, g),
            progress,
        )?;
        progress.log(&format!("{} pull complete", kind.label()));
        summary.passes.push((kind, pass));
    }

    Ok(summary)
}

/// Resume state of one record kind against the saved game log.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KindStatus {
    pub kind: DetailKind,
    pub path: PathBuf,
    pub completed: usize,
    pub missing: usize,
}

/// Read-only report: how far each pass has got, using only files on disk.
pub fn status(opts: &Options) -> Result<Vec<KindStatus>> {
    opts.validate()?;
    let game_log = opts.game_log_path();
    let log = store::load_dataset(&game_log)?.ok_or_else(|| {
        Error::Config(format!("no game log at {}; run a pull first", game_log.display()))
    })?;
    let games = index::ids(&index::games(&log, &game_log.display().to_string())?);

    let mut out = Vec::with_capacity(opts.kinds.len());
    for &kind in &opts.kinds {
        let path = opts.detail_path(kind);
        let missing = collect::missing_games(&games, &path)?.len();
        logd!("Status: {kind} {} of {} missing", missing, games.len());
        out.push(KindStatus { kind, path, completed: games.len() - missing, missing });
    }
    Ok(out)
}
