// src/collect.rs
use std::collections::HashSet;
use std::path::Path;

use crate::config::DelayRange;
use crate::config::consts::DETAIL_ID_COL;
use crate::core::GameId;
use crate::error::{Error, Result, SourceError};
use crate::file::Appender;
use crate::progress::Progress;
use crate::retry::{Pause, RetryPolicy};
use crate::store::{self, DataSet};

/// What one pass over a dataset did.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CollectSummary {
    /// Games already on disk when the pass started.
    pub already_done: usize,
    /// Games the pass set out to fetch.
    pub missing: usize,
    /// Games whose rows were appended.
    pub appended: usize,
    pub rows_written: usize,
    /// Fetched fine but came back with no rows; nothing written.
    pub empty: Vec<GameId>,
    /// Retries exhausted; left for the next run.
    pub failed: Vec<GameId>,
    /// Game whose half-written rows were cut off before starting, if any.
    pub repaired: Option<GameId>,
}

/// Games from `games` (order kept) that have no rows in the dataset yet.
pub fn missing_games(games: &[GameId], path: &Path) -> Result<Vec<GameId>> {
    let done = store::load_completed_ids(path, DETAIL_ID_COL)?;
    Ok(pending(games, &done))
}

fn pending(games: &[GameId], done: &HashSet<GameId>) -> Vec<GameId> {
    let mut seen = HashSet::new();
    games
        .iter()
        .filter(|g| !done.contains(*g) && seen.insert(*g))
        .cloned()
        .collect()
}

/// Resume-safe, rate-limited, single-worker fetch loop for one record kind.
///
/// Each game's rows go to disk in one append as soon as they arrive, and the
/// resume state is re-derived from the file on every start, so a killed run
/// loses at most the game in flight. New datasets carry `game_id` as their
/// first column so a torn row still names its game.
pub struct Collector<'a> {
    retry: &'a RetryPolicy,
    delay: DelayRange,
    pause: &'a dyn Pause,
}

impl<'a> Collector<'a> {
    pub fn new(retry: &'a RetryPolicy, delay: DelayRange, pause: &'a dyn Pause) -> Self {
        Self { retry, delay, pause }
    }

    /// Fetch every game in `games` not yet in the dataset at `path`.
    ///
    /// A game whose retries run out is logged and skipped; it will come up
    /// as missing again next run. Disk errors and a malformed dataset abort
    /// the pass.
    pub fn run<F>(
        &self,
        label: &str,
        games: &[GameId],
        path: &Path,
        mut fetch: F,
        progress: &mut dyn Progress,
    ) -> Result<CollectSummary>
    where
        F: FnMut(&GameId) -> std::result::Result<DataSet, SourceError>,
    {
        let mut summary = CollectSummary {
            repaired: store::repair_torn_tail(path, DETAIL_ID_COL)?,
            ..CollectSummary::default()
        };
        if let Some(g) = &summary.repaired {
            progress.log(&format!("{label}: discarded interrupted rows for {g}"));
        }

        let done = store::load_completed_ids(path, DETAIL_ID_COL)?;
        let todo = pending(games, &done);
        summary.already_done = done.len();
        summary.missing = todo.len();
        progress.log(&format!("{label} resume: {} games already processed", done.len()));
        progress.log(&format!("{label} missing games: {}", todo.len()));
        logf!("{label}: {} done, {} missing → {}", done.len(), todo.len(), path.display());

        let mut out = Appender::open(path)?;
        progress.begin(todo.len());

        for (i, game) in todo.iter().enumerate() {
            if i > 0 {
                self.pause.pause(self.delay.sample());
            }
            progress.item_start(game);

            let call_label = format!("{label} {game}");
            match self.retry.call(&call_label, self.pause, || fetch(game)) {
                Ok(mut batch) => {
                    batch.set_leading_column(DETAIL_ID_COL, game.as_str());
                    let n = out.append(&batch)?;
                    if n == 0 {
                        logw!("{call_label}: no rows returned; stays missing");
                        summary.empty.push(game.clone());
                    } else {
                        logd!("{call_label}: appended {n} rows");
                        summary.appended += 1;
                        summary.rows_written += n;
                    }
                    progress.item_done(game, n);
                }
                Err(e @ Error::ExhaustedRetries { .. }) => {
                    loge!("{call_label}: skipped: {e}");
                    progress.item_failed(game, &e);
                    summary.failed.push(game.clone());
                }
                Err(e) => return Err(e),
            }
        }

        progress.finish();
        logf!(
            "{label}: appended {} games ({} rows), {} empty, {} failed",
            summary.appended,
            summary.rows_written,
            summary.empty.len(),
            summary.failed.len()
        );
        Ok(summary)
    }
}
