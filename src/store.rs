// src/store.rs
//
// On-disk datasets: one delimited file per record kind, header row first.
//
// - DataSet: headers + string rows, the in-memory shape of every table we
//            fetch or persist.
// - load_completed_ids: the resume state of a dataset, i.e. which game ids
//            already have rows in it.
// - repair_torn_tail: cut off the rows of an append that was interrupted
//            half-way, so that game is fetched again instead of kept partial.

use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::config::consts::SEP;
use crate::core::GameId;
use crate::csv::{self, Record};
use crate::error::{Error, Result};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DataSet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataSet {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn row_count(&self) -> usize { self.rows.len() }
    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Exact (case-sensitive) header lookup.
    pub fn column(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Set every row's `name` cell to `value`, appending the column if absent.
    pub fn set_column(&mut self, name: &str, value: &str) {
        match self.column(name) {
            Some(ix) => {
                for row in &mut self.rows {
                    if row.len() <= ix {
                        row.resize(ix + 1, String::new());
                    }
                    row[ix] = value.to_string();
                }
            }
            None => {
                self.headers.push(name.to_string());
                let width = self.headers.len();
                for row in &mut self.rows {
                    row.resize(width - 1, String::new());
                    row.push(value.to_string());
                }
            }
        }
    }

    /// Like [`DataSet::set_column`], but a new column goes first.
    pub fn set_leading_column(&mut self, name: &str, value: &str) {
        if self.column(name).is_some() {
            self.set_column(name, value);
        } else {
            self.headers.insert(0, name.to_string());
            for row in &mut self.rows {
                row.insert(0, value.to_string());
            }
        }
    }

    /// Rewrite column `name` in place. Returns false if there is no such column.
    pub fn map_column<F>(&mut self, name: &str, mut f: F) -> bool
    where
        F: FnMut(&str) -> String,
    {
        let Some(ix) = self.column(name) else { return false };
        for row in &mut self.rows {
            if let Some(cell) = row.get_mut(ix) {
                *cell = f(cell);
            }
        }
        true
    }

    /// Reorder cells to match `target` by header name.
    /// Columns missing here become empty cells; columns not in `target` are
    /// dropped and returned so the caller can report them.
    pub fn project_onto(&self, target: &[String]) -> (Vec<Vec<String>>, Vec<String>) {
        let map: Vec<Option<usize>> = target.iter().map(|h| self.column(h)).collect();
        let dropped = self
            .headers
            .iter()
            .filter(|h| !target.contains(h))
            .cloned()
            .collect();
        let rows = self
            .rows
            .iter()
            .map(|row| {
                map.iter()
                    .map(|ix| ix.and_then(|i| row.get(i)).cloned().unwrap_or_default())
                    .collect()
            })
            .collect();
        (rows, dropped)
    }
}

/* ---------------- Reading ---------------- */

/// File contents, or `None` when the file is absent or blank.
/// A blank file is what a crash between create and first write leaves behind.
fn read_text(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(text) if text.trim().is_empty() => Ok(None),
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Just the header row, without reading the rest of the file.
/// A header line without its line break is a torn first write, not a header.
pub fn read_header(path: &Path) -> Result<Option<Vec<String>>> {
    let file = match fs::File::open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut reader = BufReader::new(file);
    let mut line = String::new();
    loop {
        line.clear();
        if reader.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        if !line.trim().is_empty() {
            break;
        }
    }
    if !line.ends_with('\n') {
        return Ok(None);
    }
    Ok(csv::parse_rows(&line, SEP).into_iter().next())
}

/// Whole dataset, header required. `None` when absent or blank.
pub fn load_dataset(path: &Path) -> Result<Option<DataSet>> {
    let Some(text) = read_text(path)? else { return Ok(None) };
    let mut rows = csv::parse_rows(&text, SEP);
    if rows.is_empty() {
        return Ok(None);
    }
    let headers = rows.remove(0);
    Ok(Some(DataSet { headers, rows }))
}

fn id_column(header: &Record, id_col: &str, path: &Path) -> Result<usize> {
    header
        .cells
        .iter()
        .position(|h| h == id_col)
        .ok_or_else(|| Error::malformed(path.display(), format!("missing `{id_col}` column")))
}

/// Where an interrupted append starts, if the file ends in one.
///
/// A torn tail is a final row without its line break. Only the torn line is
/// cut unless its id cell is provably whole (another cell follows it); then
/// the complete rows of that same game directly above it are cut too: they
/// are the earlier part of the same batch. Rows of any other game are never
/// touched.
struct TornTail {
    cut_at: usize,
    game: Option<GameId>,
}

fn find_torn_tail(records: &[Record], id_ix: usize) -> Option<TornTail> {
    let last = records.last()?;
    if last.terminated || records.len() < 2 {
        return None;
    }
    let game = (last.cells.len() > id_ix + 1).then(|| GameId::new(&last.cells[id_ix]));

    let mut cut_at = last.start;
    if let Some(g) = &game {
        // records[0] is the header; data rows sit between it and the torn line
        for rec in records[1..records.len() - 1].iter().rev() {
            if rec.cells.get(id_ix).map(|c| GameId::new(c)).as_ref() != Some(g) {
                break;
            }
            cut_at = rec.start;
        }
    }
    Some(TornTail { cut_at, game })
}

/// A header line cut off before its line break is ours to discard only if it
/// could be the start of a header this crate writes: it already names
/// `id_col`, or it stops inside (or right before) that cell.
fn is_torn_header(header: &Record, id_col: &str) -> bool {
    !header.terminated
        && (header.cells.iter().any(|c| c == id_col)
            || header.cells.last().is_some_and(|c| id_col.starts_with(c.as_str())))
}

/// Canonical ids of every game that already has rows in the dataset.
///
/// Absent or blank file → empty set (first run). Existing file without the
/// `id_col` header → [`Error::MalformedDataset`]. A torn trailing append is
/// not counted as complete.
pub fn load_completed_ids(path: &Path, id_col: &str) -> Result<HashSet<GameId>> {
    let Some(text) = read_text(path)? else { return Ok(HashSet::new()) };
    let records = csv::parse_records(&text, SEP);
    let Some(header) = records.first() else { return Ok(HashSet::new()) };
    if is_torn_header(header, id_col) {
        // Nothing but a partial header from an interrupted first write.
        return Ok(HashSet::new());
    }
    let ix = id_column(header, id_col, path)?;

    let torn = find_torn_tail(&records, ix);
    let end = match &torn {
        Some(t) => records.iter().position(|r| r.start >= t.cut_at).unwrap_or(records.len()),
        None => records.len(),
    };

    let mut done = HashSet::new();
    for rec in &records[1..end.max(1)] {
        match rec.cells.get(ix) {
            Some(cell) => { done.insert(GameId::new(cell)); }
            None => logw!("{}: short row at byte {} has no `{id_col}` cell", path.display(), rec.start),
        }
    }
    Ok(done)
}

/// Truncate an interrupted append off the end of the dataset.
/// Returns the game whose rows were removed, if one could be told.
pub fn repair_torn_tail(path: &Path, id_col: &str) -> Result<Option<GameId>> {
    let Some(text) = read_text(path)? else { return Ok(None) };
    let records = csv::parse_records(&text, SEP);
    let Some(header) = records.first() else { return Ok(None) };

    let (cut_at, game) = if is_torn_header(header, id_col) {
        (0, None)
    } else {
        let ix = id_column(header, id_col, path)?;
        match find_torn_tail(&records, ix) {
            Some(t) => (t.cut_at, t.game),
            None => return Ok(None),
        }
    };

    let file = OpenOptions::new().write(true).open(path)?;
    file.set_len(cut_at as u64)?;
    file.sync_data()?;
    match &game {
        Some(g) => logw!("{}: dropped interrupted rows for {g} (truncated to {cut_at} bytes)", path.display()),
        None => logw!("{}: dropped interrupted tail (truncated to {cut_at} bytes)", path.display()),
    }
    Ok(game)
}
