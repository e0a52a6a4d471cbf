// src/index.rs
use std::collections::HashSet;

use chrono::NaiveDate;

use crate::config::consts::{INDEX_DATE_COL, INDEX_ID_COL};
use crate::core::GameId;
use crate::error::{Error, Result};
use crate::store::DataSet;

/// One game of the season, as far as scheduling the detail passes goes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndexEntry {
    pub id: GameId,
    pub date: NaiveDate,
}

/// Accepts `2024-10-22`, `2024-10-22T00:00:00`, `2024-10-22 00:00:00`
/// and `OCT 22, 2024`.
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = s.split(['T', ' ']).next().unwrap_or(s);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%b %d, %Y"))
        .ok()
}

/// Shape the raw game log for storage: canonical GAME_ID plus the season
/// columns the API leaves out.
pub fn prepare(ds: &mut DataSet, season: &str, season_type: &str) -> Result<()> {
    if !ds.map_column(INDEX_ID_COL, |raw| GameId::new(raw).to_string()) {
        return Err(Error::malformed("game log", format!("missing `{INDEX_ID_COL}` column")));
    }
    ds.set_column("SEASON", season);
    ds.set_column("SEASON_TYPE", season_type);
    Ok(())
}

/// Distinct games ordered by date ascending.
///
/// The first row seen for an id wins; games on the same date keep their
/// input order. `origin` only labels errors.
pub fn games(ds: &DataSet, origin: &str) -> Result<Vec<IndexEntry>> {
    let id_ix = ds
        .column(INDEX_ID_COL)
        .ok_or_else(|| Error::malformed(origin, format!("missing `{INDEX_ID_COL}` column")))?;
    let date_ix = ds
        .column(INDEX_DATE_COL)
        .ok_or_else(|| Error::malformed(origin, format!("missing `{INDEX_DATE_COL}` column")))?;

    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for (n, row) in ds.rows.iter().enumerate() {
        let (Some(raw_id), Some(raw_date)) = (row.get(id_ix), row.get(date_ix)) else {
            return Err(Error::malformed(origin, format!("row {} is short", n + 1)));
        };
        let id = GameId::new(raw_id);
        if !seen.insert(id.clone()) {
            continue;
        }
        let date = parse_date(raw_date).ok_or_else(|| {
            Error::malformed(origin, format!("row {}: bad {INDEX_DATE_COL} `{raw_date}`", n + 1))
        })?;
        out.push(IndexEntry { id, date });
    }
    out.sort_by_key(|e| e.date);
    Ok(out)
}

pub fn ids(entries: &[IndexEntry]) -> Vec<GameId> {
    entries.iter().map(|e| e.id.clone()).collect()
}
