// src/source.rs
use reqwest::blocking::Client;

use crate::config::DetailKind;
use crate::core::{GameId, net};
use crate::error::SourceError;
use crate::specs::{self, BoxScore};
use crate::store::DataSet;

/// The remote side of a pull. Any call may fail; every failure is retried
/// the same way, so implementations need not classify their errors.
pub trait StatsSource {
    /// One bulk call: the season's game log (at least GAME_ID and GAME_DATE).
    fn fetch_game_log(&self, season: &str, season_type: &str) -> Result<DataSet, SourceError>;

    /// Detail tables for one game.
    fn fetch_box_score(&self, game: &GameId) -> Result<BoxScore, SourceError>;

    /// Just the table for one record kind.
    fn fetch_detail(&self, kind: DetailKind, game: &GameId) -> Result<DataSet, SourceError> {
        let bs = self.fetch_box_score(game)?;
        Ok(match kind {
            DetailKind::Players => bs.players,
            DetailKind::Teams => bs.teams,
        })
    }
}

/// The live stats.nba.com API.
pub struct HttpSource {
    client: Client,
}

impl HttpSource {
    pub fn new() -> Result<Self, SourceError> {
        Ok(Self { client: net::client()? })
    }
}

impl StatsSource for HttpSource {
    fn fetch_game_log(&self, season: &str, season_type: &str) -> Result<DataSet, SourceError> {
        specs::game_log::fetch(&self.client, season, season_type)
    }

    fn fetch_box_score(&self, game: &GameId) -> Result<BoxScore, SourceError> {
        specs::box_score::fetch(&self.client, game)
    }
}
