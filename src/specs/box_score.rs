// src/specs/box_score.rs
use reqwest::blocking::Client;

use crate::core::{GameId, net};
use crate::error::SourceError;
use crate::store::DataSet;

use super::result_sets;

const ENDPOINT: &str = "boxscoretraditionalv2";
const PLAYER_SET: &str = "PlayerStats";
const TEAM_SET: &str = "TeamStats";

/// Both tables of one game's traditional box score.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BoxScore {
    /// One row per player who appeared.
    pub players: DataSet,
    /// One row per team (starters/bench split not included).
    pub teams: DataSet,
}

pub fn fetch(client: &Client, game: &GameId) -> Result<BoxScore, SourceError> {
    let query = [
        ("GameID", game.as_str()),
        ("StartPeriod", "0"),
        ("EndPeriod", "10"),
        ("StartRange", "0"),
        ("EndRange", "28800"),
        ("RangeType", "0"),
    ];
    let body = net::http_get(client, ENDPOINT, &query)?;
    parse_doc(&body)
}

/// Split out for unit tests.
pub fn parse_doc(body: &str) -> Result<BoxScore, SourceError> {
    let mut sets = result_sets::decode(body, &[PLAYER_SET, TEAM_SET])?.into_iter();
    match (sets.next(), sets.next()) {
        (Some(players), Some(teams)) => Ok(BoxScore { players, teams }),
        _ => Err(SourceError::Decode(format!("{ENDPOINT}: expected player and team tables"))),
    }
}
