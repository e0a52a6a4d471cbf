// src/core/game_id.rs
use std::fmt;

use crate::config::consts::GAME_ID_LEN;

/// Canonical game identifier.
///
/// Always left-zero-padded to [`GAME_ID_LEN`] characters so that ids read back
/// from disk (where a spreadsheet tool may have eaten the leading zeros) compare
/// equal to ids coming from the API. Values already at or beyond the width are
/// kept as-is, apart from surrounding whitespace.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GameId(String);

impl GameId {
    pub fn new(raw: &str) -> Self {
        let raw = raw.trim();
        let pad = GAME_ID_LEN.saturating_sub(raw.chars().count());
        let mut s = String::with_capacity(raw.len() + pad);
        s.extend(std::iter::repeat_n('0', pad));
        s.push_str(raw);
        GameId(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for GameId {
    fn from(s: &str) -> Self {
        GameId::new(s)
    }
}

impl From<&String> for GameId {
    fn from(s: &String) -> Self {
        GameId::new(s)
    }
}

impl AsRef<str> for GameId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
