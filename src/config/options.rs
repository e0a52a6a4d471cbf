// src/config/options.rs
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::retry::RetryPolicy;
use super::consts::*;

/// Everything a pull run needs. Built once, passed down; nothing global.
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    pub season: String,
    pub season_type: String,
    /// File-name label; `None` derives it from the season.
    pub season_label: Option<String>,
    pub out_dir: PathBuf,
    pub delay: DelayRange,
    pub retry: RetryPolicy,
    /// Detail passes to run, in order.
    pub kinds: Vec<DetailKind>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            season: DEFAULT_SEASON.to_string(),
            season_type: DEFAULT_SEASON_TYPE.to_string(),
            season_label: None,
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            delay: DelayRange::default(),
            retry: RetryPolicy::default(),
            kinds: vec![DetailKind::Players, DetailKind::Teams],
        }
    }
}

impl Options {
    pub fn validate(&self) -> Result<()> {
        if self.season.trim().is_empty() {
            return Err(Error::Config("season must not be empty".into()));
        }
        if self.season_type.trim().is_empty() {
            return Err(Error::Config("season type must not be empty".into()));
        }
        if self.delay.min > self.delay.max {
            return Err(Error::Config(format!(
                "delay range inverted: {:?} > {:?}",
                self.delay.min, self.delay.max
            )));
        }
        if self.retry.max_attempts == 0 {
            return Err(Error::Config("max attempts must be at least 1".into()));
        }
        Ok(())
    }

    /// "2024-25" → "2024_25" unless overridden.
    pub fn label(&self) -> String {
        match &self.season_label {
            Some(l) if !l.trim().is_empty() => l.trim().to_string(),
            _ => self.season.trim().replace(['-', '/', ' '], "_"),
        }
    }

    pub fn game_log_path(&self) -> PathBuf {
        self.out_dir.join(format!("{}_{}.csv", GAME_LOG_STEM, self.label()))
    }

    pub fn detail_path(&self, kind: DetailKind) -> PathBuf {
        self.out_dir.join(format!("{}_{}.csv", kind.stem(), self.label()))
    }

    pub fn log_path(&self) -> PathBuf {
        self.out_dir.join(LOG_FILE)
    }
}

/// Uniform pause between consecutive games.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DelayRange {
    pub min: Duration,
    pub max: Duration,
}

impl Default for DelayRange {
    fn default() -> Self {
        Self {
            min: Duration::from_secs_f64(DELAY_MIN_SECS),
            max: Duration::from_secs_f64(DELAY_MAX_SECS),
        }
    }
}

impl DelayRange {
    pub const ZERO: DelayRange = DelayRange { min: Duration::ZERO, max: Duration::ZERO };

    pub fn sample(&self) -> Duration {
        use rand::Rng;
        if self.max <= self.min {
            return self.min;
        }
        let secs = rand::rng().random_range(self.min.as_secs_f64()..=self.max.as_secs_f64());
        Duration::from_secs_f64(secs)
    }
}

/// Per-game record kinds pulled out of one box score.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DetailKind {
    Players,
    Teams,
}

impl DetailKind {
    pub const ALL: [DetailKind; 2] = [DetailKind::Players, DetailKind::Teams];

    pub fn stem(self) -> &'static str {
        match self {
            DetailKind::Players => PLAYER_BOX_STEM,
            DetailKind::Teams => TEAM_BOX_STEM,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            DetailKind::Players => "Player BS",
            DetailKind::Teams => "Team BS",
        }
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            DetailKind::Players => "players",
            DetailKind::Teams => "teams",
        })
    }
}

impl FromStr for DetailKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "players" | "player" => Ok(DetailKind::Players),
            "teams" | "team" => Ok(DetailKind::Teams),
            other => Err(Error::Config(format!("unknown record kind: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn label_from_season() {
        let opts = Options::default();
        assert_eq!(opts.label(), "2024_25");
        assert!(opts.game_log_path().ends_with("league_gamelog_2024_25.csv"));
        assert!(opts.detail_path(DetailKind::Teams).ends_with("team_boxscores_2024_25.csv"));
    }

    #[test]
    fn explicit_label_wins() {
        let opts = Options { season_label: Some("2024_25_fixed".into()), ..Options::default() };
        assert!(opts.detail_path(DetailKind::Players).ends_with("player_boxscores_2024_25_fixed.csv"));
    }

    #[test]
    fn inverted_delay_rejected() {
        let opts = Options {
            delay: DelayRange { min: Duration::from_secs(3), max: Duration::from_secs(1) },
            ..Options::default()
        };
        assert!(matches!(opts.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn delay_sample_within_range() {
        let d = DelayRange::default();
        for _ in 0..100 {
            let s = d.sample();
            assert!(s >= d.min && s <= d.max);
        }
        assert_eq!(DelayRange::ZERO.sample(), Duration::ZERO);
    }
}
