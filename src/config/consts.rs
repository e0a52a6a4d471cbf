// src/config/consts.rs

// Net config
pub const HOST: &str = "stats.nba.com";
pub const PREFIX: &str = "/stats/";
pub const HTTP_TIMEOUT_SECS: u64 = 30;

// Season selection
pub const DEFAULT_SEASON: &str = "2024-25";
pub const DEFAULT_SEASON_TYPE: &str = "Regular Season";

// Output
pub const DEFAULT_OUT_DIR: &str = "data/raw";
pub const GAME_LOG_STEM: &str = "league_gamelog";
pub const PLAYER_BOX_STEM: &str = "player_boxscores";
pub const TEAM_BOX_STEM: &str = "team_boxscores";
pub const LOG_FILE: &str = "debug.log";
pub const SEP: char = ',';

// Identifiers. NBA game ids are always 10 digits.
pub const GAME_ID_LEN: usize = 10;
pub const INDEX_ID_COL: &str = "GAME_ID";
pub const INDEX_DATE_COL: &str = "GAME_DATE";
pub const DETAIL_ID_COL: &str = "game_id";

// Pacing between games, seconds
pub const DELAY_MIN_SECS: f64 = 1.5;
pub const DELAY_MAX_SECS: f64 = 3.0;

// Retry
pub const MAX_ATTEMPTS: u32 = 5;
pub const BACKOFF_BASE_SECS: f64 = 2.0;
pub const BACKOFF_STEP_SECS: f64 = 2.0;
pub const BACKOFF_JITTER_SECS: f64 = 1.0;
