// src/core/mod.rs

pub mod game_id;
pub mod net;

pub use game_id::GameId;
