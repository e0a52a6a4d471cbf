// src/progress.rs
use crate::core::GameId;
use crate::error::Error;

/// Lightweight progress reporting used by the pull passes.
/// Frontends (the CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start of a pass with the number of games left to fetch.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// A game's fetch is about to start.
    fn item_start(&mut self, _id: &GameId) {}

    /// A game's rows were appended (`rows` may be 0 if the source had none).
    fn item_done(&mut self, _id: &GameId, _rows: usize) {}

    /// A game was given up on for this run; it stays missing.
    fn item_failed(&mut self, _id: &GameId, _err: &Error) {}

    /// Called at the end of a pass.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
