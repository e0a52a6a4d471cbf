// src/lib.rs

#[doc(hidden)]
pub use tracing as __tracing;

#[macro_use]
pub mod log;

pub mod config;
pub mod core;
pub mod error;
pub mod specs;

pub mod collect;
pub mod csv;
pub mod file;
pub mod index;
pub mod progress;
pub mod retry;
pub mod runner;
pub mod source;
pub mod store;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, ErrorKind, Result, SourceError};
