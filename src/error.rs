// src/error.rs
use std::io;

use thiserror::Error;

/// Any failure coming back from the remote stats source.
/// Transient and permanent failures are not told apart; all of them are retried.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("http: {0}")]
    Http(#[from] reqwest::Error),
    #[error("http status {status} for {url}")]
    Status { status: u16, url: String },
    #[error("unexpected response: {0}")]
    Decode(String),
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for SourceError {
    fn from(e: serde_json::Error) -> Self {
        SourceError::Decode(e.to_string())
    }
}

/// Discriminant of [`Error`], for callers that pick a recovery policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    TransientSource,
    ExhaustedRetries,
    MalformedDataset,
    Io,
    Config,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Source(#[from] SourceError),

    #[error("{label}: gave up after {attempts} attempts: {last}")]
    ExhaustedRetries {
        label: String,
        attempts: u32,
        #[source]
        last: SourceError,
    },

    #[error("malformed dataset {origin}: {reason}")]
    MalformedDataset { origin: String, reason: String },

    #[error(transparent)]
    Io(#[from] io::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Source(_) => ErrorKind::TransientSource,
            Error::ExhaustedRetries { .. } => ErrorKind::ExhaustedRetries,
            Error::MalformedDataset { .. } => ErrorKind::MalformedDataset,
            Error::Io(_) => ErrorKind::Io,
            Error::Config(_) => ErrorKind::Config,
        }
    }

    pub(crate) fn malformed(origin: impl std::fmt::Display, reason: impl Into<String>) -> Self {
        Error::MalformedDataset { origin: origin.to_string(), reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
