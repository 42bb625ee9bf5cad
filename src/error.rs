//! Error taxonomy for zet operations.
//!
//! Every library function returns `Result<T, ZetError>`. The binary wraps
//! these in `anyhow` for context and uses [`ZetError::is_user_error`] to pick
//! the exit code. Messages never repeat their source; print the chain
//! (`{:#}` on an `anyhow::Error`) to see the cause.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while managing the zettelkasten.
#[derive(Debug, Error)]
pub enum ZetError {
    /// Bad arguments, caught before any side effect.
    #[error("{0}")]
    Usage(String),

    /// A note reference that is neither `last` nor a valid identifier.
    #[error("invalid entry, or zet not found: {0:?}")]
    InvalidReference(String),

    /// The repository is empty or a note document is missing.
    #[error("not found: {0}")]
    NotFound(String),

    /// A document already exists where a new note was about to be written.
    #[error("zet already exists at {}", .0.display())]
    NoteExists(PathBuf),

    /// Filesystem create/read/write failure.
    #[error("I/O error at {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A required environment variable is not set.
    #[error("environment variable {0} is not set")]
    MissingConfig(&'static str),

    /// An external command was requested without a program name.
    #[error("missing name of executable")]
    MissingExecutable,

    /// The program could not be found on the search path.
    #[error("executable not found: {0}")]
    ExecutableNotFound(String),

    /// The program was found but could not be started.
    #[error("failed to start {program}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    /// The program ran and exited unsuccessfully.
    #[error("{program} exited with {}", describe_exit(.code))]
    CommandFailed { program: String, code: Option<i32> },

    /// No git remote is configured and no override is set.
    #[error("no git remote found")]
    NoRemote,

    #[error("failed to pull from git remote")]
    PullFailed(#[source] Box<ZetError>),

    #[error("failed to add files to git")]
    StageFailed(#[source] Box<ZetError>),

    #[error("failed to commit files to git")]
    CommitFailed(#[source] Box<ZetError>),

    #[error("failed to push files to git")]
    PushFailed(#[source] Box<ZetError>),

    /// Terminal output failed while rendering markdown.
    #[error("failed to render markdown")]
    Render(#[source] io::Error),

    /// Timestamp formatting failed.
    #[error("failed to format timestamp")]
    Time(#[from] time::error::Format),

    /// JSON serialization of a listing failed.
    #[error("serialization error")]
    Json(#[from] serde_json::Error),
}

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(c) => format!("status {c}"),
        None => "a signal".to_string(),
    }
}

impl ZetError {
    /// Builds an [`ZetError::Io`] for the given path.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Returns true for errors caused by user input rather than the system.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Self::Usage(_) | Self::InvalidReference(_) | Self::NotFound(_) | Self::NoteExists(_)
        )
    }
}
