use std::io;

use thiserror::Error;

use crate::BoxedError;

#[derive(Error, Debug)]
pub enum FlagError {
    #[error("bad flag syntax: {0}")]
    BadSyntax(String),
    #[error("flag provided but not defined: -{0}")]
    Undefined(String),
    #[error("flag needs an argument: -{0}")]
    MissingValue(String),
    #[error("{0}")]
    InvalidValue(String),
    /// `-h` or `-help` was given without being defined. Only the usage screen is shown for this.
    #[error("help requested")]
    HelpRequested,
}

impl FlagError {
    pub(crate) fn from_clap(err: clap::Error) -> Self {
        let rendered = err.to_string();
        let message = rendered
            .lines()
            .next()
            .unwrap_or_default()
            .trim_start_matches("error: ")
            .to_owned();
        FlagError::InvalidValue(message)
    }
}

/// Returned from a command's action to abort the invocation.
#[derive(Error, Debug)]
pub enum ActionError {
    /// The command's arguments were invalid. The command's usage screen is shown and the
    /// program exits with status 2.
    #[error("invalid usage")]
    Usage,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Failed(BoxedError),
}

impl ActionError {
    pub fn failed(err: impl Into<BoxedError>) -> Self {
        ActionError::Failed(err.into())
    }
}
