use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Configuration(String),
    /// Any failure while talking to the language model backend.
    #[error("{0}")]
    Backend(String),
    #[error("invalid input: {0}")]
    Validation(String),
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub type AppResult<T> = Result<T, AppError>;
