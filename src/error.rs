//! Error types for growbit.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid habit: {0}")]
    InvalidHabit(String),

    #[error("invalid profile: {0}")]
    InvalidProfile(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, Error>;
