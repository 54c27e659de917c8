use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrainerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Secure random source unavailable: {0}")]
    RngUnavailable(String),

    #[error("Failed to persist knowledge base to {path:?}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No active round to attach feedback to")]
    NoActiveRound,

    #[error("Unknown feedback level: {0}")]
    UnknownFeedback(String),
}

pub type Result<T> = std::result::Result<T, TrainerError>;
