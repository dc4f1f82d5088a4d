use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error in {path:?} line {line}: {reason}")]
    ConfigLine {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("Invalid idle duration '{0}'")]
    InvalidDuration(String),

    #[error("Process spawn failed: {0}")]
    SpawnFailed(String),

    #[error("Signal delivery failed for pid {pid}: {reason}")]
    Signal { pid: u32, reason: String },

    #[error("Idle source error: {0}")]
    IdleSource(String),

    #[error("Failed to reap child {pid}: {reason}")]
    Reap { pid: u32, reason: String },

    #[cfg(unix)]
    #[error("Unix error: {0}")]
    Unix(#[from] nix::errno::Errno),

    #[error("Other error: {0}")]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
