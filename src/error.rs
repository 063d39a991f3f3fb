use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("root directory not found: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("permission denied: {}", .0.display())]
    PermissionDenied(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("invalid date: {0:?}")]
    InvalidDate(String),

    #[error("invalid window: {0}")]
    InvalidWindow(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// A problem with a single file. Never aborts a scan.
#[derive(Error, Debug)]
pub enum FileError {
    #[error("{0}")]
    Stat(std::io::Error),

    #[error("{0}")]
    AudioParse(#[from] hound::Error),

    #[error("{0}")]
    Walk(#[from] walkdir::Error),
}

impl FileError {
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Stat(_) => "stat",
            Self::AudioParse(_) => "audio",
            Self::Walk(_) => "walk",
        }
    }
}
