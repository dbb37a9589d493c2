use crate::tree::TreeError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error("cannot read settings file {}: {source}", path.display())]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid settings file {}: {source}", path.display())]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid option: {0}")]
    InvalidOption(String),
}

pub type Result<T> = std::result::Result<T, Error>;
