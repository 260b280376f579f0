use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced by the log dock. Logging calls themselves never return these;
/// they only come out of construction and settings persistence.
#[derive(Debug, Error)]
pub enum LogDockError {
    #[error("could not open log file {path}: {source}")]
    FileSink {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not read settings file {path}: {source}")]
    SettingsRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write settings file {path}: {source}")]
    SettingsWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("settings file {path} is not valid TOML: {source}")]
    SettingsParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("could not serialize setting `{key}`: {source}")]
    SettingsSerialize {
        key: String,
        #[source]
        source: toml::ser::Error,
    },

    #[error("a global logger is already installed")]
    LoggerAlreadySet(#[from] log::SetLoggerError),
}

pub type Result<T> = std::result::Result<T, LogDockError>;
