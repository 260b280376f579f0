use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Mutex,
};

use log::warn;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::error::{LogDockError, Result};

const APP_DIR_NAME: &str = "logdock";
const SETTINGS_FILE_NAME: &str = "settings.toml";

/// A typed group of settings stored under one key.
pub trait Section: Serialize + DeserializeOwned + Default {
    const KEY: &'static str;

    /// Brings loaded values back into range.
    fn sanitize(self) -> Self {
        self
    }
}

// ---------- Logger settings ----------
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SinkConfig {
    pub max_log_lines: usize,
    pub log_path: PathBuf,
    pub enable_file_logging: bool,
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            max_log_lines: 1000,
            log_path: default_log_path(),
            enable_file_logging: false,
        }
    }
}

impl Section for SinkConfig {
    const KEY: &'static str = "logger";

    fn sanitize(mut self) -> Self {
        self.max_log_lines = self.max_log_lines.max(1);
        self
    }
}

/// The user's desktop, or home, or the working directory.
pub fn default_log_path() -> PathBuf {
    dirs::desktop_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Key-value settings persisted as a TOML table.
///
/// Without a backing file the store lives in memory only.
pub struct ConfigStore {
    path: Option<PathBuf>,
    table: Mutex<toml::Table>,
}

impl ConfigStore {
    /// Loads `path` if it exists; a missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = match fs::read_to_string(&path) {
            Ok(text) => toml::from_str::<toml::Table>(&text).map_err(|source| {
                LogDockError::SettingsParse {
                    path: path.clone(),
                    source,
                }
            })?,
            Err(e) if e.kind() == ErrorKind::NotFound => toml::Table::new(),
            Err(source) => return Err(LogDockError::SettingsRead { path, source }),
        };

        Ok(Self {
            path: Some(path),
            table: Mutex::new(table),
        })
    }

    /// `<config dir>/logdock/settings.toml`, or an in-memory store when the
    /// platform has no config directory.
    pub fn open_default() -> Result<Self> {
        match dirs::config_dir() {
            Some(dir) => Self::open(dir.join(APP_DIR_NAME).join(SETTINGS_FILE_NAME)),
            None => {
                warn!("no config directory on this platform, settings will not persist");
                Ok(Self::in_memory())
            }
        }
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            table: Mutex::new(toml::Table::new()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// The value under `key`, if present and of the right shape.
    pub fn value<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let raw = self.lock().get(key).cloned()?;
        match raw.try_into::<T>() {
            Ok(v) => Some(v),
            Err(e) => {
                warn!("ignoring setting `{key}`: {e}");
                None
            }
        }
    }

    pub fn set_value<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let value = toml::Value::try_from(value).map_err(|source| {
            LogDockError::SettingsSerialize {
                key: key.to_owned(),
                source,
            }
        })?;

        let mut table = self.lock();
        table.insert(key.to_owned(), value);
        self.persist(&table)
    }

    /// Stored section, defaults for whatever is missing.
    pub fn load<S: Section>(&self) -> S {
        self.value::<S>(S::KEY).unwrap_or_default().sanitize()
    }

    pub fn save<S: Section>(&self, section: &S) -> Result<()> {
        self.set_value(S::KEY, section)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, toml::Table> {
        match self.table.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn persist(&self, table: &toml::Table) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let text = toml::to_string_pretty(table).map_err(|source| {
            LogDockError::SettingsSerialize {
                key: String::from("<root>"),
                source,
            }
        })?;

        let write = || -> std::io::Result<()> {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, text)
        };
        write().map_err(|source| LogDockError::SettingsWrite {
            path: path.clone(),
            source,
        })
    }
}
