//! Size-based rotating log file.
//!
//! The active file is `name`; backups are `name.1` (newest) through
//! `name.{backup_count}` (oldest). Rollover happens before a line that would bring
//! the active file to `max_bytes` or beyond.

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
    sync::{
        Mutex,
        atomic::{AtomicU32, Ordering},
    },
};

use chrono::{DateTime, Local};

use crate::error::{LogDockError, Result};
use crate::format::{LineFormatter, PlainFormatter};
use crate::hub::Handler;
use crate::record::{LogRecord, Severity};

pub const SESSION_MAX_BYTES: u64 = 5 * 1024 * 1024;
pub const SESSION_BACKUP_COUNT: usize = 30;
pub const SESSION_FILE_STEM: &str = "python_log";

/// `{stem}_{YYYYMMDD-HHMMSS}.log`
pub fn session_file_name(now: DateTime<Local>) -> String {
    format!("{SESSION_FILE_STEM}_{}.log", now.format("%Y%m%d-%H%M%S"))
}

struct ActiveFile {
    file: File,
    size: u64,
}

pub struct RotatingFileSink {
    path: PathBuf,
    max_bytes: u64,
    backup_count: usize,
    formatter: Box<dyn LineFormatter>,
    level: AtomicU32,
    active: Mutex<Option<ActiveFile>>,
}

impl RotatingFileSink {
    /// Opens `path` for appending, creating it and its parent directories.
    pub fn create(path: impl Into<PathBuf>, max_bytes: u64, backup_count: usize) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| LogDockError::FileSink {
                path: path.clone(),
                source,
            })?;
        }
        let active = open_append(&path).map_err(|source| LogDockError::FileSink {
            path: path.clone(),
            source,
        })?;

        Ok(Self {
            path,
            max_bytes,
            backup_count,
            formatter: Box::new(PlainFormatter::default()),
            level: AtomicU32::new(Severity::NOTSET.0),
            active: Mutex::new(Some(active)),
        })
    }

    /// One file per session under `dir`, rotated at 5 MiB with 30 backups.
    pub fn for_session(dir: &Path, now: DateTime<Local>) -> Result<Self> {
        Self::create(
            dir.join(session_file_name(now)),
            SESSION_MAX_BYTES,
            SESSION_BACKUP_COUNT,
        )
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_formatter(&mut self, formatter: Box<dyn LineFormatter>) {
        self.formatter = formatter;
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.0, Ordering::Relaxed);
    }

    fn write_line(&self, active: &mut Option<ActiveFile>, line: &str) -> io::Result<()> {
        let len = line.len() as u64 + 1;
        let needs_rollover = match active {
            Some(f) => self.max_bytes > 0 && f.size > 0 && f.size + len >= self.max_bytes,
            None => false,
        };
        if needs_rollover || active.is_none() {
            // Close before renaming; some platforms refuse to move an open file.
            *active = None;
            if needs_rollover {
                self.rollover()?;
            }
            *active = Some(open_append(&self.path)?);
        }

        let Some(f) = active.as_mut() else {
            return Ok(());
        };
        writeln!(f.file, "{line}")?;
        f.size += len;
        Ok(())
    }

    fn rollover(&self) -> io::Result<()> {
        if self.backup_count == 0 {
            File::create(&self.path)?;
            return Ok(());
        }

        let oldest = backup_path(&self.path, self.backup_count);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for n in (1..self.backup_count).rev() {
            let from = backup_path(&self.path, n);
            if from.exists() {
                fs::rename(&from, backup_path(&self.path, n + 1))?;
            }
        }
        fs::rename(&self.path, backup_path(&self.path, 1))
    }
}

impl Handler for RotatingFileSink {
    fn emit(&self, record: &LogRecord) {
        let line = self.formatter.format(record);
        let mut active = match self.active.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Err(e) = self.write_line(&mut active, &line) {
            // Reopened on the next record.
            *active = None;
            eprintln!("log file {}: {e}", self.path.display());
        }
    }

    fn level(&self) -> Severity {
        Severity(self.level.load(Ordering::Relaxed))
    }

    fn flush(&self) {
        if let Ok(mut active) = self.active.lock() {
            if let Some(f) = active.as_mut() {
                let _ = f.file.flush();
            }
        }
    }
}

fn open_append(path: &Path) -> io::Result<ActiveFile> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let size = file.metadata()?.len();
    Ok(ActiveFile { file, size })
}

fn backup_path(path: &Path, n: usize) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(format!(".{n}"));
    PathBuf::from(name)
}
