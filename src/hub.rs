//! The logger handle: a global `log` backend that fans every record out to the
//! handlers attached to it.
//!
//! Handlers can be attached at any time after installation, which is how the log
//! panel hooks in once the UI exists.

use std::sync::{Arc, OnceLock, RwLock};

use log::{LevelFilter, Log, Metadata, Record};

use crate::error::Result;
use crate::record::{LogRecord, Severity};

/// A destination for records.
pub trait Handler: Send + Sync {
    /// Handle one record. Must not panic and must not block on the UI thread.
    fn emit(&self, record: &LogRecord);

    /// Records below this are skipped by the hub.
    fn level(&self) -> Severity;

    fn flush(&self) {}
}

static GLOBAL_HUB: OnceLock<&'static LogHub> = OnceLock::new();

pub struct LogHub {
    handlers: RwLock<Vec<Arc<dyn Handler>>>,
    console: Option<env_logger::Logger>,
}

impl Default for LogHub {
    fn default() -> Self {
        Self::new()
    }
}

impl LogHub {
    /// A hub with no handlers and no console echo.
    pub fn new() -> Self {
        Self {
            handlers: RwLock::new(Vec::new()),
            console: None,
        }
    }

    /// Also echo records to stderr, filtered by `RUST_LOG`.
    pub fn with_console(mut self) -> Self {
        self.console = Some(env_logger::Builder::from_default_env().build());
        self
    }

    /// Installs the hub as the process-wide `log` backend and returns the handle
    /// handlers are attached to.
    pub fn install(self, max_level: LevelFilter) -> Result<&'static LogHub> {
        let hub: &'static LogHub = Box::leak(Box::new(self));
        log::set_logger(hub)?;
        log::set_max_level(max_level);
        let _ = GLOBAL_HUB.set(hub);
        Ok(hub)
    }

    /// The installed hub, if any.
    pub fn global() -> Option<&'static LogHub> {
        GLOBAL_HUB.get().copied()
    }

    pub fn add_handler(&self, handler: Arc<dyn Handler>) {
        match self.handlers.write() {
            Ok(mut handlers) => handlers.push(handler),
            Err(poisoned) => poisoned.into_inner().push(handler),
        }
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.read().map(|h| h.len()).unwrap_or(0)
    }

    /// Echoes `record` to stderr like facade records, then dispatches it. For
    /// records built outside the `log` facade, such as CRITICAL ones.
    pub fn emit(&self, record: &LogRecord) {
        self.echo(
            &Record::builder()
                .level(record.severity.to_log_level())
                .target(&record.logger_name)
                .args(format_args!("{}", record.message))
                .build(),
        );
        self.dispatch(record);
    }

    fn echo(&self, record: &Record) {
        if let Some(console) = &self.console {
            if console.matches(record) {
                console.log(record);
            }
        }
    }

    /// Sends a record to every handler whose level admits it.
    pub fn dispatch(&self, record: &LogRecord) {
        let Ok(handlers) = self.handlers.read() else {
            return;
        };
        for handler in handlers.iter() {
            if record.severity >= handler.level() {
                handler.emit(record);
            }
        }
    }
}

impl Log for LogHub {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.echo(record);
        self.dispatch(&LogRecord::from(record));
    }

    fn flush(&self) {
        if let Some(console) = &self.console {
            console.flush();
        }
        if let Ok(handlers) = self.handlers.read() {
            for handler in handlers.iter() {
                handler.flush();
            }
        }
    }
}

/// Emits a record with an explicit severity through the installed hub.
/// Does nothing if no hub is installed.
pub fn emit_global(severity: Severity, logger_name: &str, message: String) {
    if let Some(hub) = LogHub::global() {
        hub.emit(&LogRecord::new(severity, logger_name, message));
    }
}

/// Logs at CRITICAL, a level the `log` facade does not have. The stderr echo
/// shows it as `ERROR`.
#[macro_export]
macro_rules! critical {
    ($($arg:tt)*) => {{
        $crate::hub::emit_global(
            $crate::record::Severity::CRITICAL,
            module_path!(),
            format!($($arg)*),
        );
    }};
}
