use std::fmt;

use chrono::{DateTime, Local};

/// Ordinal severity of a record.
///
/// The named levels sit on a numeric scale with gaps between them, so a record can
/// carry any level in between (or below `DEBUG`) and still be ordered correctly.
/// Such levels are "unknown" to the formatter and rendered with a fallback tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(pub u32);

impl Severity {
    /// Lowest possible level; a handler set to it accepts every record.
    pub const NOTSET: Severity = Severity(0);
    pub const TRACE: Severity = Severity(5);
    pub const DEBUG: Severity = Severity(10);
    pub const INFO: Severity = Severity(20);
    pub const WARNING: Severity = Severity(30);
    pub const ERROR: Severity = Severity(40);
    pub const CRITICAL: Severity = Severity(50);

    /// Upper-case level name, or `Level N` for levels without a name.
    pub fn name(self) -> String {
        match self {
            Severity::DEBUG => "DEBUG".to_owned(),
            Severity::INFO => "INFO".to_owned(),
            Severity::WARNING => "WARNING".to_owned(),
            Severity::ERROR => "ERROR".to_owned(),
            Severity::CRITICAL => "CRITICAL".to_owned(),
            Severity(n) => format!("Level {n}"),
        }
    }

    /// Nearest `log` facade level, for the stderr echo. Anything from ERROR up is
    /// `Error`, anything below DEBUG is `Trace`.
    pub fn to_log_level(self) -> log::Level {
        if self >= Severity::ERROR {
            log::Level::Error
        } else if self >= Severity::WARNING {
            log::Level::Warn
        } else if self >= Severity::INFO {
            log::Level::Info
        } else if self >= Severity::DEBUG {
            log::Level::Debug
        } else {
            log::Level::Trace
        }
    }
}

impl From<log::Level> for Severity {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Severity::ERROR,
            log::Level::Warn => Severity::WARNING,
            log::Level::Info => Severity::INFO,
            log::Level::Debug => Severity::DEBUG,
            log::Level::Trace => Severity::TRACE,
        }
    }
}

impl From<log::LevelFilter> for Severity {
    /// Lowest severity that passes the filter. `Off` maps above every real level.
    fn from(filter: log::LevelFilter) -> Self {
        match filter.to_level() {
            Some(level) => level.into(),
            None => Severity(u32::MAX),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// One log event as handed to the handlers.
#[derive(Clone, Debug, PartialEq)]
pub struct LogRecord {
    pub severity: Severity,
    pub logger_name: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
}

impl LogRecord {
    pub fn new(
        severity: Severity,
        logger_name: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            severity,
            logger_name: logger_name.into(),
            message: message.into(),
            timestamp: Local::now(),
        }
    }
}

impl From<&log::Record<'_>> for LogRecord {
    fn from(record: &log::Record<'_>) -> Self {
        Self::new(
            record.level().into(),
            record.target(),
            record.args().to_string(),
        )
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;

    #[test]
    fn named_levels_are_ordered() {
        assert!(Severity::DEBUG < Severity::INFO);
        assert!(Severity::INFO < Severity::WARNING);
        assert!(Severity::WARNING < Severity::ERROR);
        assert!(Severity::ERROR < Severity::CRITICAL);
        assert!(Severity::TRACE < Severity::DEBUG);
    }

    #[test]
    fn unnamed_levels_get_numeric_name() {
        assert_eq!(Severity::WARNING.name(), "WARNING");
        assert_eq!(Severity(25).name(), "Level 25");
        assert_eq!(Severity::TRACE.to_string(), "Level 5");
    }

    #[test]
    fn converts_from_log_record() {
        let converted = LogRecord::from(
            &log::Record::builder()
                .level(log::Level::Warn)
                .target("net::peer")
                .args(format_args!("lost {} packets", 3))
                .build(),
        );
        assert_eq!(converted.severity, Severity::WARNING);
        assert_eq!(converted.logger_name, "net::peer");
        assert_eq!(converted.message, "lost 3 packets");
    }

    #[test]
    fn maps_back_to_facade_levels() {
        assert_eq!(Severity::CRITICAL.to_log_level(), log::Level::Error);
        assert_eq!(Severity::ERROR.to_log_level(), log::Level::Error);
        assert_eq!(Severity(35).to_log_level(), log::Level::Warn);
        assert_eq!(Severity::INFO.to_log_level(), log::Level::Info);
        assert_eq!(Severity::DEBUG.to_log_level(), log::Level::Debug);
        assert_eq!(Severity::TRACE.to_log_level(), log::Level::Trace);
        assert_eq!(Severity::NOTSET.to_log_level(), log::Level::Trace);
    }

    #[test]
    fn level_filter_maps_to_threshold() {
        assert_eq!(Severity::from(log::LevelFilter::Info), Severity::INFO);
        assert!(Severity::from(log::LevelFilter::Off) > Severity::CRITICAL);
    }
}
