use eframe::egui::Color32;

use crate::record::{LogRecord, Severity};

/// Turns a record into one line of text. Implementations must be pure: the same
/// formatter is shared by every thread that logs.
pub trait LineFormatter: Send + Sync {
    fn format(&self, record: &LogRecord) -> String;
}

const FALLBACK_STYLE: (&str, Color32) = ("[????]", Color32::from_rgb(255, 255, 255));

/// Fixed tag and color for a severity. Levels without an entry get `[????]` in white.
pub fn level_style(severity: Severity) -> (&'static str, Color32) {
    match severity {
        Severity::ERROR => ("[ERR ]", Color32::from_rgb(255, 100, 100)),
        Severity::DEBUG => ("[DBG ]", Color32::from_rgb(200, 200, 200)),
        Severity::INFO => ("[INFO]", Color32::from_rgb(100, 250, 100)),
        Severity::WARNING => ("[WARN]", Color32::from_rgb(255, 255, 50)),
        Severity::CRITICAL => ("[CRIT]", Color32::from_rgb(255, 0, 0)),
        _ => FALLBACK_STYLE,
    }
}

/// `#rrggbb`, lower case.
pub fn color_hex(color: Color32) -> String {
    format!("#{:02x}{:02x}{:02x}", color.r(), color.g(), color.b())
}

/// A rendered record, ready for the panel.
///
/// `markup` is the canonical text. The remaining fields carry the same content
/// unescaped so the panel can paint it without parsing markup back.
#[derive(Clone, Debug, PartialEq)]
pub struct FormattedLine {
    pub markup: String,
    pub tag: &'static str,
    pub color: Color32,
    pub logger_name: String,
    pub message: String,
}

/// Severity-colored markup formatter used by the panel.
#[derive(Clone, Copy, Debug, Default)]
pub struct LevelFormatter;

impl LevelFormatter {
    pub fn format_line(&self, record: &LogRecord) -> FormattedLine {
        let (tag, color) = level_style(record.severity);
        let markup = format!(
            "<font color=\"{}\">{} ({})</font> {}",
            color_hex(color),
            tag,
            escape_markup(&record.logger_name),
            line_breaks_to_markup(&escape_markup(&record.message)),
        );

        FormattedLine {
            markup,
            tag,
            color,
            logger_name: record.logger_name.clone(),
            message: record.message.clone(),
        }
    }
}

impl LineFormatter for LevelFormatter {
    fn format(&self, record: &LogRecord) -> String {
        self.format_line(record).markup
    }
}

fn escape_markup(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

fn line_breaks_to_markup(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\n', "<br>")
}

/// Plain-text formatter for files: `{timestamp} - {logger} - {LEVEL} - {message}`.
#[derive(Clone, Debug)]
pub struct PlainFormatter {
    time_format: String,
}

pub const DEFAULT_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S,%3f";

impl Default for PlainFormatter {
    fn default() -> Self {
        Self::with_time_format(DEFAULT_TIME_FORMAT)
    }
}

impl PlainFormatter {
    pub fn with_time_format(time_format: impl Into<String>) -> Self {
        Self {
            time_format: time_format.into(),
        }
    }
}

impl LineFormatter for PlainFormatter {
    fn format(&self, record: &LogRecord) -> String {
        format!(
            "{} - {} - {} - {}",
            record.timestamp.format(&self.time_format),
            record.logger_name,
            record.severity.name(),
            record.message,
        )
    }
}
