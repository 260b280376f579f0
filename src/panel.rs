use std::{collections::VecDeque, path::PathBuf, sync::Arc};

use chrono::Local;
use eframe::egui::{
    self, Color32, FontId, Frame, Margin, RichText, ScrollArea, TextFormat, text::LayoutJob,
};
use log::info;

use crate::config::SinkConfig;
use crate::error::Result;
use crate::file_sink::RotatingFileSink;
use crate::format::FormattedLine;
use crate::hub::LogHub;
use crate::sink::{SinkInbox, ThreadSafeSink};

pub const PANEL_TITLE: &str = "Log";

const PANEL_BACKGROUND: Color32 = Color32::from_rgb(30, 30, 30);
const MESSAGE_COLOR: Color32 = Color32::WHITE;
const LOG_FONT_SIZE: f32 = 12.0;

/// Most recent lines, oldest first. Never holds more than `max_lines`.
#[derive(Debug)]
pub struct Scrollback {
    lines: VecDeque<FormattedLine>,
    max_lines: usize,
}

impl Scrollback {
    pub fn new(max_lines: usize) -> Self {
        let max_lines = max_lines.max(1);
        Self {
            lines: VecDeque::with_capacity(max_lines.min(4096)),
            max_lines,
        }
    }

    pub fn push(&mut self, line: FormattedLine) {
        while self.lines.len() >= self.max_lines {
            self.lines.pop_front();
        }
        self.lines.push_back(line);
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn max_lines(&self) -> usize {
        self.max_lines
    }

    pub fn iter(&self) -> impl Iterator<Item = &FormattedLine> {
        self.lines.iter()
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// All lines as markup, one per line.
    pub fn to_markup(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.markup.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// The dockable log viewer.
///
/// Owns the scrollback and the UI end of a [`ThreadSafeSink`]. The settings it was
/// built with stay fixed for its lifetime.
pub struct LogPanel {
    config: SinkConfig,
    scrollback: Scrollback,
    sink: Arc<ThreadSafeSink>,
    inbox: SinkInbox,
    file_log_path: Option<PathBuf>,
}

impl LogPanel {
    pub fn new(config: SinkConfig) -> Self {
        let (sink, inbox) = ThreadSafeSink::new();
        Self {
            scrollback: Scrollback::new(config.max_log_lines),
            config,
            sink: Arc::new(sink),
            inbox,
            file_log_path: None,
        }
    }

    pub fn config(&self) -> &SinkConfig {
        &self.config
    }

    pub fn scrollback(&self) -> &Scrollback {
        &self.scrollback
    }

    pub fn sink(&self) -> Arc<ThreadSafeSink> {
        Arc::clone(&self.sink)
    }

    /// Path of this session's log file, once file logging is attached.
    pub fn file_log_path(&self) -> Option<&PathBuf> {
        self.file_log_path.as_ref()
    }

    /// Lets background emits wake the UI. Call once with the app's context.
    pub fn set_repaint_context(&self, ctx: egui::Context) {
        self.sink.set_repaint_context(ctx);
    }

    /// Attaches the panel's sink to `hub`, plus a rotating file sink when file
    /// logging is enabled.
    ///
    /// The panel sink is attached first, so on a file sink error the panel keeps
    /// working and the caller decides how to report it.
    pub fn register_with(&mut self, hub: &LogHub) -> Result<()> {
        hub.add_handler(self.sink());

        if self.config.enable_file_logging {
            let file_sink = RotatingFileSink::for_session(&self.config.log_path, Local::now())?;
            info!("writing log file {}", file_sink.path().display());
            self.file_log_path = Some(file_sink.path().to_path_buf());
            hub.add_handler(Arc::new(file_sink));
        }
        Ok(())
    }

    pub fn on_formatted_line(&mut self, line: FormattedLine) {
        self.scrollback.push(line);
    }

    /// Moves everything the sink has queued into the scrollback. UI thread only.
    pub fn pump(&mut self) -> usize {
        let lines: Vec<FormattedLine> = self.inbox.drain().collect();
        let received = lines.len();
        for line in lines {
            self.on_formatted_line(line);
        }
        received
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        self.pump();

        ui.horizontal(|ui| {
            ui.strong(PANEL_TITLE);
            ui.separator();
            if ui.button("🗑 Clear").clicked() {
                self.scrollback.clear();
            }
            if ui.button("📋 Copy").clicked() {
                ui.ctx().copy_text(self.scrollback.to_markup());
            }
            ui.label(format!(
                "{} / {} lines",
                self.scrollback.len(),
                self.scrollback.max_lines()
            ));
            if let Some(path) = &self.file_log_path {
                ui.separator();
                ui.label(RichText::new(format!("File: {}", path.display())).weak());
            }
        });

        Frame::new()
            .fill(PANEL_BACKGROUND)
            .inner_margin(Margin::same(6))
            .show(ui, |ui| {
                ScrollArea::vertical()
                    .id_salt("log_panel_scroll")
                    .auto_shrink([false; 2])
                    .stick_to_bottom(true)
                    .show(ui, |ui| {
                        for line in self.scrollback.iter() {
                            ui.label(line_layout(line));
                        }
                    });
            });
    }
}

fn line_layout(line: &FormattedLine) -> LayoutJob {
    let font_id = FontId::monospace(LOG_FONT_SIZE);
    let mut job = LayoutJob::default();
    job.append(
        &format!("{} ({})", line.tag, line.logger_name),
        0.0,
        TextFormat {
            font_id: font_id.clone(),
            color: line.color,
            ..Default::default()
        },
    );
    job.append(
        &line.message,
        LOG_FONT_SIZE / 2.0,
        TextFormat {
            font_id,
            color: MESSAGE_COLOR,
            ..Default::default()
        },
    );
    job
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use crate::format::LevelFormatter;
    use crate::hub::Handler;
    use crate::record::{LogRecord, Severity};
    use std::{fs, thread};

    fn line(message: &str) -> FormattedLine {
        LevelFormatter.format_line(&LogRecord::new(Severity::INFO, "test", message))
    }

    fn config(max_log_lines: usize) -> SinkConfig {
        SinkConfig {
            max_log_lines,
            ..SinkConfig::default()
        }
    }

    #[test]
    fn scrollback_evicts_oldest_first() {
        let mut panel = LogPanel::new(config(3));
        for m in ["A", "B", "C", "D", "E"] {
            panel.on_formatted_line(line(m));
            assert!(panel.scrollback().len() <= 3);
        }

        let kept: Vec<_> = panel.scrollback().iter().map(|l| l.message.as_str()).collect();
        assert_eq!(kept, vec!["C", "D", "E"]);
    }

    #[test]
    fn zero_capacity_still_keeps_one_line() {
        let mut scrollback = Scrollback::new(0);
        scrollback.push(line("first"));
        scrollback.push(line("second"));
        assert_eq!(scrollback.len(), 1);
        assert_eq!(scrollback.iter().next().unwrap().message, "second");
    }

    #[test]
    fn lines_from_worker_thread_arrive_on_pump() {
        let mut panel = LogPanel::new(config(100));
        let sink = panel.sink();

        thread::spawn(move || {
            for i in 0..10 {
                sink.emit(&LogRecord::new(Severity::DEBUG, "worker", format!("tick {i}")));
            }
        })
        .join()
        .unwrap();

        assert_eq!(panel.pump(), 10);
        assert_eq!(panel.scrollback().len(), 10);
        assert_eq!(panel.scrollback().iter().last().unwrap().message, "tick 9");
        assert_eq!(panel.pump(), 0);
    }

    #[test]
    fn pumped_lines_are_evicted_oldest_first() {
        let mut panel = LogPanel::new(config(3));
        let sink = panel.sink();
        for m in ["A", "B", "C", "D", "E"] {
            sink.emit(&LogRecord::new(Severity::INFO, "test", m));
        }

        assert_eq!(panel.pump(), 5);
        let kept: Vec<_> = panel.scrollback().iter().map(|l| l.message.as_str()).collect();
        assert_eq!(kept, vec!["C", "D", "E"]);
    }

    #[test]
    fn levels_below_debug_reach_the_panel_with_fallback_tag() {
        let hub = LogHub::new();
        let mut panel = LogPanel::new(config(10));
        panel.register_with(&hub).unwrap();

        hub.dispatch(&LogRecord::new(Severity::TRACE, "app", "trace detail"));
        hub.dispatch(&LogRecord::new(Severity(1), "app", "custom low level"));

        assert_eq!(panel.pump(), 2);
        let tags: Vec<_> = panel.scrollback().iter().map(|l| l.tag).collect();
        assert_eq!(tags, vec!["[????]", "[????]"]);
    }

    #[test]
    fn register_attaches_only_panel_sink_by_default() {
        let hub = LogHub::new();
        let mut panel = LogPanel::new(config(10));
        panel.register_with(&hub).unwrap();
        assert_eq!(hub.handler_count(), 1);
        assert!(panel.file_log_path().is_none());

        hub.dispatch(&LogRecord::new(Severity::ERROR, "app", "through the hub"));
        panel.pump();
        assert_eq!(panel.scrollback().iter().next().unwrap().tag, "[ERR ]");
    }

    #[test]
    fn register_adds_file_sink_when_enabled() {
        let dir = std::env::temp_dir().join(format!(
            "logdock-panel-{}-{}",
            std::process::id(),
            Local::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        let hub = LogHub::new();
        let mut panel = LogPanel::new(SinkConfig {
            max_log_lines: 10,
            log_path: dir.clone(),
            enable_file_logging: true,
        });

        panel.register_with(&hub).unwrap();
        assert_eq!(hub.handler_count(), 2);

        hub.dispatch(&LogRecord::new(Severity::WARNING, "app", "to both"));
        let path = panel.file_log_path().unwrap().clone();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.ends_with(" - app - WARNING - to both\n"));
        assert!(path.file_name().unwrap().to_string_lossy().starts_with("python_log_"));

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn file_sink_failure_keeps_panel_sink() {
        let blocker = std::env::temp_dir().join(format!(
            "logdock-blocker-{}-{}",
            std::process::id(),
            Local::now().timestamp_nanos_opt().unwrap_or_default()
        ));
        fs::write(&blocker, b"not a directory").unwrap();

        let hub = LogHub::new();
        let mut panel = LogPanel::new(SinkConfig {
            max_log_lines: 10,
            log_path: blocker.clone(),
            enable_file_logging: true,
        });

        assert!(panel.register_with(&hub).is_err());
        assert_eq!(hub.handler_count(), 1);
        assert!(panel.file_log_path().is_none());

        fs::remove_file(blocker).unwrap();
    }

    #[test]
    fn markup_export_joins_lines() {
        let mut scrollback = Scrollback::new(5);
        scrollback.push(line("a"));
        scrollback.push(line("b\nc"));
        let markup = scrollback.to_markup();
        assert_eq!(markup.lines().count(), 2);
        assert!(markup.ends_with("b<br>c"));
    }
}
