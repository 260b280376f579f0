use std::sync::{
    OnceLock,
    atomic::{AtomicU32, Ordering},
    mpsc::{self, Receiver, Sender},
};

use eframe::egui;

use crate::format::{FormattedLine, LevelFormatter};
use crate::hub::Handler;
use crate::record::{LogRecord, Severity};

/// Handler that can be called from any thread and delivers formatted lines to
/// the UI thread.
///
/// Lines travel through an unbounded channel, so `emit` never waits for the UI.
/// The receiving half is a [`SinkInbox`] that only the UI thread drains. Once a
/// repaint context is attached, each emit also wakes the egui event loop.
pub struct ThreadSafeSink {
    tx: Sender<FormattedLine>,
    formatter: LevelFormatter,
    level: AtomicU32,
    repaint: OnceLock<egui::Context>,
}

/// Receiving end of a [`ThreadSafeSink`]. Lives on the UI thread.
pub struct SinkInbox {
    rx: Receiver<FormattedLine>,
}

impl ThreadSafeSink {
    pub fn new() -> (Self, SinkInbox) {
        let (tx, rx) = mpsc::channel();
        let sink = Self {
            tx,
            formatter: LevelFormatter,
            level: AtomicU32::new(Severity::NOTSET.0),
            repaint: OnceLock::new(),
        };
        (sink, SinkInbox { rx })
    }

    pub fn set_level(&self, level: Severity) {
        self.level.store(level.0, Ordering::Relaxed);
    }

    /// Has no effect after the first call.
    pub fn set_repaint_context(&self, ctx: egui::Context) {
        let _ = self.repaint.set(ctx);
    }
}

impl Handler for ThreadSafeSink {
    fn emit(&self, record: &LogRecord) {
        let line = self.formatter.format_line(record);
        // The inbox is gone once the panel is dropped; late lines are discarded.
        if self.tx.send(line).is_ok() {
            if let Some(ctx) = self.repaint.get() {
                ctx.request_repaint();
            }
        }
    }

    fn level(&self) -> Severity {
        Severity(self.level.load(Ordering::Relaxed))
    }
}

impl SinkInbox {
    /// Everything queued so far, without waiting.
    pub fn drain(&self) -> impl Iterator<Item = FormattedLine> + '_ {
        self.rx.try_iter()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::{sync::Arc, thread};

    #[test]
    fn emit_formats_and_queues() {
        let (sink, inbox) = ThreadSafeSink::new();
        sink.emit(&LogRecord::new(Severity::WARNING, "io", "slow disk"));

        let lines: Vec<_> = inbox.drain().collect();
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].tag, "[WARN]");
        assert!(lines[0].markup.ends_with("[WARN] (io)</font> slow disk"));
        assert_eq!(inbox.drain().count(), 0);
    }

    #[test]
    fn emit_from_worker_threads_keeps_per_thread_order() {
        let (sink, inbox) = ThreadSafeSink::new();
        let sink = Arc::new(sink);

        let workers: Vec<_> = (0..4)
            .map(|w| {
                let sink = Arc::clone(&sink);
                thread::spawn(move || {
                    for i in 0..50 {
                        sink.emit(&LogRecord::new(Severity::INFO, format!("w{w}"), i.to_string()));
                    }
                })
            })
            .collect();
        for worker in workers {
            worker.join().unwrap();
        }

        let lines: Vec<_> = inbox.drain().collect();
        assert_eq!(lines.len(), 200);
        for w in 0..4 {
            let name = format!("w{w}");
            let seq: Vec<usize> = lines
                .iter()
                .filter(|l| l.logger_name == name)
                .map(|l| l.message.parse().unwrap())
                .collect();
            assert_eq!(seq, (0..50).collect::<Vec<_>>());
        }
    }

    #[test]
    fn emit_after_inbox_dropped_is_silent() {
        let (sink, inbox) = ThreadSafeSink::new();
        drop(inbox);
        sink.emit(&LogRecord::new(Severity::ERROR, "late", "nobody listens"));
    }

    #[test]
    fn level_can_be_changed_through_shared_reference() {
        let (sink, _inbox) = ThreadSafeSink::new();
        assert_eq!(sink.level(), Severity::NOTSET);
        sink.set_level(Severity::ERROR);
        assert_eq!(sink.level(), Severity::ERROR);
    }
}
