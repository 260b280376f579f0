mod app;
mod demo_page;
mod ui;

use std::sync::Arc;

use eframe::egui;
use log::{warn, LevelFilter};
use logdock::config::ConfigStore;
use logdock::hub::LogHub;

use crate::app::{App, APP_NAME};

fn main() -> eframe::Result {
    // Echoes to stderr as well (if you run with `RUST_LOG=debug`).
    let hub: &'static LogHub = match LogHub::new().with_console().install(LevelFilter::Trace) {
        Ok(hub) => hub,
        Err(e) => {
            eprintln!("{e}; the log panel will only show records sent to it directly");
            Box::leak(Box::new(LogHub::new()))
        }
    };

    let store = match ConfigStore::open_default() {
        Ok(store) => store,
        Err(e) => {
            warn!("{e}; using default settings");
            ConfigStore::in_memory()
        }
    };
    let store = Arc::new(store);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 720.0]),
        ..Default::default()
    };
    eframe::run_native(
        format!("{} {}", APP_NAME, env!("CARGO_PKG_VERSION")).as_str(),
        options,
        Box::new(move |cc| Ok(Box::new(App::new(cc, hub, store)))),
    )
}
