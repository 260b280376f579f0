use std::thread;
use std::time::Duration;

use eframe::egui::*;
use log::{debug, error, info, trace, warn};
use logdock::critical;
use logdock::hub::emit_global;
use logdock::record::Severity;

use super::app::{AppModel, APP_HEADER_PADDING};
use super::ui::TabPage;

const WORKER_THREADS: usize = 4;
const LINES_PER_WORKER: usize = 25;
const WORKER_PAUSE: Duration = Duration::from_millis(40);

/// The "Demo" tab: buttons that produce log records of every kind.
#[derive(Default)]
pub struct DemoPage;

impl TabPage for DemoPage {
    fn id(&self) -> &'static str { "demo" }
    fn label(&self) -> &'static str { "Demo" }

    fn ui(&mut self, ui: &mut Ui, model: &mut AppModel) {
        ui.heading("Log Some Records");

        ui.add_space(APP_HEADER_PADDING);

        ui.horizontal_wrapped(|ui| {
            if ui.button("Debug").clicked() {
                debug!("cache warmed with {} entries", 128);
            }
            if ui.button("Info").clicked() {
                info!("connected to demo service");
            }
            if ui.button("Warning").clicked() {
                warn!("response took {} ms", 1450);
            }
            if ui.button("Error").clicked() {
                error!("could not open <config.toml> & friends");
            }
            if ui.button("Critical").clicked() {
                critical!("storage is gone, shutting down");
            }
            if ui.button("Trace").clicked() {
                trace!("below debug, shown with the fallback tag");
            }
            if ui.button("Level 25").clicked() {
                emit_global(Severity(25), module_path!(), "custom level between INFO and WARNING".to_owned());
            }
            if ui.button("Multi-line").clicked() {
                info!("first line\nsecond line\nthird line");
            }
        });

        ui.separator();

        ui.horizontal(|ui| {
            if ui.button(format!("Spawn {WORKER_THREADS} worker threads")).clicked() {
                spawn_workers(model.workers_spawned);
                model.workers_spawned += WORKER_THREADS;
            }
            ui.label(format!("{} workers spawned so far", model.workers_spawned));
        });
    }
}

fn spawn_workers(first_id: usize) {
    for id in first_id..first_id + WORKER_THREADS {
        let spawned = thread::Builder::new()
            .name(format!("demo-worker-{id}"))
            .spawn(move || {
                for step in 0..LINES_PER_WORKER {
                    match step % 5 {
                        0 => debug!("worker {id} step {step}"),
                        4 => warn!("worker {id} step {step} is slow"),
                        _ => info!("worker {id} step {step}"),
                    }
                    thread::sleep(WORKER_PAUSE);
                }
                info!("worker {id} finished");
            });
        if let Err(e) = spawned {
            error!("could not spawn demo worker {id}: {e}");
        }
    }
}
