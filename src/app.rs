use std::sync::Arc;

use eframe::{egui::{*}, Frame};
use log::{error, info};
use logdock::config::{ConfigStore, SinkConfig};
use logdock::hub::LogHub;
use logdock::panel::LogPanel;
use logdock::settings_page::LoggerSettingsPage;

use super::demo_page::*;
use super::ui::*;

pub const APP_NAME : &str = "Log Dock";

const APP_SIDEBAR_WIDTH : f32 = 180.0;
pub const APP_HEADER_PADDING : f32 = 20.0;
const LOG_DOCK_DEFAULT_HEIGHT : f32 = 240.0;

/// State shared by all tabs.
#[derive(Default)]
pub struct AppModel {
    pub show_log_dock: bool,
    pub workers_spawned: usize,
}

/// Application root: the tabs, the active tab index and the docked log panel.
pub struct App {
    pages: Vec<Box<dyn TabPage>>,
    active: usize,

    model : AppModel,
    log_panel: LogPanel,
}

impl App {
    pub fn new(cc: &eframe::CreationContext<'_>, hub: &'static LogHub, store: Arc<ConfigStore>) -> Self {
        // Register your tabs here. Adding tabs = push another `Box::new(MyPage { ... })`.
        let pages: Vec<Box<dyn TabPage>> = vec![
            Box::new(DemoPage::default()),
            Box::new(LoggerSettingsPage::new(Arc::clone(&store))),
        ];

        let mut log_panel = LogPanel::new(store.load::<SinkConfig>());
        log_panel.set_repaint_context(cc.egui_ctx.clone());
        if let Err(e) = log_panel.register_with(hub) {
            error!("file logging disabled: {e}");
        }
        info!("{} {} started", APP_NAME, env!("CARGO_PKG_VERSION"));

        Self {
            pages,
            active: 0,
            model : AppModel { show_log_dock: true, ..Default::default() },
            log_panel,
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &Context, _frame: &mut Frame) {
        // TOP BAR
        TopBottomPanel::top("top_bar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.strong(APP_NAME);
                ui.separator();
                ui.toggle_value(&mut self.model.show_log_dock, "📜 Log");
            });
        });

        // LEFT SIDEBAR
        SidePanel::left("sidebar")
            .exact_width(APP_SIDEBAR_WIDTH)
            .resizable(false)
            .show(ctx, |ui| {
                ScrollArea::vertical().auto_shrink([false, false]).show(ui, |ui| {
                    for i in 0..self.pages.len() {
                        let label = self.pages[i].label();
                        if ui.selectable_label(self.active == i, label).clicked() {
                            self.active = i;
                        }
                    }
                });
            });

        // BOTTOM LOG DOCK
        if self.model.show_log_dock {
            TopBottomPanel::bottom("log_dock")
                .resizable(true)
                .default_height(LOG_DOCK_DEFAULT_HEIGHT)
                .show(ctx, |ui| self.log_panel.ui(ui));
        } else {
            // Keep the scrollback current while the dock is hidden.
            self.log_panel.pump();
        }

        // RIGHT CONTENT
        CentralPanel::default().show(ctx, |ui| {
            ui.add_space(8.0);

            if let Some(page) = self.pages.get_mut(self.active) {
                page.ui(ui, &mut self.model);
            } else {
                ui.label("No page selected.");
            }
        });
    }
}
