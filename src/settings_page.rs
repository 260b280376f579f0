use std::sync::Arc;

use eframe::egui::{self, DragValue, RichText};
use log::{error, info};

use crate::config::{ConfigStore, SinkConfig};
use crate::path_query::{PathMode, PathQuery};

pub const LOG_FOLDER_KEY: &str = "log_folder";
const MAX_LINES_RANGE: std::ops::RangeInclusive<usize> = 1..=1_000_000;
const ROW_SPACING: f32 = 6.0;

/// Editor for the logger settings. Edits a draft; nothing is stored until Save.
pub struct LoggerSettingsPage {
    store: Arc<ConfigStore>,
    folder_query: PathQuery,
    draft: SinkConfig,
    status: Option<Result<String, String>>,
}

impl LoggerSettingsPage {
    pub fn new(store: Arc<ConfigStore>) -> Self {
        let draft = store.load::<SinkConfig>();
        let folder_query = PathQuery::new(Arc::clone(&store), LOG_FOLDER_KEY, Vec::new());
        Self {
            store,
            folder_query,
            draft,
            status: None,
        }
    }

    pub fn draft(&self) -> &SinkConfig {
        &self.draft
    }

    pub fn draft_mut(&mut self) -> &mut SinkConfig {
        &mut self.draft
    }

    /// Writes the draft. The running panel keeps its settings until restart.
    pub fn save(&mut self) {
        match self.store.save(&self.draft) {
            Ok(()) => {
                info!("logger settings saved");
                self.status = Some(Ok("Saved. Restart to apply.".to_owned()));
            }
            Err(e) => {
                error!("could not save logger settings: {e}");
                self.status = Some(Err(e.to_string()));
            }
        }
    }

    /// Back to what is stored.
    pub fn reset(&mut self) {
        self.draft = self.store.load();
        self.status = None;
    }

    pub fn ui(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let name_label = ui.label("Max log lines:");
            ui.add(DragValue::new(&mut self.draft.max_log_lines).range(MAX_LINES_RANGE))
                .labelled_by(name_label.id);
        });
        ui.add_space(ROW_SPACING);

        ui.horizontal(|ui| {
            let name_label = ui.label("Log folder:");
            let mut text = self.draft.log_path.to_string_lossy().into_owned();
            if ui.text_edit_singleline(&mut text).labelled_by(name_label.id).changed() {
                self.draft.log_path = text.into();
            }
            if ui.button("📂").clicked() {
                if let Some(folder) = self.folder_query.get_path(PathMode::Folder) {
                    self.draft.log_path = folder;
                }
            }
        });
        ui.add_space(ROW_SPACING);

        ui.horizontal(|ui| {
            let name_label = ui.label("Write log files");
            ui.checkbox(&mut self.draft.enable_file_logging, "")
                .labelled_by(name_label.id);
        });
        ui.add_space(ROW_SPACING);

        ui.horizontal(|ui| {
            if ui.button("Save").clicked() {
                self.save();
            }
            if ui.button("Reset").clicked() {
                self.reset();
            }
        });

        ui.label(RichText::new("Changes take effect after a restart.").weak());
        match &self.status {
            Some(Ok(msg)) => {
                ui.label(msg);
            }
            Some(Err(msg)) => {
                ui.colored_label(egui::Color32::from_rgb(255, 100, 100), msg);
            }
            None => {}
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn save_persists_draft_and_reset_discards_edits() {
        let store = Arc::new(ConfigStore::in_memory());
        let mut page = LoggerSettingsPage::new(Arc::clone(&store));
        assert_eq!(page.draft(), &SinkConfig::default());

        page.draft_mut().max_log_lines = 42;
        page.draft_mut().enable_file_logging = true;
        page.save();
        assert_eq!(store.load::<SinkConfig>().max_log_lines, 42);
        assert!(matches!(page.status, Some(Ok(_))));

        page.draft_mut().log_path = PathBuf::from("/elsewhere");
        page.reset();
        assert_eq!(page.draft(), &store.load::<SinkConfig>());
        assert!(page.status.is_none());
    }
}
