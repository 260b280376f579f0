use eframe::egui;

use logdock::settings_page::LoggerSettingsPage;

use super::app::AppModel;

/// Trait every tab/page implements.
/// Keeping per-tab state inside each struct makes it easy to add tabs.
pub trait TabPage {
    /// Unique, stable ID for the tab.
    fn id(&self) -> &'static str;

    /// Human-readable label shown in the sidebar.
    fn label(&self) -> &'static str;

    /// Draw the main content for this tab (right side).
    fn ui(&mut self, ui: &mut egui::Ui, model: &mut AppModel);
}

impl TabPage for LoggerSettingsPage {
    fn id(&self) -> &'static str { "settings" }
    fn label(&self) -> &'static str { "Settings" }

    fn ui(&mut self, ui: &mut egui::Ui, _model: &mut AppModel) {
        ui.heading("Logger Settings");
        ui.add_space(super::app::APP_HEADER_PADDING);
        LoggerSettingsPage::ui(self, ui);
    }
}
