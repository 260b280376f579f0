use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, error};

use crate::config::ConfigStore;
use crate::error::Result;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathMode {
    Load,
    Save,
    Folder,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileFilter {
    pub name: String,
    pub extensions: Vec<String>,
}

impl FileFilter {
    pub fn new(name: impl Into<String>, extensions: &[&str]) -> Self {
        Self {
            name: name.into(),
            extensions: extensions.iter().map(|e| (*e).to_owned()).collect(),
        }
    }

    /// Parses `"Logs (*.log *.txt);;All files (*)"`.
    ///
    /// `*` and `*.*` become an empty extension list, which matches everything.
    pub fn parse(filters: &str) -> Vec<FileFilter> {
        filters.split(";;")
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| match (part.find('('), part.rfind(')')) {
                (Some(open), Some(close)) if open < close => {
                    let extensions = part[open + 1..close]
                        .split_whitespace()
                        .filter_map(|glob| glob.strip_prefix("*."))
                        .filter(|ext| *ext != "*")
                        .map(str::to_owned)
                        .collect();
                    FileFilter {
                        name: part[..open].trim().to_owned(),
                        extensions,
                    }
                }
                _ => FileFilter {
                    name: part.to_owned(),
                    extensions: Vec::new(),
                },
            })
            .collect()
    }
}

/// File dialog that opens where the user last picked something.
///
/// The last folder is kept in the [`ConfigStore`] under `key`, so separate
/// queries (say, "import" and "export") each remember their own place.
pub struct PathQuery {
    store: Arc<ConfigStore>,
    key: String,
    filters: Vec<FileFilter>,
}

impl PathQuery {
    pub fn new(store: Arc<ConfigStore>, key: impl Into<String>, filters: Vec<FileFilter>) -> Self {
        Self {
            store,
            key: key.into(),
            filters,
        }
    }

    pub fn last_folder(&self) -> Option<PathBuf> {
        self.store
            .value::<PathBuf>(&self.key)
            .filter(|p| !p.as_os_str().is_empty())
    }

    pub fn store_last_folder(&self, folder: &Path) -> Result<()> {
        self.store.set_value(&self.key, &folder)
    }

    /// Shows the dialog. `None` when cancelled.
    pub fn get_path(&self, mode: PathMode) -> Option<PathBuf> {
        let mut dialog = rfd::FileDialog::new();
        if let Some(folder) = self.last_folder() {
            dialog = dialog.set_directory(folder);
        }
        if mode != PathMode::Folder {
            for filter in &self.filters {
                dialog = dialog.add_filter(filter.name.as_str(), &filter.extensions);
            }
        }

        let picked = match mode {
            PathMode::Load => dialog.set_title("Open File").pick_file(),
            PathMode::Save => dialog.set_title("Save File").save_file(),
            PathMode::Folder => dialog.set_title("Select Folder").pick_folder(),
        }?;

        self.remember(mode, &picked);
        Some(picked)
    }

    fn remember(&self, mode: PathMode, picked: &Path) {
        let folder = match mode {
            PathMode::Folder => Some(picked),
            PathMode::Load | PathMode::Save => picked.parent(),
        };
        let Some(folder) = folder else {
            return;
        };
        debug!("remembering {} for `{}`", folder.display(), self.key);
        if let Err(e) = self.store_last_folder(folder) {
            error!("could not remember folder for `{}`: {e}", self.key);
        }
    }
}
