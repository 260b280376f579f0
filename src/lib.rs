//! A dockable egui log viewer fed by the `log` facade.
//!
//! Install a [`hub::LogHub`] as the global logger, build a [`panel::LogPanel`]
//! from the stored [`config::SinkConfig`], and register the panel with the hub.
//! Records logged from any thread then show up in the panel, colored by severity,
//! and optionally in a rotating log file.

pub mod config;
pub mod error;
pub mod file_sink;
pub mod format;
pub mod hub;
pub mod panel;
pub mod path_query;
pub mod record;
pub mod settings_page;
pub mod sink;

pub use error::{LogDockError, Result};
