//! Config and cache directory helpers.

use std::path::PathBuf;

use crate::core::app;

/// File name of the optional settings file inside the config directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// File name of the HTML page snapshot written by `page --open`.
pub const SNAPSHOT_FILE: &str = "page.html";

pub fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("io", app::VENDOR, app::NAME)
}

/// Config directory (~/.config/travel-companion/).
pub fn config_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.config_dir().to_path_buf())
}

/// Cache directory (~/.cache/travel-companion/).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|d| d.cache_dir().to_path_buf())
}

pub fn settings_path() -> Option<PathBuf> {
    config_dir().map(|d| d.join(SETTINGS_FILE))
}

pub fn snapshot_path() -> Option<PathBuf> {
    cache_dir().map(|d| d.join(SNAPSHOT_FILE))
}
