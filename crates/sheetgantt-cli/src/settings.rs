//! Optional TOML settings file
//!
//! ```toml
//! [layout]
//! row_height = 32.0
//! collapse_strategy = "transitive"
//!
//! [render]
//! title = "Office move"
//! dark = true
//! ```
//!
//! Every key is optional. Command-line flags override what the file says.

use serde::{Deserialize, Serialize};
use sheetgantt_core::LayoutConfig;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub layout: LayoutConfig,
    pub render: RenderSettings,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderSettings {
    /// Page title for HTML output
    pub title: Option<String>,
    pub dark: bool,
    /// Width of the task-name column
    pub label_width: Option<u32>,
    pub show_dependencies: bool,
    pub show_today: bool,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            title: None,
            dark: false,
            label_width: None,
            show_dependencies: true,
            show_today: true,
        }
    }
}

impl Settings {
    /// Load settings from `path`. A missing or malformed file logs a
    /// warning and yields the defaults.
    pub fn load_from_path(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                warn!("could not read settings file {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match toml::from_str::<Settings>(&content) {
            Ok(settings) => {
                debug!(path = %path.display(), "loaded settings");
                settings
            }
            Err(e) => {
                warn!("ignoring malformed settings file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}
