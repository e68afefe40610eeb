//! TOML configuration, read once at startup.
//!
//! Every field has a default, so a missing file or a file with only a few
//! keys is fine. Example:
//!
//! ```toml
//! [capture]
//! path = "/tmp/plot.png"
//! rtf = true
//!
//! [keys]
//! data_tip = "T"
//!
//! [window]
//! theme = "light"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::state::theme::Theme;

pub const APP_NAME: &str = "plotdrop";
pub const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub capture: CaptureConfig,
    pub keys: KeyBindings,
    pub window: WindowConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    /// Where every successful capture is also written as PNG.
    pub path: PathBuf,
    /// Captures larger than this are cropped (in physical pixels).
    pub max_width: u32,
    pub max_height: u32,
    /// Also put an RTF picture on the clipboard.
    pub rtf: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            path: std::env::temp_dir().join("plotdrop_capture.png"),
            max_width: 5000,
            max_height: 5000,
            rtf: false,
        }
    }
}

/// Key names as understood by `egui::Key::from_name` ("D", "F5", "Space", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub data_tip: String,
    pub toggle_visibility: String,
    pub capture: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            data_tip: "D".to_string(),
            toggle_visibility: "I".to_string(),
            capture: "P".to_string(),
        }
    }
}

/// Resolved plot-window shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlotKeys {
    pub data_tip: egui::Key,
    pub toggle_visibility: egui::Key,
    pub capture: egui::Key,
}

impl Default for PlotKeys {
    fn default() -> Self {
        Self {
            data_tip: egui::Key::D,
            toggle_visibility: egui::Key::I,
            capture: egui::Key::P,
        }
    }
}

impl KeyBindings {
    /// Map names to keys; unknown names keep the default binding.
    pub fn resolve(&self) -> PlotKeys {
        let defaults = PlotKeys::default();
        PlotKeys {
            data_tip: resolve_key(&self.data_tip, defaults.data_tip),
            toggle_visibility: resolve_key(&self.toggle_visibility, defaults.toggle_visibility),
            capture: resolve_key(&self.capture, defaults.capture),
        }
    }
}

fn resolve_key(name: &str, fallback: egui::Key) -> egui::Key {
    egui::Key::from_name(name).unwrap_or_else(|| {
        tracing::warn!("Unknown key {name:?} in config, using {}", fallback.name());
        fallback
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub theme: Theme,
    pub width: f32,
    pub height: f32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            width: 1280.0,
            height: 800.0,
        }
    }
}

/// `<config dir>/plotdrop/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join(APP_NAME).join(CONFIG_FILE))
}

impl AppConfig {
    /// Read a config file. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Load the explicit path, or the default location. Errors are logged
    /// and the defaults used instead.
    pub fn load(explicit: Option<&Path>) -> Self {
        let path = match explicit.map(Path::to_path_buf).or_else(default_config_path) {
            Some(p) => p,
            None => return Self::default(),
        };
        match Self::load_from(&path) {
            Ok(config) => {
                tracing::debug!("Using config {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config {:?}: {e}", path);
                Self::default()
            }
        }
    }
}
