// ABOUTME: Application configuration handling.
// ABOUTME: Loads and saves pane constraints and window defaults from TOML.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::Orientation;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Smallest width a pane may be squeezed to
    pub minimum_width: f32,

    /// Smallest height a pane may be squeezed to
    pub minimum_height: f32,

    /// Thickness of the divider drawn between two panes
    pub divider_thickness: f32,

    /// Allow dragging a divider far enough to collapse a pane
    pub can_collapse: bool,

    /// Orientation of the top-level container
    pub root_orientation: Orientation,

    /// Orientation a split uses when the alternate modifier is not held
    pub default_split: Orientation,

    /// Initial window dimensions
    pub window_width: u32,
    pub window_height: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minimum_width: 100.0,
            minimum_height: 100.0,
            divider_thickness: 1.0,
            can_collapse: false,
            root_orientation: Orientation::Row,
            default_split: Orientation::Column,
            window_width: 800,
            window_height: 600,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,
}

impl Config {
    /// Get the default config file path (~/.config/pressure-panes/config.toml)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("pressure-panes").join("config.toml"))
    }

    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load config from default path, or return default config if not found
    pub fn load_or_default() -> Self {
        Self::default_path()
            .and_then(|path| match Self::load(&path) {
                Ok(config) => Some(config),
                Err(ConfigError::ReadError(_)) => None,
                Err(e) => {
                    tracing::warn!("Ignoring config at {}: {}", path.display(), e);
                    None
                }
            })
            .unwrap_or_default()
    }

    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn save_to_default(&self) -> Result<PathBuf, ConfigError> {
        let path = Self::default_path().ok_or(ConfigError::NoConfigDir)?;
        self.save(&path)?;
        Ok(path)
    }
}
