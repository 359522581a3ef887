// ABOUTME: Shared types and configuration for pressure-panes.
// ABOUTME: Defines geometry, config file handling, and the preference store.

pub mod config;
pub mod geometry;
pub mod prefs;

pub use config::{Config, ConfigError};
pub use geometry::{Orientation, Point, Rect, Size};
pub use prefs::{
    FilePreferences, MemoryPreferences, PreferenceError, PreferenceStore,
    SPLIT_SIZE_WARNING_SHOW_AGAIN,
};
