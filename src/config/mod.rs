//! Overlay configuration
//!
//! Settings are read from host global variables through a static descriptor
//! table. Anything missing or invalid keeps its default.

pub mod definitions;
pub mod descriptor;
pub mod keymap;
pub mod registry;

pub use definitions::create_settings_registry;
pub use descriptor::{SettingDescriptor, SettingError, SettingSetter, SettingType, SettingValue};
pub use keymap::{parse_key_spec, parse_key_specs, NavigationBindings};
pub use registry::SettingsRegistry;

use std::time::Duration;

use crate::history::DEFAULT_CAPACITY;
use crate::host::ScriptGlobals;
use crate::suppression::DEFAULT_SUPPRESSION;

/// Tunables for the overlay
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlaySettings {
    /// Entries kept per history bucket
    pub history_capacity: usize,
    /// Cap on distinct document words extracted per session
    pub max_search_words: usize,
    /// Rows shown (and candidates kept) for command completion
    pub max_visible_rows: usize,
    /// Candidates kept for word completion
    pub max_search_completions: usize,
    /// Trigger suppression after a synthetic replay
    pub suppression: Duration,
    pub highlight_completions: bool,
    pub navigation: NavigationBindings,
}

impl Default for OverlaySettings {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_CAPACITY,
            max_search_words: 5000,
            max_visible_rows: 8,
            max_search_completions: 50,
            suppression: DEFAULT_SUPPRESSION,
            highlight_completions: true,
            navigation: NavigationBindings::default(),
        }
    }
}

impl OverlaySettings {
    /// Defaults overridden by the host's `cmdfloat_*` globals
    #[must_use]
    pub fn load(globals: &(impl ScriptGlobals + ?Sized)) -> Self {
        let mut settings = Self::default();
        let applied = create_settings_registry().apply(globals, &mut settings);
        tracing::debug!(applied, "overlay settings loaded");
        settings
    }
}
