//! Settings definitions
//! Declarative table of every host global the overlay reads

use crate::config::descriptor::{SettingDescriptor, SettingError, SettingType, SettingValue};
use crate::config::registry::SettingsRegistry;
use crate::config::OverlaySettings;

// Setter functions for each setting

fn set_highlight_completions(
    settings: &mut OverlaySettings,
    value: SettingValue,
) -> Result<(), SettingError> {
    match value {
        SettingValue::Bool(b) => {
            settings.highlight_completions = b;
            Ok(())
        }
        _ => Err(SettingError::ValidationError("Expected boolean".to_string())),
    }
}

fn set_history_size(settings: &mut OverlaySettings, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Integer(n) => {
            settings.history_capacity = n;
            Ok(())
        }
        _ => Err(SettingError::ValidationError("Expected integer".to_string())),
    }
}

fn set_max_search_words(
    settings: &mut OverlaySettings,
    value: SettingValue,
) -> Result<(), SettingError> {
    match value {
        SettingValue::Integer(n) => {
            settings.max_search_words = n;
            Ok(())
        }
        _ => Err(SettingError::ValidationError("Expected integer".to_string())),
    }
}

fn set_prev_keys(settings: &mut OverlaySettings, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Keys(keys) if !keys.is_empty() => {
            settings.navigation.previous = keys;
            Ok(())
        }
        SettingValue::Keys(_) => Err(SettingError::ValidationError(
            "No usable key specs".to_string(),
        )),
        _ => Err(SettingError::ValidationError("Expected key list".to_string())),
    }
}

fn set_next_keys(settings: &mut OverlaySettings, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Keys(keys) if !keys.is_empty() => {
            settings.navigation.next = keys;
            Ok(())
        }
        SettingValue::Keys(_) => Err(SettingError::ValidationError(
            "No usable key specs".to_string(),
        )),
        _ => Err(SettingError::ValidationError("Expected key list".to_string())),
    }
}

/// Static registry of all overlay settings
static SETTINGS: &[SettingDescriptor<OverlaySettings>] = &[
    SettingDescriptor {
        name: "cmdfloat_highlight_completions",
        description: "Highlight matched characters in completion rows",
        ty: SettingType::Boolean,
        set: set_highlight_completions,
    },
    SettingDescriptor {
        name: "cmdfloat_history_size",
        description: "Entries kept per history",
        ty: SettingType::Integer {
            min: Some(1),
            max: None,
        },
        set: set_history_size,
    },
    SettingDescriptor {
        name: "cmdfloat_max_search_words",
        description: "Maximum document words offered as search completions",
        ty: SettingType::Integer {
            min: Some(1),
            max: None,
        },
        set: set_max_search_words,
    },
    SettingDescriptor {
        name: "cmdfloat_completion_prev_keys",
        description: "Keys that select the previous completion",
        ty: SettingType::KeyList,
        set: set_prev_keys,
    },
    SettingDescriptor {
        name: "cmdfloat_completion_next_keys",
        description: "Keys that select the next completion",
        ty: SettingType::KeyList,
        set: set_next_keys,
    },
];

/// Registry over every overlay setting
#[must_use]
pub fn create_settings_registry() -> SettingsRegistry<OverlaySettings> {
    SettingsRegistry::new(SETTINGS)
}
