//! Settings registry
//! Applies host global variables to a settings struct through descriptors

use super::descriptor::{SettingDescriptor, SettingError, SettingType, SettingValue};
use super::keymap::parse_key_specs;
use crate::host::{GlobalValue, ScriptGlobals};

/// Settings registry
///
/// Holds static setting descriptors and applies host globals to a target.
pub struct SettingsRegistry<T: 'static> {
    /// Static array of setting descriptors
    settings: &'static [SettingDescriptor<T>],
}

impl<T: 'static> Clone for SettingsRegistry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for SettingsRegistry<T> {}

impl<T: 'static> SettingsRegistry<T> {
    /// Create a new registry from static descriptors
    #[must_use]
    pub const fn new(descriptors: &'static [SettingDescriptor<T>]) -> Self {
        SettingsRegistry {
            settings: descriptors,
        }
    }

    #[must_use]
    pub fn descriptors(&self) -> &'static [SettingDescriptor<T>] {
        self.settings
    }

    /// Convert a host value to `SettingValue` using `SettingType`
    pub(crate) fn parse_value(ty: &SettingType, value: &GlobalValue) -> Result<SettingValue, SettingError> {
        match ty {
            SettingType::Boolean => value
                .as_bool()
                .map(SettingValue::Bool)
                .ok_or_else(|| SettingError::ParseError(format!("Invalid boolean value: {value:?}"))),
            SettingType::Integer { min, max } => {
                let raw = value.as_int().ok_or_else(|| {
                    SettingError::ParseError(format!("Invalid integer value: {value:?}"))
                })?;
                let val = usize::try_from(raw).map_err(|_| {
                    SettingError::ValidationError(format!("Value {raw} is negative"))
                })?;

                if let Some(min_val) = min {
                    if val < *min_val {
                        return Err(SettingError::ValidationError(format!(
                            "Value {val} is below minimum {min_val}"
                        )));
                    }
                }
                if let Some(max_val) = max {
                    if val > *max_val {
                        return Err(SettingError::ValidationError(format!(
                            "Value {val} is above maximum {max_val}"
                        )));
                    }
                }
                Ok(SettingValue::Integer(val))
            }
            SettingType::KeyList => Ok(SettingValue::Keys(parse_key_specs(&value.as_string_list()))),
        }
    }

    /// Apply every defined global to `target`
    ///
    /// Missing globals leave the current value. Invalid ones are logged and
    /// skipped; loading never fails. Returns how many settings were applied.
    pub fn apply(&self, globals: &(impl ScriptGlobals + ?Sized), target: &mut T) -> usize {
        let mut applied = 0;
        for desc in self.settings {
            let Some(raw) = globals.global_variable(desc.name) else {
                continue;
            };
            let result = Self::parse_value(&desc.ty, &raw).and_then(|v| (desc.set)(target, v));
            match result {
                Ok(()) => applied += 1,
                Err(err) => {
                    tracing::debug!(setting = desc.name, error = %err, "ignoring invalid setting");
                }
            }
        }
        applied
    }
}
