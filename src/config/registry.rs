//! Settings registry
//! Resolves option names and applies typed values

use super::descriptor::{SettingDescriptor, SettingError, SettingType, SettingValue};
use crate::command::registry::{CommandDef, CommandRegistry, MatchResult};

/// Holds static setting descriptors for one target type and provides
/// option name matching and `:set` execution against that target
pub struct SettingsRegistry<T: 'static> {
    settings: &'static [SettingDescriptor<T>],
}

impl<T: 'static> Clone for SettingsRegistry<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T: 'static> Copy for SettingsRegistry<T> {}

impl<T: 'static> SettingsRegistry<T> {
    #[must_use]
    pub const fn new(descriptors: &'static [SettingDescriptor<T>]) -> Self {
        SettingsRegistry {
            settings: descriptors,
        }
    }

    pub fn descriptors(&self) -> &'static [SettingDescriptor<T>] {
        self.settings
    }

    /// `CommandRegistry` over option names, for prefix and alias matching
    #[must_use]
    pub fn build_option_registry(&self) -> CommandRegistry {
        self.settings.iter().fold(CommandRegistry::new(), |registry, desc| {
            let def = desc
                .aliases
                .iter()
                .fold(CommandDef::new(desc.name), |def, alias| def.with_alias(*alias));
            registry.register(def)
        })
    }

    /// Descriptor for an option name, alias or unambiguous prefix
    pub fn resolve(&self, name: &str) -> Result<&'static SettingDescriptor<T>, SettingError> {
        let matched = match self.build_option_registry().match_command(name) {
            MatchResult::Exact(n) | MatchResult::Prefix(n) => n,
            MatchResult::Ambiguous { prefix, matches } => {
                return Err(SettingError::AmbiguousOption { prefix, matches })
            }
            MatchResult::Unknown(_) => return Err(SettingError::UnknownOption(name.to_string())),
        };
        self.settings
            .iter()
            .find(|d| d.name == matched)
            .ok_or_else(|| SettingError::UnknownOption(name.to_string()))
    }

    /// Parse a raw string according to the setting type
    pub(crate) fn parse_value(ty: &SettingType, value: &str) -> Result<SettingValue, SettingError> {
        match ty {
            SettingType::Boolean => match value.to_lowercase().as_str() {
                "true" | "1" | "on" | "yes" => Ok(SettingValue::Bool(true)),
                "false" | "0" | "off" | "no" => Ok(SettingValue::Bool(false)),
                _ => Err(SettingError::ParseError(format!(
                    "Invalid boolean value: {value}"
                ))),
            },
            SettingType::Integer { min, max } => {
                let val = value.parse::<usize>().map_err(|_| {
                    SettingError::ParseError(format!("Invalid integer value: {value}"))
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
            SettingType::Enum { variants } => {
                let val_lower = value.to_lowercase();
                variants
                    .iter()
                    .find(|v| v.to_lowercase() == val_lower)
                    .map(|canonical| SettingValue::Enum(canonical.to_string()))
                    .ok_or_else(|| {
                        SettingError::ParseError(format!(
                            "Invalid enum value: {value}. Valid values: {variants:?}"
                        ))
                    })
            }
            SettingType::Text => {
                if value.is_empty() {
                    return Err(SettingError::ValidationError(
                        "Value cannot be empty".to_string(),
                    ));
                }
                Ok(SettingValue::Text(value.to_string()))
            }
        }
    }

    /// Apply one `:set` request.
    ///
    /// With a value the option is parsed and assigned. Without one a
    /// boolean is switched on and any other option is reported. Returns
    /// the text to show, if any.
    pub fn execute_setting(
        &self,
        name: &str,
        value: Option<&str>,
        target: &mut T,
    ) -> Result<Option<String>, SettingError> {
        let desc = self.resolve(name)?;
        let typed = match value {
            Some(raw) => Self::parse_value(&desc.ty, raw)?,
            None if desc.ty.is_boolean() => SettingValue::Bool(true),
            None => return Ok(Some(desc.describe(target))),
        };
        (desc.set)(target, typed)?;
        tracing::debug!(option = desc.name, "option set");
        Ok(None)
    }

    /// Current value of `name` in `:set` form
    pub fn show(&self, name: &str, target: &T) -> Result<String, SettingError> {
        Ok(self.resolve(name)?.describe(target))
    }

    /// Every option in `:set` form, in declaration order
    pub fn list(&self, target: &T) -> Vec<String> {
        self.settings.iter().map(|d| d.describe(target)).collect()
    }
}
