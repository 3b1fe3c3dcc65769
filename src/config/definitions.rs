//! Settings definitions
//! Declarative registry of all :set options

use super::descriptor::{SettingDescriptor, SettingError, SettingType, SettingValue};
use super::registry::SettingsRegistry;
use super::Config;

fn expect_bool(value: SettingValue) -> Result<bool, SettingError> {
    match value {
        SettingValue::Bool(b) => Ok(b),
        _ => Err(SettingError::ValidationError("Expected boolean".to_string())),
    }
}

fn expect_integer(value: SettingValue) -> Result<usize, SettingError> {
    match value {
        SettingValue::Integer(n) => Ok(n),
        _ => Err(SettingError::ValidationError(
            "Expected integer".to_string(),
        )),
    }
}

// Setter and getter functions for each setting

fn set_colorscheme(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Text(name) => {
            config.colorscheme = name;
            Ok(())
        }
        _ => Err(SettingError::ValidationError("Expected string".to_string())),
    }
}

fn get_colorscheme(config: &Config) -> SettingValue {
    SettingValue::Text(config.colorscheme.clone())
}

fn set_color_depth(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    match value {
        SettingValue::Enum(depth) => {
            config.color_depth = depth.parse().map_err(|_| {
                SettingError::ValidationError(format!("Unsupported color depth: {depth}"))
            })?;
            Ok(())
        }
        _ => Err(SettingError::ValidationError("Expected enum".to_string())),
    }
}

fn get_color_depth(config: &Config) -> SettingValue {
    SettingValue::Enum(config.color_depth.to_string())
}

fn set_use_nerd_icons(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    config.use_nerd_icons = expect_bool(value)?;
    Ok(())
}

fn get_use_nerd_icons(config: &Config) -> SettingValue {
    SettingValue::Bool(config.use_nerd_icons)
}

fn set_number(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    config.show_line_numbers = expect_bool(value)?;
    Ok(())
}

fn get_number(config: &Config) -> SettingValue {
    SettingValue::Bool(config.show_line_numbers)
}

fn set_relative_number(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    config.show_relative_numbers = expect_bool(value)?;
    Ok(())
}

fn get_relative_number(config: &Config) -> SettingValue {
    SettingValue::Bool(config.show_relative_numbers)
}

fn set_expandtabs(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    config.expandtabs = expect_bool(value)?;
    Ok(())
}

fn get_expandtabs(config: &Config) -> SettingValue {
    SettingValue::Bool(config.expandtabs)
}

fn set_tabstop(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    let n = expect_integer(value)?;
    if n == 0 {
        return Err(SettingError::ValidationError(
            "tabstop must be greater than 0".to_string(),
        ));
    }
    config.tabstop = n;
    Ok(())
}

fn get_tabstop(config: &Config) -> SettingValue {
    SettingValue::Integer(config.tabstop)
}

fn set_list(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    config.show_unprintable_characters = expect_bool(value)?;
    Ok(())
}

fn get_list(config: &Config) -> SettingValue {
    SettingValue::Bool(config.show_unprintable_characters)
}

fn set_clipboard(config: &mut Config, value: SettingValue) -> Result<(), SettingError> {
    config.use_system_clipboard = expect_bool(value)?;
    Ok(())
}

fn get_clipboard(config: &Config) -> SettingValue {
    SettingValue::Bool(config.use_system_clipboard)
}

/// Global settings registry
/// SETTINGS
const SETTINGS: &[SettingDescriptor<Config>] = &[
    SettingDescriptor {
        name: "colorscheme",
        aliases: &["colo"],
        description: "Name of the color theme",
        ty: SettingType::Text,
        set: set_colorscheme,
        get: get_colorscheme,
    },
    SettingDescriptor {
        name: "color_depth",
        aliases: &["cdepth"],
        description: "Terminal color depth in bits",
        ty: SettingType::Enum {
            variants: &["8", "24"],
        },
        set: set_color_depth,
        get: get_color_depth,
    },
    SettingDescriptor {
        name: "use_nerd_icons",
        aliases: &["nerd"],
        description: "Use nerd font glyphs",
        ty: SettingType::Boolean,
        set: set_use_nerd_icons,
        get: get_use_nerd_icons,
    },
    SettingDescriptor {
        name: "number",
        aliases: &["nu", "show_line_numbers"],
        description: "Show line numbers",
        ty: SettingType::Boolean,
        set: set_number,
        get: get_number,
    },
    SettingDescriptor {
        name: "relativenumber",
        aliases: &["rnu", "show_relative_numbers"],
        description: "Show line numbers relative to the cursor",
        ty: SettingType::Boolean,
        set: set_relative_number,
        get: get_relative_number,
    },
    SettingDescriptor {
        name: "expandtabs",
        aliases: &["et", "expandtab"],
        description: "Insert spaces instead of tabs",
        ty: SettingType::Boolean,
        set: set_expandtabs,
        get: get_expandtabs,
    },
    SettingDescriptor {
        name: "tabstop",
        aliases: &["ts"],
        description: "Display width of a tab",
        ty: SettingType::Integer {
            min: Some(1),
            max: Some(64),
        },
        set: set_tabstop,
        get: get_tabstop,
    },
    SettingDescriptor {
        name: "list",
        aliases: &["show_unprintable_characters"],
        description: "Show tabs and other unprintable characters",
        ty: SettingType::Boolean,
        set: set_list,
        get: get_list,
    },
    SettingDescriptor {
        name: "clipboard",
        aliases: &["use_system_clipboard"],
        description: "Yank and paste through the system clipboard",
        ty: SettingType::Boolean,
        set: set_clipboard,
        get: get_clipboard,
    },
];

pub fn create_settings_registry() -> SettingsRegistry<Config> {
    SettingsRegistry::new(SETTINGS)
}
