//! Command definitions
//! Declarative registry of all ex commands

use super::registry::MatchResult;
use super::types::{BufferTarget, ParsedCommand};
use crate::config::{Config, SettingsRegistry};
use crate::split::SplitDirection;

/// Function pointer type for command factories
/// Takes the settings registry, arguments, and bang count, returns a ParsedCommand
pub type CommandFactory = fn(&SettingsRegistry<Config>, &[&str], usize) -> ParsedCommand;

/// Descriptor for a command
#[derive(Clone, Copy)]
pub struct CommandDescriptor {
    /// Canonical name of the command
    pub name: &'static str,
    pub aliases: &'static [&'static str],
    /// Description for help text
    pub description: &'static str,
    pub factory: CommandFactory,
}

fn invalid(command: &str, reason: impl Into<String>) -> ParsedCommand {
    ParsedCommand::Invalid {
        command: command.to_string(),
        reason: reason.into(),
    }
}

/// Zero or one path argument
fn optional_path(command: &str, args: &[&str]) -> Result<Option<String>, ParsedCommand> {
    match args {
        [] => Ok(None),
        [path] => Ok(Some(path.to_string())),
        _ => Err(invalid(command, "too many arguments")),
    }
}

fn no_args(command: &str, args: &[&str], parsed: ParsedCommand) -> ParsedCommand {
    if args.is_empty() {
        parsed
    } else {
        invalid(command, "takes no arguments")
    }
}

// Factory functions

fn parse_edit(_registry: &SettingsRegistry<Config>, args: &[&str], bangs: usize) -> ParsedCommand {
    let (line, rest) = match args.split_first() {
        Some((first, rest)) => match first.strip_prefix('+') {
            Some(number) => match number.parse::<usize>() {
                Ok(n) => (Some(n), rest),
                Err(_) => return invalid("edit", format!("invalid line number: {first}")),
            },
            None => (None, args),
        },
        None => (None, args),
    };
    match optional_path("edit", rest) {
        Ok(path) => ParsedCommand::Edit { path, line, bangs },
        Err(e) => e,
    }
}

fn parse_write(_registry: &SettingsRegistry<Config>, args: &[&str], bangs: usize) -> ParsedCommand {
    match optional_path("write", args) {
        Ok(path) => ParsedCommand::Write { path, bangs },
        Err(e) => e,
    }
}

fn parse_wall(_registry: &SettingsRegistry<Config>, args: &[&str], bangs: usize) -> ParsedCommand {
    no_args("wall", args, ParsedCommand::WriteAll { bangs })
}

fn parse_quit(_registry: &SettingsRegistry<Config>, args: &[&str], bangs: usize) -> ParsedCommand {
    no_args("quit", args, ParsedCommand::Quit { bangs })
}

fn parse_qall(_registry: &SettingsRegistry<Config>, args: &[&str], bangs: usize) -> ParsedCommand {
    no_args("qall", args, ParsedCommand::QuitAll { bangs })
}

fn parse_write_quit(
    _registry: &SettingsRegistry<Config>,
    args: &[&str],
    bangs: usize,
) -> ParsedCommand {
    match optional_path("wq", args) {
        Ok(path) => ParsedCommand::WriteQuit { path, bangs },
        Err(e) => e,
    }
}

fn parse_bnext(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    no_args("bnext", args, ParsedCommand::BufferNext)
}

fn parse_bprev(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    no_args("bprevious", args, ParsedCommand::BufferPrevious)
}

fn parse_buffer(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    match args {
        [] => invalid("buffer", "usage: :buffer N|name"),
        [arg] => match arg.parse::<usize>() {
            Ok(0) => invalid("buffer", "buffer numbers start at 1"),
            Ok(n) => ParsedCommand::Buffer {
                target: BufferTarget::Index(n),
            },
            Err(_) => ParsedCommand::Buffer {
                target: BufferTarget::Name(arg.to_string()),
            },
        },
        _ => ParsedCommand::Buffer {
            target: BufferTarget::Name(args.join(" ")),
        },
    }
}

fn parse_bdelete(_registry: &SettingsRegistry<Config>, args: &[&str], bangs: usize) -> ParsedCommand {
    no_args("bdelete", args, ParsedCommand::BufferDelete { bangs })
}

fn parse_blist(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    no_args("buffers", args, ParsedCommand::BufferList)
}

fn parse_split(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    match optional_path("split", args) {
        Ok(path) => ParsedCommand::Split {
            direction: SplitDirection::Horizontal,
            path,
        },
        Err(e) => e,
    }
}

fn parse_vsplit(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    match optional_path("vsplit", args) {
        Ok(path) => ParsedCommand::Split {
            direction: SplitDirection::Vertical,
            path,
        },
        Err(e) => e,
    }
}

fn parse_only(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    no_args("only", args, ParsedCommand::Only)
}

fn parse_wnext(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    no_args("wnext", args, ParsedCommand::WindowNext)
}

fn parse_wprev(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    no_args("wprevious", args, ParsedCommand::WindowPrevious)
}

fn parse_echo(_registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    ParsedCommand::Echo {
        message: args.join(" "),
    }
}

fn parse_messages(
    _registry: &SettingsRegistry<Config>,
    args: &[&str],
    _bangs: usize,
) -> ParsedCommand {
    no_args("messages", args, ParsedCommand::Messages)
}

/// Resolve an option name, keeping unknown names for the executor to report
fn resolve_option(registry: &SettingsRegistry<Config>, name: &str) -> Result<String, ParsedCommand> {
    match registry.build_option_registry().match_command(name) {
        MatchResult::Exact(n) | MatchResult::Prefix(n) => Ok(n),
        MatchResult::Ambiguous { prefix, matches } => {
            Err(ParsedCommand::Ambiguous { prefix, matches })
        }
        MatchResult::Unknown(_) => Ok(name.to_string()),
    }
}

fn is_boolean_option(registry: &SettingsRegistry<Config>, name: &str) -> bool {
    registry
        .resolve(name)
        .map(|d| d.ty.is_boolean())
        .unwrap_or(false)
}

// Set command logic
//
//   :set               list every option
//   :set name          enable a boolean, show anything else
//   :set name?         show, booleans included
//   :set noname        disable a boolean
//   :set name=value    assign
//   :set name value    assign
fn parse_set(registry: &SettingsRegistry<Config>, args: &[&str], _bangs: usize) -> ParsedCommand {
    let (option_str, rest) = match args.split_first() {
        None => return ParsedCommand::SetAll,
        Some(split) => split,
    };
    let option_str: &str = option_str;

    let set = |name: &str, value: Option<String>| match resolve_option(registry, name) {
        Ok(option) => ParsedCommand::Set { option, value },
        Err(ambiguous) => ambiguous,
    };

    if let Some((name, value)) = option_str.split_once('=') {
        if !rest.is_empty() {
            return invalid("set", "too many arguments");
        }
        return set(name, Some(value.to_string()));
    }

    match rest {
        [] => {}
        [value] => return set(option_str, Some(value.to_string())),
        _ => return invalid("set", "too many arguments"),
    }

    if let Some(name) = option_str.strip_suffix('?') {
        return set(name, None);
    }

    // "no" prefix turns a boolean off, unless the whole word names an option
    let option_lower = option_str.to_lowercase();
    if let Some(name) = option_lower.strip_prefix("no") {
        if !name.is_empty()
            && registry.resolve(&option_lower).is_err()
            && is_boolean_option(registry, name)
        {
            return set(name, Some("false".to_string()));
        }
    }

    let enable = is_boolean_option(registry, option_str).then(|| "true".to_string());
    set(option_str, enable)
}

/// Static registry of all commands
pub const COMMANDS: &[CommandDescriptor] = &[
    CommandDescriptor {
        name: "edit",
        aliases: &["e"],
        description: "Edit a file",
        factory: parse_edit,
    },
    CommandDescriptor {
        name: "write",
        aliases: &["w"],
        description: "Save the current file",
        factory: parse_write,
    },
    CommandDescriptor {
        name: "wall",
        aliases: &["wa"],
        description: "Save every modified buffer",
        factory: parse_wall,
    },
    CommandDescriptor {
        name: "quit",
        aliases: &["q"],
        description: "Close the current window",
        factory: parse_quit,
    },
    CommandDescriptor {
        name: "qall",
        aliases: &["qa", "quitall"],
        description: "Quit the editor",
        factory: parse_qall,
    },
    CommandDescriptor {
        name: "wq",
        aliases: &["x", "xit"],
        description: "Save the current file and close the window",
        factory: parse_write_quit,
    },
    CommandDescriptor {
        name: "bnext",
        aliases: &["bn"],
        description: "Next buffer",
        factory: parse_bnext,
    },
    CommandDescriptor {
        name: "bprevious",
        aliases: &["bp", "bprev"],
        description: "Previous buffer",
        factory: parse_bprev,
    },
    CommandDescriptor {
        name: "buffer",
        aliases: &["b"],
        description: "Select a buffer by number or name",
        factory: parse_buffer,
    },
    CommandDescriptor {
        name: "bdelete",
        aliases: &["bd"],
        description: "Close the current buffer",
        factory: parse_bdelete,
    },
    CommandDescriptor {
        name: "buffers",
        aliases: &["ls"],
        description: "List buffers",
        factory: parse_blist,
    },
    CommandDescriptor {
        name: "split",
        aliases: &["sp", "hsplit", "hs"],
        description: "Split the window horizontally",
        factory: parse_split,
    },
    CommandDescriptor {
        name: "vsplit",
        aliases: &["vs"],
        description: "Split the window vertically",
        factory: parse_vsplit,
    },
    CommandDescriptor {
        name: "only",
        aliases: &["on"],
        description: "Close all other windows",
        factory: parse_only,
    },
    CommandDescriptor {
        name: "wnext",
        aliases: &["wn"],
        description: "Focus the next window",
        factory: parse_wnext,
    },
    CommandDescriptor {
        name: "wprevious",
        aliases: &["wp"],
        description: "Focus the previous window",
        factory: parse_wprev,
    },
    CommandDescriptor {
        name: "set",
        aliases: &["se"],
        description: "Set an option",
        factory: parse_set,
    },
    CommandDescriptor {
        name: "echo",
        aliases: &["ec"],
        description: "Show a message",
        factory: parse_echo,
    },
    CommandDescriptor {
        name: "messages",
        aliases: &["mes"],
        description: "Show the message log",
        factory: parse_messages,
    },
];
