//! Command parser
//! Parses ex command lines into structured commands using declarative definitions

use super::definitions::{CommandDescriptor, COMMANDS};
use super::registry::{CommandDef, CommandRegistry, MatchResult};
use super::types::ParsedCommand;
use crate::config::{Config, SettingsRegistry};

/// Command parser
pub struct CommandParser {
    registry: CommandRegistry,
    settings_registry: SettingsRegistry<Config>,
}

impl CommandParser {
    pub fn new(settings_registry: SettingsRegistry<Config>) -> Self {
        CommandParser {
            registry: Self::build_registry(),
            settings_registry,
        }
    }

    /// Build the command registry from declarative definitions
    fn build_registry() -> CommandRegistry {
        CommandRegistry::new().register_all(COMMANDS.iter().map(|desc| {
            CommandDef::new(desc.name).with_aliases(desc.aliases.iter().copied())
        }))
    }

    pub fn registry(&self) -> &CommandRegistry {
        &self.registry
    }

    /// Parse a command string
    ///
    /// A leading `:` is optional. Trailing `!` on the command word are
    /// counted as bangs.
    pub fn parse(&self, input: &str) -> ParsedCommand {
        let input = input.trim();
        let input = input.strip_prefix(':').unwrap_or(input).trim();

        let mut parts = input.split_whitespace();
        let Some(first) = parts.next() else {
            return ParsedCommand::Unknown {
                name: String::new(),
            };
        };
        let args: Vec<&str> = parts.collect();

        let (name, bangs) = Self::strip_bangs(first);
        if name.is_empty() {
            return ParsedCommand::Unknown {
                name: first.to_string(),
            };
        }

        match self.registry.match_command(name) {
            MatchResult::Exact(canonical) | MatchResult::Prefix(canonical) => {
                match Self::descriptor(&canonical) {
                    Some(desc) => (desc.factory)(&self.settings_registry, &args, bangs),
                    None => ParsedCommand::Unknown { name: canonical },
                }
            }
            MatchResult::Ambiguous { prefix, matches } => {
                ParsedCommand::Ambiguous { prefix, matches }
            }
            MatchResult::Unknown(_) => ParsedCommand::Unknown {
                name: name.to_string(),
            },
        }
    }

    fn descriptor(name: &str) -> Option<&'static CommandDescriptor> {
        COMMANDS.iter().find(|d| d.name == name)
    }

    /// Helper to strip trailing '!' from a command name
    /// Returns (name_without_bangs, bang_count)
    fn strip_bangs(input: &str) -> (&str, usize) {
        let trimmed = input.trim_end_matches('!');
        let bangs = input.len() - trimmed.len();
        (trimmed, bangs)
    }
}
