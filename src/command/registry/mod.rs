//! Command registry
//! Command definitions with alias and prefix matching, shared by ex
//! commands and `:set` option names

/// Result of matching a command input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchResult {
    /// Command name or explicit alias
    Exact(String),
    /// Shortest unambiguous prefix match
    Prefix(String),
    /// Several commands share the prefix
    Ambiguous { prefix: String, matches: Vec<String> },
    Unknown(String),
}

/// Command definition
#[derive(Debug, Clone)]
pub struct CommandDef {
    /// Canonical command name
    pub name: String,
    /// Explicit aliases for this command
    pub aliases: Vec<String>,
}

impl CommandDef {
    pub fn new(name: impl Into<String>) -> Self {
        CommandDef {
            name: name.into(),
            aliases: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_aliases<S: Into<String>>(mut self, aliases: impl IntoIterator<Item = S>) -> Self {
        self.aliases.extend(aliases.into_iter().map(Into::into));
        self
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}

/// Command registry
#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: Vec<CommandDef>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        CommandRegistry {
            commands: Vec::new(),
        }
    }

    pub fn register(mut self, cmd: CommandDef) -> Self {
        self.commands.push(cmd);
        self
    }

    pub fn register_all(mut self, cmds: impl IntoIterator<Item = CommandDef>) -> Self {
        self.commands.extend(cmds);
        self
    }

    /// Match an input string to a command
    ///
    /// Matching order:
    /// 1. Exact match against command name or explicit alias
    /// 2. Unique prefix of a name or alias
    /// 3. Ambiguous if several commands share the prefix
    /// 4. Unknown otherwise
    ///
    /// Matching is case-insensitive.
    pub fn match_command(&self, input: &str) -> MatchResult {
        let input = input.trim().to_lowercase();
        if input.is_empty() {
            return MatchResult::Unknown(input);
        }

        if let Some(cmd) = self
            .commands
            .iter()
            .find(|cmd| cmd.names().any(|n| n.to_lowercase() == input))
        {
            return MatchResult::Exact(cmd.name.clone());
        }

        let matches: Vec<String> = self
            .commands
            .iter()
            .filter(|cmd| cmd.names().any(|n| n.to_lowercase().starts_with(&input)))
            .map(|cmd| cmd.name.clone())
            .collect();

        match matches.len() {
            0 => MatchResult::Unknown(input),
            1 => MatchResult::Prefix(matches[0].clone()),
            _ => MatchResult::Ambiguous {
                prefix: input,
                matches,
            },
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandDef> {
        self.commands.iter().find(|c| c.name == name)
    }

    /// Get all registered command names
    pub fn command_names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name.as_str()).collect()
    }
}

#[cfg(test)]
#[path = "tests.rs"]
mod tests;
