//! Ex commands
//!
//! Command lines are matched against [`COMMANDS`] by exact name, alias,
//! then unambiguous prefix, and turned into a [`ParsedCommand`] that the
//! editor executes.

pub mod definitions;
pub mod parser;
pub mod registry;
pub mod types;

pub use definitions::{CommandDescriptor, COMMANDS};
pub use parser::CommandParser;
pub use registry::{CommandDef, CommandRegistry, MatchResult};
pub use types::{BufferTarget, ParsedCommand};
