//! sno - a modal text editor core
//!
//! Buffers, a split-window layout and pooled language server sessions,
//! driven through ex commands.

pub mod buffer;
pub mod cli;
pub mod command;
pub mod config;
pub mod constants;
pub mod editor;
pub mod error;
pub mod filetype;
pub mod job_manager;
pub mod logging;
pub mod lsp;
pub mod notification;
pub mod split;
pub mod window;

#[cfg(test)]
pub mod test_utils;
