//! Render processors
//!
//! A window hands its processors to the renderer in order, so a later
//! processor draws over an earlier one.

use crate::config::Config;
use crate::constants::ui;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Processor {
    /// Underline ranges reported by the language server
    LspDiagnostics,
    TrailingWhitespace,
    HighlightSelection,
    HighlightSearch,
    HighlightIncrementalSearch,
    MatchingBracket,
    DisplayMultipleCursors,
    /// Draw a tab as `char1` followed by `char2` up to the next tab stop
    Tabs {
        tabstop: usize,
        char1: char,
        char2: char,
    },
}

impl Processor {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LspDiagnostics => "lsp_diagnostics",
            Self::TrailingWhitespace => "trailing_whitespace",
            Self::HighlightSelection => "highlight_selection",
            Self::HighlightSearch => "highlight_search",
            Self::HighlightIncrementalSearch => "highlight_incremental_search",
            Self::MatchingBracket => "matching_bracket",
            Self::DisplayMultipleCursors => "display_multiple_cursors",
            Self::Tabs { .. } => "tabs",
        }
    }

    /// Expand the tabs of `line` the way this processor draws them.
    /// `None` for processors that do not touch tabs.
    pub fn expand_tabs(&self, line: &str) -> Option<String> {
        let Self::Tabs {
            tabstop,
            char1,
            char2,
        } = *self
        else {
            return None;
        };
        let tabstop = tabstop.max(1);
        let mut out = String::with_capacity(line.len());
        let mut column = 0;
        for ch in line.chars() {
            if ch == '\t' {
                let width = tabstop - column % tabstop;
                out.push(char1);
                out.extend(std::iter::repeat(char2).take(width - 1));
                column += width;
            } else {
                out.push(ch);
                column += 1;
            }
        }
        Some(out)
    }
}

/// Process-wide processors every window gets after its own
pub fn default_processors(config: &Config) -> Vec<Processor> {
    let (char1, char2) = if !config.show_unprintable_characters {
        (' ', ' ')
    } else if config.use_nerd_icons {
        (ui::TAB_CHAR, ui::TAB_FILL_NERD)
    } else {
        (ui::TAB_CHAR, ui::TAB_FILL)
    };

    vec![
        Processor::TrailingWhitespace,
        Processor::HighlightSelection,
        Processor::HighlightSearch,
        Processor::HighlightIncrementalSearch,
        Processor::MatchingBracket,
        Processor::DisplayMultipleCursors,
        Processor::Tabs {
            tabstop: config.tabstop,
            char1,
            char2,
        },
    ]
}

/// Window-local processors first, then the defaults
pub fn compose(local: &[Processor], defaults: &[Processor]) -> Vec<Processor> {
    local.iter().chain(defaults).cloned().collect()
}
