use crate::split::SplitDirection;

/// How `:buffer` picks its target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferTarget {
    /// 1-based position in the window's buffer list
    Index(usize),
    Name(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedCommand {
    /// Open a file in the active window, optionally at a line
    Edit {
        path: Option<String>,
        line: Option<usize>,
        bangs: usize,
    },
    /// Write command (save file)
    Write {
        path: Option<String>,
        bangs: usize,
    },
    /// Write every modified buffer
    WriteAll {
        bangs: usize,
    },
    /// Close the active window
    Quit {
        bangs: usize,
    },
    /// Close every window
    QuitAll {
        bangs: usize,
    },
    /// Write command followed by quit
    WriteQuit {
        path: Option<String>,
        bangs: usize,
    },
    /// Switch to next buffer
    BufferNext,
    /// Switch to previous buffer
    BufferPrevious,
    /// Select a buffer of the active window
    Buffer {
        target: BufferTarget,
    },
    /// Remove the active buffer from every window
    BufferDelete {
        bangs: usize,
    },
    BufferList,
    /// Split the active window, optionally opening a file in the new one
    Split {
        direction: SplitDirection,
        path: Option<String>,
    },
    /// Close all windows but the active one
    Only,
    WindowNext,
    WindowPrevious,
    /// List every option
    SetAll,
    /// Set command with option and optional value; no value shows it
    Set {
        option: String,
        value: Option<String>,
    },
    Echo {
        message: String,
    },
    Messages,
    /// Recognised command with bad arguments
    Invalid {
        command: String,
        reason: String,
    },
    /// Unknown command
    Unknown {
        name: String,
    },
    /// Ambiguous command (multiple matches)
    Ambiguous {
        prefix: String,
        matches: Vec<String>,
    },
}
