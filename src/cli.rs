use std::path::PathBuf;

use clap::Parser;

use crate::editor::InitialLayout;

/// Command-line arguments
#[derive(Parser, Debug)]
#[command(name = "sno", version, about = "A modal text editor")]
pub struct Cli {
    /// Files to edit (an empty buffer when omitted)
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Open one window per file, stacked
    #[arg(short = 'o', long = "open-split", conflicts_with = "open_vsplit")]
    pub open_split: bool,

    /// Open one window per file, side by side
    #[arg(short = 'O', long = "open-vsplit")]
    pub open_vsplit: bool,

    /// Config file to use instead of the default one
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Log file to write instead of the default one
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn layout(&self) -> InitialLayout {
        if self.open_split {
            InitialLayout::HorizontalSplits
        } else if self.open_vsplit {
            InitialLayout::VerticalSplits
        } else {
            InitialLayout::Buffers
        }
    }
}
