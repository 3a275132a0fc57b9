//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueHint};

use crate::config::RawSettings;

/// Render directory trees as ASCII-art diagrams
#[derive(Parser, Debug)]
#[command(name = "asciitree")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
pub struct Cli {
    /// Increase log verbosity (-d info, -dd debug, -ddd trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub debug: u8,

    #[command(flatten)]
    pub render: RenderArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Options for rendering a directory
#[derive(Args, Debug, Default, Clone)]
pub struct RenderArgs {
    /// Directory to render (default: current directory)
    #[arg(value_hint = ValueHint::DirPath)]
    pub dir: Option<PathBuf>,

    /// Include hidden entries
    #[arg(short, long)]
    pub all: bool,

    /// List directories before files
    #[arg(long)]
    pub dirs_first: bool,

    /// Keep filesystem order instead of sorting by name
    #[arg(short = 'U', long)]
    pub unsorted: bool,

    /// Descend at most LEVEL directories
    #[arg(short = 'L', long, value_name = "LEVEL")]
    pub max_depth: Option<usize>,

    /// Skip entries whose name matches PATTERN (regex, repeatable)
    #[arg(short = 'I', long, value_name = "PATTERN")]
    pub exclude: Vec<String>,

    /// Show file sizes below file names
    #[arg(short, long)]
    pub size: bool,

    /// Follow symbolic links to directories
    #[arg(short = 'l', long)]
    pub follow_links: bool,
}

impl RenderArgs {
    /// Flags as a settings overlay: only flags actually given override.
    pub fn to_overrides(&self) -> RawSettings {
        RawSettings {
            sort: self.unsorted.then_some(false),
            dirs_first: self.dirs_first.then_some(true),
            show_hidden: self.all.then_some(true),
            follow_links: self.follow_links.then_some(true),
            show_size: self.size.then_some(true),
            max_depth: self.max_depth,
            exclude: (!self.exclude.is_empty()).then(|| self.exclude.clone()),
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show merged config for a directory
    Show {
        /// Directory whose local config is merged (default: cwd)
        #[arg(value_hint = ValueHint::DirPath)]
        dir: Option<PathBuf>,
    },

    /// Create config template
    Init {
        /// Create global config instead of ./.asciitree.toml
        #[arg(short, long)]
        global: bool,
        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Show config paths
    Path,
}
