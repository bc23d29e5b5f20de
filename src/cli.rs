//! Command-line interface definitions and parsing
//!
//! This module defines the CLI structure for tablib using the `clap` crate.
//! The binary works on a JSON inventory snapshot (`--snapshot`, default
//! `tabs.json`) so every operation can be run headless.
//!
//! # Commands
//!
//! - **list**: Show windows and tabs, optionally filtered (default)
//! - **plan**: Preview the window optimization plan
//! - **optimize**: Apply the optimization plan after confirmation
//! - **copy**: Copy matching tabs as links
//! - **open**: Open pasted links
//! - **parse-links**: Print the urls found in text
//! - **keys**: Show the keybind reference
//! - **config**: Inspect configuration
//!
//! # Examples
//!
//! ```no_run
//! use tablib::cli::{Cli, Commands};
//!
//! let cli = Cli::parse_args();
//! match cli.get_command() {
//!     Commands::List { query, .. } => println!("{query:?}"),
//!     _ => {}
//! }
//! ```

use crate::links::LinkFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Snapshot file used when `--snapshot` is not given
pub const DEFAULT_SNAPSHOT: &str = "tabs.json";

#[derive(Parser, Debug)]
#[command(name = "tablib")]
#[command(about = "Search, select and reorganize browser tabs", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// JSON inventory snapshot to read and update
    #[arg(short = 's', long = "snapshot", value_name = "FILE", global = true, default_value = DEFAULT_SNAPSHOT)]
    pub snapshot: PathBuf,

    /// Suppress informational output (only print results)
    #[arg(short = 'q', long = "quiet", global = true)]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// List windows and tabs, ranked by a search query
    #[command(visible_alias = "l")]
    List {
        /// Search query (fuzzy by default)
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Match the query as a plain substring
        #[arg(long = "substring")]
        substring: bool,
    },

    /// Preview how windows would be merged and split
    #[command(visible_alias = "p")]
    Plan {
        #[command(flatten)]
        thresholds: ThresholdArgs,
    },

    /// Merge small windows and split large ones
    #[command(visible_alias = "o")]
    Optimize {
        #[command(flatten)]
        thresholds: ThresholdArgs,

        /// Apply without asking for confirmation
        #[arg(short = 'y', long = "yes")]
        yes: bool,
    },

    /// Copy the tabs matching QUERY (all tabs if omitted) as links
    #[command(visible_alias = "c")]
    Copy {
        #[arg(value_name = "QUERY")]
        query: Option<String>,

        /// Link format: plain, markdown or html (overrides config)
        #[arg(short = 'f', long = "format", value_name = "FORMAT")]
        format: Option<LinkFormat>,

        /// Print the links instead of using the system clipboard
        #[arg(long = "stdout")]
        stdout: bool,
    },

    /// Open every link found in FILE (stdin if omitted)
    Open {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Add the tabs to the focused window instead of a new one
        #[arg(long = "current-window")]
        current_window: bool,
    },

    /// Print the urls found in FILE (stdin if omitted), one per line
    #[command(name = "parse-links")]
    ParseLinks {
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },

    /// Show configured keybinds
    Keys,

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

/// Raw threshold fields; blank or invalid values use the defaults
#[derive(clap::Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct ThresholdArgs {
    /// Windows with fewer tabs than this are merged
    #[arg(long = "min", value_name = "TABS")]
    pub min: Option<String>,

    /// Windows with more tabs than this are split
    #[arg(long = "max", value_name = "TABS")]
    pub max: Option<String>,
}

impl ThresholdArgs {
    /// Both fields as strings, empty when not given
    #[must_use]
    pub fn fields(&self) -> (&str, &str) {
        (
            self.min.as_deref().unwrap_or_default(),
            self.max.as_deref().unwrap_or_default(),
        )
    }

    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.min.is_some() || self.max.is_some()
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ConfigCommands {
    /// Print the effective configuration as TOML
    Show,

    /// Print the config file location
    Path,
}

impl Cli {
    /// Parse command line arguments
    #[must_use]
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Get the command, defaulting to an unfiltered list
    #[must_use]
    pub fn get_command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::List {
            query: None,
            substring: false,
        })
    }
}
