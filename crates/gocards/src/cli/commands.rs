//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

use crate::card::Difficulty;
use crate::session::Filter;

/// Study command arguments.
#[derive(Debug, Args)]
pub struct StudyCommand {
    /// Start with only cards at this difficulty
    #[arg(short, long, value_enum)]
    pub filter: Option<FilterArg>,

    /// Shuffle the selection before the first card
    #[arg(short, long)]
    pub shuffle: bool,

    /// Hide cards already marked studied
    #[arg(short = 'u', long)]
    pub study_mode: bool,

    /// Seed for the shuffle order (random if omitted)
    #[arg(long)]
    pub seed: Option<u64>,
}

/// List command arguments.
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Only cards at this difficulty
    #[arg(short, long, value_enum)]
    pub filter: Option<FilterArg>,

    /// Only cards not yet marked studied
    #[arg(short, long)]
    pub unstudied: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// Stats command arguments.
#[derive(Debug, Args)]
pub struct StatsCommand {
    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Deck file to validate (defaults to the configured deck)
    pub file: Option<PathBuf>,
}

/// Saved-progress commands.
#[derive(Debug, Subcommand)]
pub enum ProgressCommand {
    /// Show saved study progress
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Clear all saved study progress
    Reset {
        /// Skip confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Difficulty filter argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FilterArg {
    /// Every card
    All,
    /// Only basic cards
    Basic,
    /// Only intermediate cards
    Intermediate,
    /// Only advanced cards
    Advanced,
}

impl From<FilterArg> for Filter {
    fn from(arg: FilterArg) -> Self {
        match arg {
            FilterArg::All => Self::All,
            FilterArg::Basic => Self::Difficulty(Difficulty::Basic),
            FilterArg::Intermediate => Self::Difficulty(Difficulty::Intermediate),
            FilterArg::Advanced => Self::Difficulty(Difficulty::Advanced),
        }
    }
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// Formatted table
    Table,
    /// JSON output
    Json,
}
