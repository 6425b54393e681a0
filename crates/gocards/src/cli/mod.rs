//! Command-line interface for gocards.
//!
//! This module provides the CLI structure for the `gocards` binary.

mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckCommand, ConfigCommand, FilterArg, ListCommand, OutputFormat, ProgressCommand,
    StatsCommand, StudyCommand,
};

/// gocards - Go interview flashcards in your terminal
///
/// Flip through a deck of Go interview questions, mark the ones you know,
/// and pick up where you left off next time.
#[derive(Debug, Parser)]
#[command(name = "gocards")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Path to a deck JSON file (overrides configuration)
    #[arg(short, long, global = true, value_name = "FILE")]
    pub deck: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Study the deck interactively
    Study(StudyCommand),

    /// List cards in the deck
    List(ListCommand),

    /// Show study statistics
    Stats(StatsCommand),

    /// Validate a deck file
    Check(CheckCommand),

    /// View or reset saved study progress
    #[command(subcommand)]
    Progress(ProgressCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.quiet, self.verbose)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn stats_cli(quiet: bool, verbose: u8) -> Cli {
        Cli {
            config: None,
            deck: None,
            verbose,
            quiet,
            command: Command::Stats(StatsCommand { json: false }),
        }
    }

    #[test]
    fn test_cli_name() {
        let cli = Cli::command();
        assert_eq!(cli.get_name(), "gocards");
    }

    #[test]
    fn test_cli_verify() {
        // Verify the CLI structure is valid
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_quiet() {
        assert_eq!(
            stats_cli(true, 0).verbosity(),
            crate::logging::Verbosity::Quiet
        );
    }

    #[test]
    fn test_verbosity_normal() {
        assert_eq!(
            stats_cli(false, 0).verbosity(),
            crate::logging::Verbosity::Normal
        );
    }

    #[test]
    fn test_verbosity_verbose_and_trace() {
        assert_eq!(
            stats_cli(false, 1).verbosity(),
            crate::logging::Verbosity::Verbose
        );
        assert_eq!(
            stats_cli(false, 3).verbosity(),
            crate::logging::Verbosity::Trace
        );
    }

    #[test]
    fn test_parse_study() {
        let args = vec!["gocards", "study"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(cli.command, Command::Study(_)));
    }

    #[test]
    fn test_parse_study_with_flags() {
        let args = vec!["gocards", "study", "-f", "intermediate", "-s", "-u"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Study(cmd) = cli.command else {
            panic!("expected study command");
        };
        assert_eq!(cmd.filter, Some(FilterArg::Intermediate));
        assert!(cmd.shuffle);
        assert!(cmd.study_mode);
        assert!(cmd.seed.is_none());
    }

    #[test]
    fn test_parse_study_with_seed() {
        let args = vec!["gocards", "study", "--seed", "42"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Study(cmd) = cli.command else {
            panic!("expected study command");
        };
        assert_eq!(cmd.seed, Some(42));
    }

    #[test]
    fn test_parse_list() {
        let args = vec!["gocards", "list", "--format", "json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::List(cmd) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(cmd.format, OutputFormat::Json);
        assert!(!cmd.unstudied);
    }

    #[test]
    fn test_parse_stats() {
        let args = vec!["gocards", "stats", "--json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Stats(cmd) = cli.command else {
            panic!("expected stats command");
        };
        assert!(cmd.json);
    }

    #[test]
    fn test_parse_check_with_file() {
        let args = vec!["gocards", "check", "cards.json"];
        let cli = Cli::try_parse_from(args).unwrap();
        let Command::Check(cmd) = cli.command else {
            panic!("expected check command");
        };
        assert_eq!(cmd.file, Some(PathBuf::from("cards.json")));
    }

    #[test]
    fn test_parse_progress_reset() {
        let args = vec!["gocards", "progress", "reset", "--yes"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Progress(ProgressCommand::Reset { yes: true })
        ));
    }

    #[test]
    fn test_parse_config_show() {
        let args = vec!["gocards", "config", "show"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(matches!(
            cli.command,
            Command::Config(ConfigCommand::Show { json: false })
        ));
    }

    #[test]
    fn test_parse_with_config() {
        let args = vec!["gocards", "-c", "/custom/config.toml", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/custom/config.toml")));
    }

    #[test]
    fn test_parse_with_deck_override() {
        let args = vec!["gocards", "-d", "/decks/go.json", "list"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.deck, Some(PathBuf::from("/decks/go.json")));
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let args = vec!["gocards", "study", "-v"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert_eq!(cli.verbose, 1);
    }

    #[test]
    fn test_parse_with_quiet() {
        let args = vec!["gocards", "-q", "stats"];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.quiet);
    }

    #[test]
    fn test_parse_rejects_unknown_filter() {
        let args = vec!["gocards", "study", "-f", "expert"];
        assert!(Cli::try_parse_from(args).is_err());
    }
}
