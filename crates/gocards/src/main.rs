//! `gocards` - study Go interview flashcards in the terminal.
//!
//! This binary wires the deck, session, and storage layers to the CLI and
//! the interactive study screen.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::Path;

use clap::Parser;
use serde::Serialize;
use tracing::warn;

use gocards::cli::{
    CheckCommand, Cli, Command, ConfigCommand, ListCommand, OutputFormat, ProgressCommand,
    StatsCommand, StudyCommand,
};
use gocards::tui::{self, StudyApp, StudyOptions};
use gocards::{
    init_logging, CardId, Config, Deck, Difficulty, Filter, MemoryProgressStore, ProgressStore,
    SqliteProgressStore, StudyProgress, StudySession, StudyStats,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;
    let deck_override = cli.deck.clone();

    // Execute the command
    match cli.command {
        Command::Study(cmd) => handle_study(deck_override.as_deref(), &config, &cmd),
        Command::List(cmd) => handle_list(deck_override.as_deref(), &config, &cmd),
        Command::Stats(cmd) => handle_stats(deck_override.as_deref(), &config, &cmd),
        Command::Check(cmd) => handle_check(deck_override.as_deref(), &config, &cmd),
        Command::Progress(cmd) => handle_progress(deck_override.as_deref(), &config, cmd),
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Load the deck named on the command line, in config, or built in.
fn load_deck(deck_override: Option<&Path>, config: &Config) -> gocards::Result<Deck> {
    match deck_override
        .map(Path::to_path_buf)
        .or_else(|| config.deck_path())
    {
        Some(path) => Deck::load(path),
        None => Deck::builtin(),
    }
}

/// Open the progress store, falling back to memory if the database is
/// unusable. The bool is true when the fallback was taken.
fn open_store(config: &Config) -> (Box<dyn ProgressStore>, bool) {
    match SqliteProgressStore::open(config.database_path()) {
        Ok(store) => (Box::new(store), false),
        Err(e) => {
            warn!("progress database unavailable, continuing in memory: {e}");
            (Box::new(MemoryProgressStore::new()), true)
        }
    }
}

fn handle_study(
    deck_override: Option<&Path>,
    config: &Config,
    cmd: &StudyCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let deck = load_deck(deck_override, config)?;
    let (store, degraded) = open_store(config);

    let options = StudyOptions {
        filter: cmd
            .filter
            .map_or_else(|| config.initial_filter(), Filter::from),
        study_mode: cmd.study_mode || config.study.study_mode_on_start,
        shuffle: cmd.shuffle || config.study.shuffle_on_start,
        seed: cmd.seed,
    };

    let mut app = StudyApp::new(deck, store, options);
    if degraded {
        app.mark_persistence_degraded();
    }
    tui::run(&mut app)?;

    let stats = StudyStats::collect(app.deck(), app.progress());
    println!("studied {}/{} cards", stats.studied_cards, stats.total_cards);
    Ok(())
}

fn handle_list(
    deck_override: Option<&Path>,
    config: &Config,
    cmd: &ListCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let deck = load_deck(deck_override, config)?;
    let (store, _) = open_store(config);
    let progress = store.load();

    // The list shares the session's selection logic, so `list --filter` and
    // the study screen always agree on what is in scope.
    let filter = cmd.filter.map_or(Filter::All, Filter::from);
    let session = StudySession::with_options(&deck, &progress, filter, cmd.unstudied);

    if session.is_empty() {
        println!("no cards match the current selection");
        return Ok(());
    }

    let cards = session
        .ordered_ids()
        .iter()
        .filter_map(|&id| deck.get(id));

    match cmd.format {
        OutputFormat::Plain => {
            for card in cards {
                println!("{}. {}", card.id, card.question);
            }
        }
        OutputFormat::Table => {
            println!("{:<4} {:<13} {:<8} {}", "ID", "DIFFICULTY", "STUDIED", "QUESTION");
            for card in cards {
                let studied = if progress.is_studied(card.id) { "yes" } else { "no" };
                println!(
                    "{:<4} {:<13} {:<8} {}",
                    card.id,
                    card.difficulty,
                    studied,
                    truncate(&card.question, 60)
                );
            }
        }
        OutputFormat::Json => {
            let entries: Vec<ListEntry> = cards
                .map(|card| ListEntry {
                    id: card.id,
                    difficulty: card.difficulty,
                    studied: progress.is_studied(card.id),
                    question: &card.question,
                    answer: &card.answer,
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&entries)?);
        }
    }
    Ok(())
}

fn handle_stats(
    deck_override: Option<&Path>,
    config: &Config,
    cmd: &StatsCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let deck = load_deck(deck_override, config)?;
    let (store, _) = open_store(config);
    let stats = StudyStats::collect(&deck, &store.load());

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("gocards stats");
        println!("-------------");
        println!(
            "Studied:       {}/{} ({:.0}%)",
            stats.studied_cards,
            stats.total_cards,
            stats.ratio() * 100.0
        );
        println!();
        for tier in &stats.by_difficulty {
            println!("  {:<13} {}/{}", tier.difficulty, tier.studied, tier.cards);
        }
    }
    Ok(())
}

fn handle_check(
    deck_override: Option<&Path>,
    config: &Config,
    cmd: &CheckCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    let result = match cmd
        .file
        .clone()
        .or_else(|| deck_override.map(Path::to_path_buf))
        .or_else(|| config.deck_path())
    {
        Some(path) => {
            println!("Checking {}", path.display());
            Deck::load(path)
        }
        None => {
            println!("Checking built-in deck");
            Deck::builtin()
        }
    };

    let deck = result?;
    println!("Deck is valid: {} cards", deck.len());
    for difficulty in Difficulty::ALL {
        println!("  {:<13} {}", difficulty, deck.count_at(difficulty));
    }
    Ok(())
}

fn handle_progress(
    deck_override: Option<&Path>,
    config: &Config,
    cmd: ProgressCommand,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ProgressCommand::Show { json } => {
            let deck = load_deck(deck_override, config)?;
            let (store, _) = open_store(config);
            let progress = store.load();

            if json {
                println!("{}", serde_json::to_string_pretty(&progress)?);
            } else if progress.is_empty() {
                println!("No saved study progress.");
            } else {
                for (id, at) in progress.iter() {
                    let label = deck.get(id).map_or_else(
                        || "(not in current deck)".to_string(),
                        |card| truncate(&card.question, 50),
                    );
                    println!("{:>4}  {}  {}", id, at.format("%Y-%m-%d %H:%M"), label);
                }
            }
        }
        ProgressCommand::Reset { yes } => {
            if !yes {
                println!("This will clear all saved study progress.");
                println!("Use --yes to confirm.");
                return Ok(());
            }
            let (mut store, degraded) = open_store(config);
            if degraded {
                println!("Progress storage is unavailable; nothing to reset.");
                return Ok(());
            }
            store.save(&StudyProgress::new())?;
            println!("Study progress cleared.");
        }
    }
    Ok(())
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Deck]");
                match config.deck_path() {
                    Some(path) => println!("  Deck file:          {}", path.display()),
                    None => println!("  Deck file:          <built-in>"),
                }
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!();
                println!("[Study]");
                println!("  Initial filter:     {}", config.initial_filter().label());
                println!("  Shuffle on start:   {}", config.study.shuffle_on_start);
                println!("  Study mode:         {}", config.study.study_mode_on_start);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}

/// One card in `list --format json` output.
#[derive(Debug, Serialize)]
struct ListEntry<'a> {
    id: CardId,
    difficulty: Difficulty,
    studied: bool,
    question: &'a str,
    answer: &'a str,
}

/// Shorten text to at most `max_chars` characters for table cells.
fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max_chars.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_short_text_unchanged() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn test_truncate_long_text() {
        let long = "a".repeat(80);
        let cut = truncate(&long, 60);
        assert_eq!(cut.chars().count(), 60);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_truncate_is_char_safe() {
        let text = "über".repeat(20);
        let cut = truncate(&text, 10);
        assert!(cut.chars().count() <= 10);
    }

    #[test]
    fn test_load_deck_builtin_by_default() {
        let deck = load_deck(None, &Config::default()).unwrap();
        assert!(!deck.is_empty());
    }

    #[test]
    fn test_load_deck_override_beats_config() {
        let mut config = Config::default();
        config.deck.path = Some("/nonexistent/config-deck.json".into());

        // The override path wins, so the error names it.
        let err = load_deck(Some(Path::new("/nonexistent/override.json")), &config)
            .unwrap_err()
            .to_string();
        assert!(err.contains("override.json"));
    }
}
