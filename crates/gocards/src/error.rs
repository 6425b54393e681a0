//! Error types for gocards.
//!
//! This module defines all error types used throughout the gocards crate.
//! Deck errors are fatal to the command that raised them; storage errors are
//! recoverable by design, since callers fall back to in-memory progress
//! rather than aborting a study session.

use std::path::PathBuf;
use thiserror::Error;

use crate::card::CardId;

/// The main error type for gocards operations.
#[derive(Error, Debug)]
pub enum Error {
    // === Deck Errors ===
    /// The deck file could not be read.
    #[error("failed to read deck file {path}: {source}")]
    DeckRead {
        /// Path to the deck file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The deck source is not valid card JSON.
    #[error("failed to parse deck {path}: {source}")]
    DeckParse {
        /// Path to the deck resource.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },

    /// Two cards in the deck share an id.
    #[error("deck contains duplicate card id {id}")]
    DuplicateCardId {
        /// The repeated card id.
        id: CardId,
    },

    /// A card failed validation after parsing.
    #[error("card {id} is invalid: {reason}")]
    InvalidCard {
        /// Id of the offending card.
        id: CardId,
        /// What was wrong with it.
        reason: String,
    },

    // === Storage Errors ===
    /// Failed to open or create the progress database.
    #[error("failed to open progress database at {path}: {source}")]
    DatabaseOpen {
        /// Path to the database file.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: rusqlite::Error,
    },

    /// A database query failed.
    #[error("database query failed: {0}")]
    DatabaseQuery(#[from] rusqlite::Error),

    /// The progress database schema is unusable.
    #[error("progress schema error: {message}")]
    Schema {
        /// Description of what went wrong.
        message: String,
    },

    /// Failed to create a required directory.
    #[error("failed to create directory {path}: {source}")]
    DirectoryCreate {
        /// Path that couldn't be created.
        path: PathBuf,
        /// The underlying error.
        #[source]
        source: std::io::Error,
    },

    // === Configuration Errors ===
    /// Failed to load configuration.
    #[error("failed to load configuration: {0}")]
    ConfigLoad(Box<figment::Error>),

    /// Configuration validation failed.
    #[error("invalid configuration: {message}")]
    ConfigValidation {
        /// Description of the validation failure.
        message: String,
    },

    // === I/O Errors ===
    /// File system operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // === Serialization Errors ===
    /// JSON serialization/deserialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// A specialized Result type for gocards operations.
pub type Result<T> = std::result::Result<T, Error>;

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Self::ConfigLoad(Box::new(err))
    }
}

impl Error {
    /// Create an invalid-card error.
    #[must_use]
    pub fn invalid_card(id: CardId, reason: impl Into<String>) -> Self {
        Self::InvalidCard {
            id,
            reason: reason.into(),
        }
    }

    /// Create a progress schema error.
    #[must_use]
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema {
            message: message.into(),
        }
    }

    /// Check if this error came from loading or validating a deck.
    ///
    /// Deck errors are fatal: no partially loaded deck is ever shown.
    #[must_use]
    pub fn is_deck_error(&self) -> bool {
        matches!(
            self,
            Self::DeckRead { .. }
                | Self::DeckParse { .. }
                | Self::DuplicateCardId { .. }
                | Self::InvalidCard { .. }
        )
    }
}
