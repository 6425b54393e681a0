//! Deck loading and validation.
//!
//! A [`Deck`] is the read-only card store for one run of the program. Loading
//! is all-or-nothing: if any card fails validation the whole deck is rejected
//! and the caller sees a single error, never a partially loaded deck.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::card::{Card, CardId, Difficulty};
use crate::error::{Error, Result};

/// The deck compiled into the binary, used when no deck path is configured.
const BUILTIN_DECK: &str = include_str!("../decks/go-interview.json");

/// Path label reported in errors for the built-in deck.
const BUILTIN_PATH: &str = "<builtin>";

/// An immutable, validated collection of cards.
#[derive(Debug, Clone)]
pub struct Deck {
    cards: Vec<Card>,
    by_id: HashMap<CardId, usize>,
}

impl Deck {
    /// Build a deck from already-parsed cards, validating every one.
    ///
    /// Card order is preserved; it defines the default study ordering.
    ///
    /// # Errors
    ///
    /// Returns an error if any card has an empty question or answer, or if
    /// two cards share an id.
    pub fn from_cards(cards: Vec<Card>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(cards.len());
        for (index, card) in cards.iter().enumerate() {
            if card.question.trim().is_empty() {
                return Err(Error::invalid_card(card.id, "question is empty"));
            }
            if card.answer.trim().is_empty() {
                return Err(Error::invalid_card(card.id, "answer is empty"));
            }
            if by_id.insert(card.id, index).is_some() {
                return Err(Error::DuplicateCardId { id: card.id });
            }
        }
        Ok(Self { cards, by_id })
    }

    /// Load and validate a deck from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not a JSON array of
    /// cards, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| Error::DeckRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cards: Vec<Card> = serde_json::from_str(&raw).map_err(|source| Error::DeckParse {
            path: path.to_path_buf(),
            source,
        })?;
        let deck = Self::from_cards(cards)?;
        info!("loaded {} cards from {}", deck.len(), path.display());
        Ok(deck)
    }

    /// Load the deck compiled into the binary.
    ///
    /// # Errors
    ///
    /// Returns an error if the embedded deck fails to parse or validate,
    /// which indicates a packaging bug rather than a user mistake.
    pub fn builtin() -> Result<Self> {
        let cards: Vec<Card> =
            serde_json::from_str(BUILTIN_DECK).map_err(|source| Error::DeckParse {
                path: PathBuf::from(BUILTIN_PATH),
                source,
            })?;
        Self::from_cards(cards)
    }

    /// Look up a card by id.
    #[must_use]
    pub fn get(&self, id: CardId) -> Option<&Card> {
        self.by_id.get(&id).map(|&index| &self.cards[index])
    }

    /// All cards in deck order.
    #[must_use]
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Number of cards in the deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Whether the deck has no cards.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Number of cards at the given difficulty.
    #[must_use]
    pub fn count_at(&self, difficulty: Difficulty) -> usize {
        self.cards
            .iter()
            .filter(|card| card.difficulty == difficulty)
            .count()
    }
}
