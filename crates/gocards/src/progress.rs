//! Study progress and the persistence seam.
//!
//! [`StudyProgress`] is the set of studied card ids with the time each was
//! first marked. The [`ProgressStore`] trait is the only boundary the rest of
//! the crate talks to for persistence, so the SQLite store and the in-memory
//! fallback are interchangeable.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::card::{CardId, Difficulty};
use crate::deck::Deck;
use crate::error::Result;

/// Which cards have been studied, and when each was first marked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudyProgress {
    studied: BTreeMap<CardId, DateTime<Utc>>,
}

impl StudyProgress {
    /// Empty progress: nothing studied yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a card studied at the given time.
    ///
    /// Returns `true` if the card was newly marked. Marking an
    /// already-studied card changes nothing and keeps the original
    /// timestamp, so the operation is idempotent.
    pub fn mark(&mut self, id: CardId, at: DateTime<Utc>) -> bool {
        if self.studied.contains_key(&id) {
            return false;
        }
        self.studied.insert(id, at);
        true
    }

    /// Whether the card has been studied.
    #[must_use]
    pub fn is_studied(&self, id: CardId) -> bool {
        self.studied.contains_key(&id)
    }

    /// When the card was first marked studied, if it has been.
    #[must_use]
    pub fn studied_at(&self, id: CardId) -> Option<DateTime<Utc>> {
        self.studied.get(&id).copied()
    }

    /// Forget everything.
    pub fn clear(&mut self) {
        self.studied.clear();
    }

    /// Number of studied cards, including ids not in the current deck.
    #[must_use]
    pub fn len(&self) -> usize {
        self.studied.len()
    }

    /// Whether nothing has been studied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.studied.is_empty()
    }

    /// Studied entries in ascending card-id order.
    pub fn iter(&self) -> impl Iterator<Item = (CardId, DateTime<Utc>)> + '_ {
        self.studied.iter().map(|(&id, &at)| (id, at))
    }
}

/// Where study progress is saved between runs.
///
/// `load` is infallible by contract: a store that cannot produce saved
/// progress returns empty progress instead of an error, so a corrupt or
/// missing database degrades to a fresh start rather than a crash.
pub trait ProgressStore: std::fmt::Debug {
    /// Short name for log messages.
    fn name(&self) -> &'static str;

    /// Load previously saved progress, or empty progress if none is usable.
    fn load(&self) -> StudyProgress;

    /// Replace the saved progress with the given snapshot.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written. Callers treat
    /// this as non-fatal and keep studying with in-memory progress.
    fn save(&mut self, progress: &StudyProgress) -> Result<()>;
}

/// A [`ProgressStore`] that keeps progress only for the current process.
///
/// Used as the fallback when the SQLite store is unavailable, and as a test
/// double.
#[derive(Debug, Clone, Default)]
pub struct MemoryProgressStore {
    saved: StudyProgress,
}

impl MemoryProgressStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressStore for MemoryProgressStore {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> StudyProgress {
        self.saved.clone()
    }

    fn save(&mut self, progress: &StudyProgress) -> Result<()> {
        self.saved = progress.clone();
        Ok(())
    }
}

/// Studied counts for one difficulty tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TierStats {
    /// The tier these counts describe.
    pub difficulty: Difficulty,
    /// Cards in the deck at this tier.
    pub cards: usize,
    /// Studied cards at this tier.
    pub studied: usize,
}

/// A summary of progress against a deck.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StudyStats {
    /// Total cards in the deck.
    pub total_cards: usize,
    /// Studied cards that are present in the deck.
    pub studied_cards: usize,
    /// Per-tier breakdown, in ascending difficulty order.
    pub by_difficulty: Vec<TierStats>,
}

impl StudyStats {
    /// Compute stats for a deck against saved progress.
    ///
    /// Studied ids that are not in the deck are ignored; they belong to a
    /// different deck and say nothing about this one.
    #[must_use]
    pub fn collect(deck: &Deck, progress: &StudyProgress) -> Self {
        let mut by_difficulty: Vec<TierStats> = Difficulty::ALL
            .into_iter()
            .map(|difficulty| TierStats {
                difficulty,
                cards: deck.count_at(difficulty),
                studied: 0,
            })
            .collect();
        let mut studied_cards = 0;
        for card in deck.cards() {
            if progress.is_studied(card.id) {
                studied_cards += 1;
                if let Some(tier) = by_difficulty
                    .iter_mut()
                    .find(|t| t.difficulty == card.difficulty)
                {
                    tier.studied += 1;
                }
            }
        }
        Self {
            total_cards: deck.len(),
            studied_cards,
            by_difficulty,
        }
    }

    /// Fraction of the deck studied, between 0.0 and 1.0.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f64 {
        if self.total_cards == 0 {
            0.0
        } else {
            self.studied_cards as f64 / self.total_cards as f64
        }
    }
}
