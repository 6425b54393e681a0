//! The study view state machine.
//!
//! A [`StudySession`] is the complete view state for one study pass: which
//! cards are in the current selection, where the cursor is, and whether the
//! answer is showing. State changes happen only through [`StudySession::apply`],
//! which takes a [`StudyEvent`] and reports whether progress needs saving.
//! The session itself never touches the terminal or the database, so every
//! transition can be tested directly.

use rand::seq::SliceRandom;
use rand::Rng;

use chrono::Utc;

use crate::card::{Card, CardId, Difficulty};
use crate::deck::Deck;
use crate::progress::StudyProgress;

/// Which cards the session shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Filter {
    /// Every card in the deck.
    #[default]
    All,
    /// Only cards at one difficulty tier.
    Difficulty(Difficulty),
}

impl Filter {
    /// Whether a card at the given difficulty passes this filter.
    #[must_use]
    pub fn matches(self, difficulty: Difficulty) -> bool {
        match self {
            Self::All => true,
            Self::Difficulty(wanted) => wanted == difficulty,
        }
    }

    /// Label for status lines.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Difficulty(difficulty) => difficulty.as_str(),
        }
    }
}

/// An input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StudyEvent {
    /// Toggle between question and answer on the current card.
    Flip,
    /// Move to the next card, wrapping at the end.
    Next,
    /// Move to the previous card, wrapping at the start.
    Previous,
    /// Mark the current card studied.
    MarkStudied,
    /// Switch to a different filter and rebuild the selection.
    ChangeFilter(Filter),
    /// Randomize the order of the current selection.
    Shuffle,
    /// Toggle hiding of already-studied cards.
    ToggleStudyMode,
    /// Clear all studied marks.
    ResetProgress,
}

/// What applying an event changed outside the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Applied {
    /// Progress was modified and should be persisted.
    pub progress_changed: bool,
}

/// View state for one study pass over a deck.
#[derive(Debug, Clone)]
pub struct StudySession {
    filter: Filter,
    study_mode: bool,
    ordered: Vec<CardId>,
    cursor: Option<usize>,
    revealed: bool,
}

impl StudySession {
    /// Start a session over the whole deck, question side up.
    #[must_use]
    pub fn new(deck: &Deck, progress: &StudyProgress) -> Self {
        Self::with_options(deck, progress, Filter::All, false)
    }

    /// Start a session with an initial filter and study-mode setting.
    #[must_use]
    pub fn with_options(
        deck: &Deck,
        progress: &StudyProgress,
        filter: Filter,
        study_mode: bool,
    ) -> Self {
        let mut session = Self {
            filter,
            study_mode,
            ordered: Vec::new(),
            cursor: None,
            revealed: false,
        };
        session.rebuild(deck, progress);
        session
    }

    /// Apply one event, returning what changed beyond the view.
    ///
    /// Events that cannot apply (navigation on an empty selection, flipping
    /// with no current card) are no-ops rather than errors.
    pub fn apply<R: Rng + ?Sized>(
        &mut self,
        deck: &Deck,
        progress: &mut StudyProgress,
        rng: &mut R,
        event: StudyEvent,
    ) -> Applied {
        match event {
            StudyEvent::Flip => {
                if self.cursor.is_some() {
                    self.revealed = !self.revealed;
                }
                Applied::default()
            }
            StudyEvent::Next => {
                self.advance(1);
                Applied::default()
            }
            StudyEvent::Previous => {
                self.advance(-1);
                Applied::default()
            }
            StudyEvent::MarkStudied => {
                let Some(id) = self.current_card_id() else {
                    return Applied::default();
                };
                // Marking never disturbs the view: the card stays put, even
                // in study mode, until the next selection rebuild.
                Applied {
                    progress_changed: progress.mark(id, Utc::now()),
                }
            }
            StudyEvent::ChangeFilter(filter) => {
                self.filter = filter;
                self.rebuild(deck, progress);
                Applied::default()
            }
            StudyEvent::Shuffle => {
                self.ordered.shuffle(rng);
                self.cursor = if self.ordered.is_empty() { None } else { Some(0) };
                self.revealed = false;
                Applied::default()
            }
            StudyEvent::ToggleStudyMode => {
                self.study_mode = !self.study_mode;
                self.rebuild(deck, progress);
                Applied::default()
            }
            StudyEvent::ResetProgress => {
                progress.clear();
                Applied {
                    progress_changed: true,
                }
            }
        }
    }

    /// Recompute the selection in deck order and reset the view position.
    fn rebuild(&mut self, deck: &Deck, progress: &StudyProgress) {
        self.ordered = deck
            .cards()
            .iter()
            .filter(|card| self.filter.matches(card.difficulty))
            .filter(|card| !self.study_mode || !progress.is_studied(card.id))
            .map(|card| card.id)
            .collect();
        self.cursor = if self.ordered.is_empty() { None } else { Some(0) };
        self.revealed = false;
    }

    /// Move the cursor by one step in either direction, with wraparound.
    fn advance(&mut self, direction: isize) {
        if let Some(index) = self.cursor {
            let len = self.ordered.len();
            let next = if direction >= 0 {
                (index + 1) % len
            } else {
                (index + len - 1) % len
            };
            self.cursor = Some(next);
            self.revealed = false;
        }
    }

    /// The active filter.
    #[must_use]
    pub fn filter(&self) -> Filter {
        self.filter
    }

    /// Whether already-studied cards are hidden from the selection.
    #[must_use]
    pub fn study_mode(&self) -> bool {
        self.study_mode
    }

    /// Whether the answer side is showing.
    #[must_use]
    pub fn revealed(&self) -> bool {
        self.revealed
    }

    /// Card ids in the current display order.
    #[must_use]
    pub fn ordered_ids(&self) -> &[CardId] {
        &self.ordered
    }

    /// Number of cards in the current selection.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    /// Whether the current selection is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Id of the card under the cursor, if any.
    #[must_use]
    pub fn current_card_id(&self) -> Option<CardId> {
        self.cursor.map(|index| self.ordered[index])
    }

    /// The card under the cursor, if any.
    #[must_use]
    pub fn current_card<'deck>(&self, deck: &'deck Deck) -> Option<&'deck Card> {
        self.current_card_id().and_then(|id| deck.get(id))
    }

    /// One-based cursor position and selection size, for status lines.
    #[must_use]
    pub fn position(&self) -> Option<(usize, usize)> {
        self.cursor.map(|index| (index + 1, self.ordered.len()))
    }
}
