//! The card data model.
//!
//! A card is an immutable question/answer pair tagged with a difficulty.
//! Cards are loaded once at startup and never modified while the program
//! runs; all mutable study state lives elsewhere, keyed by card id.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier for a card within a deck.
pub type CardId = u64;

/// Difficulty tier of a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Fundamentals every Go programmer should know.
    Basic,
    /// The bread and butter of a Go interview.
    Intermediate,
    /// Runtime internals and sharp edges.
    Advanced,
}

impl Difficulty {
    /// All difficulty tiers, in ascending order.
    pub const ALL: [Self; 3] = [Self::Basic, Self::Intermediate, Self::Advanced];

    /// Lowercase name as it appears in deck files and filter labels.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // pad() keeps the tier name usable in aligned table columns.
        f.pad(self.as_str())
    }
}

/// A single flashcard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    /// Unique id within the deck.
    pub id: CardId,
    /// The prompt shown before the flip.
    pub question: String,
    /// The answer revealed on flip.
    pub answer: String,
    /// Difficulty tier, used for filtering and stats.
    pub difficulty: Difficulty,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_difficulty_display() {
        assert_eq!(Difficulty::Basic.to_string(), "basic");
        assert_eq!(Difficulty::Intermediate.to_string(), "intermediate");
        assert_eq!(Difficulty::Advanced.to_string(), "advanced");
    }

    #[test]
    fn test_difficulty_all_is_ordered() {
        assert_eq!(
            Difficulty::ALL,
            [
                Difficulty::Basic,
                Difficulty::Intermediate,
                Difficulty::Advanced
            ]
        );
    }

    #[test]
    fn test_difficulty_serde_lowercase() {
        let json = serde_json::to_string(&Difficulty::Intermediate).unwrap();
        assert_eq!(json, "\"intermediate\"");

        let parsed: Difficulty = serde_json::from_str("\"advanced\"").unwrap();
        assert_eq!(parsed, Difficulty::Advanced);
    }

    #[test]
    fn test_difficulty_rejects_unknown_variant() {
        let result: Result<Difficulty, _> = serde_json::from_str("\"expert\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_card_deserialize() {
        let json = r#"{
            "id": 1,
            "question": "What is a goroutine?",
            "answer": "A lightweight thread managed by the Go runtime.",
            "difficulty": "basic"
        }"#;
        let card: Card = serde_json::from_str(json).unwrap();
        assert_eq!(card.id, 1);
        assert_eq!(card.difficulty, Difficulty::Basic);
        assert!(card.question.contains("goroutine"));
    }

    #[test]
    fn test_card_missing_field_is_rejected() {
        let json = r#"{"id": 1, "question": "q", "difficulty": "basic"}"#;
        let result: Result<Card, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
